//! Cache-group matching
//!
//! The core decision function: given a module and the chunks currently
//! containing it, pick the cache group it should move to. Pure and
//! deterministic - the assignment engine re-runs it every iteration against
//! whatever the chunk membership has become.

use crate::config::CompiledRule;
use crate::graph::{ModuleGraph, ModuleId};

use super::chunk::Chunk;

/// Resolve the cache group for one module, or `None` to keep its current
/// placement.
///
/// `rules` must already be sorted by priority descending then declaration
/// order (see [`crate::config::sort_for_matching`]); the first rule that
/// matches wins. A rule matches when its predicate hits the module's path
/// or an in-scope containing chunk's name, and the number of distinct
/// in-scope containing chunks meets the rule's reuse threshold.
pub(crate) fn match_module<'r>(
    graph: &ModuleGraph,
    module: ModuleId,
    containing: &[&Chunk],
    rules: &'r [CompiledRule],
) -> Option<&'r CompiledRule> {
    let path = graph.path_of(module);

    rules.iter().find(|rule| {
        let in_scope = || {
            containing
                .iter()
                .filter(|chunk| rule.rule.chunks.includes(chunk.kind))
        };

        let reuse_count = in_scope().count();
        if reuse_count == 0 || reuse_count < rule.rule.min_chunks {
            return false;
        }

        rule.matches(path) || in_scope().any(|chunk| rule.matches(&chunk.name))
    })
}
