//! Chunk assignment engine
//!
//! Fixed-point iteration over the chunk set: every pass re-matches all
//! placed modules against the cache groups, materializes the groups that
//! meet their size threshold and moves modules out of their in-scope origin
//! chunks. The loop ends when a pass changes nothing; a configured cap
//! converts rule-induced oscillation into an error instead of a hang.

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use crate::config::CompiledRule;
use crate::error::{ChunkSnapshot, SplitError};
use crate::graph::{ModuleGraph, ModuleId};
use crate::utils::format_size;

use super::chunk::{Chunk, ChunkKind};
use super::matcher::match_module;

/// One cache group's resolved extraction for a single pass.
struct PlannedGroup<'r> {
    rule: &'r CompiledRule,
    modules: Vec<ModuleId>,
    /// In-scope origin chunk indices, parallel to `modules`
    origins: Vec<Vec<usize>>,
}

/// Run the assignment loop until chunk membership stops changing.
pub(crate) fn run_to_fixed_point(
    graph: &ModuleGraph,
    rules: &[CompiledRule],
    mut chunks: Vec<Chunk>,
    iteration_cap: usize,
) -> Result<Vec<Chunk>, SplitError> {
    let placed_before: HashSet<ModuleId> = chunks
        .iter()
        .flat_map(|c| c.modules().iter().copied())
        .collect();

    for iteration in 1..=iteration_cap {
        let changed = apply_pass(graph, rules, &mut chunks);
        chunks.retain(|chunk| !chunk.is_empty());

        if !changed {
            debug!("chunk assignment stable after {} iteration(s)", iteration);
            let placed_after: HashSet<ModuleId> = chunks
                .iter()
                .flat_map(|c| c.modules().iter().copied())
                .collect();
            debug_assert_eq!(placed_before, placed_after, "extraction dropped a module");
            return Ok(chunks);
        }
        trace!("iteration {}: membership changed, continuing", iteration);
    }

    Err(SplitError::Oscillation {
        iterations: iteration_cap,
        last_stable: snapshot(graph, &chunks),
    })
}

/// One pass: match every placed module, materialize eligible groups, move
/// modules. Returns whether any membership changed.
fn apply_pass(graph: &ModuleGraph, rules: &[CompiledRule], chunks: &mut Vec<Chunk>) -> bool {
    // Candidate modules and their containing chunks, captured before any
    // mutation so matching sees one consistent state.
    let mut containing: HashMap<ModuleId, Vec<usize>> = HashMap::new();
    let mut candidates: Vec<ModuleId> = Vec::new();
    for (idx, chunk) in chunks.iter().enumerate() {
        for &module in chunk.modules() {
            let entry = containing.entry(module).or_default();
            if entry.is_empty() {
                candidates.push(module);
            }
            entry.push(idx);
        }
    }

    // Group candidates by their matched rule; declaration index keys the
    // group so processing order is deterministic.
    let mut groups: Vec<PlannedGroup> = Vec::new();
    let mut group_by_rule: HashMap<usize, usize> = HashMap::new();
    for &module in &candidates {
        let chunk_refs: Vec<&Chunk> = containing[&module].iter().map(|&i| &chunks[i]).collect();
        let Some(rule) = match_module(graph, module, &chunk_refs, rules) else {
            continue;
        };

        let origins: Vec<usize> = containing[&module]
            .iter()
            .copied()
            .filter(|&i| rule.rule.chunks.includes(chunks[i].kind))
            .collect();

        let slot = *group_by_rule.entry(rule.index).or_insert_with(|| {
            groups.push(PlannedGroup {
                rule,
                modules: Vec::new(),
                origins: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].modules.push(module);
        groups[slot].origins.push(origins);
    }
    groups.sort_by_key(|g| g.rule.index);

    let mut changed = false;
    for group in &groups {
        let projected: usize = group.modules.iter().map(|&m| graph.size_of(m)).sum();
        if projected < group.rule.rule.min_size {
            trace!(
                "group '{}' rejected: projected {} under min size {}",
                group.rule.rule.name,
                format_size(projected),
                format_size(group.rule.rule.min_size)
            );
            continue;
        }

        let dest = resolve_destination(chunks, group);
        for (slot, &module) in group.modules.iter().enumerate() {
            if chunks[dest].insert(module) {
                changed = true;
            }
            for &origin in &group.origins[slot] {
                if origin != dest && chunks[origin].remove(module) {
                    changed = true;
                }
            }
        }
    }

    changed
}

/// Pick or create the chunk a group's modules move into.
///
/// An existing chunk with the group's name is always reused - this is how
/// a cache group named after an entry folds shared modules back into that
/// entry chunk. With `reuse_existing_chunk`, a non-entry origin chunk whose
/// whole membership is being extracted is adopted as the destination
/// instead of materializing a new chunk next to it.
fn resolve_destination(chunks: &mut Vec<Chunk>, group: &PlannedGroup) -> usize {
    let name = &group.rule.rule.name;
    if let Some(idx) = chunks.iter().position(|c| &c.name == name) {
        return idx;
    }

    if group.rule.rule.reuse_existing_chunk {
        let extracted: HashSet<ModuleId> = group.modules.iter().copied().collect();
        let mut origin_indices: Vec<usize> =
            group.origins.iter().flatten().copied().collect();
        origin_indices.sort_unstable();
        origin_indices.dedup();
        for idx in origin_indices {
            let chunk = &chunks[idx];
            if chunk.kind != ChunkKind::Entry
                && chunk.modules().iter().all(|m| extracted.contains(m))
            {
                debug!("reusing chunk '{}' for group '{}'", chunk.name, name);
                return idx;
            }
        }
    }

    chunks.push(Chunk::new(name.clone(), ChunkKind::Extracted));
    chunks.len() - 1
}

fn snapshot(graph: &ModuleGraph, chunks: &[Chunk]) -> Vec<ChunkSnapshot> {
    chunks
        .iter()
        .map(|chunk| ChunkSnapshot {
            name: chunk.name.clone(),
            modules: chunk
                .modules()
                .iter()
                .map(|&m| graph.path_of(m).to_string())
                .collect(),
        })
        .collect()
}
