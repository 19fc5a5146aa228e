//! Entry resolution
//!
//! Turns the configured entry list into the initial chunk set: one entry
//! chunk per entry containing its static closure, plus one async chunk per
//! unique dynamic-import target reachable from the entries.

use std::collections::HashSet;

use tracing::debug;

use crate::config::SplitOptions;
use crate::error::ConfigError;
use crate::graph::{ModuleGraph, ModuleId, Traversal};
use crate::utils::path_to_chunk_name;

use super::chunk::{Chunk, ChunkKind};

/// Seed entry and async chunks from the configured entry points.
pub(crate) fn seed_chunks(
    graph: &ModuleGraph,
    options: &SplitOptions,
) -> Result<Vec<Chunk>, ConfigError> {
    let mut chunks: Vec<Chunk> = Vec::new();
    let mut used_names: HashSet<String> = HashSet::new();

    // Visit order across all entries, following static and dynamic edges.
    // Drives deterministic async-chunk discovery below.
    let mut reachable: HashSet<ModuleId> = HashSet::new();
    let mut visit_order: Vec<ModuleId> = Vec::new();

    for (name, root) in &options.entries {
        let root_id = graph
            .module_id(root)
            .ok_or_else(|| ConfigError::UnknownEntryModule {
                name: name.clone(),
                path: root.clone(),
            })?;

        if !used_names.insert(name.clone()) {
            return Err(ConfigError::DuplicateChunkName { name: name.clone() });
        }

        let mut chunk = Chunk::new(name.clone(), ChunkKind::Entry);
        for id in graph.reachable_from(root_id, Traversal::StaticOnly) {
            chunk.insert(id);
        }
        debug!(
            "entry chunk '{}': {} modules from {}",
            name,
            chunk.len(),
            root
        );
        chunks.push(chunk);

        for id in graph.reachable_from(root_id, Traversal::All) {
            if reachable.insert(id) {
                visit_order.push(id);
            }
        }
    }

    // One async chunk per unique dynamic-import target, created lazily in
    // discovery order.
    let mut seen_targets: HashSet<ModuleId> = HashSet::new();
    for &importer in &visit_order {
        let Some(module) = graph.module(importer) else {
            continue;
        };
        for &target in &module.dynamic_imports {
            if !seen_targets.insert(target) {
                continue;
            }
            let name = disambiguate(path_to_chunk_name(graph.path_of(target)), &mut used_names);
            let mut chunk = Chunk::new(name, ChunkKind::AsyncSplit);
            for id in graph.reachable_from(target, Traversal::StaticOnly) {
                chunk.insert(id);
            }
            debug!(
                "async chunk '{}': {} modules from {}",
                chunk.name,
                chunk.len(),
                graph.path_of(target)
            );
            chunks.push(chunk);
        }
    }

    Ok(chunks)
}

/// Generated async chunk names never collide with entries or each other;
/// a taken base name gets a numeric suffix.
fn disambiguate(base: String, used_names: &mut HashSet<String>) -> String {
    if used_names.insert(base.clone()) {
        return base;
    }
    let mut n = 1;
    loop {
        let candidate = format!("{}-{}", base, n);
        if used_names.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}
