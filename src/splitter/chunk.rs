//! Chunk representation

use std::collections::HashSet;

use crate::graph::{ModuleGraph, ModuleId};

/// How a chunk came to exist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
    /// Created for a configured entry point - loaded immediately
    Entry,
    /// Seeded by a dynamic import - loaded on demand
    AsyncSplit,
    /// Materialized by a cache-group extraction
    Extracted,
}

/// A group of modules bundled into one output file.
///
/// Membership is an ordered set: insertion order is preserved so output is
/// deterministic, and lookups stay O(1).
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Chunk name; also the chunk's identity
    pub name: String,

    /// Origin of the chunk
    pub kind: ChunkKind,

    modules: Vec<ModuleId>,
    members: HashSet<ModuleId>,
}

impl Chunk {
    pub fn new(name: String, kind: ChunkKind) -> Self {
        Self {
            name,
            kind,
            modules: Vec::new(),
            members: HashSet::new(),
        }
    }

    /// Add a module; returns false if it was already a member
    pub fn insert(&mut self, id: ModuleId) -> bool {
        if self.members.insert(id) {
            self.modules.push(id);
            true
        } else {
            false
        }
    }

    /// Remove a module; returns false if it was not a member
    pub fn remove(&mut self, id: ModuleId) -> bool {
        if self.members.remove(&id) {
            self.modules.retain(|&m| m != id);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, id: ModuleId) -> bool {
        self.members.contains(&id)
    }

    /// Member modules in insertion order
    pub fn modules(&self) -> &[ModuleId] {
        &self.modules
    }

    /// Sum of member module sizes in bytes
    pub fn total_size(&self, graph: &ModuleGraph) -> usize {
        self.modules.iter().map(|&id| graph.size_of(id)).sum()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
