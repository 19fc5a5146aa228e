//! Module graph data structures
//!
//! The dependency graph is built by an external resolver and handed to the
//! engine fully materialized. Once assignment starts the graph is read-only;
//! chunk membership is tracked by the splitter, not here.

use std::collections::{HashMap, HashSet, VecDeque};

use serde::Deserialize;
use tracing::debug;

/// Unique identifier for a module
pub type ModuleId = usize;

/// Kind of import edge between two modules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    /// `import x from '...'` - member of the importer's chunk closure
    Static,
    /// `import('...')` - seeds a separate async chunk
    Dynamic,
}

/// Which edges a reachability traversal follows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    /// Static edges only (chunk closure)
    StaticOnly,
    /// Static and dynamic edges (whole-graph reachability)
    All,
}

/// A module in the dependency graph
#[derive(Debug, Clone)]
pub struct Module {
    /// Resolved source path; the module's identity
    pub path: String,

    /// Size of the module source in bytes
    pub size: usize,

    /// Statically imported modules, in declaration order
    pub static_imports: Vec<ModuleId>,

    /// Dynamically imported modules, in declaration order
    pub dynamic_imports: Vec<ModuleId>,
}

/// Adjacency record for one module, as supplied by an external resolver.
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleRecord {
    pub path: String,
    #[serde(default)]
    pub size: usize,
    #[serde(default)]
    pub static_imports: Vec<String>,
    #[serde(default)]
    pub dynamic_imports: Vec<String>,
}

/// The module dependency graph
#[derive(Debug, Default)]
pub struct ModuleGraph {
    /// All modules, indexed by their ID
    modules: Vec<Module>,

    /// Map from path to module ID
    path_to_id: HashMap<String, ModuleId>,
}

impl ModuleGraph {
    /// Create a new empty module graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from adjacency records.
    ///
    /// All modules are registered before edges are wired, so record order
    /// does not matter. An import naming a path with no record is the
    /// resolver's defect; the edge is skipped.
    pub fn from_records(records: &[ModuleRecord]) -> Self {
        let mut graph = Self::new();
        for record in records {
            graph.add_module(&record.path, record.size);
        }
        for record in records {
            let from = graph.path_to_id[&record.path];
            for target in &record.static_imports {
                match graph.module_id(target) {
                    Some(to) => graph.add_edge(from, to, ImportKind::Static),
                    None => debug!("skipping unresolved static import: {}", target),
                }
            }
            for target in &record.dynamic_imports {
                match graph.module_id(target) {
                    Some(to) => graph.add_edge(from, to, ImportKind::Dynamic),
                    None => debug!("skipping unresolved dynamic import: {}", target),
                }
            }
        }
        graph
    }

    /// Add a module to the graph, returning its ID.
    ///
    /// Adding the same path twice returns the existing ID.
    pub fn add_module(&mut self, path: &str, size: usize) -> ModuleId {
        if let Some(&id) = self.path_to_id.get(path) {
            return id;
        }

        let id = self.modules.len();
        self.path_to_id.insert(path.to_string(), id);
        self.modules.push(Module {
            path: path.to_string(),
            size,
            static_imports: Vec::new(),
            dynamic_imports: Vec::new(),
        });

        id
    }

    /// Add an import edge between modules
    pub fn add_edge(&mut self, from: ModuleId, to: ModuleId, kind: ImportKind) {
        if to >= self.modules.len() {
            debug!("ignoring edge to unknown module id {}", to);
            return;
        }
        let Some(module) = self.modules.get_mut(from) else {
            debug!("ignoring edge from unknown module id {}", from);
            return;
        };
        let edges = match kind {
            ImportKind::Static => &mut module.static_imports,
            ImportKind::Dynamic => &mut module.dynamic_imports,
        };
        if !edges.contains(&to) {
            edges.push(to);
        }
    }

    /// Get module ID from path
    pub fn module_id(&self, path: &str) -> Option<ModuleId> {
        self.path_to_id.get(path).copied()
    }

    /// Get a module by ID
    pub fn module(&self, id: ModuleId) -> Option<&Module> {
        self.modules.get(id)
    }

    /// Path of a module, by ID
    pub fn path_of(&self, id: ModuleId) -> &str {
        &self.modules[id].path
    }

    /// Size of a module in bytes, by ID
    pub fn size_of(&self, id: ModuleId) -> usize {
        self.modules[id].size
    }

    /// All modules reachable from a starting module (BFS).
    ///
    /// Import graphs may be cyclic; the visited set guarantees termination.
    /// The returned order is deterministic: breadth-first, edges in
    /// declaration order.
    pub fn reachable_from(&self, start: ModuleId, traversal: Traversal) -> Vec<ModuleId> {
        let mut visited = HashSet::new();
        let mut result = Vec::new();
        let mut queue = VecDeque::new();

        if start >= self.modules.len() {
            return result;
        }

        queue.push_back(start);
        visited.insert(start);

        while let Some(id) = queue.pop_front() {
            result.push(id);

            let module = &self.modules[id];
            for &dep in &module.static_imports {
                if visited.insert(dep) {
                    queue.push_back(dep);
                }
            }
            if traversal == Traversal::All {
                for &dep in &module.dynamic_imports {
                    if visited.insert(dep) {
                        queue.push_back(dep);
                    }
                }
            }
        }

        result
    }

    /// Every unique dynamic-import target in the graph, in discovery order
    /// (by importer ID, then declaration order).
    pub fn dynamic_targets(&self) -> Vec<ModuleId> {
        let mut seen = HashSet::new();
        let mut targets = Vec::new();
        for module in &self.modules {
            for &target in &module.dynamic_imports {
                if seen.insert(target) {
                    targets.push(target);
                }
            }
        }
        targets
    }

    /// Total number of modules
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Check if graph is empty
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
