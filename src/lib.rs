//! splitchunks - module deduplication and chunk assignment for bundlers
//!
//! Takes a fully-materialized module dependency graph, a list of named
//! entry points and a list of cache-group rules, and decides which final
//! chunk every module belongs to: entry chunks get their static closures,
//! dynamic imports seed async chunks, and cache groups extract shared or
//! vendor modules into dedicated chunks by priority and size thresholds.
//!
//! The engine is a pure, synchronous, in-memory transform invoked once per
//! build. Reading configuration files, resolving and parsing sources, and
//! writing output files are the caller's concern.
//!
//! # Example
//! ```
//! use splitchunks::{CacheGroupRule, ChunkScope, ImportKind, ModuleGraph, SplitOptions};
//!
//! let mut graph = ModuleGraph::new();
//! let main = graph.add_module("src/index.js", 1_200);
//! let sum = graph.add_module("src/sum.js", 800);
//! let lodash = graph.add_module("node_modules/lodash/index.js", 70_000);
//! graph.add_edge(main, lodash, ImportKind::Static);
//! graph.add_edge(sum, lodash, ImportKind::Static);
//!
//! let options = SplitOptions::single_entry("main", "src/index.js")
//!     .with_entry("sum", "src/sum.js")
//!     .with_cache_group(
//!         CacheGroupRule::new("vendor")
//!             .with_test("node_modules")
//!             .with_chunks(ChunkScope::All)
//!             .with_min_chunks(2)
//!             .with_priority(1),
//!     );
//!
//! let result = splitchunks::split(&graph, &options).unwrap();
//! assert!(result.chunk("vendor").is_some());
//! ```

pub mod config;
pub mod error;
pub mod graph;
pub mod naming;
pub mod splitter;
pub mod utils;

pub use config::{builtin_rules, CacheGroupRule, ChunkScope, SplitOptions};
pub use error::{ChunkSnapshot, ConfigError, SplitError, TemplateError};
pub use graph::{ImportKind, ModuleGraph, ModuleId, ModuleRecord, Traversal};
pub use splitter::{split, Chunk, ChunkKind, OutputChunk, SplitResult};
