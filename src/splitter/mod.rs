//! Chunk splitting pipeline
//!
//! Wires the stages together: entry resolution seeds the initial chunk set,
//! the assignment engine runs cache-group extraction to a fixed point, and
//! the result renders into the output manifest.

mod assign;
mod chunk;
mod entries;
mod matcher;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::SplitOptions;
use crate::error::{Result, TemplateError};
use crate::graph::ModuleGraph;
use crate::naming::render_filename;
use crate::utils::{format_size, hash_identities};

pub use chunk::{Chunk, ChunkKind};

/// One manifest entry, consumed by the file-emission collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct OutputChunk {
    #[serde(rename = "chunkName")]
    pub chunk_name: String,

    pub filename: String,

    #[serde(rename = "moduleList")]
    pub modules: Vec<String>,

    #[serde(rename = "totalSize")]
    pub total_size: usize,
}

/// Final chunk assignment for one build.
///
/// Borrows the graph it was computed against so manifest rendering can
/// resolve module paths and sizes.
#[derive(Debug)]
pub struct SplitResult<'g> {
    graph: &'g ModuleGraph,
    chunks: Vec<Chunk>,
    filename_template: String,
}

/// Run the whole split: validate options, seed chunks from entries, drive
/// cache-group assignment to a fixed point.
pub fn split<'g>(graph: &'g ModuleGraph, options: &SplitOptions) -> Result<SplitResult<'g>> {
    let rules = options.compile()?;
    let seeded = entries::seed_chunks(graph, options)?;
    debug!(
        "seeded {} chunk(s) from {} entry point(s)",
        seeded.len(),
        options.entries.len()
    );

    let chunks = assign::run_to_fixed_point(graph, &rules, seeded, options.iteration_cap)?;
    info!(
        "split produced {} chunk(s), {} total",
        chunks.len(),
        format_size(chunks.iter().map(|c| c.total_size(graph)).sum())
    );

    Ok(SplitResult {
        graph,
        chunks,
        filename_template: options.filename_template.clone(),
    })
}

impl<'g> SplitResult<'g> {
    /// All chunks: entries in declaration order first, then generated
    /// chunks in creation order.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Look up a chunk by name
    pub fn chunk(&self, name: &str) -> Option<&Chunk> {
        self.chunks.iter().find(|c| c.name == name)
    }

    /// Member module paths of a chunk, in member order
    pub fn module_paths(&self, chunk: &Chunk) -> Vec<String> {
        chunk
            .modules()
            .iter()
            .map(|&id| self.graph.path_of(id).to_string())
            .collect()
    }

    /// Render the output manifest with the configured filename template.
    pub fn render_manifest(&self) -> std::result::Result<Vec<OutputChunk>, TemplateError> {
        self.render_manifest_with(&self.filename_template)
    }

    /// Render the output manifest with an explicit template.
    ///
    /// Naming failures do not invalidate the computed assignment; callers
    /// keep this result and may retry with a corrected template.
    pub fn render_manifest_with(
        &self,
        template: &str,
    ) -> std::result::Result<Vec<OutputChunk>, TemplateError> {
        let mut ordered: Vec<&Chunk> = self
            .chunks
            .iter()
            .filter(|c| c.kind == ChunkKind::Entry)
            .collect();
        let mut generated: Vec<&Chunk> = self
            .chunks
            .iter()
            .filter(|c| c.kind != ChunkKind::Entry)
            .collect();
        generated.sort_by(|a, b| a.name.cmp(&b.name));
        ordered.extend(generated);

        ordered
            .into_iter()
            .map(|chunk| {
                let modules = self.module_paths(chunk);
                let hash = hash_identities(&modules);
                let filename = render_filename(template, &chunk.name, &hash)?;
                Ok(OutputChunk {
                    chunk_name: chunk.name.clone(),
                    filename,
                    modules,
                    total_size: chunk.total_size(self.graph),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CacheGroupRule, ChunkScope};
    use crate::graph::ImportKind;
    use pretty_assertions::assert_eq;

    /// Two entries that both pull in lodash, plus a second vendor package
    /// behind a lower-priority group.
    fn fixture() -> (ModuleGraph, SplitOptions) {
        let mut graph = ModuleGraph::new();
        let main = graph.add_module("src/index.js", 34_400);
        let sum = graph.add_module("src/sum.js", 9_000);
        let lodash = graph.add_module("/app/node_modules/lodash/index.js", 550_000);
        let axios = graph.add_module("/app/node_modules/axios/index.js", 120_000);
        graph.add_edge(main, lodash, ImportKind::Static);
        graph.add_edge(main, axios, ImportKind::Static);
        graph.add_edge(sum, lodash, ImportKind::Static);

        let options = SplitOptions::single_entry("main", "src/index.js")
            .with_entry("sum", "src/sum.js")
            .without_builtin_groups()
            .with_cache_group(
                CacheGroupRule::new("lodash-split")
                    .with_test(r"[\\/]node_modules[\\/]lodash[\\/]")
                    .with_chunks(ChunkScope::All)
                    .with_priority(2),
            )
            .with_cache_group(
                CacheGroupRule::new("node_modules")
                    .with_test(r"[\\/]node_modules[\\/]")
                    .with_chunks(ChunkScope::All)
                    .with_priority(1),
            );
        (graph, options)
    }

    #[test]
    fn test_layered_vendor_split() {
        let (graph, options) = fixture();
        let result = split(&graph, &options).unwrap();

        let names: Vec<&str> = result.chunks().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["main", "sum", "lodash-split", "node_modules"]);

        // lodash won the higher-priority group; the other vendor fell
        // through to the general node_modules group
        let lodash_chunk = result.chunk("lodash-split").unwrap();
        assert_eq!(result.module_paths(lodash_chunk), vec![
            "/app/node_modules/lodash/index.js".to_string()
        ]);
        let vendor_chunk = result.chunk("node_modules").unwrap();
        assert_eq!(result.module_paths(vendor_chunk), vec![
            "/app/node_modules/axios/index.js".to_string()
        ]);
    }

    #[test]
    fn test_manifest_rendering() {
        let (graph, options) = fixture();
        let result = split(&graph, &options).unwrap();
        let manifest = result.render_manifest().unwrap();

        assert_eq!(manifest.len(), 4);
        assert_eq!(manifest[0].chunk_name, "main");
        assert_eq!(manifest[0].filename, "main.bundle.js");
        assert_eq!(manifest[2].chunk_name, "lodash-split");
        assert_eq!(manifest[2].total_size, 550_000);
    }

    #[test]
    fn test_template_error_leaves_assignment_usable() {
        let (graph, options) = fixture();
        let result = split(&graph, &options).unwrap();

        let err = result.render_manifest_with("[name].[id].js").unwrap_err();
        assert_eq!(err.placeholder, "id");

        // Retry with a corrected template against the same assignment
        let manifest = result.render_manifest_with("[name].[hash].js").unwrap();
        assert_eq!(manifest.len(), 4);
        assert!(manifest[0].filename.starts_with("main."));
    }

    #[test]
    fn test_manifest_serializes_output_contract() {
        let (graph, options) = fixture();
        let result = split(&graph, &options).unwrap();
        let manifest = result.render_manifest().unwrap();

        let json = serde_json::to_value(&manifest).unwrap();
        let first = &json[0];
        assert!(first.get("chunkName").is_some());
        assert!(first.get("filename").is_some());
        assert!(first.get("moduleList").is_some());
        assert!(first.get("totalSize").is_some());
    }
}
