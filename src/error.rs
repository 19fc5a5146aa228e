//! Error types for the chunk-assignment engine
//!
//! All failures are typed: configuration defects surface before any chunk
//! computation starts, and pattern problems are caught at rule registration
//! so the matcher itself never fails mid-iteration.

use thiserror::Error;

/// Invalid input contract: entries, rules or templates that can never
/// produce a valid split. Fatal before any chunk computation.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no entrypoints configured")]
    NoEntrypoints,

    #[error("entry '{name}' collides with an existing chunk name")]
    DuplicateChunkName { name: String },

    #[error("entry '{name}' points to unknown module: {path}")]
    UnknownEntryModule { name: String, path: String },

    #[error("cache group '{group}' has an empty name template")]
    EmptyGroupName { group: String },

    #[error("cache group '{group}' has a malformed test pattern: {source}")]
    InvalidPattern {
        group: String,
        #[source]
        source: regex::Error,
    },
}

/// Unknown placeholder in an output filename template.
///
/// Raised at the naming stage only; a computed chunk assignment is still
/// returned so the caller can retry with a corrected template.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown placeholder '[{placeholder}]' in template '{template}'")]
pub struct TemplateError {
    pub placeholder: String,
    pub template: String,
}

/// Chunk membership of one chunk, captured for oscillation diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkSnapshot {
    pub name: String,
    pub modules: Vec<String>,
}

/// Top-level failure of a split run.
#[derive(Error, Debug)]
pub enum SplitError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The fixed-point loop kept reassigning modules past the iteration cap.
    /// Indicates rule misconfiguration (typically two chunk-name predicates
    /// extracting from each other). Carries the last stable assignment so
    /// callers can report which chunks were bouncing.
    #[error("chunk assignment did not stabilize within {iterations} iterations")]
    Oscillation {
        iterations: usize,
        last_stable: Vec<ChunkSnapshot>,
    },
}

pub type Result<T> = std::result::Result<T, SplitError>;
