//! Input contract for a split run
//!
//! Options are handed over fully formed by a configuration-loading
//! collaborator; this crate never reads configuration files itself.

mod rules;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub use rules::{
    builtin_rules, sort_for_matching, CacheGroupRule, ChunkScope, CompiledRule,
    VENDOR_PATH_PATTERN,
};

/// Everything a split run needs besides the module graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitOptions {
    /// Entry points in declaration order: chunk name -> root module path
    pub entries: Vec<(String, String)>,

    /// Output filename template, e.g. `[name].bundle.js`
    #[serde(default = "default_filename_template")]
    pub filename_template: String,

    /// Cache-group rules in declaration order
    #[serde(default)]
    pub cache_groups: Vec<CacheGroupRule>,

    /// Append the built-in `vendors`/`default` groups after user rules
    #[serde(default = "default_true")]
    pub builtin_groups: bool,

    /// Upper bound on fixed-point iterations before the run is declared
    /// oscillating
    #[serde(default = "default_iteration_cap")]
    pub iteration_cap: usize,
}

fn default_filename_template() -> String {
    "[name].bundle.js".to_string()
}

fn default_true() -> bool {
    true
}

fn default_iteration_cap() -> usize {
    25
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            filename_template: default_filename_template(),
            cache_groups: Vec::new(),
            builtin_groups: true,
            iteration_cap: default_iteration_cap(),
        }
    }
}

impl SplitOptions {
    /// Options with a single entry and otherwise defaults
    pub fn single_entry(name: &str, root: &str) -> Self {
        Self {
            entries: vec![(name.to_string(), root.to_string())],
            ..Self::default()
        }
    }

    /// Add an entry point, keeping declaration order
    pub fn with_entry(mut self, name: &str, root: &str) -> Self {
        self.entries.push((name.to_string(), root.to_string()));
        self
    }

    /// Add a cache-group rule, keeping declaration order
    pub fn with_cache_group(mut self, rule: CacheGroupRule) -> Self {
        self.cache_groups.push(rule);
        self
    }

    /// Disable the built-in `vendors`/`default` groups
    pub fn without_builtin_groups(mut self) -> Self {
        self.builtin_groups = false;
        self
    }

    pub fn with_filename_template(mut self, template: &str) -> Self {
        self.filename_template = template.to_string();
        self
    }

    pub fn with_iteration_cap(mut self, cap: usize) -> Self {
        self.iteration_cap = cap;
        self
    }

    /// Validate entries and compile every rule.
    ///
    /// Returns the compiled rule set sorted for matching. All configuration
    /// defects surface here, before chunk computation starts.
    pub fn compile(&self) -> Result<Vec<CompiledRule>, ConfigError> {
        if self.entries.is_empty() {
            return Err(ConfigError::NoEntrypoints);
        }

        let mut seen = std::collections::HashSet::new();
        for (name, _) in &self.entries {
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::DuplicateChunkName { name: name.clone() });
            }
        }

        let mut compiled = Vec::with_capacity(
            self.cache_groups.len() + if self.builtin_groups { 2 } else { 0 },
        );
        for (index, rule) in self.cache_groups.iter().cloned().enumerate() {
            compiled.push(CompiledRule::compile(rule, index)?);
        }
        if self.builtin_groups {
            let base = self.cache_groups.len();
            for (offset, rule) in builtin_rules().into_iter().enumerate() {
                compiled.push(CompiledRule::compile(rule, base + offset)?);
            }
        }

        sort_for_matching(&mut compiled);
        Ok(compiled)
    }
}
