//! Cache-group rule definitions
//!
//! A cache group describes which modules should be pulled out of their
//! current chunks into a shared one. Rules arrive from the configuration
//! collaborator as plain data; patterns are compiled once at registration
//! so matching itself can never fail.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::splitter::ChunkKind;

/// Which chunk kinds a cache group applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkScope {
    /// Entry, async and extracted chunks alike
    All,
    /// Only chunks seeded by dynamic imports
    #[default]
    Async,
    /// Only entry chunks
    Initial,
}

impl ChunkScope {
    /// Whether a chunk of the given kind falls inside this scope.
    ///
    /// Extracted chunks are reachable only through `All`; an extracted
    /// chunk is neither an initial nor an async load point.
    pub fn includes(self, kind: ChunkKind) -> bool {
        match self {
            ChunkScope::All => true,
            ChunkScope::Async => kind == ChunkKind::AsyncSplit,
            ChunkScope::Initial => kind == ChunkKind::Entry,
        }
    }
}

/// A cache-group rule as declared in configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheGroupRule {
    /// Name of the destination chunk
    pub name: String,

    /// Pattern matched against a module's path or a containing chunk's
    /// name. `None` matches every module.
    #[serde(default)]
    pub test: Option<String>,

    /// Which chunk kinds this rule extracts from
    #[serde(default)]
    pub chunks: ChunkScope,

    /// Higher priority wins; ties break by declaration order
    #[serde(default)]
    pub priority: i32,

    /// Minimum projected size of the extracted chunk, in bytes
    #[serde(default)]
    pub min_size: usize,

    /// Minimum number of distinct in-scope chunks referencing a module
    #[serde(default = "default_min_chunks")]
    pub min_chunks: usize,

    /// Adopt an origin chunk fully drained by the extraction instead of
    /// creating a new one
    #[serde(default)]
    pub reuse_existing_chunk: bool,
}

fn default_min_chunks() -> usize {
    1
}

impl CacheGroupRule {
    /// Create a rule with defaults matching the serde defaults
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            test: None,
            chunks: ChunkScope::default(),
            priority: 0,
            min_size: 0,
            min_chunks: default_min_chunks(),
            reuse_existing_chunk: false,
        }
    }

    pub fn with_test(mut self, pattern: &str) -> Self {
        self.test = Some(pattern.to_string());
        self
    }

    pub fn with_chunks(mut self, scope: ChunkScope) -> Self {
        self.chunks = scope;
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_min_size(mut self, min_size: usize) -> Self {
        self.min_size = min_size;
        self
    }

    pub fn with_min_chunks(mut self, min_chunks: usize) -> Self {
        self.min_chunks = min_chunks;
        self
    }

    pub fn with_reuse_existing_chunk(mut self, reuse: bool) -> Self {
        self.reuse_existing_chunk = reuse;
        self
    }
}

/// Path convention for third-party dependency directories
pub const VENDOR_PATH_PATTERN: &str = r"[\\/]node_modules[\\/]";

/// Built-in cache groups, appended after all user-declared groups unless
/// disabled. Negative priorities keep user rules winning every tie.
pub fn builtin_rules() -> Vec<CacheGroupRule> {
    vec![
        CacheGroupRule::new("vendors")
            .with_test(VENDOR_PATH_PATTERN)
            .with_chunks(ChunkScope::All)
            .with_priority(-10),
        CacheGroupRule::new("default")
            .with_chunks(ChunkScope::All)
            .with_priority(-20)
            .with_min_chunks(2)
            .with_reuse_existing_chunk(true),
    ]
}

/// A rule with its pattern compiled and its declaration index fixed.
///
/// The index is the tiebreak for equal priorities: user rules keep their
/// declaration order and built-in rules sort after all of them.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub rule: CacheGroupRule,
    pub index: usize,
    test: Option<Regex>,
}

impl CompiledRule {
    /// Compile a rule's test pattern; a malformed pattern is rejected here,
    /// before any chunk computation.
    pub fn compile(rule: CacheGroupRule, index: usize) -> Result<Self, ConfigError> {
        if rule.name.is_empty() {
            return Err(ConfigError::EmptyGroupName {
                group: format!("#{}", index),
            });
        }
        let test = match &rule.test {
            Some(pattern) => Some(Regex::new(pattern).map_err(|source| {
                ConfigError::InvalidPattern {
                    group: rule.name.clone(),
                    source,
                }
            })?),
            None => None,
        };
        Ok(Self { rule, index, test })
    }

    /// Whether the predicate matches a module path or chunk name
    pub fn matches(&self, candidate: &str) -> bool {
        match &self.test {
            Some(test) => test.is_match(candidate),
            None => true,
        }
    }
}

/// Sort rules for evaluation: priority descending, then declaration order.
pub fn sort_for_matching(rules: &mut [CompiledRule]) {
    rules.sort_by_key(|r| (std::cmp::Reverse(r.rule.priority), r.index));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scope_includes() {
        assert!(ChunkScope::All.includes(ChunkKind::Entry));
        assert!(ChunkScope::All.includes(ChunkKind::AsyncSplit));
        assert!(ChunkScope::All.includes(ChunkKind::Extracted));
        assert!(ChunkScope::Initial.includes(ChunkKind::Entry));
        assert!(!ChunkScope::Initial.includes(ChunkKind::AsyncSplit));
        assert!(!ChunkScope::Async.includes(ChunkKind::Extracted));
    }

    #[test]
    fn test_malformed_pattern_rejected_at_registration() {
        let rule = CacheGroupRule::new("broken").with_test("(unclosed");
        let err = CompiledRule::compile(rule, 0).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { .. }));
    }

    #[test]
    fn test_vendor_pattern_matches_both_separators() {
        let rule = CompiledRule::compile(
            CacheGroupRule::new("vendors").with_test(VENDOR_PATH_PATTERN),
            0,
        )
        .unwrap();
        assert!(!rule.matches("node_modules/lodash/index.js"));
        assert!(rule.matches("/node_modules/lodash/index.js"));
        assert!(rule.matches(r"C:\project\node_modules\lodash\index.js"));
    }

    #[test]
    fn test_sort_priority_then_declaration_order() {
        let mut rules = vec![
            CompiledRule::compile(CacheGroupRule::new("low").with_priority(-5), 0).unwrap(),
            CompiledRule::compile(CacheGroupRule::new("a").with_priority(1), 1).unwrap(),
            CompiledRule::compile(CacheGroupRule::new("b").with_priority(1), 2).unwrap(),
        ];
        sort_for_matching(&mut rules);
        let names: Vec<&str> = rules.iter().map(|r| r.rule.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "low"]);
    }

    #[test]
    fn test_serde_defaults() {
        let rule: CacheGroupRule =
            serde_json::from_str(r#"{"name": "vendors", "test": "node_modules"}"#).unwrap();
        assert_eq!(rule.chunks, ChunkScope::Async);
        assert_eq!(rule.priority, 0);
        assert_eq!(rule.min_chunks, 1);
        assert_eq!(rule.min_size, 0);
        assert!(!rule.reuse_existing_chunk);
    }
}
