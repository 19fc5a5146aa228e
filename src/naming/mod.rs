//! Output filename rendering
//!
//! Renders final chunk names into file names. Template syntax is the
//! square-bracket placeholder form: `[name]` is the chunk name, `[hash]` a
//! short digest of the chunk's member identities for cache busting.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::TemplateError;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\[\]]*)\]").unwrap());

/// Render a chunk's output filename from a template.
///
/// Unknown placeholders fail with [`TemplateError`]; text outside brackets
/// is copied through verbatim.
pub fn render_filename(template: &str, name: &str, hash: &str) -> Result<String, TemplateError> {
    let mut unknown: Option<String> = None;
    let rendered = PLACEHOLDER.replace_all(template, |caps: &regex::Captures| {
        match &caps[1] {
            "name" => name.to_string(),
            "hash" => hash.to_string(),
            other => {
                if unknown.is_none() {
                    unknown = Some(other.to_string());
                }
                String::new()
            }
        }
    });

    match unknown {
        Some(placeholder) => Err(TemplateError {
            placeholder,
            template: template.to_string(),
        }),
        None => Ok(rendered.into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_name_placeholder() {
        let filename = render_filename("[name].bundle.js", "main", "deadbeef").unwrap();
        assert_eq!(filename, "main.bundle.js");
    }

    #[test]
    fn test_hash_placeholder() {
        let filename = render_filename("[name].[hash].js", "main", "deadbeef").unwrap();
        assert_eq!(filename, "main.deadbeef.js");
    }

    #[test]
    fn test_repeated_placeholders() {
        let filename = render_filename("[name]/[name].js", "sum", "").unwrap();
        assert_eq!(filename, "sum/sum.js");
    }

    #[test]
    fn test_unknown_placeholder_fails() {
        let err = render_filename("[name].[contenthash].js", "main", "x").unwrap_err();
        assert_eq!(err.placeholder, "contenthash");
        assert_eq!(err.template, "[name].[contenthash].js");
    }

    #[test]
    fn test_template_without_placeholders() {
        assert_eq!(render_filename("bundle.js", "main", "x").unwrap(), "bundle.js");
    }

    #[test]
    fn test_unmatched_bracket_is_literal() {
        assert_eq!(render_filename("[name.js", "main", "x").unwrap(), "[name.js");
    }
}
