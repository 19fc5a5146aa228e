//! Utility functions and helpers

use sha2::{Digest, Sha256};

/// Generate a short hash of the given content
pub fn hash_content(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    let result = hasher.finalize();
    hex::encode(&result[..8])
}

/// Generate a stable short hash over a list of module identities.
///
/// The list is hashed in the order given; callers sort it first when the
/// digest must be independent of insertion order.
pub fn hash_identities<S: AsRef<str>>(identities: &[S]) -> String {
    let mut buf = Vec::new();
    for id in identities {
        buf.extend_from_slice(id.as_ref().as_bytes());
        // Separator keeps ["ab", "c"] distinct from ["a", "bc"]
        buf.push(0);
    }
    hash_content(&buf)
}

/// Format bytes as human-readable size
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = KB * 1024;
    const GB: usize = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Reduce a module path to an identifier usable as a chunk name.
///
/// Strips the extension, keeps the final path segment, and maps anything
/// outside `[A-Za-z0-9_-]` to `_` so the name is safe inside a filename.
pub fn path_to_chunk_name(path: &str) -> String {
    let normalized = path.replace('\\', "/");
    let last = normalized.rsplit('/').next().unwrap_or("");
    let stem = match last.rsplit_once('.') {
        Some((stem, _ext)) if !stem.is_empty() => stem,
        _ => last,
    };

    let cleaned: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() {
        "chunk".to_string()
    } else {
        cleaned
    }
}
