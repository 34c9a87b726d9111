//! Wiki page path normalization.

/// Trim whitespace and strip every leading and trailing slash.
///
/// Whitespace and slashes are stripped as one class so the result is stable:
/// `normalize_wiki_path(normalize_wiki_path(p)) == normalize_wiki_path(p)`.
pub fn normalize_wiki_path(path: &str) -> String {
    path.trim_matches(|c: char| c == '/' || c.is_whitespace())
        .to_string()
}
