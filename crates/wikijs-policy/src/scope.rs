//! Path-prefix allow-list for writes.

use wikijs_core::{WikiError, normalize_wiki_path};

/// Prefixes that writes are confined to. Empty means every path is allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathScope {
    prefixes: Vec<String>,
}

impl PathScope {
    /// Build a scope; prefixes are normalized and empty ones dropped.
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            prefixes: prefixes
                .into_iter()
                .map(|p| normalize_wiki_path(p.as_ref()))
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    pub fn is_unrestricted(&self) -> bool {
        self.prefixes.is_empty()
    }

    /// Whether `path` is equal to a prefix or below one (`prefix/...`).
    pub fn allows(&self, path: &str) -> bool {
        if self.is_unrestricted() {
            return true;
        }
        let normalized = normalize_wiki_path(path);
        self.prefixes.iter().any(|prefix| {
            normalized == *prefix
                || normalized
                    .strip_prefix(prefix.as_str())
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }

    /// Fail with `PathNotAllowed` unless `path` is inside the scope.
    pub fn check(&self, path: &str) -> Result<(), WikiError> {
        if self.allows(path) {
            Ok(())
        } else {
            Err(WikiError::path_not_allowed(
                &normalize_wiki_path(path),
                &self.prefixes,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wikijs_core::ErrorKind;

    #[test]
    fn test_prefix_boundaries() {
        let scope = PathScope::new(["docs", "guides"]);
        assert!(scope.allows("docs"));
        assert!(scope.allows("docs/intro"));
        assert!(scope.allows("/docs/intro/"));
        assert!(scope.allows("guides/setup"));
        assert!(!scope.allows("docs-archive/old"));
        assert!(!scope.allows("admin"));
        assert!(!scope.allows(""));
    }

    #[test]
    fn test_unrestricted() {
        let scope = PathScope::new(Vec::<String>::new());
        assert!(scope.is_unrestricted());
        assert!(scope.allows("anything/at/all"));
        assert!(scope.allows(""));
    }

    #[test]
    fn test_prefixes_normalized() {
        let scope = PathScope::new(["/docs/", "  ", "//"]);
        assert_eq!(scope.prefixes(), ["docs".to_string()]);
    }

    #[test]
    fn test_check_error_names_path_and_prefixes() {
        let scope = PathScope::new(["docs", "guides"]);
        let err = scope.check("/admin/users").unwrap_err();
        assert_eq!(err.kind, ErrorKind::PathNotAllowed);
        assert!(err.message.contains("'admin/users'"));
        assert!(err.message.contains("docs, guides"));
    }
}
