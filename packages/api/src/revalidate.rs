//! Path-keyed revalidation registry.
//!
//! Every mutating server function marks the page path it affects as stale by
//! bumping a process-wide version counter for that path. Cached query results
//! remember the version they were filled at and are refreshed once the counter
//! has advanced. There is no other invalidation scheme.

use std::collections::HashMap;
use std::sync::{LazyLock, RwLock};

static VERSIONS: LazyLock<RwLock<HashMap<String, u64>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// Mark a page path stale, advancing its version counter.
pub fn mark_stale(path: &str) {
    let mut versions = VERSIONS.write().expect("revalidation registry poisoned");
    *versions.entry(path.to_string()).or_insert(0) += 1;
}

/// Current version of a path. Paths never marked stale are at version 0.
pub fn version(path: &str) -> u64 {
    let versions = VERSIONS.read().expect("revalidation registry poisoned");
    versions.get(path).copied().unwrap_or(0)
}

/// A value cached for a page path, tagged with the version it was filled at.
#[derive(Debug, Clone)]
pub struct Cached<T> {
    pub version: u64,
    pub value: T,
}

impl<T> Cached<T> {
    pub fn fill(path: &str, value: T) -> Self {
        Self {
            version: version(path),
            value,
        }
    }

    /// Whether the cached value is still current for `path`.
    pub fn is_fresh(&self, path: &str) -> bool {
        self.version == version(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_stale_advances_version() {
        let path = "/test/mark-stale";
        assert_eq!(version(path), 0);
        mark_stale(path);
        assert_eq!(version(path), 1);
        mark_stale(path);
        assert_eq!(version(path), 2);
    }

    #[test]
    fn cached_value_goes_stale_only_when_marked() {
        let path = "/test/cached";
        let cached = Cached::fill(path, vec![1, 2, 3]);
        assert!(cached.is_fresh(path));

        // Staleness is per path.
        mark_stale("/test/other");
        assert!(cached.is_fresh(path));

        mark_stale(path);
        assert!(!cached.is_fresh(path));

        let refilled = Cached::fill(path, cached.value);
        assert!(refilled.is_fresh(path));
    }
}
