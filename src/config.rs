//! Search configuration.

use serde::{Deserialize, Serialize};

/// Bounds on path enumeration.
///
/// The number of simple paths between two stations can grow exponentially
/// with graph density. Hosts that need bounded latency cap the search here;
/// the default is unlimited, which enumerates every simple path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchLimits {
    /// Maximum number of links in an enumerated path.
    pub max_depth: Option<usize>,
    /// Maximum number of paths collected before the search stops.
    pub max_paths: Option<usize>,
}

impl SearchLimits {
    /// No limits.
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Limit the number of links per path.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Limit the number of collected paths.
    pub fn with_max_paths(mut self, max_paths: usize) -> Self {
        self.max_paths = Some(max_paths);
        self
    }

    /// Whether a path of `hops` links may be recorded.
    #[inline]
    pub(crate) fn allows_hops(&self, hops: usize) -> bool {
        self.max_depth.is_none_or(|max| hops <= max)
    }

    /// Whether `collected` paths fill the path budget.
    #[inline]
    pub(crate) fn is_full(&self, collected: usize) -> bool {
        self.max_paths.is_some_and(|max| collected >= max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unlimited() {
        let limits = SearchLimits::default();
        assert_eq!(limits, SearchLimits::unlimited());
        assert!(limits.allows_hops(usize::MAX));
        assert!(!limits.is_full(usize::MAX));
    }

    #[test]
    fn test_builders() {
        let limits = SearchLimits::unlimited().with_max_depth(3).with_max_paths(10);
        assert!(limits.allows_hops(3));
        assert!(!limits.allows_hops(4));
        assert!(!limits.is_full(9));
        assert!(limits.is_full(10));
    }

    #[test]
    fn test_deserialize_partial_object() {
        let limits: SearchLimits = serde_json::from_str(r#"{"maxDepth": 4}"#).unwrap();
        assert_eq!(limits.max_depth, Some(4));
        assert_eq!(limits.max_paths, None);

        let limits: SearchLimits = serde_json::from_str("{}").unwrap();
        assert_eq!(limits, SearchLimits::unlimited());
    }
}
