use std::fmt;

/// Composite cache key, e.g. `["recipes", "my", "<userId>"]`.
///
/// Prefixes match on whole segments: `["recipes"]` covers
/// `["recipes", "my", "u1"]` but `["recipe"]` does not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Returns a new key with `segment` appended.
    pub fn join(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    /// True if `prefix` matches this key's leading segments.
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl<const N: usize> From<[&str; N]> for QueryKey {
    fn from(segments: [&str; N]) -> Self {
        Self::new(segments)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_matches_whole_segments() {
        let key = QueryKey::from(["recipes", "my", "u1"]);
        assert!(key.starts_with(&QueryKey::from(["recipes"])));
        assert!(key.starts_with(&QueryKey::from(["recipes", "my"])));
        assert!(key.starts_with(&key.clone()));
        assert!(!key.starts_with(&QueryKey::from(["recipe"])));
        assert!(!key.starts_with(&QueryKey::from(["recipes", "my", "u1", "x"])));
    }

    #[test]
    fn test_empty_prefix_matches_everything() {
        let key = QueryKey::from(["pantry"]);
        assert!(key.starts_with(&QueryKey::new(Vec::<String>::new())));
    }

    #[test]
    fn test_join_and_display() {
        let key = QueryKey::from(["meal-plans"]).join("p1");
        assert!(key.starts_with(&QueryKey::from(["meal-plans"])));
        assert_eq!(key.to_string(), "[meal-plans, p1]");
    }
}
