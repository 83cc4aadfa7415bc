use std::fmt;

use serde::{Deserialize, Serialize};

/// Key matching a trigger with the build it produced.
///
/// Built from a pull request number and the revision under test. Both parts
/// are kept as-is, so two distinct pairs never share a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CorrelationKey {
    pull_request_id: u64,
    revision: String,
}

impl CorrelationKey {
    /// Derive a key. Returns `None` when the revision is blank.
    pub fn new(pull_request_id: u64, revision: &str) -> Option<Self> {
        let revision = revision.trim();
        if revision.is_empty() {
            None
        } else {
            Some(Self {
                pull_request_id,
                revision: revision.to_owned(),
            })
        }
    }

    /// Derive a key from optional parts, as found on events coming from
    /// the outside. A missing part means the event is not ours.
    pub fn from_parts(pull_request_id: Option<u64>, revision: Option<&str>) -> Option<Self> {
        match (pull_request_id, revision) {
            (Some(pull_request_id), Some(revision)) => Self::new(pull_request_id, revision),
            _ => None,
        }
    }

    pub fn pull_request_id(&self) -> u64 {
        self.pull_request_id
    }

    pub fn revision(&self) -> &str {
        &self.revision
    }
}

impl fmt::Display for CorrelationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.pull_request_id, self.revision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        assert_eq!(
            CorrelationKey::new(42, "abc123"),
            CorrelationKey::new(42, "abc123")
        );
        assert_eq!(
            CorrelationKey::new(42, " abc123\n"),
            CorrelationKey::new(42, "abc123")
        );
    }

    #[test]
    fn distinct_pairs_do_not_collide() {
        assert_ne!(
            CorrelationKey::new(42, "abc123"),
            CorrelationKey::new(43, "abc123")
        );
        assert_ne!(
            CorrelationKey::new(42, "abc123"),
            CorrelationKey::new(42, "abc124")
        );
        // "1" + "2:x" vs "12" + "x" render differently and compare differently.
        let a = CorrelationKey::new(1, "2:x").unwrap();
        let b = CorrelationKey::new(12, "x").unwrap();
        assert_ne!(a, b);
        assert_ne!(a.to_string(), b.to_string());
    }

    #[test]
    fn rejects_missing_parts() {
        assert_eq!(CorrelationKey::new(42, ""), None);
        assert_eq!(CorrelationKey::new(42, "   "), None);
        assert_eq!(CorrelationKey::from_parts(None, Some("abc123")), None);
        assert_eq!(CorrelationKey::from_parts(Some(42), None), None);
        assert_eq!(
            CorrelationKey::from_parts(Some(42), Some("abc123")),
            CorrelationKey::new(42, "abc123")
        );
    }

    #[test]
    fn display() {
        let key = CorrelationKey::new(42, "abc123").unwrap();
        assert_eq!(key.to_string(), "42:abc123");
        assert_eq!(key.pull_request_id(), 42);
        assert_eq!(key.revision(), "abc123");
    }
}
