use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::CorrelationKey;

/// Correlation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationState {
    /// Change submitted, outcome not yet observed.
    Pending,
    /// Outcome observed and result comment dispatched.
    Reported,
}

/// Tracked pull request revision awaiting a build outcome.
///
/// Only `state` and `updated_at` change once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrelationRecord {
    key: CorrelationKey,
    state: CorrelationState,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    updated_at: OffsetDateTime,
}

impl CorrelationRecord {
    /// Create a pending record.
    pub fn new(key: CorrelationKey, now: OffsetDateTime) -> Self {
        Self {
            key,
            state: CorrelationState::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn key(&self) -> &CorrelationKey {
        &self.key
    }

    pub fn pull_request_id(&self) -> u64 {
        self.key.pull_request_id()
    }

    pub fn revision(&self) -> &str {
        self.key.revision()
    }

    pub fn state(&self) -> CorrelationState {
        self.state
    }

    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    pub fn updated_at(&self) -> OffsetDateTime {
        self.updated_at
    }

    pub fn is_pending(&self) -> bool {
        self.state == CorrelationState::Pending
    }

    /// Refresh the update timestamp.
    pub fn touch(&mut self, now: OffsetDateTime) {
        self.updated_at = now;
    }

    /// Move from pending to reported. Returns `false` when already reported.
    pub fn mark_reported(&mut self, now: OffsetDateTime) -> bool {
        match self.state {
            CorrelationState::Pending => {
                self.state = CorrelationState::Reported;
                self.updated_at = now;
                true
            }
            CorrelationState::Reported => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use time::Duration;

    use super::*;

    #[test]
    fn lifecycle() {
        let created = OffsetDateTime::UNIX_EPOCH;
        let key = CorrelationKey::new(42, "abc123").unwrap();
        let mut record = CorrelationRecord::new(key.clone(), created);

        assert_eq!(record.state(), CorrelationState::Pending);
        assert_eq!(record.pull_request_id(), 42);
        assert_eq!(record.revision(), "abc123");
        assert_eq!(record.created_at(), record.updated_at());

        record.touch(created + Duration::seconds(5));
        assert_eq!(record.updated_at(), created + Duration::seconds(5));
        assert_eq!(record.created_at(), created);

        assert!(record.mark_reported(created + Duration::seconds(10)));
        assert_eq!(record.state(), CorrelationState::Reported);
        assert_eq!(record.updated_at(), created + Duration::seconds(10));

        assert!(!record.mark_reported(created + Duration::seconds(20)));
        assert_eq!(record.updated_at(), created + Duration::seconds(10));
        assert_eq!(record.key(), &key);
    }
}
