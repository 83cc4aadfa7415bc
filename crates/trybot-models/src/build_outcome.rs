use std::fmt;

use serde::{Deserialize, Serialize};

/// Classified build outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildOutcome {
    Success,
    Failure,
}

impl BuildOutcome {
    /// Classify a build from its textual summary.
    ///
    /// This is a heuristic: any case-insensitive occurrence of `failure_marker`
    /// makes the build a failure. An empty marker never matches.
    pub fn classify(summary: &str, failure_marker: &str) -> Self {
        let marker = failure_marker.trim().to_lowercase();
        if !marker.is_empty() && summary.to_lowercase().contains(&marker) {
            Self::Failure
        } else {
            Self::Success
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }
}

impl fmt::Display for BuildOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
