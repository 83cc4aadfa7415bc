use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{BRANCH_PROPERTY, NICKNAME_PROPERTY, PULL_REQUEST_ID_PROPERTY, REVISION_PROPERTY};

/// Finished build, as reported by the CI system.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct CompletedBuild {
    /// Global build ID.
    pub id: u64,
    /// Build number, scoped to the builder.
    pub number: u64,
    /// Builder name.
    pub builder_name: String,
    /// Textual summary of the build.
    pub summary: String,
    /// Blamed authors, first one being the primary author.
    pub blamelist: Vec<String>,
    /// Build properties.
    pub properties: HashMap<String, Value>,
}

impl CompletedBuild {
    /// Get a property as a non-empty string.
    pub fn property_str(&self, name: &str) -> Option<String> {
        let value = match self.properties.get(name)? {
            Value::String(s) => s.trim().to_owned(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };

        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }

    /// Pull request number echoed back from submission.
    pub fn pull_request_id(&self) -> Option<u64> {
        self.property_str(PULL_REQUEST_ID_PROPERTY)?.parse().ok()
    }

    /// Revision echoed back from submission.
    pub fn revision(&self) -> Option<String> {
        self.property_str(REVISION_PROPERTY)
    }

    /// Author nickname echoed back from submission.
    pub fn nickname(&self) -> Option<String> {
        self.property_str(NICKNAME_PROPERTY)
    }

    /// Built branch.
    pub fn branch(&self) -> Option<String> {
        self.property_str(BRANCH_PROPERTY)
    }

    /// Primary blamed author.
    pub fn primary_author(&self) -> Option<&str> {
        self.blamelist.first().map(String::as_str)
    }
}
