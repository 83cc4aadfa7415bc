use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{NICKNAME_PROPERTY, PULL_REQUEST_ID_PROPERTY, REVISION_PROPERTY};

/// Change submitted to the CI system.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct ChangeRequest {
    /// Pull request number.
    pub pull_request_id: u64,
    /// Revision to build.
    pub revision: String,
    /// Author login.
    pub author: String,
    /// Target project.
    pub project: String,
    /// Repository containing the revision.
    pub repository: String,
    /// Change category.
    pub category: String,
    /// Branch to build.
    pub branch: String,
}

impl ChangeRequest {
    /// Properties that the CI system must echo back on the resulting build.
    pub fn properties(&self) -> BTreeMap<&'static str, String> {
        let mut properties = BTreeMap::new();
        properties.insert(PULL_REQUEST_ID_PROPERTY, self.pull_request_id.to_string());
        properties.insert(REVISION_PROPERTY, self.revision.clone());
        properties.insert(NICKNAME_PROPERTY, self.author.clone());
        properties
    }
}

#[cfg(test)]
mod tests {
    use maplit::btreemap;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn properties() {
        let change = ChangeRequest {
            pull_request_id: 42,
            revision: "abc123".into(),
            author: "alice".into(),
            ..Default::default()
        };

        assert_eq!(
            change.properties(),
            btreemap! {
                "nickname" => "alice".to_string(),
                "pull-request-id" => "42".to_string(),
                "revision" => "abc123".to_string(),
            }
        );
    }
}
