use serde::{Deserialize, Serialize};

/// Current head of a pull request.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct PullRequestHead {
    /// Head commit.
    pub revision: String,
    /// Author login.
    pub author: String,
    /// Head branch name.
    pub branch: String,
    /// Target project.
    pub project: String,
    /// Repository the head commit lives in.
    pub repository: String,
}
