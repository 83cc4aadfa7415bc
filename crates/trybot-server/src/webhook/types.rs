//! Webhook payload types.

use serde::Deserialize;

/// GitHub user.
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct GhUser {
    /// Login.
    pub login: String,
}

/// GitHub repository.
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct GhRepository {
    /// Full name, as `owner/name`.
    pub full_name: String,
}

/// GitHub ping event.
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct GhPingEvent {
    /// Zen message.
    pub zen: String,
    /// Hook ID.
    pub hook_id: u64,
    /// Repository.
    pub repository: Option<GhRepository>,
}

/// GitHub issue comment action.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GhIssueCommentAction {
    /// Created.
    Created,
    /// Edited.
    Edited,
    /// Deleted.
    Deleted,
}

/// Marker present on issues that are pull requests.
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct GhIssuePullRequest {
    /// API URL.
    #[serde(default)]
    pub url: String,
}

/// GitHub issue.
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct GhIssue {
    /// Number.
    pub number: u64,
    /// Set when the issue is a pull request.
    pub pull_request: Option<GhIssuePullRequest>,
}

/// GitHub issue comment.
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct GhIssueComment {
    /// Body.
    #[serde(default)]
    pub body: String,
    /// Author.
    pub user: GhUser,
}

/// GitHub issue comment event.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct GhIssueCommentEvent {
    /// Action.
    pub action: GhIssueCommentAction,
    /// Issue.
    pub issue: GhIssue,
    /// Comment.
    pub comment: GhIssueComment,
    /// Repository.
    pub repository: Option<GhRepository>,
}
