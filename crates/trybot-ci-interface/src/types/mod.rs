//! CI types.

mod change_request;
mod completed_build;

pub use change_request::ChangeRequest;
pub use completed_build::CompletedBuild;

/// Property carrying the pull request number.
pub const PULL_REQUEST_ID_PROPERTY: &str = "pull-request-id";
/// Property carrying the revision under test.
pub const REVISION_PROPERTY: &str = "revision";
/// Property carrying the reviewer-facing nickname of the author.
pub const NICKNAME_PROPERTY: &str = "nickname";
/// Property carrying the built branch.
pub const BRANCH_PROPERTY: &str = "branch";
