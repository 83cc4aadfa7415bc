use async_trait::async_trait;

use crate::{PullRequestHead, Result};

/// Review system interface.
#[cfg_attr(any(test, feature = "testkit"), mockall::automock)]
#[async_trait]
pub trait ReviewService: Send + Sync {
    /// Get the current head of a pull request.
    async fn pulls_get_head(&self, pull_request_id: u64) -> Result<PullRequestHead>;
    /// Post a comment on a pull request, returning the comment ID.
    async fn comments_post(&self, pull_request_id: u64, body: &str) -> Result<u64>;
}
