//! Review service wrappers.

use async_trait::async_trait;
use trybot_review_interface::{PullRequestHead, Result, ReviewService};

use crate::metrics::REVIEW_API_CALLS;

/// Review service with metrics.
pub struct MetricsReviewService {
    inner: Box<dyn ReviewService>,
}

impl MetricsReviewService {
    /// Wrap a review service.
    pub fn new(inner: Box<dyn ReviewService>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ReviewService for MetricsReviewService {
    async fn pulls_get_head(&self, pull_request_id: u64) -> Result<PullRequestHead> {
        REVIEW_API_CALLS.inc();
        self.inner.pulls_get_head(pull_request_id).await
    }

    async fn comments_post(&self, pull_request_id: u64, body: &str) -> Result<u64> {
        REVIEW_API_CALLS.inc();
        self.inner.comments_post(pull_request_id, body).await
    }
}
