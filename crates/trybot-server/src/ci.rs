//! CI service wrappers.

use async_trait::async_trait;
use trybot_ci_interface::{
    types::{ChangeRequest, CompletedBuild},
    CiService, Result,
};

use crate::metrics::CI_API_CALLS;

/// CI service with metrics.
pub struct MetricsCiService {
    inner: Box<dyn CiService>,
}

impl MetricsCiService {
    /// Wrap a CI service.
    pub fn new(inner: Box<dyn CiService>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl CiService for MetricsCiService {
    async fn changes_submit(&self, change: &ChangeRequest) -> Result<()> {
        CI_API_CALLS.inc();
        self.inner.changes_submit(change).await
    }

    async fn builds_list_finished(&self, builder: &str, limit: u32) -> Result<Vec<CompletedBuild>> {
        CI_API_CALLS.inc();
        self.inner.builds_list_finished(builder, limit).await
    }

    async fn builds_blamelist(&self, build_id: u64) -> Result<Vec<String>> {
        CI_API_CALLS.inc();
        self.inner.builds_blamelist(build_id).await
    }
}
