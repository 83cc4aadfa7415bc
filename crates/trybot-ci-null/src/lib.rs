//! Null driver for the CI system.

#![warn(missing_docs)]
#![warn(clippy::all)]

use async_trait::async_trait;
use trybot_ci_interface::{
    types::{ChangeRequest, CompletedBuild},
    CiService, Result,
};

/// Null CI service.
#[derive(Clone, Default)]
pub struct NullCiService {
    _private: (),
}

impl NullCiService {
    /// Build a null CI service.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

#[async_trait]
impl CiService for NullCiService {
    #[tracing::instrument(skip(self))]
    async fn changes_submit(&self, _change: &ChangeRequest) -> Result<()> {
        Ok(())
    }

    #[tracing::instrument(skip(self), ret)]
    async fn builds_list_finished(
        &self,
        _builder: &str,
        _limit: u32,
    ) -> Result<Vec<CompletedBuild>> {
        Ok(vec![])
    }

    #[tracing::instrument(skip(self), ret)]
    async fn builds_blamelist(&self, _build_id: u64) -> Result<Vec<String>> {
        Ok(vec![])
    }
}
