use async_trait::async_trait;

use crate::{
    types::{ChangeRequest, CompletedBuild},
    Result,
};

/// CI system interface.
#[cfg_attr(any(test, feature = "testkit"), mockall::automock)]
#[async_trait]
pub trait CiService: Send + Sync {
    /// Submit a change to build.
    async fn changes_submit(&self, change: &ChangeRequest) -> Result<()>;
    /// List the latest finished builds of a builder, newest first.
    ///
    /// Returned builds carry an empty blamelist, see `builds_blamelist`.
    async fn builds_list_finished(&self, builder: &str, limit: u32) -> Result<Vec<CompletedBuild>>;
    /// List the authors blamed for a build.
    async fn builds_blamelist(&self, build_id: u64) -> Result<Vec<String>>;
}
