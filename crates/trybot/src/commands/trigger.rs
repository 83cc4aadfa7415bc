use std::io::Write;

use async_trait::async_trait;
use clap::Parser;
use shaku::HasComponent;
use trybot_core::use_cases::triggers::HandleTriggerEventInterface;

use super::{Command, CommandContext};
use crate::Result;

/// Request a build for a pull request head, as the trigger phrase would
#[derive(Parser)]
pub(crate) struct TriggerCommand {
    /// Pull request number
    pull_request_id: u64,
}

#[async_trait(?Send)]
impl Command for TriggerCommand {
    async fn execute(self, ctx: CommandContext) -> Result<()> {
        let core_ctx = ctx.as_core_context();
        let handle_trigger_event: &dyn HandleTriggerEventInterface =
            core_ctx.core_module.resolve_ref();
        let record = handle_trigger_event
            .run(&core_ctx, self.pull_request_id)
            .await?;

        writeln!(
            ctx.writer.write().await,
            "Build requested for pull request #{} at revision {}.",
            record.pull_request_id(),
            record.revision()
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use trybot_ci_null::NullCiService;
    use trybot_config::Config;
    use trybot_core::{CoreModule, CorrelationStore};
    use trybot_review_interface::PullRequestHead;
    use trybot_review_null::{NullReviewService, NULL_REVISION};

    use crate::{
        commands::CommandContext,
        testutils::{test_command, test_command_with, CommandContextTest},
    };

    #[tokio::test]
    async fn test_trigger() {
        let mut ctx = CommandContextTest::new();
        ctx.review_service
            .expect_pulls_get_head()
            .once()
            .withf(|id| *id == 42)
            .return_once(|_| {
                Ok(PullRequestHead {
                    revision: "abc123".into(),
                    author: "alice".into(),
                    branch: "feature".into(),
                    ..Default::default()
                })
            });
        ctx.ci_service
            .expect_changes_submit()
            .once()
            .withf(|change| change.pull_request_id == 42 && change.revision == "abc123")
            .return_once(|_| Ok(()));

        assert_eq!(
            test_command(ctx, &["trigger", "42"]).await,
            "Build requested for pull request #42 at revision abc123.\n"
        );
    }

    #[tokio::test]
    async fn test_trigger_with_null_drivers() {
        let output = test_command_with(
            |writer| {
                let config = Config::from_env_no_version().unwrap();
                CommandContext {
                    store: CorrelationStore::from_config(&config.cache),
                    config,
                    core_module: CoreModule::builder().build(),
                    review_service: Box::new(NullReviewService::new()),
                    ci_service: Box::new(NullCiService::new()),
                    writer,
                }
            },
            &["trigger", "7"],
        )
        .await;

        assert_eq!(
            output,
            format!("Build requested for pull request #7 at revision {NULL_REVISION}.\n")
        );
    }
}
