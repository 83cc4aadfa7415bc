use async_trait::async_trait;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use shaku::{Component, Interface};
use tracing::{debug, info};
use trybot_ci_interface::types::CompletedBuild;
use trybot_models::{BuildOutcome, CorrelationKey};

use super::utils::{result_url, CommentFields, CommentRenderer};
use crate::{CoreContext, Result};

const UNKNOWN_AUTHOR: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// Build lacks correlation properties: it was not triggered by us.
    NotOurs,
    /// Build is not tracked anymore, or was already reported.
    Ignored { key: CorrelationKey },
    /// Result comment posted.
    Reported {
        key: CorrelationKey,
        outcome: BuildOutcome,
        comment_id: u64,
    },
}

#[cfg_attr(any(test, feature = "testkit"), mockall::automock)]
#[async_trait]
pub trait HandleBuildCompletedEventInterface: Interface {
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        build: CompletedBuild,
    ) -> Result<CompletionOutcome>;
}

/// Report a finished build on the pull request that triggered it, once.
#[derive(Component)]
#[shaku(interface = HandleBuildCompletedEventInterface)]
pub(crate) struct HandleBuildCompletedEvent;

#[async_trait]
impl HandleBuildCompletedEventInterface for HandleBuildCompletedEvent {
    #[tracing::instrument(
        skip_all,
        fields(
            build_id = build.id,
            build_number = build.number,
            builder = %build.builder_name,
        )
    )]
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        build: CompletedBuild,
    ) -> Result<CompletionOutcome> {
        let revision = build.revision();
        let key = match CorrelationKey::from_parts(build.pull_request_id(), revision.as_deref())
        {
            Some(key) => key,
            None => return Ok(CompletionOutcome::NotOurs),
        };

        if !ctx.store.mark_reported(&key) {
            debug!(key = %key, message = "Build not awaited, skipping");
            return Ok(CompletionOutcome::Ignored { key });
        }

        let outcome = BuildOutcome::classify(&build.summary, &ctx.config.ci.failure_marker);
        let author = build.primary_author().unwrap_or(UNKNOWN_AUTHOR).to_owned();
        let fields = CommentFields {
            branch: build.branch().unwrap_or_default(),
            nickname: build.nickname().unwrap_or_else(|| author.clone()),
            author,
            build_number: build.number,
            builder: build.builder_name.clone(),
            url: result_url(&ctx.config.ci, &build.builder_name, build.number),
        };

        let mut rng = ChaCha8Rng::seed_from_u64(ctx.config.random_seed ^ build.id);
        let comment = CommentRenderer::new(&ctx.config.comments).render(outcome, &fields, &mut rng);

        // Already marked as reported: a failed post is not retried.
        let comment_id = ctx
            .review_service
            .comments_post(key.pull_request_id(), &comment.body)
            .await?;

        info!(
            key = %key,
            outcome = %outcome,
            comment_id = comment_id,
            asset = ?comment.asset,
            message = "Build result reported"
        );

        Ok(CompletionOutcome::Reported {
            key,
            outcome,
            comment_id,
        })
    }
}
