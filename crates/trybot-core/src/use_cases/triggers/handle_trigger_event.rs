use async_trait::async_trait;
use shaku::{Component, Interface};
use time::OffsetDateTime;
use tracing::{field, info, warn, Span};
use trybot_ci_interface::types::ChangeRequest;
use trybot_models::{CorrelationKey, CorrelationRecord};

use crate::{CoreContext, DomainError, Result};

#[cfg_attr(any(test, feature = "testkit"), mockall::automock)]
#[async_trait]
pub trait HandleTriggerEventInterface: Interface {
    async fn run<'a>(&self, ctx: &CoreContext<'a>, pull_request_id: u64)
        -> Result<CorrelationRecord>;
}

/// Track the pull request head revision and ask the CI system to build it.
#[derive(Component)]
#[shaku(interface = HandleTriggerEventInterface)]
pub(crate) struct HandleTriggerEvent;

#[async_trait]
impl HandleTriggerEventInterface for HandleTriggerEvent {
    #[tracing::instrument(skip(self, ctx), fields(key = field::Empty))]
    async fn run<'a>(
        &self,
        ctx: &CoreContext<'a>,
        pull_request_id: u64,
    ) -> Result<CorrelationRecord> {
        let head = ctx.review_service.pulls_get_head(pull_request_id).await?;
        let key = CorrelationKey::new(pull_request_id, &head.revision)
            .ok_or(DomainError::MissingHeadRevision { pull_request_id })?;
        Span::current().record("key", field::display(&key));

        let record = ctx.store.get_or_create(&key, || {
            CorrelationRecord::new(key.clone(), OffsetDateTime::now_utc())
        });

        let change = ChangeRequest {
            pull_request_id,
            revision: key.revision().into(),
            author: head.author,
            project: head.project,
            repository: head.repository,
            category: ctx.config.ci.category.clone(),
            branch: head.branch,
        };

        // The record stays tracked even if the CI system refuses the change.
        if let Err(e) = ctx.ci_service.changes_submit(&change).await {
            warn!(
                pull_request_id = pull_request_id,
                key = %key,
                error = %e,
                message = "Change submission failed, record kept as pending"
            );
            return Err(e.into());
        }

        info!(
            pull_request_id = pull_request_id,
            key = %key,
            author = %change.author,
            branch = %change.branch,
            message = "Change submitted"
        );

        Ok(record)
    }
}
