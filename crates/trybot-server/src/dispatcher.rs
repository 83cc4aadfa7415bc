//! Event dispatch to the correlation engine.

use std::sync::Arc;

use shaku::HasComponent;
use tokio::{sync::mpsc::Receiver, task::JoinHandle};
use tracing::{debug, error, info};
use trybot_core::use_cases::{
    builds::{CompletionOutcome, HandleBuildCompletedEventInterface},
    triggers::HandleTriggerEventInterface,
};

use crate::{
    events::{BuildCompletedEvent, EventStreams, TriggerEvent},
    metrics::RESULTS_REPORTED,
    server::AppContext,
};

/// Consumes event streams, handling each event in its own task.
pub struct EventDispatcher {
    context: Arc<AppContext>,
}

impl EventDispatcher {
    /// Create a dispatcher over a shared context.
    pub fn new(context: Arc<AppContext>) -> Self {
        Self { context }
    }

    /// Start consuming both streams, independently from each other.
    pub fn start(self, streams: EventStreams) -> Vec<JoinHandle<()>> {
        let EventStreams {
            triggers,
            completions,
        } = streams;

        vec![
            tokio::spawn(consume(self.context.clone(), triggers, handle_trigger_event)),
            tokio::spawn(consume(
                self.context,
                completions,
                handle_build_completed_event,
            )),
        ]
    }
}

async fn consume<E, F, Fut>(context: Arc<AppContext>, mut receiver: Receiver<E>, handler: F)
where
    E: Send + 'static,
    F: Fn(Arc<AppContext>, E) -> Fut,
    Fut: std::future::Future<Output = ()> + Send + 'static,
{
    while let Some(event) = receiver.recv().await {
        tokio::spawn(handler(context.clone(), event));
    }

    debug!("Event stream closed");
}

/// Run the trigger use case, logging its result.
pub async fn handle_trigger_event(context: Arc<AppContext>, event: TriggerEvent) {
    let ctx = context.as_core_context();
    let handle_trigger_event: &dyn HandleTriggerEventInterface = ctx.core_module.resolve_ref();

    match handle_trigger_event.run(&ctx, event.pull_request_id).await {
        Ok(record) => info!(
            pull_request_id = event.pull_request_id,
            key = %record.key(),
            state = ?record.state(),
            message = "Trigger handled"
        ),
        Err(e) => error!(
            pull_request_id = event.pull_request_id,
            error = %e,
            message = "Trigger failed"
        ),
    }
}

/// Run the build completion use case, logging its result.
pub async fn handle_build_completed_event(context: Arc<AppContext>, event: BuildCompletedEvent) {
    let ctx = context.as_core_context();
    let handle_build_completed_event: &dyn HandleBuildCompletedEventInterface =
        ctx.core_module.resolve_ref();

    let build_id = event.build.id;
    let pull_request_id = event.build.pull_request_id();
    let revision = event.build.revision();

    match handle_build_completed_event.run(&ctx, event.build).await {
        Ok(CompletionOutcome::Reported { key, outcome, .. }) => {
            RESULTS_REPORTED.inc();
            info!(
                build_id = build_id,
                key = %key,
                outcome = %outcome,
                message = "Build completion reported"
            );
        }
        Ok(outcome) => debug!(
            build_id = build_id,
            outcome = ?outcome,
            message = "Build completion skipped"
        ),
        Err(e) => error!(
            build_id = build_id,
            pull_request_id = ?pull_request_id,
            revision = ?revision,
            error = %e,
            message = "Build completion failed"
        ),
    }
}
