//! Finished builds poller.

use std::{sync::Arc, time::Duration};

use tracing::{debug, info, warn};
use trybot_ci_interface::{types::CompletedBuild, CiError};

use crate::{
    constants::SEEN_BUILDS_POLL_FACTOR,
    events::{BuildCompletedEvent, EventBus},
    metrics::BUILDS_OBSERVED,
    server::AppContext,
    utils::SeenWindow,
};

/// Periodically lists finished builds and emits each new one once.
///
/// Builds already finished when the poller starts are never emitted.
pub struct BuildPoller {
    context: Arc<AppContext>,
    bus: EventBus,
    seen: SeenWindow<u64>,
    seeded: bool,
}

impl BuildPoller {
    /// Create a poller emitting on `bus`.
    pub fn new(context: Arc<AppContext>, bus: EventBus) -> Self {
        let window = context.config.ci.poll_limit as usize * SEEN_BUILDS_POLL_FACTOR;

        Self {
            context,
            bus,
            seen: SeenWindow::new(window),
            seeded: false,
        }
    }

    /// Poll until the event bus closes.
    pub async fn run(mut self) {
        let period = Duration::from_secs(self.context.config.ci.poll_interval.max(1));
        let mut interval = tokio::time::interval(period);

        info!(
            builder = %self.context.config.ci.builder,
            period_secs = period.as_secs(),
            message = "Starting build poller"
        );

        while !self.bus.is_closed() {
            interval.tick().await;

            if let Err(e) = self.poll_once().await {
                warn!(error = %e, message = "Build poll failed");
            }
        }

        debug!("Event bus closed, stopping build poller");
    }

    /// Run one poll, returning the count of emitted builds.
    #[tracing::instrument(skip(self), fields(seeded = self.seeded), ret)]
    pub async fn poll_once(&mut self) -> Result<usize, CiError> {
        let config = &self.context.config.ci;
        let builds = self
            .context
            .ci_service
            .builds_list_finished(&config.builder, config.poll_limit)
            .await?;

        if !self.seeded {
            for build in &builds {
                self.seen.insert(build.id);
            }
            self.seeded = true;
            debug!(count = builds.len(), message = "Seeded seen builds");
            return Ok(0);
        }

        let mut emitted = 0;
        // Builds come newest first.
        for build in builds.into_iter().rev() {
            if !self.seen.insert(build.id) {
                continue;
            }

            let build = self.with_blamelist(build).await;
            BUILDS_OBSERVED.inc();

            if !self.bus.emit_build_completed(BuildCompletedEvent { build }).await {
                break;
            }
            emitted += 1;
        }

        Ok(emitted)
    }

    async fn with_blamelist(&self, mut build: CompletedBuild) -> CompletedBuild {
        match self.context.ci_service.builds_blamelist(build.id).await {
            Ok(blamelist) => build.blamelist = blamelist,
            Err(e) => warn!(
                build_id = build.id,
                error = %e,
                message = "Could not fetch blamelist"
            ),
        }

        build
    }
}
