//! Typed event channels between event sources and the engine.

use tokio::sync::mpsc::{self, error::TrySendError, Receiver, Sender};
use tracing::warn;
use trybot_ci_interface::types::CompletedBuild;

/// A reviewer asked for a build on a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerEvent {
    /// Pull request number.
    pub pull_request_id: u64,
}

/// A finished build was observed on the CI system.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildCompletedEvent {
    /// Finished build, blamelist included.
    pub build: CompletedBuild,
}

/// Sending side of the event channels.
#[derive(Debug, Clone)]
pub struct EventBus {
    triggers: Sender<TriggerEvent>,
    completions: Sender<BuildCompletedEvent>,
}

/// Receiving side of the event channels.
#[derive(Debug)]
pub struct EventStreams {
    /// Trigger events.
    pub triggers: Receiver<TriggerEvent>,
    /// Build completion events.
    pub completions: Receiver<BuildCompletedEvent>,
}

impl EventBus {
    /// Create both channels, each one bounded to `capacity` events.
    pub fn new(capacity: usize) -> (Self, EventStreams) {
        let (triggers_tx, triggers_rx) = mpsc::channel(capacity.max(1));
        let (completions_tx, completions_rx) = mpsc::channel(capacity.max(1));

        (
            Self {
                triggers: triggers_tx,
                completions: completions_tx,
            },
            EventStreams {
                triggers: triggers_rx,
                completions: completions_rx,
            },
        )
    }

    /// Enqueue a trigger without waiting.
    ///
    /// Returns `false` when the event was dropped.
    pub fn emit_trigger(&self, event: TriggerEvent) -> bool {
        match self.triggers.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                warn!(
                    pull_request_id = event.pull_request_id,
                    message = "Trigger channel is full, dropping trigger"
                );
                false
            }
            Err(TrySendError::Closed(event)) => {
                warn!(
                    pull_request_id = event.pull_request_id,
                    message = "Trigger channel is closed, dropping trigger"
                );
                false
            }
        }
    }

    /// Enqueue a build completion, waiting for room in the channel.
    ///
    /// Returns `false` when the dispatcher is gone.
    pub async fn emit_build_completed(&self, event: BuildCompletedEvent) -> bool {
        self.completions.send(event).await.is_ok()
    }

    /// Check if build completions can no longer be delivered.
    pub fn is_closed(&self) -> bool {
        self.completions.is_closed()
    }
}
