//! Correlation engine.
//!
//! Tracks pull request revisions for which a build was requested, and
//! reports build results back on the pull request exactly once.

#![warn(clippy::all)]
#![allow(clippy::new_without_default)]

mod context;
pub mod errors;
pub mod store;
pub mod use_cases;

pub use context::CoreContext;
#[cfg(any(test, feature = "testkit"))]
pub use context::tests::CoreContextTest;
pub use errors::{DomainError, Result};
use shaku::module;
pub use store::CorrelationStore;
use use_cases::{
    builds::handle_build_completed_event::HandleBuildCompletedEvent,
    triggers::handle_trigger_event::HandleTriggerEvent,
};

module! {
    pub CoreModule {
        components = [HandleTriggerEvent, HandleBuildCompletedEvent],
        providers = []
    }
}
