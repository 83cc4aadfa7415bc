//! Server module.
//!
//! Hosts both event sources (webhook and CI poller) and dispatches their
//! events to the correlation engine.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ci;
pub mod constants;
pub mod dispatcher;
pub mod errors;
mod event_type;
pub mod events;
mod health;
mod metrics;
pub mod poller;
pub mod review;
pub mod server;
pub mod utils;
mod webhook;

pub use errors::{Result, ServerError};
