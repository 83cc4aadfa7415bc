//! Domain models.

#![warn(clippy::all)]

mod build_outcome;
mod correlation_key;
mod correlation_record;

pub use build_outcome::BuildOutcome;
pub use correlation_key::CorrelationKey;
pub use correlation_record::{CorrelationRecord, CorrelationState};
