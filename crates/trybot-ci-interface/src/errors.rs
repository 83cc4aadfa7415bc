//! CI errors.

use thiserror::Error;

/// CI system error.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum CiError {
    /// Change was refused by the CI system.
    #[error("Change for pull request #{} was rejected: {}", pull_request_id, reason)]
    ChangeRejected { pull_request_id: u64, reason: String },

    #[error(transparent)]
    ImplementationError {
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

/// Result alias for `CiError`.
pub type Result<T, E = CiError> = core::result::Result<T, E>;
