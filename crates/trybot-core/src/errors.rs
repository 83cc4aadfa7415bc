//! Logic errors.

use thiserror::Error;

/// Logic error.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum DomainError {
    /// Wraps [`trybot_review_interface::ReviewError`].
    #[error("Review system error: {source}")]
    ReviewError {
        source: trybot_review_interface::ReviewError,
    },

    /// Wraps [`trybot_ci_interface::CiError`].
    #[error("CI system error: {source}")]
    CiError { source: trybot_ci_interface::CiError },

    #[error("Pull request #{pull_request_id} has no head revision")]
    MissingHeadRevision { pull_request_id: u64 },
}

impl From<trybot_review_interface::ReviewError> for DomainError {
    fn from(e: trybot_review_interface::ReviewError) -> Self {
        Self::ReviewError { source: e }
    }
}

impl From<trybot_ci_interface::CiError> for DomainError {
    fn from(e: trybot_ci_interface::CiError) -> Self {
        Self::CiError { source: e }
    }
}

/// Result alias for `DomainError`.
pub type Result<T> = core::result::Result<T, DomainError>;
