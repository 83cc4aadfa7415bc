//! Review errors.

use thiserror::Error;

/// Review system error.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum ReviewError {
    /// Pull request could not be found.
    #[error("Pull request #{} not found", pull_request_id)]
    PullRequestNotFound { pull_request_id: u64 },

    #[error(transparent)]
    ImplementationError {
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

/// Result alias for `ReviewError`.
pub type Result<T, E = ReviewError> = core::result::Result<T, E>;
