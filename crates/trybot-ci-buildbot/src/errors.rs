use trybot_ci_interface::CiError;

/// Buildbot driver error.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum BuildbotError {
    #[error(transparent)]
    HttpError { source: reqwest::Error },

    #[error(transparent)]
    SerializationError { source: serde_json::Error },

    #[error("Change for pull request #{} was rejected: {}", pull_request_id, reason)]
    ChangeRejected { pull_request_id: u64, reason: String },
}

impl From<reqwest::Error> for BuildbotError {
    fn from(e: reqwest::Error) -> Self {
        BuildbotError::HttpError { source: e }
    }
}

impl From<serde_json::Error> for BuildbotError {
    fn from(e: serde_json::Error) -> Self {
        BuildbotError::SerializationError { source: e }
    }
}

impl From<BuildbotError> for CiError {
    fn from(e: BuildbotError) -> Self {
        match e {
            BuildbotError::ChangeRejected {
                pull_request_id,
                reason,
            } => CiError::ChangeRejected {
                pull_request_id,
                reason,
            },
            e => CiError::ImplementationError { source: e.into() },
        }
    }
}
