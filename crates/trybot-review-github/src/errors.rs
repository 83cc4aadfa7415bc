use trybot_review_interface::ReviewError;

/// GitHub driver error.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum GitHubError {
    #[error(transparent)]
    HttpError { source: reqwest::Error },

    #[error("Invalid repository path '{}', expected 'owner/name'", path)]
    InvalidRepositoryPath { path: String },

    #[error("Invalid token header value")]
    InvalidTokenHeader,

    #[error("Pull request #{} not found", pull_request_id)]
    PullRequestNotFound { pull_request_id: u64 },
}

impl From<reqwest::Error> for GitHubError {
    fn from(e: reqwest::Error) -> Self {
        GitHubError::HttpError { source: e }
    }
}

impl From<GitHubError> for ReviewError {
    fn from(e: GitHubError) -> Self {
        match e {
            GitHubError::PullRequestNotFound { pull_request_id } => {
                ReviewError::PullRequestNotFound { pull_request_id }
            }
            e => ReviewError::ImplementationError { source: e.into() },
        }
    }
}
