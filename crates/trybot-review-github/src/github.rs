//! GitHub review service.

use async_trait::async_trait;
use http::StatusCode;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use trybot_config::Config;
use trybot_review_interface::{PullRequestHead, Result, ReviewService};

use crate::{
    auth::{build_github_url, get_authenticated_client_builder},
    errors::GitHubError,
};

#[derive(Deserialize)]
struct UserResponse {
    login: String,
}

#[derive(Deserialize)]
struct RepoResponse {
    full_name: String,
    clone_url: String,
}

#[derive(Deserialize)]
struct BranchResponse {
    #[serde(rename = "ref")]
    reference: String,
    sha: String,
    repo: Option<RepoResponse>,
}

#[derive(Deserialize)]
struct PullResponse {
    user: UserResponse,
    head: BranchResponse,
    base: BranchResponse,
}

impl From<PullResponse> for PullRequestHead {
    fn from(pull: PullResponse) -> Self {
        let project = pull
            .base
            .repo
            .as_ref()
            .map(|r| r.full_name.clone())
            .unwrap_or_default();
        // Head repository is gone when the fork was deleted; fall back on base.
        let repository = pull
            .head
            .repo
            .or(pull.base.repo)
            .map(|r| r.clone_url)
            .unwrap_or_default();

        Self {
            revision: pull.head.sha,
            author: pull.user.login,
            branch: pull.head.reference,
            project,
            repository,
        }
    }
}

/// GitHub review service.
#[derive(Clone)]
pub struct GithubReviewService {
    config: Config,
}

impl GithubReviewService {
    /// Creates new GitHub review service.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    fn get_client(&self) -> Result<Client, GitHubError> {
        get_authenticated_client_builder(&self.config)?
            .build()
            .map_err(GitHubError::from)
    }

    fn repository_path(&self) -> Result<(&str, &str), GitHubError> {
        parse_repository_path(&self.config.review.github.repository)
    }

    fn build_url(&self, path: String) -> String {
        build_github_url(&self.config, path)
    }

    async fn pulls_get_head_internal(
        &self,
        pull_request_id: u64,
    ) -> Result<PullRequestHead, GitHubError> {
        let (owner, name) = self.repository_path()?;
        let response = self
            .get_client()?
            .get(self.build_url(format!("/repos/{owner}/{name}/pulls/{pull_request_id}")))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(GitHubError::PullRequestNotFound { pull_request_id });
        }

        Ok(response
            .error_for_status()?
            .json::<PullResponse>()
            .await?
            .into())
    }

    async fn comments_post_internal(
        &self,
        pull_request_id: u64,
        body: &str,
    ) -> Result<u64, GitHubError> {
        #[derive(Serialize)]
        struct Request<'a> {
            body: &'a str,
        }

        #[derive(Deserialize)]
        struct Response {
            id: u64,
        }

        let (owner, name) = self.repository_path()?;
        Ok(self
            .get_client()?
            .post(self.build_url(format!(
                "/repos/{owner}/{name}/issues/{pull_request_id}/comments"
            )))
            .json(&Request { body })
            .send()
            .await?
            .error_for_status()?
            .json::<Response>()
            .await?
            .id)
    }
}

fn parse_repository_path(path: &str) -> Result<(&str, &str), GitHubError> {
    match path.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok((owner, name))
        }
        _ => Err(GitHubError::InvalidRepositoryPath { path: path.into() }),
    }
}

#[async_trait]
impl ReviewService for GithubReviewService {
    #[tracing::instrument(skip(self), ret)]
    async fn pulls_get_head(&self, pull_request_id: u64) -> Result<PullRequestHead> {
        self.pulls_get_head_internal(pull_request_id)
            .await
            .map_err(Into::into)
    }

    #[tracing::instrument(skip(self, body), ret)]
    async fn comments_post(&self, pull_request_id: u64, body: &str) -> Result<u64> {
        self.comments_post_internal(pull_request_id, body)
            .await
            .map_err(Into::into)
    }
}
