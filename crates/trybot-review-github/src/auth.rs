//! Auth.

use std::time::Duration;

use http::{header, HeaderMap};
use reqwest::ClientBuilder;
use trybot_config::Config;

use crate::errors::GitHubError;

/// Get an authenticated GitHub client builder.
pub fn get_authenticated_client_builder(config: &Config) -> Result<ClientBuilder, GitHubError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        header::HeaderValue::from_static("application/vnd.github+json"),
    );
    headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {}", config.review.github.token))
            .map_err(|_| GitHubError::InvalidTokenHeader)?,
    );

    Ok(ClientBuilder::new()
        .connect_timeout(Duration::from_millis(
            config.review.github.connect_timeout,
        ))
        .user_agent(format!("trybot/{}", config.version))
        .default_headers(headers))
}

/// Build a GitHub URL.
pub fn build_github_url<T: Into<String>>(config: &Config, path: T) -> String {
    format!("{}{}", config.review.github.root_url, path.into())
}
