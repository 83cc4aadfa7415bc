//! Buildbot CI service.

use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde::Deserialize;
use serde_json::Value;
use trybot_ci_interface::{
    types::{ChangeRequest, CompletedBuild},
    CiService, Result,
};
use trybot_config::Config;

use crate::errors::BuildbotError;

#[derive(Deserialize)]
struct BuildResponse {
    buildid: u64,
    number: u64,
    #[serde(default)]
    state_string: String,
    #[serde(default)]
    properties: HashMap<String, Value>,
}

#[derive(Deserialize)]
struct BuildsResponse {
    builds: Vec<BuildResponse>,
}

#[derive(Deserialize)]
struct ChangeResponse {
    author: String,
}

#[derive(Deserialize)]
struct ChangesResponse {
    changes: Vec<ChangeResponse>,
}

impl BuildResponse {
    fn into_completed_build(self, builder_name: &str) -> CompletedBuild {
        CompletedBuild {
            id: self.buildid,
            number: self.number,
            builder_name: builder_name.into(),
            summary: self.state_string,
            blamelist: vec![],
            properties: flatten_properties(self.properties),
        }
    }
}

/// Buildbot properties are `[value, source]` pairs.
fn flatten_properties(properties: HashMap<String, Value>) -> HashMap<String, Value> {
    properties
        .into_iter()
        .map(|(name, value)| match value {
            Value::Array(mut pair) if !pair.is_empty() => (name, pair.swap_remove(0)),
            value => (name, value),
        })
        .collect()
}

fn unique_authors(changes: Vec<ChangeResponse>) -> Vec<String> {
    let mut authors: Vec<String> = vec![];
    for change in changes {
        if !authors.contains(&change.author) {
            authors.push(change.author);
        }
    }
    authors
}

/// Buildbot CI service.
#[derive(Clone)]
pub struct BuildbotCiService {
    config: Config,
}

impl BuildbotCiService {
    /// Creates new Buildbot CI service.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    fn get_client(&self) -> Result<Client, BuildbotError> {
        ClientBuilder::new()
            .connect_timeout(Duration::from_millis(self.config.ci.connect_timeout))
            .user_agent(format!("trybot/{}", self.config.version))
            .build()
            .map_err(BuildbotError::from)
    }

    fn build_url(&self, path: String) -> String {
        format!("{}{}", self.config.ci.root_url(), path)
    }

    fn change_form(
        &self,
        change: &ChangeRequest,
    ) -> Result<Vec<(&'static str, String)>, BuildbotError> {
        Ok(vec![
            ("author", change.author.clone()),
            ("revision", change.revision.clone()),
            ("branch", change.branch.clone()),
            ("project", change.project.clone()),
            ("repository", change.repository.clone()),
            ("category", change.category.clone()),
            (
                "comments",
                format!("Pull request #{}", change.pull_request_id),
            ),
            ("properties", serde_json::to_string(&change.properties())?),
        ])
    }

    async fn changes_submit_internal(&self, change: &ChangeRequest) -> Result<(), BuildbotError> {
        let form = self.change_form(change)?;
        let response = self
            .get_client()?
            .post(self.build_url(self.config.ci.change_hook_path.clone()))
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if status.is_client_error() {
            return Err(BuildbotError::ChangeRejected {
                pull_request_id: change.pull_request_id,
                reason: response.text().await.unwrap_or_else(|_| status.to_string()),
            });
        }

        response.error_for_status()?;
        Ok(())
    }

    async fn builds_list_finished_internal(
        &self,
        builder: &str,
        limit: u32,
    ) -> Result<Vec<CompletedBuild>, BuildbotError> {
        let limit = limit.to_string();
        Ok(self
            .get_client()?
            .get(self.build_url(builds_path(builder)))
            .query(&[
                ("complete", "true"),
                ("order", "-number"),
                ("limit", limit.as_str()),
                ("property", "*"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json::<BuildsResponse>()
            .await?
            .builds
            .into_iter()
            .map(|b| b.into_completed_build(builder))
            .collect())
    }

    async fn builds_blamelist_internal(&self, build_id: u64) -> Result<Vec<String>, BuildbotError> {
        let changes = self
            .get_client()?
            .get(self.build_url(format!("/api/v2/builds/{build_id}/changes")))
            .send()
            .await?
            .error_for_status()?
            .json::<ChangesResponse>()
            .await?
            .changes;

        Ok(unique_authors(changes))
    }
}

#[async_trait]
impl CiService for BuildbotCiService {
    #[tracing::instrument(skip(self), fields(pull_request_id = change.pull_request_id))]
    async fn changes_submit(&self, change: &ChangeRequest) -> Result<()> {
        self.changes_submit_internal(change)
            .await
            .map_err(Into::into)
    }

    #[tracing::instrument(skip(self))]
    async fn builds_list_finished(&self, builder: &str, limit: u32) -> Result<Vec<CompletedBuild>> {
        self.builds_list_finished_internal(builder, limit)
            .await
            .map_err(Into::into)
    }

    #[tracing::instrument(skip(self), ret)]
    async fn builds_blamelist(&self, build_id: u64) -> Result<Vec<String>> {
        self.builds_blamelist_internal(build_id)
            .await
            .map_err(Into::into)
    }
}

/// Finished builds endpoint of a builder, which name is percent-encoded.
fn builds_path(builder: &str) -> String {
    format!("/api/v2/builders/{}/builds", urlencoding::encode(builder))
}
