use lazy_static::lazy_static;
use rand::Rng;
use regex::{Captures, Regex};
use trybot_config::{CiConfig, CommentsConfig};
use trybot_models::BuildOutcome;

lazy_static! {
    static ref PLACEHOLDER_RGX: Regex = Regex::new(r"\{([a-z_]+)\}").unwrap();
}

/// Build fields available to comment templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentFields {
    pub branch: String,
    pub author: String,
    pub nickname: String,
    pub build_number: u64,
    pub builder: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedComment {
    pub body: String,
    /// Picked illustration, if the pool was not empty.
    pub asset: Option<String>,
}

/// Renders result comments from configured templates.
pub struct CommentRenderer<'a> {
    config: &'a CommentsConfig,
}

impl<'a> CommentRenderer<'a> {
    pub fn new(config: &'a CommentsConfig) -> Self {
        Self { config }
    }

    /// Render the comment matching `outcome`.
    ///
    /// Known placeholders are `{image}`, `{nickname}`, `{author}`, `{branch}`,
    /// `{builder}`, `{build_number}`, `{status}` and `{url}`. Unknown ones
    /// are left untouched.
    pub fn render<R: Rng>(
        &self,
        outcome: BuildOutcome,
        fields: &CommentFields,
        rng: &mut R,
    ) -> RenderedComment {
        let (template, pool) = match outcome {
            BuildOutcome::Success => (&self.config.success_template, &self.config.success_assets),
            BuildOutcome::Failure => (&self.config.failure_template, &self.config.failure_assets),
        };

        let asset = Self::select_asset(pool, rng).map(ToOwned::to_owned);
        let image = asset
            .as_deref()
            .map(|a| format!("![{}]({})", outcome, a))
            .unwrap_or_default();

        let body = PLACEHOLDER_RGX.replace_all(template, |caps: &Captures| match &caps[1] {
            "image" => image.clone(),
            "nickname" => fields.nickname.clone(),
            "author" => fields.author.clone(),
            "branch" => fields.branch.clone(),
            "builder" => fields.builder.clone(),
            "build_number" => fields.build_number.to_string(),
            "status" => outcome.to_string(),
            "url" => fields.url.clone(),
            _ => caps[0].to_owned(),
        });

        RenderedComment {
            body: body.trim().to_owned(),
            asset,
        }
    }

    /// Uniform draw over the whole pool, both bounds included.
    pub fn select_asset<'p, R: Rng>(pool: &'p [String], rng: &mut R) -> Option<&'p str> {
        if pool.is_empty() {
            return None;
        }

        let index = rng.gen_range(0..=pool.len() - 1);
        Some(pool[index].as_str())
    }
}

/// Web UI URL of a build. The builder name is percent-encoded.
pub fn result_url(config: &CiConfig, builder: &str, build_number: u64) -> String {
    format!(
        "{}/#/builders/{}/builds/{}",
        config.root_url(),
        urlencoding::encode(builder),
        build_number
    )
}
