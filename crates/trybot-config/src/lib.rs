//! Config module.

mod drivers;

use std::{
    env,
    str::FromStr,
    time::{SystemTime, UNIX_EPOCH},
};

pub use drivers::{CiDriver, DriverError, ReviewDriver};

pub const DEFAULT_SUCCESS_TEMPLATE: &str = "{image}\n\n\
:white_check_mark: @{nickname}, build [#{build_number}]({url}) of `{branch}` on `{builder}` **{status}**.\n\n\
_Blame: {author}_";

pub const DEFAULT_FAILURE_TEMPLATE: &str = "{image}\n\n\
:x: @{nickname}, build [#{build_number}]({url}) of `{branch}` on `{builder}` **{status}**.\n\n\
_Blame: {author}_";

#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum tracked pull request revisions.
    pub capacity: usize,
    /// Lock shards used by the correlation store.
    pub shards: usize,
}

#[derive(Debug, Clone)]
pub struct TriggerConfig {
    /// Phrase looked for in new pull request comments.
    pub phrase: String,
}

#[derive(Debug, Clone)]
pub struct ReviewConfig {
    /// Review system driver.
    pub driver: ReviewDriver,
    /// GitHub options.
    pub github: ReviewGitHubConfig,
}

#[derive(Debug, Clone)]
pub struct ReviewGitHubConfig {
    /// GitHub API connect timeout (in milliseconds).
    pub connect_timeout: u64,
    /// GitHub API root URL.
    pub root_url: String,
    /// GitHub API personal token.
    pub token: String,
    /// Watched repository, as `owner/name`.
    pub repository: String,
}

#[derive(Debug, Clone)]
pub struct CiConfig {
    /// CI system driver.
    pub driver: CiDriver,
    /// CI host.
    pub host: String,
    /// CI port.
    pub port: u16,
    /// Use HTTPS to reach the CI system.
    pub secure: bool,
    /// Builder watched for completed builds.
    pub builder: String,
    /// Category attached to submitted changes.
    pub category: String,
    /// Case-insensitive marker flagging a failed build summary.
    pub failure_marker: String,
    /// Change hook path.
    pub change_hook_path: String,
    /// Poll interval (in seconds).
    pub poll_interval: u64,
    /// Maximum builds fetched per poll.
    pub poll_limit: u32,
    /// CI API connect timeout (in milliseconds).
    pub connect_timeout: u64,
}

impl CiConfig {
    /// URL scheme, depending on the `secure` flag.
    pub fn scheme(&self) -> &'static str {
        if self.secure {
            "https"
        } else {
            "http"
        }
    }

    /// Root URL of the CI system.
    pub fn root_url(&self) -> String {
        format!("{}://{}:{}", self.scheme(), self.host, self.port)
    }
}

#[derive(Debug, Clone)]
pub struct CommentsConfig {
    /// Template used when a build succeeded.
    pub success_template: String,
    /// Template used when a build failed.
    pub failure_template: String,
    /// Image pool for successful builds.
    pub success_assets: Vec<String>,
    /// Image pool for failed builds.
    pub failure_assets: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SentryConfig {
    /// Sentry URL.
    pub url: String,
    /// Traces sample rate (between 0 and 1) for Sentry
    pub traces_sample_rate: f32,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Use bunyan logging.
    pub use_bunyan: bool,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind IP.
    pub bind_ip: String,
    /// Server bind port.
    pub bind_port: u16,
    /// Server workers count.
    pub workers_count: Option<u16>,
    /// Capacity of each event channel.
    pub channel_capacity: usize,
}

/// Bot configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bot username.
    pub name: String,
    /// Correlation cache options.
    pub cache: CacheConfig,
    /// Trigger options.
    pub trigger: TriggerConfig,
    /// Review system options.
    pub review: ReviewConfig,
    /// CI system options.
    pub ci: CiConfig,
    /// Result comments options.
    pub comments: CommentsConfig,
    /// Logging options.
    pub logging: LoggingConfig,
    /// Sentry options.
    pub sentry: SentryConfig,
    /// Server options.
    pub server: ServerConfig,
    /// Random seed
    pub random_seed: u64,
    /// App version
    pub version: String,
}

impl Config {
    /// Create configuration from environment.
    pub fn from_env(version: String) -> Result<Config, DriverError> {
        Ok(Config {
            name: env_to_str("BOT_NAME", "trybot"),
            cache: CacheConfig {
                capacity: env_to_usize("BOT_CACHE_CAPACITY", 1000),
                shards: env_to_usize("BOT_CACHE_SHARDS", 8),
            },
            trigger: TriggerConfig {
                phrase: env_to_str("BOT_TRIGGER_PHRASE", "/try"),
            },
            review: ReviewConfig {
                driver: ReviewDriver::from_str(&env_to_str("BOT_REVIEW_DRIVER", "github"))?,
                github: ReviewGitHubConfig {
                    connect_timeout: env_to_u64("BOT_REVIEW_GITHUB_CONNECT_TIMEOUT", 5000),
                    root_url: env_to_str("BOT_REVIEW_GITHUB_ROOT_URL", "https://api.github.com"),
                    token: env_to_str("BOT_REVIEW_GITHUB_TOKEN", ""),
                    repository: env_to_str("BOT_REVIEW_GITHUB_REPOSITORY", ""),
                },
            },
            ci: CiConfig {
                driver: CiDriver::from_str(&env_to_str("BOT_CI_DRIVER", "buildbot"))?,
                host: env_to_str("BOT_CI_HOST", "localhost"),
                port: env_to_u16("BOT_CI_PORT", 8010),
                secure: env_to_bool("BOT_CI_SECURE", false),
                builder: env_to_str("BOT_CI_BUILDER", "try"),
                category: env_to_str("BOT_CI_CATEGORY", "pull-request"),
                failure_marker: env_to_str("BOT_CI_FAILURE_MARKER", "fail"),
                change_hook_path: env_to_str("BOT_CI_CHANGE_HOOK_PATH", "/change_hook/base"),
                poll_interval: env_to_u64("BOT_CI_POLL_INTERVAL", 30),
                poll_limit: env_to_u32("BOT_CI_POLL_LIMIT", 20),
                connect_timeout: env_to_u64("BOT_CI_CONNECT_TIMEOUT", 5000),
            },
            comments: CommentsConfig {
                success_template: env_to_str(
                    "BOT_COMMENTS_SUCCESS_TEMPLATE",
                    DEFAULT_SUCCESS_TEMPLATE,
                ),
                failure_template: env_to_str(
                    "BOT_COMMENTS_FAILURE_TEMPLATE",
                    DEFAULT_FAILURE_TEMPLATE,
                ),
                success_assets: env_to_list("BOT_COMMENTS_SUCCESS_ASSETS"),
                failure_assets: env_to_list("BOT_COMMENTS_FAILURE_ASSETS"),
            },
            logging: LoggingConfig {
                use_bunyan: env_to_bool("BOT_LOGGING_USE_BUNYAN", false),
            },
            sentry: SentryConfig {
                url: env_to_str("BOT_SENTRY_URL", ""),
                traces_sample_rate: env_to_f32("BOT_SENTRY_TRACES_SAMPLE_RATE", 0.0),
            },
            server: ServerConfig {
                bind_ip: env_to_str("BOT_SERVER_BIND_IP", "127.0.0.1"),
                bind_port: env_to_u16("BOT_SERVER_BIND_PORT", 8008),
                workers_count: env_to_optional_u16("BOT_SERVER_WORKERS_COUNT", None),
                channel_capacity: env_to_usize("BOT_SERVER_CHANNEL_CAPACITY", 256),
            },
            random_seed: env_to_u64("BOT_RANDOM_SEED", random_seed()),
            version,
        })
    }

    pub fn from_env_no_version() -> Result<Config, DriverError> {
        Self::from_env("0.0.0".into())
    }
}

fn random_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

fn env_to_u16(name: &str, default: u16) -> u16 {
    env::var(name)
        .map(|e| e.parse().unwrap_or(default))
        .unwrap_or(default)
}

fn env_to_optional_u16(name: &str, default: Option<u16>) -> Option<u16> {
    env::var(name)
        .map(|e| e.parse::<u16>().map(Some).unwrap_or(default))
        .unwrap_or(default)
}

fn env_to_u32(name: &str, default: u32) -> u32 {
    env::var(name)
        .map(|e| e.parse().unwrap_or(default))
        .unwrap_or(default)
}

fn env_to_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .map(|e| e.parse().unwrap_or(default))
        .unwrap_or(default)
}

fn env_to_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .map(|e| e.parse().unwrap_or(default))
        .unwrap_or(default)
}

fn env_to_f32(name: &str, default: f32) -> f32 {
    env::var(name)
        .map(|e| e.parse().unwrap_or(default))
        .unwrap_or(default)
}

fn env_to_bool(name: &str, default: bool) -> bool {
    env::var(name).map(|e| !e.is_empty()).unwrap_or(default)
}

fn env_to_str(name: &str, default: &str) -> String {
    env::var(name)
        .unwrap_or_else(|_e| default.to_string())
        .replace("\\n", "\n")
}

fn env_to_list(name: &str) -> Vec<String> {
    env::var(name)
        .map(|e| split_list(&e))
        .unwrap_or_default()
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
