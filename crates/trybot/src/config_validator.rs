//! Validation utilities.

use std::fmt::Write;

use thiserror::Error;
use trybot_config::{CiDriver, Config, ReviewDriver};

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Errors on environment variables:\n{}", errors)]
    EnvVarsError { errors: String },
}

fn validate_env_vars(config: &Config) -> Result<(), ValidationError> {
    #[inline]
    fn _missing(error: &mut String, name: &str) {
        error.push('\n');
        write!(error, "  - Missing env. var.: {}", name).unwrap();
    }

    #[inline]
    fn _invalid(error: &mut String, name: &str, reason: &str) {
        error.push('\n');
        write!(error, "  - Invalid env. var.: {} ({})", name, reason).unwrap();
    }

    let mut error = String::new();

    // Check server configuration
    if config.server.bind_ip.is_empty() {
        _missing(&mut error, "BOT_SERVER_BIND_IP");
    }
    if config.server.bind_port == 0 {
        _missing(&mut error, "BOT_SERVER_BIND_PORT");
    }
    if config.server.channel_capacity == 0 {
        _invalid(&mut error, "BOT_SERVER_CHANNEL_CAPACITY", "must be positive");
    }
    if config.name.is_empty() {
        _missing(&mut error, "BOT_NAME");
    }

    // Check correlation cache
    if config.cache.capacity == 0 {
        _invalid(&mut error, "BOT_CACHE_CAPACITY", "must be positive");
    }
    if config.trigger.phrase.trim().is_empty() {
        _missing(&mut error, "BOT_TRIGGER_PHRASE");
    }

    // Check review system credentials
    if config.review.driver == ReviewDriver::GitHub {
        if config.review.github.token.is_empty() {
            _missing(&mut error, "BOT_REVIEW_GITHUB_TOKEN");
        }
        if !is_repository_path(&config.review.github.repository) {
            _invalid(
                &mut error,
                "BOT_REVIEW_GITHUB_REPOSITORY",
                "expected owner/name",
            );
        }
    }

    // Check CI system location
    if config.ci.driver == CiDriver::Buildbot {
        if config.ci.host.is_empty() {
            _missing(&mut error, "BOT_CI_HOST");
        }
        if config.ci.builder.is_empty() {
            _missing(&mut error, "BOT_CI_BUILDER");
        }
        if config.ci.poll_interval == 0 {
            _invalid(&mut error, "BOT_CI_POLL_INTERVAL", "must be positive");
        }
    }

    if error.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::EnvVarsError { errors: error })
    }
}

fn is_repository_path(value: &str) -> bool {
    matches!(value.split_once('/'), Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/'))
}

/// Validate configuration.
pub fn validate_configuration(config: &Config) -> Result<(), ValidationError> {
    validate_env_vars(config)
}
