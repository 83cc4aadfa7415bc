//! Server errors.

use actix_http::StatusCode;
use actix_web::ResponseError;
use thiserror::Error;

use crate::event_type::EventType;

/// Server error.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(
        "Error while parsing webhook event for type {},\n  caused by: {}",
        event_type,
        source
    )]
    EventParseError {
        event_type: EventType,
        source: serde_json::Error,
    },

    #[error("I/O error,\n  caused by: {}", source)]
    IoError { source: std::io::Error },

    #[error("Metrics error,\n  caused by: {}", source)]
    MetricsError {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match &self {
            ServerError::EventParseError { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Result alias for `ServerError`.
pub type Result<T> = core::result::Result<T, ServerError>;
