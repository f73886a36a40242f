//! Error types for API operations

use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

use crate::cache::CacheError;
use crate::registry::RegistryError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("token is missing")]
    MissingToken,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Missing path parameter '{name}' for {method}")]
    MissingPathParam { method: String, name: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {status}: {body}")]
    HttpStatus { status: StatusCode, body: String },

    #[error("Rate limited")]
    RateLimited {
        /// Duration from the HTTP Retry-After header, if present
        retry_after: Option<Duration>,
    },

    #[error("Job {id} expired before it could be scheduled")]
    Expired { id: String },

    #[error("Empty response from {0}")]
    EmptyResponse(String),

    #[error("Rate limit datastore error: {0}")]
    Datastore(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
}

impl ApiError {
    /// Check if error is retryable
    pub fn should_retry(&self) -> bool {
        match self {
            Self::RateLimited { .. } => true,
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::HttpStatus { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }

    /// Get the Retry-After hint duration, if this is a rate-limited error with one.
    pub fn retry_after_hint(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            Self::RateLimited { .. } => Some(StatusCode::TOO_MANY_REQUESTS),
            Self::Http(e) => e.status(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(ApiError::RateLimited { retry_after: None }.should_retry());
        assert!(
            ApiError::HttpStatus {
                status: StatusCode::BAD_GATEWAY,
                body: String::new(),
            }
            .should_retry()
        );
        assert!(
            !ApiError::HttpStatus {
                status: StatusCode::NOT_FOUND,
                body: String::new(),
            }
            .should_retry()
        );
        assert!(!ApiError::MissingToken.should_retry());
        assert!(
            !ApiError::Expired {
                id: "1".to_string()
            }
            .should_retry()
        );
    }

    #[test]
    fn test_retry_after_hint() {
        let err = ApiError::RateLimited {
            retry_after: Some(Duration::from_secs(3)),
        };
        assert_eq!(err.retry_after_hint(), Some(Duration::from_secs(3)));
        assert_eq!(err.status(), Some(StatusCode::TOO_MANY_REQUESTS));
        assert_eq!(ApiError::MissingToken.retry_after_hint(), None);
    }

    #[test]
    fn test_missing_token_message() {
        assert_eq!(ApiError::MissingToken.to_string(), "token is missing");
    }
}
