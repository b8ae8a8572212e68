use reqwest::StatusCode;
use thiserror::Error;

use rigquote_core::errors::{PricingError, SaveValidationError};

/// Failure taxonomy for backend calls. `Auth` is reserved: the backend does
/// not enforce authentication today, but 401/403 are classified for it.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("server error: http {status}")]
    Server { status: u16 },
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("not authorized: http {status}")]
    Auth { status: u16 },
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unexpected response: {0}")]
    Unexpected(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn from_status(status: StatusCode, context: &str) -> Self {
        match status.as_u16() {
            401 | 403 => Self::Auth { status: status.as_u16() },
            404 => Self::NotFound(context.to_string()),
            400..=499 => Self::Validation(format!("{context}: http {}", status.as_u16())),
            500..=599 => Self::Server { status: status.as_u16() },
            _ => Self::Unexpected(format!("{context}: http {}", status.as_u16())),
        }
    }

    /// Only transient transport and server failures are worth retrying, and
    /// then only for idempotent reads.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Server { .. })
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() || error.is_connect() {
            Self::Network(error.to_string())
        } else {
            Self::Unexpected(error.to_string())
        }
    }
}

impl From<SaveValidationError> for ApiError {
    fn from(error: SaveValidationError) -> Self {
        Self::Validation(error.to_string())
    }
}

impl From<PricingError> for ApiError {
    fn from(error: PricingError) -> Self {
        Self::Validation(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::ApiError;

    #[test]
    fn status_codes_map_to_the_taxonomy() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, "x"),
            ApiError::Auth { status: 401 }
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::NOT_FOUND, "/parties/P-9"),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::UNPROCESSABLE_ENTITY, "x"),
            ApiError::Validation(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_GATEWAY, "x"),
            ApiError::Server { status: 502 }
        ));
    }

    #[test]
    fn only_transient_failures_are_retryable() {
        assert!(ApiError::Network("connection refused".to_string()).is_retryable());
        assert!(ApiError::Server { status: 500 }.is_retryable());
        assert!(!ApiError::Validation("bad payload".to_string()).is_retryable());
        assert!(!ApiError::NotFound("/quotations/Q-1".to_string()).is_retryable());
    }
}
