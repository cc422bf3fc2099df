//! Application error types
//!
//! Errors raised by the shared infrastructure (auth, config) and the
//! HTTP status/code mapping shared by every layer.

use std::fmt;

use recipe_core::DomainError;
use serde::Serialize;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Authentication errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Missing authentication")]
    MissingAuth,

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    // Resource errors
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::InvalidCredentials | Self::InvalidToken | Self::TokenExpired | Self::MissingAuth => 401,
            Self::InsufficientPermissions => 403,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::RateLimitExceeded => 429,
            Self::Database(_) | Self::Internal(_) | Self::Config(_) => 500,
            Self::Domain(e) => domain_status(e),
        }
    }

    /// Error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::MissingAuth => "MISSING_AUTH",
            Self::InsufficientPermissions => "INSUFFICIENT_PERMISSIONS",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Domain(e) => e.code(),
        }
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }

    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status_code())
    }

    pub fn not_found(resource: impl fmt::Display) -> Self {
        Self::NotFound(resource.to_string())
    }

    pub fn validation(msg: impl fmt::Display) -> Self {
        Self::Validation(msg.to_string())
    }

    pub fn internal(msg: impl fmt::Display) -> Self {
        Self::Internal(msg.to_string())
    }
}

/// HTTP status for a domain error, by its classification
pub fn domain_status(e: &DomainError) -> u16 {
    if e.is_not_found() {
        404
    } else if e.is_authorization() {
        403
    } else if e.is_validation() {
        400
    } else if e.is_conflict() {
        409
    } else {
        500
    }
}

/// Error response structure for API responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        Self {
            code: err.error_code().to_string(),
            message: err.to_string(),
            details: None,
        }
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use recipe_core::Snowflake;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::InvalidCredentials.status_code(), 401);
        assert_eq!(AppError::InsufficientPermissions.status_code(), 403);
        assert_eq!(AppError::not_found("recipe").status_code(), 404);
        assert_eq!(AppError::validation("bad").status_code(), 400);
        assert_eq!(AppError::RateLimitExceeded.status_code(), 429);
        assert_eq!(AppError::Database("down".into()).status_code(), 500);
    }

    #[test]
    fn test_domain_errors_map_by_class() {
        let not_found = AppError::from(DomainError::CommentNotFound(Snowflake::new(5)));
        assert_eq!(not_found.status_code(), 404);
        assert_eq!(not_found.error_code(), "UNKNOWN_COMMENT");

        assert_eq!(AppError::from(DomainError::EmailAlreadyExists).status_code(), 409);
        assert_eq!(AppError::from(DomainError::AccountDeactivated).status_code(), 403);
        assert_eq!(AppError::from(DomainError::DatabaseError("x".into())).status_code(), 500);
    }

    #[test]
    fn test_client_and_server_classes() {
        assert!(AppError::MissingAuth.is_client_error());
        assert!(!AppError::MissingAuth.is_server_error());
        assert!(AppError::internal("boom").is_server_error());
    }

    #[test]
    fn test_error_response() {
        let err = AppError::not_found("recipe 12");
        let response = ErrorResponse::from(&err);
        assert_eq!(response.code, "NOT_FOUND");
        assert_eq!(response.message, "Resource not found: recipe 12");
        assert!(response.details.is_none());
    }
}
