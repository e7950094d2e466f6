//! Application error types.
//!
//! Fatal errors abort the run and are reported back to the workflow runner.
//! Recoverable per-item failures are logged where they happen and never
//! reach this type's callers.

use thiserror::Error;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum AppError {
    /// GitHub API request failed.
    #[error("GitHub API error: {message}")]
    GitHubApi {
        message: String,
        status_code: Option<u16>,
        endpoint: Option<String>,
    },

    /// Network request failed.
    #[error("Network error: {message}")]
    Network { message: String },

    /// Authentication failed or credentials invalid.
    #[error("Authentication error: {message}")]
    Authentication { message: String },

    /// The run has no pull request to work on.
    #[error("{message}")]
    MissingContext { message: String },

    /// Invalid input provided.
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        field: Option<String>,
    },

    /// Internal application error.
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl AppError {
    /// Create a GitHub API error.
    pub fn github_api(message: impl Into<String>) -> Self {
        Self::GitHubApi {
            message: message.into(),
            status_code: None,
            endpoint: None,
        }
    }

    /// Create a GitHub API error with status code and endpoint.
    pub fn github_api_full(
        message: impl Into<String>,
        status_code: u16,
        endpoint: impl Into<String>,
    ) -> Self {
        Self::GitHubApi {
            message: message.into(),
            status_code: Some(status_code),
            endpoint: Some(endpoint.into()),
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Create a missing pull request context error.
    pub fn missing_context(message: impl Into<String>) -> Self {
        Self::MissingContext {
            message: message.into(),
        }
    }

    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: None,
        }
    }

    /// Create an invalid input error with field name.
    pub fn invalid_input_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// HTTP status code, if this error came from an API response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::GitHubApi { status_code, .. } => *status_code,
            _ => None,
        }
    }

    /// Check if this error means the run has no pull request context.
    pub fn is_missing_context(&self) -> bool {
        matches!(self, Self::MissingContext { .. })
    }
}

// Conversions from common error types

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network("Request timed out")
        } else if err.is_connect() {
            Self::network("Failed to connect to server")
        } else if err.is_status() {
            Self::github_api(format!("HTTP error: {}", err))
        } else {
            Self::network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::internal(format!("JSON error: {}", err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(format!("I/O error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_github_api_error_full() {
        let err = AppError::github_api_full("Not Found", 404, "/repos/o/r/pulls/1");
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(format!("{}", err), "GitHub API error: Not Found");
    }

    #[test]
    fn test_missing_context_displays_bare_message() {
        let err = AppError::missing_context("This action can only be run on pull request events");
        assert!(err.is_missing_context());
        assert_eq!(
            err.to_string(),
            "This action can only be run on pull request events"
        );
    }

    #[test]
    fn test_invalid_input_field() {
        let err = AppError::invalid_input_field("Input required and not supplied", "github-token");
        match err {
            AppError::InvalidInput { field, .. } => assert_eq!(field.as_deref(), Some("github-token")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_display_impl() {
        let err = AppError::authentication("invalid token");
        assert_eq!(format!("{}", err), "Authentication error: invalid token");
        assert_eq!(err.status_code(), None);
    }
}
