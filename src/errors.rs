// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Error taxonomy for plan generation and its mapping onto HTTP responses

use serde::Serialize;
use warp::http::StatusCode;

/// Errors raised while validating a request or producing a plan
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenerationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Authorization header is required")]
    Unauthorized,

    #[error("Generation backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Malformed backend response: {0}")]
    MalformedBackendResponse(String),

    #[error("Knowledge base is not available")]
    KnowledgeBaseUnavailable,
}

impl GenerationError {
    pub fn missing(field: &str) -> Self {
        Self::MissingField(field.to_string())
    }

    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Stable machine-readable kind used in the `error` field of responses
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "missing_field",
            Self::InvalidValue { .. } => "invalid_value",
            Self::Unauthorized => "unauthorized",
            Self::BackendUnavailable(_) => "backend_unavailable",
            Self::MalformedBackendResponse(_) => "malformed_backend_response",
            Self::KnowledgeBaseUnavailable => "knowledge_base_unavailable",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingField(_) | Self::InvalidValue { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::BackendUnavailable(_) | Self::KnowledgeBaseUnavailable => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::MalformedBackendResponse(_) => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// Message safe to hand to callers. Server-side details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            Self::BackendUnavailable(_) => {
                "Failed to generate workout plan: generation backend unavailable".to_string()
            }
            Self::MalformedBackendResponse(_) => {
                "Failed to generate workout plan: backend returned an invalid plan".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// JSON body of every error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl From<&GenerationError> for ErrorResponse {
    fn from(error: &GenerationError) -> Self {
        Self {
            error: error.kind().to_string(),
            message: error.public_message(),
        }
    }
}

impl warp::reject::Reject for GenerationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_client_errors() {
        let missing = GenerationError::missing("user_profile");
        assert!(missing.is_client_error());
        assert!(missing.to_string().contains("user_profile"));

        let invalid = GenerationError::invalid("user_profile.age", "must be positive, got -3");
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);
        assert!(invalid.public_message().contains("user_profile.age"));
    }

    #[test]
    fn test_backend_details_are_not_exposed() {
        let error = GenerationError::BackendUnavailable("HTTP 500: secret upstream trace".into());
        assert!(!error.is_client_error());
        assert!(!error.public_message().contains("secret"));

        let body = ErrorResponse::from(&GenerationError::MalformedBackendResponse(
            "missing field `day_date` in {\"raw\": 1}".into(),
        ));
        assert_eq!(body.error, "malformed_backend_response");
        assert!(!body.message.contains("raw"));
    }
}
