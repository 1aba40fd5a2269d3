//! AI protocol error taxonomy.
//!
//! Every failure of an AI-assisted operation surfaces as exactly one
//! `AiError`. Nothing here is retried.

use thiserror::Error;

/// Failure of an AI-assisted operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AiError {
    /// The API key is blank; detected before any network call.
    #[error("No API key configured. Add one in settings to use AI features.")]
    MissingCredential,

    /// The endpoint answered with a non-success status, or could not be
    /// reached at all (`status` is `None`).
    #[error("{}", endpoint_message(.status, .message))]
    Endpoint { status: Option<u16>, message: String },

    /// The response could not be turned into the expected JSON payload.
    #[error("The AI returned an unusable response: {0}")]
    InvalidResponse(String),
}

/// Result type alias for AI protocol operations.
pub type AiResult<T> = Result<T, AiError>;

impl AiError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingCredential => "missing_api_key",
            Self::Endpoint { .. } => "api_error",
            Self::InvalidResponse(_) => "invalid_response",
        }
    }

    /// Whether the caller should prompt for (re)configuring credentials.
    pub fn needs_credentials(&self) -> bool {
        matches!(self, Self::MissingCredential)
    }

    /// Create an invalid-response error
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }
}

fn endpoint_message(status: &Option<u16>, message: &str) -> String {
    match (*status, message.trim().is_empty()) {
        (Some(status), true) => format!("AI request failed with HTTP {status}"),
        (Some(status), false) => format!("AI request failed with HTTP {status}: {message}"),
        (None, _) => format!("AI request failed: {message}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(AiError::MissingCredential.code(), "missing_api_key");
        assert_eq!(
            AiError::Endpoint {
                status: Some(500),
                message: String::new()
            }
            .code(),
            "api_error"
        );
        assert_eq!(AiError::invalid_response("x").code(), "invalid_response");
    }

    #[test]
    fn test_endpoint_display_includes_status_and_body() {
        let err = AiError::Endpoint {
            status: Some(429),
            message: "Rate limit reached".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "AI request failed with HTTP 429: Rate limit reached"
        );

        let err = AiError::Endpoint {
            status: Some(502),
            message: "  ".to_string(),
        };
        assert_eq!(err.to_string(), "AI request failed with HTTP 502");

        let err = AiError::Endpoint {
            status: None,
            message: "connection refused".to_string(),
        };
        assert_eq!(err.to_string(), "AI request failed: connection refused");
    }

    #[test]
    fn test_only_missing_credential_prompts_for_settings() {
        assert!(AiError::MissingCredential.needs_credentials());
        assert!(!AiError::invalid_response("bad json").needs_credentials());
    }
}
