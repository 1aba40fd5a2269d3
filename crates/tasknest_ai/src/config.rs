//! AI client configuration.
//!
//! Credentials and model choice are user settings stored in
//! `tasknest_core::AppSettings`; this holds transport-level knobs only.

use std::time::Duration;

/// Default public API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default request timeout enforced by the HTTP client.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Transport configuration for `ReqwestTransport`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiClientConfig {
    /// Base URL without trailing slash; `/responses` is appended.
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for AiClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl AiClientConfig {
    /// Full URL of the responses endpoint.
    pub fn responses_url(&self) -> String {
        format!("{}/responses", self.base_url.trim_end_matches('/'))
    }
}
