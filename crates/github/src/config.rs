//! Connection settings for the GitHub REST API.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Public GitHub REST endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Value sent in the `X-GitHub-Api-Version` header.
pub const API_VERSION: &str = "2022-11-28";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// How to reach GitHub.
///
/// Every field has a default, so a config file only needs the values it
/// overrides.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    /// REST base URL. GitHub Enterprise Server uses `https://<host>/api/v3`.
    pub api_url: String,

    /// Token used as a bearer credential. Without one no client is built.
    pub token: Option<String>,

    /// `User-Agent` header; GitHub rejects requests without one.
    pub user_agent: String,

    /// Per-request timeout in seconds, enforced by the HTTP client.
    pub request_timeout_secs: u64,

    /// Whether `HTTP_PROXY` / `HTTPS_PROXY` are honoured.
    pub use_system_proxy: bool,
}

impl GithubConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// The token, if one is set and not blank.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.trim().is_empty())
    }
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            user_agent: concat!("autostatus/", env!("CARGO_PKG_VERSION")).to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            use_system_proxy: true,
        }
    }
}

// Keeps the token out of logs.
impl std::fmt::Debug for GithubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubConfig")
            .field("api_url", &self.api_url)
            .field("token", &self.token().map(|_| "<redacted>"))
            .field("user_agent", &self.user_agent)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("use_system_proxy", &self.use_system_proxy)
            .finish()
    }
}

/// Why a [`crate::GithubStatusClient`] could not be built.
#[derive(Debug, Error)]
pub enum GithubConfigError {
    /// No token was configured.
    #[error("A GitHub token is required to create commit statuses")]
    MissingToken,

    /// The token contains characters that cannot appear in a header.
    #[error("The GitHub token is not a valid header value")]
    InvalidToken,

    /// `api_url` is not an absolute http(s) URL.
    #[error("Invalid GitHub API URL '{url}': {reason}")]
    InvalidApiUrl {
        /// The rejected URL.
        url: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The HTTP client rejected the configuration.
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
