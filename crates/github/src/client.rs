//! Commit-status client over the GitHub REST API.

use async_trait::async_trait;
use notifier::{CommitSha, CommitStatusClient, CreateCommitStatus, RepositoryId, StatusClientError};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Url;
use serde::Deserialize;

use crate::config::{GithubConfig, GithubConfigError, API_VERSION};

/// Writes commit statuses to one repository via
/// `POST /repos/{owner}/{repo}/statuses/{sha}`.
#[derive(Debug, Clone)]
pub struct GithubStatusClient {
    http: reqwest::Client,
    api_url: Url,
    repository: RepositoryId,
}

impl GithubStatusClient {
    /// Builds a client for `repository` from `config`.
    pub fn new(config: &GithubConfig, repository: RepositoryId) -> Result<Self, GithubConfigError> {
        let token = config.token().ok_or(GithubConfigError::MissingToken)?;
        let api_url = parse_api_url(&config.api_url)?;

        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| GithubConfigError::InvalidToken)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));

        let mut builder = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .timeout(config.request_timeout());
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }

        Ok(Self {
            http: builder.build()?,
            api_url,
            repository,
        })
    }

    /// Endpoint a status for `sha` is posted to.
    pub fn statuses_url(&self, sha: &CommitSha) -> Url {
        endpoint(
            &self.api_url,
            &[
                "repos",
                self.repository.owner(),
                self.repository.name(),
                "statuses",
                sha.as_str(),
            ],
        )
    }
}

/// Appends `segments` to the base path, percent-encoding each one so that
/// `/`, `?` and `#` inside a segment cannot change the target.
fn endpoint(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

#[async_trait]
impl CommitStatusClient for GithubStatusClient {
    async fn create_commit_status(
        &self,
        sha: &CommitSha,
        status: &CreateCommitStatus,
    ) -> Result<(), StatusClientError> {
        let response = self
            .http
            .post(self.statuses_url(sha))
            .json(status)
            .send()
            .await
            .map_err(transport_error)?;

        let code = response.status();
        if code.is_success() {
            return Ok(());
        }

        let message = response.text().await.map_or_else(
            |err| format!("failed to read response body: {}", error_chain(&err)),
            |text| error_message(&text, code.canonical_reason()),
        );
        Err(StatusClientError::Http {
            status: code.as_u16(),
            message,
        })
    }
}

fn parse_api_url(raw: &str) -> Result<Url, GithubConfigError> {
    let invalid = |reason: String| GithubConfigError::InvalidApiUrl {
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(invalid(format!("unsupported scheme '{other}'"))),
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("query and fragment are not allowed".to_string()));
    }
    Ok(url)
}

#[derive(Deserialize)]
struct GithubErrorBody {
    message: String,
}

/// GitHub error bodies are `{"message": ..., "documentation_url": ...}`.
fn error_message(body: &str, reason: Option<&str>) -> String {
    if let Ok(parsed) = serde_json::from_str::<GithubErrorBody>(body) {
        return parsed.message;
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        reason.unwrap_or("no response body").to_string()
    } else {
        trimmed.to_string()
    }
}

fn error_chain(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// `.json(..)` reports encode failures as builder errors from `send`.
fn transport_error(err: reqwest::Error) -> StatusClientError {
    let message = error_chain(&err);
    if err.is_builder() || err.is_decode() {
        StatusClientError::Serialization { message }
    } else {
        StatusClientError::Transport { message }
    }
}
