//! GitHub commit-status port.
//!
//! [`CommitStatusClient`] is the repository handle a GitHub notifier is bound
//! to: one client per repository, one operation. The `github` infrastructure
//! crate implements it over the REST API; tests implement it in memory.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::CommitSha;

// ---------------------------------------------------------------------------
// Status values
// ---------------------------------------------------------------------------

/// State of a GitHub commit status, as accepted by the statuses API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitState {
    /// Work is in progress.
    Pending,
    /// Work finished successfully.
    Success,
    /// Work could not complete.
    Error,
    /// Work finished and reported a failure.
    Failure,
}

impl CommitState {
    /// Wire name of the state.
    pub const fn as_str(self) -> &'static str {
        match self {
            CommitState::Pending => "pending",
            CommitState::Success => "success",
            CommitState::Error => "error",
            CommitState::Failure => "failure",
        }
    }
}

impl std::fmt::Display for CommitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of a single create-commit-status call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCommitStatus {
    /// State to set.
    pub state: CommitState,

    /// Link shown next to the status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_url: Option<String>,

    /// Short human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Label distinguishing this status from others on the same commit.
    pub context: String,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure of a commit-status call.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum StatusClientError {
    /// GitHub answered with a response the client treats as a failure.
    #[error("GitHub responded with HTTP {status}: {message}")]
    Http {
        /// HTTP response code.
        status: u16,
        /// Error message from the response body, or the raw body.
        message: String,
    },

    /// The request never produced a response (connect, TLS, timeout).
    #[error("Transport failure: {message}")]
    Transport {
        /// Description of the underlying failure.
        message: String,
    },

    /// The request or response body could not be encoded or decoded.
    #[error("Serialization failure: {message}")]
    Serialization {
        /// Description of the underlying failure.
        message: String,
    },
}

impl StatusClientError {
    /// HTTP response code, when the failure came with one.
    pub fn response_code(&self) -> Option<u16> {
        match self {
            StatusClientError::Http { status, .. } => Some(*status),
            StatusClientError::Transport { .. } | StatusClientError::Serialization { .. } => None,
        }
    }

    /// Returns `true` unless this is an HTTP failure carrying a 2xx code.
    ///
    /// Some clients classify a 2xx answer with an unreadable body as an HTTP
    /// error; the status was still written, so it does not count as a failure.
    pub fn is_failure(&self) -> bool {
        !matches!(self.response_code(), Some(code) if (200..=299).contains(&code))
    }
}

// ---------------------------------------------------------------------------
// Port
// ---------------------------------------------------------------------------

/// Sets commit statuses on one repository.
#[async_trait]
pub trait CommitStatusClient: Send + Sync {
    /// Creates a status on `sha`.
    ///
    /// Last write wins: GitHub shows the most recent status per context.
    async fn create_commit_status(
        &self,
        sha: &CommitSha,
        status: &CreateCommitStatus,
    ) -> Result<(), StatusClientError>;
}
