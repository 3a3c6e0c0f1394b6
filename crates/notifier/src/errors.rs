//! Errors raised while building domain values from untrusted input.
//!
//! These are construction-time failures: a malformed repository slug, an
//! empty SHA, an unknown build-state name. Failures of the notification
//! calls themselves are defined beside the port they belong to (see
//! [`crate::github::StatusClientError`]) and never escape a notifier.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons an identifier string is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum IdentifierError {
    /// The value was empty (or only whitespace).
    #[error("{kind} must not be empty")]
    Empty {
        /// Which identifier was being built.
        kind: String,
    },

    /// A commit SHA was not a hexadecimal object name.
    #[error("Commit SHA '{value}' is not a hexadecimal object name")]
    MalformedCommitSha {
        /// The rejected input.
        value: String,
    },

    /// A repository slug was not in `owner/name` form.
    #[error("Repository '{value}' is not in 'owner/name' format")]
    MalformedRepository {
        /// The rejected input.
        value: String,
    },
}

/// Returned when a string does not name a [`crate::BuildState`].
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("Unknown build state '{value}'")]
pub struct ParseBuildStateError {
    /// The rejected input.
    pub value: String,
}
