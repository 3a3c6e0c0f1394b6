//! Shared value types for build-status notification.
//!
//! [`BuildState`] is produced by whatever observes the build (a pipeline
//! listener, a CLI invocation) and consumed read-only by every notifier.

use serde::{Deserialize, Serialize};

use crate::errors::ParseBuildStateError;

// ---------------------------------------------------------------------------
// Build state
// ---------------------------------------------------------------------------

/// Lifecycle state of a stage or of a whole build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildState {
    /// The stage has started and not yet finished.
    Pending,
    /// The stage ran and failed.
    CompletedError,
    /// The stage ran and succeeded.
    CompletedSuccess,
    /// The stage was skipped because an earlier stage failed.
    SkippedFailure,
    /// The stage was skipped because an earlier stage marked the build unstable.
    SkippedUnstable,
    /// The stage was skipped by a `when` condition.
    SkippedConditional,
}

impl BuildState {
    /// Every variant, in declaration order.
    pub const ALL: [BuildState; 6] = [
        BuildState::Pending,
        BuildState::CompletedError,
        BuildState::CompletedSuccess,
        BuildState::SkippedFailure,
        BuildState::SkippedUnstable,
        BuildState::SkippedConditional,
    ];

    /// Canonical snake_case name, matching the serde representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            BuildState::Pending => "pending",
            BuildState::CompletedError => "completed_error",
            BuildState::CompletedSuccess => "completed_success",
            BuildState::SkippedFailure => "skipped_failure",
            BuildState::SkippedUnstable => "skipped_unstable",
            BuildState::SkippedConditional => "skipped_conditional",
        }
    }
}

impl std::fmt::Display for BuildState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BuildState {
    type Err = ParseBuildStateError;

    /// Accepts snake_case, kebab-case, and CamelCase spellings, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();

        BuildState::ALL
            .into_iter()
            .find(|state| state.as_str().replace('_', "") == normalised)
            .ok_or_else(|| ParseBuildStateError {
                value: s.to_string(),
            })
    }
}
