//! Translation of build states into GitHub commit statuses.
//!
//! Skipped stages are reported as `success`: work that was never meant to run
//! must not turn a pull request red.

use notifier::{BuildState, CommitState};

/// The commit state and description a [`BuildState`] is reported as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusMapping {
    pub state: CommitState,
    pub description: &'static str,
}

/// Resolves `build_state` to its commit status.
pub const fn status_mapping(build_state: BuildState) -> StatusMapping {
    match build_state {
        BuildState::Pending => StatusMapping {
            state: CommitState::Pending,
            description: "Building stage",
        },
        BuildState::CompletedError => StatusMapping {
            state: CommitState::Error,
            description: "Failed to build stage",
        },
        BuildState::CompletedSuccess => StatusMapping {
            state: CommitState::Success,
            description: "Stage built successfully",
        },
        BuildState::SkippedFailure => StatusMapping {
            state: CommitState::Success,
            description: "Stage did not run due to earlier failure(s)",
        },
        BuildState::SkippedUnstable => StatusMapping {
            state: CommitState::Success,
            description: "Stage did not run due to earlier stage(s) marking the build as unstable",
        },
        BuildState::SkippedConditional => StatusMapping {
            state: CommitState::Success,
            description: "Stage did not run due to when conditional",
        },
    }
}
