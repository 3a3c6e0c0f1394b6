//! In-memory fakes for the notifier traits (testing only).
//!
//! Provides `RecordingStatusClient` and `RecordingNotifier`, which satisfy
//! the trait contracts without any network access and remember every call.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::github::{CommitStatusClient, CreateCommitStatus, StatusClientError};
use crate::{BuildNotifier, BuildState, CommitSha};

// ---------------------------------------------------------------------------
// RecordingStatusClient
// ---------------------------------------------------------------------------

/// One recorded `create_commit_status` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedStatus {
    pub sha: CommitSha,
    pub status: CreateCommitStatus,
}

/// Commit-status client that records calls and replays scripted failures.
///
/// Each call pops the next scripted result; once the script is exhausted
/// every call succeeds.
#[derive(Debug, Default)]
pub struct RecordingStatusClient {
    calls: Mutex<Vec<RecordedStatus>>,
    script: Mutex<VecDeque<Result<(), StatusClientError>>>,
}

impl RecordingStatusClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// A client whose next call fails with `error`.
    pub fn failing_with(error: StatusClientError) -> Self {
        let client = Self::default();
        client.push_result(Err(error));
        client
    }

    /// Appends a result to the script.
    pub fn push_result(&self, result: Result<(), StatusClientError>) {
        self.script.lock().unwrap().push_back(result);
    }

    /// Every call made so far, oldest first.
    pub fn calls(&self) -> Vec<RecordedStatus> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommitStatusClient for RecordingStatusClient {
    async fn create_commit_status(
        &self,
        sha: &CommitSha,
        status: &CreateCommitStatus,
    ) -> Result<(), StatusClientError> {
        self.calls.lock().unwrap().push(RecordedStatus {
            sha: sha.clone(),
            status: status.clone(),
        });
        self.script.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }
}

// ---------------------------------------------------------------------------
// RecordingNotifier
// ---------------------------------------------------------------------------

/// One recorded [`BuildNotifier`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifierCall {
    BuildState {
        job_name: String,
        node_name: String,
        build_state: BuildState,
    },
    StageStatus {
        job_name: String,
        node_name: String,
        build_state: BuildState,
        node_duration: Duration,
    },
    FinalStatus {
        job_name: String,
        build_state: BuildState,
        build_duration: Duration,
        blocked_duration: Duration,
    },
    NonStageError {
        job_name: String,
        node_name: String,
    },
}

/// Notifier that records every call it receives.
#[derive(Debug)]
pub struct RecordingNotifier {
    enabled: bool,
    calls: Mutex<Vec<NotifierCall>>,
}

impl RecordingNotifier {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<NotifierCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: NotifierCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl BuildNotifier for RecordingNotifier {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn notify_build_state(&self, job_name: &str, node_name: &str, build_state: BuildState) {
        self.record(NotifierCall::BuildState {
            job_name: job_name.to_string(),
            node_name: node_name.to_string(),
            build_state,
        });
    }

    async fn notify_build_stage_status(
        &self,
        job_name: &str,
        node_name: &str,
        build_state: BuildState,
        node_duration: Duration,
    ) {
        self.record(NotifierCall::StageStatus {
            job_name: job_name.to_string(),
            node_name: node_name.to_string(),
            build_state,
            node_duration,
        });
    }

    async fn notify_final_build_status(
        &self,
        job_name: &str,
        build_state: BuildState,
        build_duration: Duration,
        blocked_duration: Duration,
    ) {
        self.record(NotifierCall::FinalStatus {
            job_name: job_name.to_string(),
            build_state,
            build_duration,
            blocked_duration,
        });
    }

    async fn send_non_stage_error(&self, job_name: &str, node_name: &str) {
        self.record(NotifierCall::NonStageError {
            job_name: job_name.to_string(),
            node_name: node_name.to_string(),
        });
    }
}
