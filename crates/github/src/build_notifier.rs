//! Stage-level GitHub commit statuses driven by build notifications.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use notifier::{
    BuildNotifier, BuildState, CommitSha, CommitStatusClient, CreateCommitStatus,
    StatusClientError, TargetUrl,
};
use tracing::{debug, error};

use crate::mapping::status_mapping;

/// Sets one commit status per stage, using the stage name as the status
/// context.
///
/// The repository handle, commit, and target URL are fixed at construction.
/// One instance tracks one commit for one build. Whole-build outcomes are not
/// reported: GitHub shows the per-stage statuses, and the build's own status
/// is owned by the CI server.
pub struct GithubBuildNotifier {
    repository: Option<Arc<dyn CommitStatusClient>>,
    sha: CommitSha,
    target_url: Option<TargetUrl>,
}

impl GithubBuildNotifier {
    /// Creates a notifier for `sha`.
    ///
    /// * `repository`: client bound to the repository that owns `sha`;
    ///   `None` produces a disabled notifier.
    /// * `target_url`: link back to the build, shown beside each status.
    pub fn new(
        repository: Option<Arc<dyn CommitStatusClient>>,
        sha: CommitSha,
        target_url: Option<TargetUrl>,
    ) -> Self {
        Self {
            repository,
            sha,
            target_url,
        }
    }

    fn status_for(&self, node_name: &str, build_state: BuildState) -> CreateCommitStatus {
        let mapping = status_mapping(build_state);
        CreateCommitStatus {
            state: mapping.state,
            target_url: self.target_url.as_ref().map(|url| url.as_str().to_string()),
            description: Some(mapping.description.to_string()),
            context: node_name.to_string(),
        }
    }
}

impl std::fmt::Debug for GithubBuildNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubBuildNotifier")
            .field("enabled", &self.is_enabled())
            .field("sha", &self.sha)
            .field("target_url", &self.target_url)
            .finish()
    }
}

#[async_trait]
impl BuildNotifier for GithubBuildNotifier {
    fn is_enabled(&self) -> bool {
        self.repository.is_some()
    }

    async fn notify_build_state(&self, job_name: &str, node_name: &str, build_state: BuildState) {
        let Some(repository) = &self.repository else {
            error!(
                job = %job_name,
                stage = %node_name,
                "Exception while creating status for job {job_name}: no repository configured"
            );
            return;
        };

        let status = self.status_for(node_name, build_state);
        match repository.create_commit_status(&self.sha, &status).await {
            Ok(()) => {
                debug!(
                    job = %job_name,
                    stage = %node_name,
                    sha = %self.sha,
                    state = %status.state,
                    "Commit status created"
                );
            }
            Err(err) if !err.is_failure() => {
                debug!(
                    job = %job_name,
                    stage = %node_name,
                    error = %err,
                    "Ignoring client error carrying a success response code"
                );
            }
            Err(err) => log_status_error(job_name, node_name, &err),
        }
    }

    async fn notify_build_stage_status(
        &self,
        job_name: &str,
        node_name: &str,
        build_state: BuildState,
        _node_duration: Duration,
    ) {
        self.notify_build_state(job_name, node_name, build_state)
            .await;
    }

    async fn notify_final_build_status(
        &self,
        _job_name: &str,
        _build_state: BuildState,
        _build_duration: Duration,
        _blocked_duration: Duration,
    ) {
    }

    async fn send_non_stage_error(&self, job_name: &str, node_name: &str) {
        self.notify_build_state(job_name, node_name, BuildState::CompletedError)
            .await;
    }
}

fn log_status_error(job_name: &str, node_name: &str, err: &StatusClientError) {
    match err.response_code() {
        Some(status) => error!(
            job = %job_name,
            stage = %node_name,
            status,
            error = %err,
            "Exception while creating status for job {job_name}"
        ),
        None => error!(
            job = %job_name,
            stage = %node_name,
            error = %err,
            "Exception while creating status for job {job_name}"
        ),
    }
}
