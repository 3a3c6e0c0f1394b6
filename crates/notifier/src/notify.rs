//! The capability every build notifier provides.

use std::time::Duration;

use async_trait::async_trait;

use crate::BuildState;

/// Reports build and stage lifecycle events to some external system.
///
/// Notification methods never fail from the caller's point of view: each
/// implementation absorbs and logs its own errors, so one broken backend
/// cannot interrupt the build or the other notifiers.
///
/// Callers check [`BuildNotifier::is_enabled`] before invoking anything else;
/// the other methods do not re-check it.
#[async_trait]
pub trait BuildNotifier: Send + Sync {
    /// Whether the notifier was configured well enough to send anything.
    fn is_enabled(&self) -> bool;

    /// Reports that `node_name` entered `build_state`.
    async fn notify_build_state(&self, job_name: &str, node_name: &str, build_state: BuildState);

    /// Reports a stage transition together with how long the stage ran.
    async fn notify_build_stage_status(
        &self,
        job_name: &str,
        node_name: &str,
        build_state: BuildState,
        node_duration: Duration,
    );

    /// Reports the outcome of the whole build.
    async fn notify_final_build_status(
        &self,
        job_name: &str,
        build_state: BuildState,
        build_duration: Duration,
        blocked_duration: Duration,
    );

    /// Reports a failure that happened outside any tracked stage, whether or
    /// not a pending notification was sent for `node_name` first.
    async fn send_non_stage_error(&self, job_name: &str, node_name: &str);
}
