//! Fan-out of build events to every enabled notifier.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::{BuildNotifier, BuildState};

/// Holds the notifiers configured for one job and forwards each event to all
/// of them, in registration order.
///
/// Disabled notifiers are rejected at registration, which is where
/// [`BuildNotifier::is_enabled`] is enforced.
#[derive(Clone)]
pub struct BuildNotifierManager {
    job_name: String,
    notifiers: Vec<Arc<dyn BuildNotifier>>,
}

impl BuildNotifierManager {
    /// Creates an empty manager for `job_name`.
    pub fn new(job_name: impl Into<String>) -> Self {
        Self {
            job_name: job_name.into(),
            notifiers: Vec::new(),
        }
    }

    /// Name passed to every notifier as logging context.
    pub fn job_name(&self) -> &str {
        &self.job_name
    }

    /// Registers `notifier` if it is enabled. Returns whether it was added.
    pub fn add_notifier(&mut self, notifier: Arc<dyn BuildNotifier>) -> bool {
        if !notifier.is_enabled() {
            debug!(job = %self.job_name, "Skipping disabled notifier");
            return false;
        }
        self.notifiers.push(notifier);
        true
    }

    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }

    pub async fn notify_build_state(&self, node_name: &str, build_state: BuildState) {
        for notifier in &self.notifiers {
            notifier
                .notify_build_state(&self.job_name, node_name, build_state)
                .await;
        }
    }

    pub async fn notify_build_stage_status(
        &self,
        node_name: &str,
        build_state: BuildState,
        node_duration: Duration,
    ) {
        for notifier in &self.notifiers {
            notifier
                .notify_build_stage_status(&self.job_name, node_name, build_state, node_duration)
                .await;
        }
    }

    pub async fn notify_final_build_status(
        &self,
        build_state: BuildState,
        build_duration: Duration,
        blocked_duration: Duration,
    ) {
        for notifier in &self.notifiers {
            notifier
                .notify_final_build_status(
                    &self.job_name,
                    build_state,
                    build_duration,
                    blocked_duration,
                )
                .await;
        }
    }

    pub async fn send_non_stage_error(&self, node_name: &str) {
        for notifier in &self.notifiers {
            notifier.send_non_stage_error(&self.job_name, node_name).await;
        }
    }
}

impl std::fmt::Debug for BuildNotifierManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildNotifierManager")
            .field("job_name", &self.job_name)
            .field("notifiers", &self.notifiers.len())
            .finish()
    }
}
