//! Build-status notification domain.
//!
//! This crate contains the build-state model, newtype identifiers, the
//! [`BuildNotifier`] capability, and the port traits that infrastructure
//! crates implement. It defines *what* a notifier must do; the `github`
//! crate defines *how* commit statuses are written.
//!
//! ## Architectural Layer
//!
//! **Domain + port definitions.** This crate has no I/O dependencies.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`CommitSha`, `RepositoryId`, `TargetUrl`) |
//! | [`types`] | [`BuildState`] |
//! | [`errors`] | Input-validation errors |
//! | [`notify`] | The [`BuildNotifier`] trait |
//! | [`manager`] | [`BuildNotifierManager`], fan-out to enabled notifiers |
//! | [`github`] | Commit-status port (`CommitStatusClient`) and its value types |
//! | [`fakes`] | In-memory implementations for tests |

pub mod errors;
pub mod fakes;
pub mod github;
pub mod identifiers;
pub mod manager;
pub mod notify;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use errors::{IdentifierError, ParseBuildStateError};
pub use github::{CommitState, CommitStatusClient, CreateCommitStatus, StatusClientError};
pub use identifiers::{CommitSha, RepositoryId, TargetUrl};
pub use manager::BuildNotifierManager;
pub use notify::BuildNotifier;
pub use types::BuildState;
