//! GitHub infrastructure adapter.
//!
//! Implements the GitHub-facing port defined in the [`notifier`] crate
//! ([`notifier::CommitStatusClient`]) over the REST API with `reqwest`, and
//! provides [`GithubBuildNotifier`], the [`notifier::BuildNotifier`] that turns
//! stage transitions into commit statuses.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Authentication headers, URL construction, and response
//! classification live here; the [`notifier`] crate never sees them.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`mapping`] | Build state → commit state and description |
//! | [`build_notifier`] | [`GithubBuildNotifier`] |
//! | [`client`] | [`GithubStatusClient`] |
//! | [`config`] | [`GithubConfig`] and construction errors |

pub mod build_notifier;
pub mod client;
pub mod config;
pub mod mapping;

pub use build_notifier::GithubBuildNotifier;
pub use client::GithubStatusClient;
pub use config::{GithubConfig, GithubConfigError, API_VERSION, DEFAULT_API_URL};
pub use mapping::{status_mapping, StatusMapping};
