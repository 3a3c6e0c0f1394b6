//! Newtype identifiers for the values a notifier is bound to.
//!
//! A commit SHA, a repository slug, and a target URL are all strings on the
//! wire. Wrapping each one keeps a [`CommitSha`] from being passed where a
//! [`RepositoryId`] is expected.

use serde::{Deserialize, Serialize};

use crate::errors::IdentifierError;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display, FromStr.
// `CommitSha` is written out by hand below because it validates its format.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident, $kind:literal
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is blank.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.trim().is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = IdentifierError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s).ok_or_else(|| IdentifierError::Empty { kind: $kind.to_string() })
            }
        }
    };
}

/// A Git commit SHA that statuses are attached to.
///
/// Only hexadecimal object names are accepted: abbreviated (at least 4
/// digits), full SHA-1 (40) or SHA-256 (64). The value ends up as a URL path
/// segment, so anything else is rejected at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CommitSha(String);

impl CommitSha {
    const MIN_LEN: usize = 4;
    const MAX_LEN: usize = 64;

    /// Creates a commit SHA, returning `None` unless `value` is a hex object
    /// name.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        Self::parse(value.into()).ok()
    }

    /// Returns the SHA as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn parse(value: String) -> Result<Self, IdentifierError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(IdentifierError::Empty {
                kind: "commit SHA".to_string(),
            });
        }
        let well_formed = (Self::MIN_LEN..=Self::MAX_LEN).contains(&trimmed.len())
            && trimmed.bytes().all(|b| b.is_ascii_hexdigit());
        if !well_formed {
            return Err(IdentifierError::MalformedCommitSha {
                value: trimmed.to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl std::fmt::Display for CommitSha {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for CommitSha {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s.to_string())
    }
}

impl TryFrom<String> for CommitSha {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<CommitSha> for String {
    fn from(sha: CommitSha) -> Self {
        sha.0
    }
}

string_id! {
    /// Link shown next to a commit status (usually the build's page).
    TargetUrl, "target URL"
}

// ---------------------------------------------------------------------------

/// Identifies a GitHub repository in `"owner/name"` format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryId {
    owner: String,
    name: String,
}

impl RepositoryId {
    /// Parses an `owner/name` slug.
    pub fn parse(value: &str) -> Result<Self, IdentifierError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(IdentifierError::Empty {
                kind: "repository".to_string(),
            });
        }

        match trimmed.split_once('/') {
            Some((owner, name)) if is_slug_part(owner) && is_slug_part(name) => {
                Ok(Self {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(IdentifierError::MalformedRepository {
                value: trimmed.to_string(),
            }),
        }
    }

    /// Account or organisation that owns the repository.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name without the owner.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Owner and repository names: ASCII letters, digits, `-`, `_` and `.`, but
/// never a bare dot segment.
fn is_slug_part(part: &str) -> bool {
    !part.is_empty()
        && part != "."
        && part != ".."
        && part
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
}

impl std::fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl std::str::FromStr for RepositoryId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
