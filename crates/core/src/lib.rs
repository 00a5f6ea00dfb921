//! Shared primitives for all Rust crates in Rolekeep.

#![forbid(unsafe_code)]

/// Pluggable serialization formats.
pub mod codec;

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use codec::{Codec, JsonCodec, null_as_default};

/// Result type used across Rolekeep crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for NonEmptyString {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Error categories raised while loading and resolving roles.
#[derive(Debug, Error)]
pub enum AppError {
    /// The role directory could not be enumerated.
    #[error("error loading roles from '{path}': {reason}")]
    DirectoryUnreadable {
        /// Directory that was requested.
        path: String,
        /// Underlying I/O failure.
        reason: String,
    },

    /// A role file could not be read or decoded.
    #[error("error loading role {file}: {reason}")]
    FileUnreadable {
        /// File name inside the role directory.
        file: String,
        /// Underlying I/O or codec failure.
        reason: String,
    },

    /// A decoded role file violates a field rule.
    #[error("error loading role {file}: {reason}")]
    InvalidRole {
        /// File name inside the role directory.
        file: String,
        /// Violated rule.
        reason: String,
    },

    /// Two role files declare the same name.
    #[error("error loading role {file}: role with name {name} already exists")]
    DuplicateName {
        /// File that introduced the duplicate.
        file: String,
        /// Conflicting role name.
        name: String,
    },

    /// Two role files declare the same tier.
    #[error("error loading role {file}: role with tier {tier} already exists")]
    DuplicateTier {
        /// File that introduced the duplicate.
        file: String,
        /// Conflicting tier.
        tier: i64,
    },

    /// A role inherits from a role that is not part of the same load.
    #[error("role {role} inherits from the role {parent} which does not exist")]
    UnknownParent {
        /// Role declaring the parent.
        role: String,
        /// Parent name that failed to resolve.
        parent: String,
    },

    /// A role names itself as its parent.
    #[error("role {role} inherits from itself")]
    SelfInheritance {
        /// Offending role.
        role: String,
    },

    /// Two roles name each other as parent.
    #[error("role {role} and role {other} have circular inheritance")]
    MutualInheritance {
        /// First role of the pair.
        role: String,
        /// Second role of the pair.
        other: String,
    },

    /// A longer chain of parents loops back onto itself.
    #[error("roles have circular inheritance: {}", .chain.join(" -> "))]
    InheritanceCycle {
        /// Role names along the cycle, first name repeated at the end.
        chain: Vec<String>,
    },

    /// A role looked up by name is not registered.
    #[error("role {0} does not exist")]
    MissingRole(String),

    /// Bytes could not be encoded or decoded by a codec.
    #[error("codec error: {0}")]
    Codec(String),

    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}
