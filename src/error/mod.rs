//! Error definitions
//!
//! This module provides error types for testkit-reflect.

use thiserror::Error;

/// Main error type for testkit-reflect
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Assertion failed
    #[error("Assertion failed: {0}")]
    AssertionFailed(String),

    /// No callable with the requested name
    #[error("No callable named `{name}` on {owner}")]
    UnknownCallable {
        /// Type that was searched.
        owner: String,
        /// Requested callable name.
        name: String,
    },

    /// Visibility name outside the supported set
    #[error("Invalid visibility: {0:?} (expected public, internal, protected or private)")]
    InvalidVisibility(String),
}

impl Error {
    /// Create an assertion failure.
    #[must_use]
    pub fn assertion_failed(message: impl Into<String>) -> Self {
        Self::AssertionFailed(message.into())
    }

    /// Create an unknown callable error.
    #[must_use]
    pub fn unknown_callable(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self::UnknownCallable {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
