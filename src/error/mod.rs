//! Error definitions
//!
//! This module provides error types for testkit-mock.
//!
//! Values thrown by mock behaviors are not errors of this crate: they travel
//! back to the caller untouched as `Err(Value)`. The variants here only
//! describe misuse of the mocking API itself.

use thiserror::Error;

/// Main error type for testkit-mock
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A substitution, spy or override named a capability it cannot use.
    #[error("Configuration error for `{capability}`: {reason}")]
    Configuration {
        /// The capability the request referred to.
        capability: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Restore was requested for a capability with no active override.
    #[error("No override to restore for `{0}`")]
    NotOverridden(String),
}

impl Error {
    /// Create a configuration error for a capability missing from a module.
    #[must_use]
    pub fn missing_capability(module: &str, capability: impl Into<String>) -> Self {
        Self::Configuration {
            capability: capability.into(),
            reason: format!("module `{module}` has no such capability"),
        }
    }

    /// Create a configuration error for a capability listed more than once.
    #[must_use]
    pub fn duplicate_capability(capability: impl Into<String>) -> Self {
        Self::Configuration {
            capability: capability.into(),
            reason: "listed more than once in the same substitution".to_string(),
        }
    }

    /// Create a not-overridden error.
    #[must_use]
    pub fn not_overridden(capability: impl Into<String>) -> Self {
        Self::NotOverridden(capability.into())
    }

    /// The capability this error names.
    #[must_use]
    pub fn capability(&self) -> &str {
        match self {
            Self::Configuration { capability, .. } | Self::NotOverridden(capability) => capability,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
