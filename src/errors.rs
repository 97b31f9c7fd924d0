// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for registry operations

use thiserror::Error;

/// Errors that can occur while resolving or accessing registry entities
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Requested key or subtree is absent from the backend
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    /// Write attempted on a field derived from the DN or from other keys
    #[error("Attribute '{field}' of {kind} is read-only")]
    ReadOnlyAttribute {
        kind: &'static str,
        field: String,
    },

    /// A DN parser could not locate the structural landmark it needs
    #[error("Malformed DN: {0}")]
    MalformedDn(String),

    /// The segment following a known prefix is not an integer
    #[error("Invalid instance id '{segment}' in route '{route}'")]
    InvalidInstanceId { route: String, segment: String },

    /// DN contains a sequence that would not survive the flat-id round trip
    #[error("DN cannot be encoded as an unambiguous flat id: {0}")]
    AmbiguousId(String),

    /// Operation the backend refuses to perform
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Stored value could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Transport or server failure of a remote backend
    #[error("Backend error: {0}")]
    Backend(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl RegistryError {
    /// True when the error reports an absent key or subtree
    pub fn is_not_found(&self) -> bool {
        matches!(self, RegistryError::KeyNotFound(_))
    }
}

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        RegistryError::Serialization(err.to_string())
    }
}
