//! Error types for quip.

use thiserror::Error;

/// A shared error type for every quip crate.
///
/// Variants are typed and structured; common library errors convert into it
/// through `From` so that `?` works across the storage and config layers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuipError {
    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Key-value storage error (quota, invalid key, backend failure)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON"
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input rejected before it reaches a store
    #[error("Validation error: {0}")]
    Validation(String),

    /// Authentication rejected by the authenticator
    #[error("Security error: {0}")]
    Security(String),

    /// A sign-in or sign-up call is already outstanding
    #[error("Authentication already in progress")]
    AuthInProgress,

    /// A generate call is already outstanding
    #[error("Joke generation already in progress")]
    GenerationInProgress,

    /// Topic has no table entry and the fallback policy is strict
    #[error("Unknown topic: '{0}'")]
    UnknownTopic(String),

    /// Share delivery failed on both native share and clipboard
    #[error("Share error: {0}")]
    Share(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl QuipError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a Security error
    pub fn security(message: impl Into<String>) -> Self {
        Self::Security(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a serialization error
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }

    /// Check if this error came from the persistence layer (I/O, backend or
    /// encoding).
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            Self::Io { .. } | Self::Storage(_) | Self::Serialization { .. }
        )
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for QuipError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for QuipError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for QuipError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for QuipError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, QuipError>`.
pub type Result<T> = std::result::Result<T, QuipError>;
