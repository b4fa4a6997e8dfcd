//! Error hierarchy for the config observer.
//!
//! Errors are grouped by how the reconciler treats them: lookups that may be
//! tolerated (`NotFound`), previous-state decode failures (`Decode`), and
//! remote failures that abort a pass and trigger a backoff retry (`Remote`,
//! `Conflict`).

use config::ConfigError;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Object is absent from a watch cache or from the remote API
    #[error("{kind} \"{name}\" not found")]
    NotFound { kind: &'static str, name: String },

    /// Stored observed config could not be decoded
    #[error("Failed to decode observed config: {0}")]
    Decode(#[from] serde_json::Error),

    /// Observed config could not be encoded for writing
    #[error("Failed to encode observed config: {0}")]
    Encode(serde_json::Error),

    /// Update rejected because the resource version was stale
    #[error("Operation cannot be fulfilled on {kind} \"{name}\": {message}")]
    Conflict {
        kind: &'static str,
        name: String,
        message: String,
    },

    /// Any other read/write failure against the remote API
    #[error("Remote call failed: {0}")]
    Remote(String),

    /// A nested setter met an intermediate value that is not a mapping
    #[error("Value cannot be set at {path}: {reason}")]
    Document { path: String, reason: String },

    /// Notification payload or tombstone carried an unexpected object
    #[error("Unexpected object: {0}")]
    UnexpectedObject(String),

    /// Configuration loading or validation failures
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Unrecoverable failures requiring process termination
    #[error("Fatal error: {0}")]
    Fatal(String),
}

impl Error {
    pub fn not_found(
        kind: &'static str,
        name: impl Into<String>,
    ) -> Self {
        Error::NotFound {
            kind,
            name: name.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Conflict { .. })
    }

    /// Short label used for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::NotFound { .. } => "not_found",
            Error::Decode(_) => "decode",
            Error::Encode(_) => "encode",
            Error::Conflict { .. } => "conflict",
            Error::Remote(_) => "remote",
            Error::Document { .. } => "document",
            Error::UnexpectedObject(_) => "unexpected_object",
            Error::Config(_) => "config",
            Error::Fatal(_) => "fatal",
        }
    }
}
