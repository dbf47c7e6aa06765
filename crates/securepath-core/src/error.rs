//! Shared error type across SecurePath crates.

use std::path::PathBuf;

use thiserror::Error;

/// Stable error codes (used in logs and tests).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Invalid configuration value or document.
    BadConfig,
    /// Unsupported config schema version.
    UnsupportedVersion,
    /// Filesystem failure.
    Io,
    /// JSON encoding failure.
    Serialize,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation used in structured log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::BadConfig => "BAD_CONFIG",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::Io => "IO",
            ErrorCode::Serialize => "SERIALIZE",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, SecurePathError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum SecurePathError {
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("serialize: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("internal: {0}")]
    Internal(String),
}

impl SecurePathError {
    /// Map the error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            SecurePathError::BadConfig(_) => ErrorCode::BadConfig,
            SecurePathError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            SecurePathError::Io { .. } => ErrorCode::Io,
            SecurePathError::Serialize(_) => ErrorCode::Serialize,
            SecurePathError::Internal(_) => ErrorCode::Internal,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SecurePathError::Io {
            path: path.into(),
            source,
        }
    }
}
