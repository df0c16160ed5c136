//! Error types for tickit
//!
//! Exit codes:
//! - 0: Success
//! - 2: Validation or usage error (empty/over-long text, bad args, bad config)
//! - 3: Task not found (stale or ambiguous id)
//! - 4: Persistence failed (storage read/write, lock, quota)

use std::path::PathBuf;
use thiserror::Error;

use crate::task::MAX_TEXT_LEN;

/// Exit codes for the tickit CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const NOT_FOUND: i32 = 3;
    pub const PERSISTENCE_FAILED: i32 = 4;
}

/// Coarse error category used for recovery decisions and JSON output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Persistence,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation_error",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Persistence => "persistence_error",
        }
    }
}

/// Main error type for tickit operations
#[derive(Error, Debug)]
pub enum Error {
    // Validation errors (exit code 2)
    #[error("Task text cannot be empty")]
    EmptyText,

    #[error("Task text is too long: {len} characters (maximum {max})", max = MAX_TEXT_LEN)]
    TooLong { len: usize },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Not found (exit code 3)
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Task id prefix '{prefix}' is ambiguous ({matches} matches)")]
    AmbiguousId { prefix: String, matches: usize },

    // Persistence failures (exit code 4)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Lock acquisition failed: {0}")]
    LockFailed(PathBuf),

    #[error("Storage quota exceeded writing '{key}': {size} bytes (limit {limit})")]
    QuotaExceeded {
        key: String,
        size: usize,
        limit: usize,
    },

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl Error {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::EmptyText
            | Error::TooLong { .. }
            | Error::InvalidArgument(_)
            | Error::InvalidConfig(_) => ErrorKind::Validation,

            Error::TaskNotFound(_) | Error::AmbiguousId { .. } => ErrorKind::NotFound,

            Error::Io(_)
            | Error::Json(_)
            | Error::LockFailed(_)
            | Error::QuotaExceeded { .. }
            | Error::StorageUnavailable(_)
            | Error::OperationFailed(_) => ErrorKind::Persistence,
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            ErrorKind::Validation => exit_codes::USER_ERROR,
            ErrorKind::NotFound => exit_codes::NOT_FOUND,
            ErrorKind::Persistence => exit_codes::PERSISTENCE_FAILED,
        }
    }

    /// Structured details for machine-readable output
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::TooLong { len } => Some(serde_json::json!({
                "len": len,
                "max": MAX_TEXT_LEN,
            })),
            Error::TaskNotFound(id) => Some(serde_json::json!({ "id": id })),
            Error::AmbiguousId { prefix, matches } => Some(serde_json::json!({
                "prefix": prefix,
                "matches": matches,
            })),
            Error::InvalidConfig(message) => Some(serde_json::json!({ "message": message })),
            Error::LockFailed(path) => Some(serde_json::json!({
                "path": path.to_string_lossy(),
            })),
            Error::QuotaExceeded { key, size, limit } => Some(serde_json::json!({
                "key": key,
                "size": size,
                "limit": limit,
            })),
            _ => None,
        }
    }
}

/// Result type alias for tickit operations
pub type Result<T> = std::result::Result<T, Error>;
