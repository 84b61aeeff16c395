use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error type shared by the sync, ranking and deletion workflows
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Transfer of '{path}' failed: {reason}")]
    Transfer { path: String, reason: String },

    #[error("Management service error: {0}")]
    ManagementService(String),

    #[error("Cache file {path:?} is unusable: {reason}")]
    CacheCorrupt { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for plex-sync
pub type Result<T> = std::result::Result<T, SyncError>;

impl SyncError {
    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        SyncError::Configuration(msg.into())
    }

    /// Create an authentication error
    pub fn authentication<S: Into<String>>(msg: S) -> Self {
        SyncError::Authentication(msg.into())
    }

    /// Create a not-found error
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        SyncError::NotFound(msg.into())
    }

    /// Create a transfer error for a single file
    pub fn transfer<P: Into<String>, S: Into<String>>(path: P, reason: S) -> Self {
        SyncError::Transfer {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn management<S: Into<String>>(msg: S) -> Self {
        SyncError::ManagementService(msg.into())
    }

    pub fn cache_corrupt<P: Into<PathBuf>, S: Into<String>>(path: P, reason: S) -> Self {
        SyncError::CacheCorrupt {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        SyncError::Other(msg.into())
    }

    /// Fatal errors end the run; the rest are logged and processing continues.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SyncError::Configuration(_)
                | SyncError::Authentication(_)
                | SyncError::CacheCorrupt { .. }
        )
    }

    /// Process exit status used by the binary for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            SyncError::Configuration(_) => 2,
            SyncError::Authentication(_) => 3,
            SyncError::CacheCorrupt { .. } => 4,
            _ => 1,
        }
    }
}
