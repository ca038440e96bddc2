/*
 * Error type for the few operations in this crate that can fail in a way the
 * caller may want to observe. Chrome controllers never surface errors: they
 * log and degrade to a safe default. Persistent configuration and native
 * window setup are the exceptions and report through `PlatformError`.
 */

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, PlatformError>;

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("initialization failed: {0}")]
    InitializationFailed(String),

    #[error("invalid handle: {0}")]
    InvalidHandle(String),

    #[error("operation failed: {0}")]
    OperationFailed(String),

    #[error("no per-user data directory is available on this system")]
    NoDataDirectory,

    #[error("config I/O failed for '{path}': {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config file '{path}' is malformed: {source}")]
    ConfigFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[cfg(target_os = "windows")]
    #[error("Win32 call failed: {0}")]
    Win32(#[from] windows::core::Error),
}

impl PlatformError {
    pub(crate) fn config_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ConfigIo {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn config_format(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::ConfigFormat {
            path: path.into(),
            source,
        }
    }
}
