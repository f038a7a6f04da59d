use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MigrateError {
    #[error("invalid chapter file '{}': {reason}", .path.display())]
    InvalidChapter { path: PathBuf, reason: String },

    #[error("failed to back up '{}': {source}", .path.display())]
    Backup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config '{}': {reason}", .path.display())]
    Config { path: PathBuf, reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MigrateError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidChapter { .. } => "invalid_chapter",
            Self::Backup { .. } => "backup_failed",
            Self::Config { .. } => "invalid_config",
            Self::Io(_) => "io_error",
            Self::Json(_) => "json_error",
        }
    }

    pub(crate) fn invalid_chapter(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidChapter {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MigrateError>;
