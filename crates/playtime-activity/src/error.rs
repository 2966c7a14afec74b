use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ActivityError {
    #[error("Failed to read log file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to walk log directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Log directory does not exist: {0:?}")]
    MissingRoot(PathBuf),
}

impl ActivityError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ActivityError>;
