use std::io;
use std::path::{Path, PathBuf};

use code_runner::error::RunnerError;
use marker::error::MarkerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// An upstream artifact the stage depends on does not exist. Fatal for the stage.
    #[error("{stage}: required artifact {} is missing", .path.display())]
    MissingArtifact { stage: &'static str, path: PathBuf },

    #[error("I/O error on {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("CSV error in {}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("JSON error in {}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("problem {0} is not in the cleaned problem list")]
    UnknownProblem(String),

    #[error("invalid record: {0}")]
    InvalidRecord(String),

    #[error(transparent)]
    Runner(#[from] RunnerError),

    #[error(transparent)]
    Marker(#[from] MarkerError),
}

impl ServiceError {
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        ServiceError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn csv(path: impl AsRef<Path>, source: csv::Error) -> Self {
        ServiceError::Csv {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn json(path: impl AsRef<Path>, source: serde_json::Error) -> Self {
        ServiceError::Json {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, ServiceError::MissingArtifact { .. })
    }
}
