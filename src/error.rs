use std::path::PathBuf;
use thiserror::Error;

/// Fatal failures. Anything in here aborts the run before an output file is written.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse category file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Category file {path:?} is missing the required key '{key}'")]
    MissingKey { path: PathBuf, key: &'static str },

    #[error("Category file {path:?} defines no categories")]
    NoCategories { path: PathBuf },

    #[error("Image directory {0:?} does not exist")]
    DirectoryNotFound(PathBuf),

    #[error("Failed to write dataset to {path:?}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, DatasetError>;
