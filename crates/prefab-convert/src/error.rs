use std::path::{Path, PathBuf};

use prefab_codec::CodecError;

/// Errors that can occur while converting one prefab file.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot convert {}: {source}", path.display())]
    Codec {
        path: PathBuf,
        #[source]
        source: CodecError,
    },
}

impl ConvertError {
    /// The file the error refers to.
    pub fn path(&self) -> &Path {
        match self {
            ConvertError::NotFound(path)
            | ConvertError::Io { path, .. }
            | ConvertError::Json { path, .. }
            | ConvertError::Codec { path, .. } => path,
        }
    }
}
