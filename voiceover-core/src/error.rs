use std::path::PathBuf;

use anyhow::anyhow;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SynthesisError {
    /// Credentials were missing, could not be resolved, or were rejected by
    /// the service.
    #[error("Authentication error: {0}")]
    Authentication(anyhow::Error),

    /// The service rejected the request or could not be reached.
    #[error("Request error: {0}")]
    Request(anyhow::Error),

    #[error("I/O error writing {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SynthesisError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for SynthesisError {
    fn from(source: serde_json::Error) -> Self {
        Self::Request(anyhow!(source))
    }
}
