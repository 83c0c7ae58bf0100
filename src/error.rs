// Error handling for pipestring
//
// Parsing and evaluation are total and never produce these. Errors only come
// from building a parser configuration or loading settings/variable files.

use std::path::PathBuf;
use thiserror::Error;

/// Library error type
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid {option} pattern: {source}")]
    InvalidPattern {
        option: &'static str,
        #[source]
        source: regex::Error,
    },
    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings: {0}")]
    Settings(#[from] serde_yaml::Error),
    #[error("invalid variables: {0}")]
    Variables(String),
}

pub type Result<T> = std::result::Result<T, Error>;

// Extension trait for attaching the offending path to io errors
pub trait IoResultExt<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| Error::Io {
            path: path.into(),
            source,
        })
    }
}
