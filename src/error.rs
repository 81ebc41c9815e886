//! The top-level error taxonomy. Every fatal path maps to exactly one
//! variant here, so `main` can translate an error into the right exit code
//! without string-matching.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum RecoverError {
    #[error("{0}")]
    Usage(String),

    #[error("{op} failed for {path}: {source}")]
    Io {
        op: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl RecoverError {
    pub fn io(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RecoverError::Io { op, path: path.into().display().to_string(), source }
    }

    /// Every fatal path exits with code 1; there is no partial-success exit
    /// code.
    pub fn exit_code(&self) -> i32 {
        1
    }
}
