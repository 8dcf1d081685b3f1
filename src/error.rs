//! Error types for the load order engine.
//!
//! A missing template, a malformed version line and duplicate entries are not
//! errors; the engine degrades instead. Only I/O failures on files that do
//! exist and inconsistent caller input surface here.

use std::path::PathBuf;

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, SorterError>;

#[derive(Debug, thiserror::Error)]
pub enum SorterError {
    /// The template exists but could not be read.
    #[error("failed to read load order template {path:?}: {source}")]
    ReadTemplate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read config file {path:?}: {source}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path:?}: {source}")]
    ParseConfig {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Parallel report inputs do not line up with the plugin list.
    #[error("expected {expected} {field} values to match the plugin list, got {actual}")]
    MismatchedInputs {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
}
