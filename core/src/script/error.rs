//! Error types for play definition loading

use std::path::PathBuf;

use thiserror::Error;

/// Errors during play definition loading.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read play file {path}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse play TOML in {path}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to read play directory {path}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid play definition in {path}: {reason}")]
    InvalidDefinition { path: PathBuf, reason: String },
}
