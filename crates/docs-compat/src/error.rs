//! Error types for docs-compat
//!
//! The transform itself is total and never produces these; they come from
//! loading configuration and resolving rule names.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompatError {
    #[error("Unknown rule: {0}")]
    UnknownRule(String),

    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid exclude pattern '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("Embedded resource missing or malformed: {0}")]
    Resource(String),
}

impl CompatError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, CompatError>;
