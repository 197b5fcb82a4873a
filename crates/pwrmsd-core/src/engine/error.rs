use super::config::ConfigError;
use crate::core::alignment::AlignmentError;
use crate::core::io::xyz::XyzError;
use crate::core::models::table::TableError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error on '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read geometry '{path}': {source}", path = path.display())]
    Geometry {
        path: PathBuf,
        #[source]
        source: XyzError,
    },

    #[error(
        "Failed to align '{target}' onto '{reference}': {source}",
        target = target.display(),
        reference = reference.display()
    )]
    Alignment {
        reference: PathBuf,
        target: PathBuf,
        #[source]
        source: AlignmentError,
    },

    #[error("Failed to persist table '{path}': {source}", path = path.display())]
    Table {
        path: PathBuf,
        #[source]
        source: TableError,
    },

    #[error("Invalid cycle range {start}..{stop}: the run has {total} cycles")]
    InvalidCycleRange {
        start: usize,
        stop: usize,
        total: usize,
    },

    #[error("Internal logic error: {0}")]
    Internal(String),
}
