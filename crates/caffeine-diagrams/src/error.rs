//! Error types for diagram rendering.
//!
//! [`CaffeineError`] wraps every failure that can occur between a declared
//! diagram and an image on disk.

use std::{io, path::PathBuf};

use thiserror::Error;

use caffeine_diagrams_core::semantic::DiagramError;

/// The main error type for rendering operations.
#[derive(Debug, Error)]
pub enum CaffeineError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid diagram: {0}")]
    InvalidDiagram(#[from] DiagramError),

    #[error("Layout error: {0}")]
    Layout(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error + Send + Sync>),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<crate::export::Error> for CaffeineError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl CaffeineError {
    /// Create a `Write` error for `path`.
    pub fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}
