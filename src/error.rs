//! Errors raised around the encoder: reading records, writing files and alternative backends.
//!
//! Encoding itself cannot fail. Every variant here comes from the file system, JSON decoding
//! or the genpdf backend, and each aborts the operation without leaving partial output.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure of one export step.
#[derive(Error, Debug)]
pub enum ExportError {
    /// The input JSON file does not exist.
    #[error("JSON file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// The input file exists but could not be read.
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The input is not a valid configuration record.
    #[error("failed to parse configuration record {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The record could not be encoded as JSON.
    #[error("failed to serialize configuration record")]
    Serialize(#[source] serde_json::Error),

    /// An output directory could not be created.
    #[error("failed to create directory {}", path.display())]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The destination could not be written.
    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The genpdf backend failed to lay out or render the document.
    #[error("genpdf rendering failed")]
    Render(#[source] genpdf::error::Error),
}

impl From<genpdf::error::Error> for ExportError {
    fn from(err: genpdf::error::Error) -> Self {
        Self::Render(err)
    }
}

/// Result alias for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;
