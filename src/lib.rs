//! Core entry point for the config_sheet crate.
//!
//! The crate turns a [`model::ConfigurationRecord`] into a one-page PDF summary. The default
//! path ([`document::encode_document`]) writes every byte of the document itself: object graph,
//! content stream, cross-reference table and trailer. The [`export`] module wraps it with the
//! file handling needed to go from a JSON record on disk to a PDF on disk.

pub mod backend;
pub mod config;
pub mod content;
pub mod document;
pub mod encoding;
pub mod error;
pub mod escape;
pub mod export;
pub mod fonts;
pub mod model;

pub use backend::{BackendKind, DocumentBackend, GenpdfBackend, NativeBackend};
pub use config::ExportSettings;
pub use document::encode_document;
pub use error::{ExportError, Result};
pub use model::ConfigurationRecord;
