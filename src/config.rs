//! Settings for the export pipeline.

use std::env;
use std::path::{Path, PathBuf};

use log::warn;

use crate::backend::BackendKind;

/// Overrides [`ExportSettings::config_dir`].
pub const CONFIG_DIR_ENV: &str = "CONFIG_SHEET_CONFIG_DIR";
/// Overrides [`ExportSettings::pdf_dir`].
pub const PDF_DIR_ENV: &str = "CONFIG_SHEET_PDF_DIR";
/// Overrides [`ExportSettings::backend`] (`native` or `genpdf`).
pub const BACKEND_ENV: &str = "CONFIG_SHEET_BACKEND";

/// Name given to records exported without one.
pub const DEFAULT_CONFIGURATION_NAME: &str = "ProductConfiguration";

/// Where exported files go and how documents are rendered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportSettings {
    config_dir: PathBuf,
    pdf_dir: PathBuf,
    backend: BackendKind,
    default_name: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            config_dir: PathBuf::from("Saved/Configurations"),
            pdf_dir: PathBuf::from("Saved/PDFs"),
            backend: BackendKind::default(),
            default_name: DEFAULT_CONFIGURATION_NAME.to_owned(),
        }
    }
}

impl ExportSettings {
    /// Creates settings with the default directories and the native backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Default settings with any `CONFIG_SHEET_*` environment overrides applied.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();

        if let Some(dir) = lookup(CONFIG_DIR_ENV).filter(|value| !value.trim().is_empty()) {
            settings.config_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup(PDF_DIR_ENV).filter(|value| !value.trim().is_empty()) {
            settings.pdf_dir = PathBuf::from(dir);
        }
        if let Some(name) = lookup(BACKEND_ENV) {
            match name.parse::<BackendKind>() {
                Ok(backend) => settings.backend = backend,
                Err(err) => warn!("ignoring {}: {}", BACKEND_ENV, err),
            }
        }

        settings
    }

    /// Directory receiving exported JSON records.
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Directory receiving rendered documents.
    pub fn pdf_dir(&self) -> &Path {
        &self.pdf_dir
    }

    /// Backend used to render documents.
    pub fn backend(&self) -> BackendKind {
        self.backend
    }

    /// Name substituted for empty configuration names.
    pub fn default_name(&self) -> &str {
        &self.default_name
    }

    /// Sets the JSON directory and returns the updated settings.
    pub fn with_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir = dir.into();
        self
    }

    /// Sets the document directory and returns the updated settings.
    pub fn with_pdf_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.pdf_dir = dir.into();
        self
    }

    /// Sets the backend and returns the updated settings.
    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    /// Sets the fallback configuration name and returns the updated settings.
    pub fn with_default_name(mut self, name: impl Into<String>) -> Self {
        self.default_name = name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_use_saved_directories() {
        let settings = ExportSettings::new();
        assert_eq!(settings.config_dir(), Path::new("Saved/Configurations"));
        assert_eq!(settings.pdf_dir(), Path::new("Saved/PDFs"));
        assert_eq!(settings.backend(), BackendKind::Native);
        assert_eq!(settings.default_name(), DEFAULT_CONFIGURATION_NAME);
    }

    #[test]
    fn environment_overrides_apply() {
        let settings = ExportSettings::from_lookup(lookup_from(&[
            (CONFIG_DIR_ENV, "/tmp/json"),
            (PDF_DIR_ENV, "/tmp/pdf"),
            (BACKEND_ENV, "genpdf"),
        ]));
        assert_eq!(settings.config_dir(), Path::new("/tmp/json"));
        assert_eq!(settings.pdf_dir(), Path::new("/tmp/pdf"));
        assert_eq!(settings.backend(), BackendKind::Genpdf);
    }

    #[test]
    fn unknown_backend_and_blank_dirs_are_ignored() {
        let settings = ExportSettings::from_lookup(lookup_from(&[
            (PDF_DIR_ENV, "  "),
            (BACKEND_ENV, "latex"),
        ]));
        assert_eq!(settings, ExportSettings::default());
    }
}
