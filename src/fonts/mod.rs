//! Font resources used by the document backends.
//!
//! The native encoder only references the two standard Type 1 fonts every reader ships with, so
//! nothing is embedded. The genpdf backend needs real TrueType files; [`default_font_family`]
//! looks them up in a small list of directories.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use genpdf::error::{Error, ErrorKind};
use genpdf::fonts::{self, FontData, FontFamily};
use log::debug;

/// One of the two built-in fonts referenced by the page resources.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StandardFont {
    /// Body text.
    Regular,
    /// Headings and emphasized lines.
    Bold,
}

impl StandardFont {
    /// Every font the page resource dictionary declares, in declaration order.
    pub const ALL: [StandardFont; 2] = [StandardFont::Regular, StandardFont::Bold];

    /// Resource name used by `Tf` operators, without the leading slash.
    pub fn resource_name(self) -> &'static str {
        match self {
            Self::Regular => "F1",
            Self::Bold => "F2",
        }
    }

    /// PostScript name of the standard 14 font.
    pub fn base_font(self) -> &'static str {
        match self {
            Self::Regular => "Helvetica",
            Self::Bold => "Helvetica-Bold",
        }
    }

    /// Font dictionary written inline into the page resources.
    pub fn dictionary(self) -> String {
        format!(
            "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
            self.base_font()
        )
    }
}

/// Environment variable pointing at a directory with the TrueType family.
pub const FONTS_DIR_ENV: &str = "CONFIG_SHEET_FONTS_DIR";

/// Name of the TrueType family loaded for the genpdf backend.
pub const DEFAULT_FONT_FAMILY_NAME: &str = "LiberationSans";

const FONT_FILES: &[&str] = &[
    "LiberationSans-Regular.ttf",
    "LiberationSans-Bold.ttf",
    "LiberationSans-Italic.ttf",
    "LiberationSans-BoldItalic.ttf",
];

fn font_directory_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(path) = env::var_os(FONTS_DIR_ENV) {
        if !path.is_empty() {
            candidates.push(PathBuf::from(path));
        }
    }

    if let Ok(current_exe) = env::current_exe() {
        if let Some(bin_dir) = current_exe.parent() {
            let candidate = bin_dir.join("assets/fonts");
            if !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }
    }

    let manifest_candidate = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts");
    if !candidates.contains(&manifest_candidate) {
        candidates.push(manifest_candidate);
    }

    candidates
}

fn missing_font_files(path: &Path) -> Vec<PathBuf> {
    FONT_FILES
        .iter()
        .map(|name| path.join(name))
        .filter(|candidate| !candidate.is_file())
        .collect()
}

fn resolve_font_directory() -> Result<PathBuf, Error> {
    let mut attempts = Vec::new();

    for candidate in font_directory_candidates() {
        let missing = missing_font_files(&candidate);
        if candidate.is_dir() && missing.is_empty() {
            debug!("using fonts from {}", candidate.display());
            return Ok(candidate);
        }

        let reason = if !candidate.is_dir() {
            "directory missing".to_owned()
        } else {
            let names = missing
                .iter()
                .map(|path| path.file_name().unwrap_or_default().to_string_lossy())
                .collect::<Vec<_>>()
                .join(", ");
            format!("missing files [{}]", names)
        };
        attempts.push(format!("{} ({})", candidate.display(), reason));
    }

    Err(Error::new(
        format!(
            "Unable to locate the {} font family. Checked: {}. Set {}.",
            DEFAULT_FONT_FAMILY_NAME,
            attempts.join(", "),
            FONTS_DIR_ENV
        ),
        io::Error::new(io::ErrorKind::NotFound, "font directory not found"),
    ))
}

/// Loads the TrueType family used by the genpdf backend.
pub fn default_font_family() -> Result<FontFamily<FontData>, Error> {
    let directory = resolve_font_directory()?;

    fonts::from_files(&directory, DEFAULT_FONT_FAMILY_NAME, None).map_err(|err| {
        Error::new(
            format!(
                "Failed to load font family '{}' from {}: {}",
                DEFAULT_FONT_FAMILY_NAME,
                directory.display(),
                err
            ),
            io::Error::new(io::ErrorKind::Other, err.to_string()),
        )
    })
}

/// Indicates whether the TrueType family can be found on disk.
pub fn default_fonts_available() -> bool {
    resolve_font_directory().is_ok()
}

/// Whether `err` means the fonts are absent rather than broken.
pub fn fonts_missing(err: &Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::IoError(io_err) if io_err.kind() == io::ErrorKind::NotFound
    )
}

#[cfg(test)]
mod tests {
    use super::StandardFont;

    #[test]
    fn resource_names_are_distinct() {
        assert_eq!(StandardFont::Regular.resource_name(), "F1");
        assert_eq!(StandardFont::Bold.resource_name(), "F2");
    }

    #[test]
    fn dictionary_names_the_base_font() {
        let dict = StandardFont::Bold.dictionary();
        assert!(dict.contains("/BaseFont /Helvetica-Bold"));
        assert!(dict.contains("/Subtype /Type1"));
    }
}
