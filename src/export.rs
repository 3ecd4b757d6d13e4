//! File handling around the encoder.
//!
//! Records are stored as JSON under [`ExportSettings::config_dir`] and rendered into
//! [`ExportSettings::pdf_dir`]. Every write goes to a temporary sibling file first and is
//! renamed into place, so a failed export never leaves a truncated file at the destination.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use log::{debug, info};

use crate::backend::BackendKind;
use crate::config::ExportSettings;
use crate::error::{ExportError, Result};
use crate::model::ConfigurationRecord;

/// `strftime` pattern used for timestamps in records and file names.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Formats `time` the way exported records and file names expect.
pub fn formatted_timestamp(time: NaiveDateTime) -> String {
    time.format(TIMESTAMP_FORMAT).to_string()
}

/// Paths produced by [`export_to_pdf`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportedFiles {
    /// The JSON record.
    pub json: PathBuf,
    /// The rendered document.
    pub pdf: PathBuf,
}

/// Reads and decodes a configuration record.
pub fn read_record(path: &Path) -> Result<ConfigurationRecord> {
    let text = fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => ExportError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => ExportError::Read {
            path: path.to_path_buf(),
            source,
        },
    })?;

    serde_json::from_str(&text).map_err(|source| ExportError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Creates `dir` and its parents if needed.
pub fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.as_os_str().is_empty() || dir.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(dir).map_err(|source| ExportError::DirectoryCreate {
        path: dir.to_path_buf(),
        source,
    })
}

fn temporary_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Writes `bytes` to `path` through a temporary file and a rename.
///
/// The parent directory is created first. On failure the temporary file is removed and the
/// destination is left untouched.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_directory(parent)?;
    }

    let temporary = temporary_path(path);
    let result = fs::write(&temporary, bytes).and_then(|()| fs::rename(&temporary, path));
    if let Err(source) = result {
        let _ = fs::remove_file(&temporary);
        return Err(ExportError::Write {
            path: path.to_path_buf(),
            source,
        });
    }

    debug!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// `<pdf_dir>/<json file stem>.pdf`.
pub fn default_pdf_path(json_path: &Path, settings: &ExportSettings) -> PathBuf {
    let stem = json_path
        .file_stem()
        .map(|stem| stem.to_os_string())
        .unwrap_or_else(|| "configuration".into());
    let mut file_name = stem;
    file_name.push(".pdf");
    settings.pdf_dir().join(file_name)
}

/// File name for an exported record: `<name>_<timestamp>.json`, or `Config_<timestamp>.json`
/// when the name is empty.
pub fn json_file_name(name: &str, timestamp: &str) -> String {
    if name.is_empty() {
        format!("Config_{}.json", timestamp)
    } else {
        format!("{}_{}.json", sanitize_file_component(name), timestamp)
    }
}

/// Replaces characters that are not portable in file names with `_`.
fn sanitize_file_component(name: &str) -> String {
    name.chars()
        .map(|ch| match ch {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            ch if ch.is_control() => '_',
            ch => ch,
        })
        .collect()
}

/// Writes `record` as pretty JSON into the settings' configuration directory.
///
/// `now` stamps the file name. Returns the path written.
pub fn export_configuration(
    record: &ConfigurationRecord,
    settings: &ExportSettings,
    now: NaiveDateTime,
) -> Result<PathBuf> {
    let path = settings
        .config_dir()
        .join(json_file_name(&record.name, &formatted_timestamp(now)));
    let json = serde_json::to_string_pretty(record).map_err(ExportError::Serialize)?;

    write_atomically(&path, json.as_bytes())?;
    info!("Configuration exported to: {}", path.display());
    Ok(path)
}

/// Renders `record` with `backend` and writes the document to `pdf_path`.
pub fn write_document(
    record: &ConfigurationRecord,
    pdf_path: &Path,
    backend: BackendKind,
) -> Result<()> {
    let renderer = backend.create();
    let bytes = renderer.render(record)?;
    write_atomically(pdf_path, &bytes)?;
    info!(
        "PDF generated successfully ({} backend, {} bytes): {}",
        renderer.name(),
        bytes.len(),
        pdf_path.display()
    );
    Ok(())
}

/// Reads the record at `json_path`, renders it and writes the document to `pdf_path`.
pub fn generate_pdf_from_json(
    json_path: &Path,
    pdf_path: &Path,
    backend: BackendKind,
) -> Result<()> {
    let record = read_record(json_path)?;
    write_document(&record, pdf_path, backend)
}

/// Exports `record` to JSON and renders the document next to the other PDFs.
///
/// Empty names are replaced by [`ExportSettings::default_name`] before anything is written.
pub fn export_to_pdf(
    record: ConfigurationRecord,
    settings: &ExportSettings,
    now: NaiveDateTime,
) -> Result<ExportedFiles> {
    let record = record.with_name_fallback(settings.default_name());
    let json = export_configuration(&record, settings, now)?;
    let pdf = default_pdf_path(&json, settings);
    generate_pdf_from_json(&json, &pdf, settings.backend())?;
    Ok(ExportedFiles { json, pdf })
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveDate;

    fn fixed_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .and_then(|date| date.and_hms_opt(9, 30, 5))
            .expect("valid date")
    }

    #[test]
    fn formats_timestamps_for_file_names() {
        assert_eq!(formatted_timestamp(fixed_time()), "2024-05-01_09-30-05");
    }

    #[test]
    fn json_file_names_fall_back_for_empty_names() {
        assert_eq!(
            json_file_name("", "2024-05-01_09-30-05"),
            "Config_2024-05-01_09-30-05.json"
        );
        assert_eq!(
            json_file_name("Road/ster", "2024-05-01_09-30-05"),
            "Road_ster_2024-05-01_09-30-05.json"
        );
    }

    #[test]
    fn pdf_path_uses_json_stem() {
        let settings = ExportSettings::new().with_pdf_dir("out");
        assert_eq!(
            default_pdf_path(Path::new("Saved/Configurations/Car_1.json"), &settings),
            Path::new("out").join("Car_1.pdf")
        );
    }

    #[test]
    fn temporary_path_is_a_sibling() {
        assert_eq!(
            temporary_path(Path::new("dir/file.pdf")),
            Path::new("dir/file.pdf.tmp")
        );
    }

    #[test]
    fn missing_input_is_reported_as_not_found() {
        let err = read_record(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ExportError::FileNotFound { .. }));
    }
}
