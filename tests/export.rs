use std::fs;

use chrono::{NaiveDate, NaiveDateTime};
use config_sheet::error::ExportError;
use config_sheet::export::{
    export_configuration, export_to_pdf, generate_pdf_from_json, read_record, write_atomically,
};
use config_sheet::model::{Selection, VariantSet};
use config_sheet::{encode_document, BackendKind, ConfigurationRecord, ExportSettings};
use tempfile::TempDir;

fn fixed_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 1)
        .and_then(|date| date.and_hms_opt(9, 30, 5))
        .expect("valid date")
}

fn settings_in(dir: &TempDir) -> ExportSettings {
    ExportSettings::new()
        .with_config_dir(dir.path().join("Saved/Configurations"))
        .with_pdf_dir(dir.path().join("Saved/PDFs"))
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[test]
fn export_writes_json_and_matching_pdf() {
    let dir = TempDir::new().unwrap();
    let settings = settings_in(&dir);
    let sets = vec![
        VariantSet::new("Paint", Selection::new(strings(&["Red", "Blue"]), 0)),
        VariantSet::new("Wheels", Selection::new(strings(&["Steel", "Alloy"]), 1)),
    ];
    let camera = Selection::new(strings(&["Front", "Rear"]), 1);
    let record =
        ConfigurationRecord::from_selections("Roadster", "2024-05-01", &sets, None, Some(&camera));

    let files = export_to_pdf(record.clone(), &settings, fixed_time()).unwrap();

    assert_eq!(
        files.json,
        settings
            .config_dir()
            .join("Roadster_2024-05-01_09-30-05.json")
    );
    assert_eq!(
        files.pdf,
        settings.pdf_dir().join("Roadster_2024-05-01_09-30-05.pdf")
    );
    let stored = read_record(&files.json).unwrap();
    assert_eq!(stored.camera, "Rear");
    assert_eq!(stored, record);
    assert_eq!(fs::read(&files.pdf).unwrap(), encode_document(&record));
}

#[test]
fn empty_names_use_the_default_name() {
    let dir = TempDir::new().unwrap();
    let settings = settings_in(&dir).with_default_name("Fallback");

    let files = export_to_pdf(ConfigurationRecord::new(""), &settings, fixed_time()).unwrap();

    assert!(files
        .json
        .ends_with("Fallback_2024-05-01_09-30-05.json"));
    assert_eq!(read_record(&files.json).unwrap().name, "Fallback");
}

#[test]
fn exported_json_uses_record_field_names() {
    let dir = TempDir::new().unwrap();
    let record = ConfigurationRecord::new("Roadster").with_variant("Paint > Red");

    let path = export_configuration(&record, &settings_in(&dir), fixed_time()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();

    assert_eq!(json["ConfigurationName"], "Roadster");
    assert_eq!(json["SelectedVariants"][0], "Paint > Red");
    assert_eq!(json["SelectedEnvironment"], "Default");
    assert_eq!(json["SelectedCamera"], "Default");
}

#[test]
fn malformed_json_is_a_parse_error_and_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let json_path = dir.path().join("broken.json");
    fs::write(&json_path, "{ \"ConfigurationName\": ").unwrap();
    let pdf_path = dir.path().join("out/broken.pdf");

    let err = generate_pdf_from_json(&json_path, &pdf_path, BackendKind::Native).unwrap_err();

    assert!(matches!(err, ExportError::Parse { .. }));
    assert!(!pdf_path.exists());
}

#[test]
fn missing_json_is_file_not_found() {
    let dir = TempDir::new().unwrap();
    let err = generate_pdf_from_json(
        &dir.path().join("missing.json"),
        &dir.path().join("missing.pdf"),
        BackendKind::Native,
    )
    .unwrap_err();

    assert!(matches!(err, ExportError::FileNotFound { .. }));
}

#[test]
fn directory_input_is_a_read_error() {
    let dir = TempDir::new().unwrap();
    let json_dir = dir.path().join("record.json");
    fs::create_dir(&json_dir).unwrap();

    let err = read_record(&json_dir).unwrap_err();

    assert!(matches!(err, ExportError::Read { .. }));
}

#[test]
fn directory_creation_failure_is_reported() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("not_a_dir");
    fs::write(&blocker, b"file").unwrap();

    let err = write_atomically(&blocker.join("out.pdf"), b"%PDF-1.4").unwrap_err();

    assert!(matches!(err, ExportError::DirectoryCreate { .. }));
}

#[test]
fn failed_rename_leaves_no_temporary_file() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("occupied.pdf");
    fs::create_dir(&target).unwrap();
    fs::write(target.join("keep"), b"x").unwrap();

    let err = write_atomically(&target, b"%PDF-1.4").unwrap_err();

    assert!(matches!(err, ExportError::Write { .. }));
    assert!(!dir.path().join("occupied.pdf.tmp").exists());
    assert!(target.join("keep").exists());
}

#[test]
fn rewriting_replaces_previous_output() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("doc.pdf");

    write_atomically(&target, b"first version, longer").unwrap();
    write_atomically(&target, b"second").unwrap();

    assert_eq!(fs::read(&target).unwrap(), b"second");
}
