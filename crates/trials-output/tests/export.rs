//! Tests for CSV and JSON export.

use std::fs;
use std::path::Path;

use trials_model::{Field, NormalizedRecord, NormalizedTable};
use trials_output::{ExportFormat, csv_string, export, write_csv};

fn sample_table() -> NormalizedTable {
    let first = NormalizedRecord::from_fn(|field| match field {
        Field::Identifier => "NCT001".to_string(),
        Field::Conditions => "Lung Cancer, EGFR+".to_string(),
        Field::Phase => "Phase 2".to_string(),
        _ => String::new(),
    });
    let second = NormalizedRecord::from_fn(|field| match field {
        Field::Identifier => "NCT002".to_string(),
        Field::Title => "A \"quoted\" title".to_string(),
        Field::Sponsor => "NIH".to_string(),
        _ => String::new(),
    });
    NormalizedTable::new(vec![first, second])
}

#[test]
fn csv_has_header_and_rows() {
    let text = csv_string(&sample_table()).expect("csv");
    insta::assert_snapshot!(text.trim_end(), @r#"
identifier,title,url,status,summary,conditions,interventions,sponsor,phase,start_date,primary_completion_date,completion_date,last_update_date
NCT001,,,,,"Lung Cancer, EGFR+",,,Phase 2,,,,
NCT002,"A ""quoted"" title",,,,,,NIH,,,,,
"#);
}

#[test]
fn empty_table_writes_header_only() {
    let mut buffer = Vec::new();
    write_csv(&NormalizedTable::default(), &mut buffer).expect("csv");
    let text = String::from_utf8(buffer).unwrap();
    assert_eq!(text.lines().count(), 1);
    assert!(text.starts_with("identifier,title,url,"));
}

#[test]
fn csv_file_round_trips_through_reader() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("studies.csv");
    export(&sample_table(), &path, ExportFormat::Csv).expect("export csv");

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(headers.len(), Field::COUNT);
    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][Field::Conditions.index()], "Lung Cancer, EGFR+");
    assert_eq!(&rows[1][Field::Title.index()], "A \"quoted\" title");
}

#[test]
fn json_file_is_array_of_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("studies.json");
    export(&sample_table(), &path, ExportFormat::Json).expect("export json");

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let rows = value.as_array().expect("array");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["phase"], "Phase 2");
    assert_eq!(rows[1]["sponsor"], "NIH");
}

#[test]
fn export_to_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("studies.csv");
    let err = export(&sample_table(), &path, ExportFormat::Csv).unwrap_err();
    assert!(err.to_string().starts_with("failed to write"));
}

#[test]
fn format_from_path_and_name() {
    assert_eq!(
        ExportFormat::from_path(Path::new("out/studies.JSON")),
        Some(ExportFormat::Json)
    );
    assert_eq!(
        ExportFormat::from_path(Path::new("studies.csv")),
        Some(ExportFormat::Csv)
    );
    assert_eq!(ExportFormat::from_path(Path::new("studies.xlsx")), None);
    assert!("tsv".parse::<ExportFormat>().is_err());
}

#[test]
fn csv_string_is_exact_utf8() {
    let record = NormalizedRecord::from_fn(|field| match field {
        Field::Title => "Étude ☤ 臨床試験".to_string(),
        _ => String::new(),
    });
    let text = csv_string(&NormalizedTable::new(vec![record])).expect("csv");
    assert!(text.contains("Étude ☤ 臨床試験"));
    assert!(!text.contains('\u{FFFD}'));
}

#[test]
fn invalid_utf8_is_an_error() {
    let err = String::from_utf8(vec![b'a', 0xff]).unwrap_err();
    let err = trials_output::OutputError::from(err);
    assert!(err.to_string().starts_with("csv output is not UTF-8"));
}
