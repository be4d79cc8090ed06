//! Integration tests: `.gwref` documents through the filesystem.

use std::fs;

use chrono::{NaiveDate, NaiveDateTime};
use gwref_io::{
    AlignmentRecord, CalibrationRecord, IoError, ModeRecord, PeriodRecord, ProjectFile,
    RoleRecord, SampleRecord, StyleValueRecord, TimeRecord, WellRecord, read_project,
    write_project,
};

fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn sample_doc() -> ProjectFile {
    let mut doc = ProjectFile::new("Strandangers", NaiveDateTime::default());
    doc.calibration = Some(CalibrationRecord {
        method: "linear".into(),
        alignment: AlignmentRecord::TimeEquivalent { offset_days: 3.5 },
        min_overlap: 2,
        confidence: 0.95,
    });
    doc.wells.push(WellRecord {
        name: "obs".into(),
        role: RoleRecord::Observation,
        x: 1.0,
        y: 2.0,
        depth: 12.5,
        mode: ModeRecord::Calendar,
        style: [("color".to_string(), StyleValueRecord::Text("red".into()))].into(),
        regressors: vec!["ref".into()],
        calibration_period: Some(PeriodRecord {
            start: TimeRecord::Calendar(day(2023, 1, 1)),
            end: TimeRecord::Calendar(day(2023, 3, 1)),
        }),
        samples: vec![
            SampleRecord(TimeRecord::Calendar(day(2023, 1, 7)), 11.4),
            SampleRecord(TimeRecord::Calendar(day(2023, 2, 1)), 11.7),
        ],
    });
    doc.wells.push(WellRecord {
        name: "ref".into(),
        role: RoleRecord::Reference,
        x: 0.0,
        y: 0.0,
        depth: 0.0,
        mode: ModeRecord::Elapsed,
        style: Default::default(),
        regressors: vec![],
        calibration_period: None,
        samples: vec![
            SampleRecord(TimeRecord::Elapsed(0.1), 8.9),
            SampleRecord(TimeRecord::Elapsed(1.0 / 3.0), 9.2),
        ],
    });
    doc
}

#[test]
fn round_trip_preserves_document() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let written = write_project(&dir.path().join("site"), &sample_doc()).expect("write");
    assert_eq!(written, dir.path().join("site.gwref"));

    let back = read_project(&written).expect("read");
    assert_eq!(back, sample_doc());
}

#[test]
fn written_file_has_expected_layout() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let written = write_project(&dir.path().join("site.json"), &sample_doc()).expect("write");
    assert_eq!(written.extension().unwrap(), "gwref");

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&written).unwrap()).unwrap();
    assert_eq!(value["format"], "gwref");
    assert_eq!(value["version"], 1);
    assert_eq!(value["time_origin"], "1970-01-01T00:00:00");
    assert_eq!(value["wells"][0]["samples"][0][0], "2023-01-07T00:00:00");
    assert_eq!(value["wells"][0]["style"]["color"], "red");
    assert_eq!(value["wells"][1]["mode"], "elapsed");
}

#[test]
fn wrong_version_is_corrupt() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("site.gwref");
    fs::write(
        &path,
        r#"{"format":"gwref","version":2,"name":"x","time_origin":"1970-01-01T00:00:00","wells":[]}"#,
    )
    .unwrap();
    let err = read_project(&path).unwrap_err();
    match err {
        IoError::CorruptFile { reason, .. } => assert!(reason.contains("version 2")),
        other => panic!("expected CorruptFile, got {other:?}"),
    }
}

#[test]
fn garbage_is_corrupt() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("site.gwref");
    fs::write(&path, "not json at all {").unwrap();
    assert!(matches!(
        read_project(&path),
        Err(IoError::CorruptFile { .. })
    ));

    fs::write(
        &path,
        r#"{"format":"gwref","version":1,"name":"x","time_origin":"1970-01-01T00:00:00",
            "wells":[{"name":"a","role":"observation","samples":[["not-a-date",1.0]]}]}"#,
    )
    .unwrap();
    assert!(matches!(
        read_project(&path),
        Err(IoError::CorruptFile { .. })
    ));
}

#[test]
fn other_extension_is_rejected() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("site.json");
    fs::write(&path, "{}").unwrap();
    assert!(matches!(
        read_project(&path),
        Err(IoError::UnsupportedExtension { .. })
    ));
}
