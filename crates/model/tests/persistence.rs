//! Integration tests: saving and loading models.

use std::fs;

use chrono::{NaiveDate, NaiveDateTime};
use gwref_io::IoError;
use gwref_model::{CalibrationConfig, Model, ModelConfig, ModelError, Role, Style, Well};
use gwref_series::{Alignment, TimeSeries, Timestamp};

fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn project() -> Model {
    let mut style = Style::default();
    style.alpha = 0.8;
    let config = ModelConfig::default()
        .with_time_origin(day(2023, 1, 1))
        .with_default_style(style)
        .with_calibration(
            CalibrationConfig::default()
                .with_alignment(Alignment::TimeEquivalent { offset_days: 3.5 })
                .with_confidence(0.9),
        );
    let mut model = Model::with_config("Strandangers", config).unwrap();

    let obs = TimeSeries::calendar([
        (day(2023, 1, 7), 11.4),
        (day(2023, 2, 1), 11.7),
        (day(2023, 2, 25), 11.8),
    ])
    .unwrap();
    let reference = TimeSeries::calendar([
        (day(2023, 1, 8), 8.9),
        (day(2023, 2, 3), 9.2),
        (day(2023, 2, 8), 9.3),
        (day(2023, 2, 25), 9.3),
        (day(2023, 2, 28), 9.5),
    ])
    .unwrap();
    let logger = TimeSeries::elapsed([(6.0, 2.5), (6.125, 2.75)]).unwrap();

    model
        .add_well(
            Well::new("ref", Role::Reference)
                .unwrap()
                .with_location(100.0, 200.0)
                .with_depth(8.0)
                .with_series(reference),
        )
        .unwrap();
    model
        .add_well(
            Well::new("obs", Role::Observation)
                .unwrap()
                .with_series(obs)
                .with_calibration_period(
                    Timestamp::Calendar(day(2023, 1, 1)),
                    Timestamp::Calendar(day(2023, 3, 1)),
                ),
        )
        .unwrap();
    model
        .add_well(Well::new("logger", Role::Reference).unwrap().with_series(logger))
        .unwrap();
    model
        .set_kwargs("obs", [("color", "red"), ("linestyle", "--")])
        .unwrap();
    model.set_kwargs("ref", [("markersize", 3.0)]).unwrap();
    model.calibrate("obs", &["ref"]).unwrap();
    model
}

#[test]
fn round_trip_restores_model_except_calibration() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let model = project();
    let written = model.save(&dir.path().join("strandangers")).unwrap();
    assert_eq!(written.file_name().unwrap(), "strandangers.gwref");

    let mut loaded = Model::load(&written).unwrap();
    assert_eq!(loaded.name(), "Strandangers");
    assert_eq!(loaded.config(), model.config());
    let names: Vec<&str> = loaded.well_names().collect();
    assert_eq!(names, ["ref", "obs", "logger"]);

    for (a, b) in model.wells().zip(loaded.wells()) {
        assert_eq!(a.name(), b.name());
        assert_eq!(a.role(), b.role());
        assert_eq!(a.location(), b.location());
        assert_eq!(a.depth(), b.depth());
        assert_eq!(a.series(), b.series());
        assert_eq!(a.style(), b.style());
        assert_eq!(a.regressors(), b.regressors());
        assert_eq!(a.calibration_period(), b.calibration_period());
    }

    let obs = loaded.get_well("obs").unwrap();
    assert!(!obs.is_calibrated());
    assert_eq!(obs.regressors(), ["ref".to_string()]);

    loaded.calibrate_all().into_result().unwrap();
    let before = model.get_well("obs").unwrap().calibration().unwrap();
    let after = loaded.get_well("obs").unwrap().calibration().unwrap();
    assert_eq!(before, after);
}

#[test]
fn rejected_non_finite_edits_keep_the_file_loadable() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let mut model = project();
    assert!(model.set_location("ref", f64::NAN, 1.0).is_err());
    assert!(model.set_depth("ref", f64::INFINITY).is_err());
    assert!(model.set_kwargs("ref", [("linewidth", f64::INFINITY)]).is_err());
    assert!(
        model
            .add_well(
                Well::new("loose", Role::Reference)
                    .unwrap()
                    .with_location(f64::NAN, 1.0)
            )
            .is_err()
    );

    let written = model.save(&dir.path().join("edited")).unwrap();
    let loaded = Model::load(&written).unwrap();
    let reference = loaded.get_well("ref").unwrap();
    assert_eq!(reference.location(), (100.0, 200.0));
    assert_eq!(reference.depth(), 8.0);
    assert_eq!(reference.style().linewidth, 1.0);
    assert!(!loaded.contains("loose"));
}

#[test]
fn repeated_regressor_in_file_is_corrupt() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("twice.gwref");
    fs::write(
        &path,
        r#"{"format":"gwref","version":1,"name":"twice","time_origin":"1970-01-01T00:00:00",
            "wells":[{"name":"ref","role":"reference"},
                     {"name":"obs","role":"observation","regressors":["ref","ref"]}]}"#,
    )
    .unwrap();
    assert!(matches!(
        Model::load(&path),
        Err(ModelError::Persistence(IoError::CorruptFile { .. }))
    ));
}

#[test]
fn only_non_default_style_is_written() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let written = project().save(&dir.path().join("site.gwref")).unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(written).unwrap()).unwrap();

    let obs = &value["wells"][1];
    assert_eq!(obs["name"], "obs");
    let style = obs["style"].as_object().unwrap();
    assert_eq!(style.len(), 2);
    assert_eq!(style["color"], "red");
    assert_eq!(style["linestyle"], "--");
    assert_eq!(value["wells"][2]["mode"], "elapsed");
    assert_eq!(value["wells"][2]["samples"][1][0], 6.125);
    assert_eq!(value["default_style"]["alpha"], 0.8);
}

#[test]
fn dangling_regressor_in_file_is_corrupt() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("bad.gwref");
    fs::write(
        &path,
        r#"{
            "format": "gwref",
            "version": 1,
            "name": "bad",
            "time_origin": "1970-01-01T00:00:00",
            "wells": [
                {"name": "obs", "role": "observation", "regressors": ["ghost"]}
            ]
        }"#,
    )
    .unwrap();
    let err = Model::load(&path).unwrap_err();
    assert!(matches!(
        err,
        ModelError::Persistence(IoError::CorruptFile { .. })
    ));
}

#[test]
fn duplicate_samples_in_file_are_corrupt() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("dup.gwref");
    fs::write(
        &path,
        r#"{"format":"gwref","version":1,"name":"dup","time_origin":"1970-01-01T00:00:00",
            "wells":[{"name":"a","role":"reference","mode":"elapsed",
                      "samples":[[1.0, 2.0],[1.0, 3.0]]}]}"#,
    )
    .unwrap();
    assert!(matches!(
        Model::load(&path),
        Err(ModelError::Persistence(IoError::CorruptFile { .. }))
    ));
}

#[test]
fn load_rejects_other_extensions() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("site.json");
    fs::write(&path, "{}").unwrap();
    assert!(matches!(
        Model::load(&path),
        Err(ModelError::Persistence(IoError::UnsupportedExtension { .. }))
    ));
}
