//! Conversion between [`Model`] and the `.gwref` document records.

use std::path::Path;

use gwref_io::{
    AlignmentRecord, CalibrationRecord, IoError, ModeRecord, PeriodRecord, ProjectFile,
    RoleRecord, SampleRecord, StyleRecord, StyleValueRecord, TimeRecord, WellRecord,
};
use gwref_series::{Alignment, TimeMode, TimeSeries, Timestamp};

use crate::calibration::Method;
use crate::config::{CalibrationConfig, ModelConfig};
use crate::error::ModelError;
use crate::model::Model;
use crate::style::{Style, StyleValue};
use crate::well::{Role, Well};

pub(crate) fn to_document(model: &Model) -> ProjectFile {
    let config = model.config();
    let mut doc = ProjectFile::new(model.name(), config.time_origin());
    doc.default_style = style_record(config.default_style());
    doc.calibration = Some(calibration_record(config.calibration()));
    doc.wells = model.wells().map(well_record).collect();
    doc
}

/// Builds a model from a document. Every inconsistency becomes
/// [`IoError::CorruptFile`] for `path`.
pub(crate) fn from_document(doc: ProjectFile, path: &Path) -> Result<Model, IoError> {
    build(doc).map_err(|e| match e {
        ModelError::Persistence(io) => io,
        other => IoError::CorruptFile {
            path: path.to_path_buf(),
            reason: other.to_string(),
        },
    })
}

fn build(doc: ProjectFile) -> Result<Model, ModelError> {
    let calibration = match doc.calibration {
        Some(record) => calibration_config(record)?,
        None => CalibrationConfig::default(),
    };
    let config = ModelConfig::default()
        .with_time_origin(doc.time_origin)
        .with_default_style(style_from_record("", &doc.default_style)?)
        .with_calibration(calibration);
    let mut model = Model::with_config(doc.name, config)?;

    // Regressors may name wells stored later in the file, so they are
    // declared once every well exists.
    let mut declarations = Vec::with_capacity(doc.wells.len());
    for record in doc.wells {
        let mode = match record.mode {
            ModeRecord::Calendar => TimeMode::Calendar,
            ModeRecord::Elapsed => TimeMode::Elapsed,
        };
        let role = match record.role {
            RoleRecord::Observation => Role::Observation,
            RoleRecord::Reference => Role::Reference,
        };
        let series = TimeSeries::from_samples(
            mode,
            record
                .samples
                .iter()
                .map(|SampleRecord(t, v)| (timestamp(*t), *v)),
        )
        .map_err(|e| ModelError::series(&record.name, e))?;

        let mut well = Well::new(record.name.as_str(), role)?
            .with_location(record.x, record.y)
            .with_depth(record.depth)
            .with_series(series)
            .with_style(style_from_record(&record.name, &record.style)?);
        if let Some(period) = record.calibration_period {
            well = well.with_calibration_period(timestamp(period.start), timestamp(period.end));
        }

        model.add_well(well)?;
        declarations.push((record.name, record.regressors));
    }

    for (name, regressors) in declarations {
        if !regressors.is_empty() {
            model.set_regressors(&name, regressors)?;
        }
    }
    Ok(model)
}

fn well_record(well: &Well) -> WellRecord {
    let (x, y) = well.location();
    WellRecord {
        name: well.name().to_string(),
        role: match well.role() {
            Role::Observation => RoleRecord::Observation,
            Role::Reference => RoleRecord::Reference,
        },
        x,
        y,
        depth: well.depth(),
        mode: match well.series().mode() {
            TimeMode::Calendar => ModeRecord::Calendar,
            TimeMode::Elapsed => ModeRecord::Elapsed,
        },
        style: style_record(well.style()),
        regressors: well.regressors().to_vec(),
        calibration_period: well.calibration_period().map(|(start, end)| PeriodRecord {
            start: time_record(start),
            end: time_record(end),
        }),
        samples: well
            .series()
            .iter()
            .map(|(t, v)| SampleRecord(time_record(t), v))
            .collect(),
    }
}

fn style_record(style: &Style) -> StyleRecord {
    style
        .non_default_entries()
        .into_iter()
        .map(|(option, value)| {
            let value = match value {
                StyleValue::Text(s) => StyleValueRecord::Text(s),
                StyleValue::Number(v) => StyleValueRecord::Number(v),
            };
            (option.as_str().to_string(), value)
        })
        .collect()
}

fn style_from_record(well: &str, record: &StyleRecord) -> Result<Style, ModelError> {
    let mut style = Style::default();
    style
        .set_kwargs(record.iter().map(|(key, value)| {
            let value = match value {
                StyleValueRecord::Text(s) => StyleValue::Text(s.clone()),
                StyleValueRecord::Number(v) => StyleValue::Number(*v),
            };
            (key, value)
        }))
        .map_err(|e| e.for_well(well))?;
    Ok(style)
}

fn calibration_record(config: &CalibrationConfig) -> CalibrationRecord {
    let alignment = match config.alignment() {
        Alignment::Exact => AlignmentRecord::Exact,
        Alignment::Nearest { tolerance_days } => AlignmentRecord::Nearest { tolerance_days },
        Alignment::TimeEquivalent { offset_days } => AlignmentRecord::TimeEquivalent { offset_days },
        Alignment::Linear => AlignmentRecord::Linear,
    };
    CalibrationRecord {
        method: config.method().as_str().to_string(),
        alignment,
        min_overlap: config.min_overlap(),
        confidence: config.confidence(),
    }
}

fn calibration_config(record: CalibrationRecord) -> Result<CalibrationConfig, ModelError> {
    let alignment = match record.alignment {
        AlignmentRecord::Exact => Alignment::Exact,
        AlignmentRecord::Nearest { tolerance_days } => Alignment::Nearest { tolerance_days },
        AlignmentRecord::TimeEquivalent { offset_days } => Alignment::TimeEquivalent { offset_days },
        AlignmentRecord::Linear => Alignment::Linear,
    };
    let config = CalibrationConfig::default()
        .with_method(record.method.parse::<Method>()?)
        .with_alignment(alignment)
        .with_min_overlap(record.min_overlap)
        .with_confidence(record.confidence);
    config.validate()?;
    Ok(config)
}

fn timestamp(record: TimeRecord) -> Timestamp {
    match record {
        TimeRecord::Calendar(t) => Timestamp::Calendar(t),
        TimeRecord::Elapsed(d) => Timestamp::Elapsed(d),
    }
}

fn time_record(timestamp: Timestamp) -> TimeRecord {
    match timestamp {
        Timestamp::Calendar(t) => TimeRecord::Calendar(t),
        Timestamp::Elapsed(d) => TimeRecord::Elapsed(d),
    }
}
