//! Pure conversion functions: TOML config structs -> crate API config types.

use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::NaiveDateTime;
use tracing::info;

use crate::config::*;

use gwref_model::{CalibrationConfig, Method, Model, ModelConfig, Style, StyleValue};
use gwref_series::Alignment;

/// Reads and parses a `gwref.toml` file.
pub fn load_config(path: &Path) -> Result<GwrefConfig> {
    let toml_str = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    toml::from_str(&toml_str).context("failed to parse TOML config")
}

/// Parses an ISO-8601 date-time such as `2023-01-01T00:00:00`.
pub fn parse_time_origin(s: &str) -> Result<NaiveDateTime> {
    s.parse::<NaiveDateTime>()
        .with_context(|| format!("invalid time_origin: {s:?}"))
}

/// Builds the alignment policy named in the calibration section.
pub fn parse_alignment(c: &CalibrationToml) -> Result<Alignment> {
    match c.alignment.to_lowercase().as_str() {
        "exact" => Ok(Alignment::Exact),
        "nearest" => Ok(Alignment::Nearest {
            tolerance_days: c.tolerance_days,
        }),
        "time_equivalent" => Ok(Alignment::TimeEquivalent {
            offset_days: c.offset_days,
        }),
        "linear" => Ok(Alignment::Linear),
        other => bail!("unknown alignment: {other:?}"),
    }
}

/// Builds a [`CalibrationConfig`] from the TOML calibration section.
pub fn build_calibration_config(c: &CalibrationToml) -> Result<CalibrationConfig> {
    let method: Method = c.method.parse()?;
    let cfg = CalibrationConfig::default()
        .with_method(method)
        .with_alignment(parse_alignment(c)?)
        .with_min_overlap(c.min_overlap)
        .with_confidence(c.confidence);
    cfg.validate()?;
    Ok(cfg)
}

/// Builds the default well [`Style`] from the TOML style section.
pub fn build_style(s: &StyleToml) -> Result<Style> {
    let mut entries: Vec<(&str, StyleValue)> = Vec::new();
    let text = [
        ("color", &s.color),
        ("linestyle", &s.linestyle),
        ("label", &s.label),
        ("marker", &s.marker),
    ];
    for (key, value) in text {
        if let Some(v) = value {
            entries.push((key, StyleValue::Text(v.clone())));
        }
    }
    let numbers = [
        ("linewidth", s.linewidth),
        ("alpha", s.alpha),
        ("markersize", s.markersize),
    ];
    for (key, value) in numbers {
        if let Some(v) = value {
            entries.push((key, StyleValue::Number(v)));
        }
    }

    let mut style = Style::default();
    style.set_kwargs(entries)?;
    Ok(style)
}

/// Builds a [`ModelConfig`] from the whole configuration.
pub fn build_model_config(cfg: &GwrefConfig) -> Result<ModelConfig> {
    let mut model_cfg = ModelConfig::default()
        .with_calibration(build_calibration_config(&cfg.calibration)?)
        .with_default_style(build_style(&cfg.style)?);
    if let Some(ref origin) = cfg.model.time_origin {
        model_cfg = model_cfg.with_time_origin(parse_time_origin(origin)?);
    }
    Ok(model_cfg)
}

/// Creates an empty [`Model`] named and configured by `cfg`.
pub fn new_model(cfg: &GwrefConfig) -> Result<Model> {
    let model_cfg = build_model_config(cfg)?;
    let model = Model::with_config(cfg.model.name.clone(), model_cfg)
        .context("invalid model configuration")?;
    info!(
        model = %model.name(),
        origin = %model.config().time_origin(),
        alignment = ?model.alignment(),
        "created model from config"
    );
    Ok(model)
}
