//! `.gwref` reader.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info};

use crate::document::{FILE_EXTENSION, FORMAT_NAME, FORMAT_VERSION, ProjectFile};
use crate::error::IoError;

/// Reads a `.gwref` project document.
///
/// # Errors
///
/// - [`IoError::UnsupportedExtension`] unless the path ends in `.gwref`.
/// - [`IoError::FileNotFound`] / [`IoError::Io`] if the file cannot be opened.
/// - [`IoError::CorruptFile`] on malformed JSON, a wrong `format` or
///   `version`, or fields that do not match the schema.
pub fn read_project(path: &Path) -> Result<ProjectFile, IoError> {
    if !has_project_extension(path) {
        return Err(IoError::UnsupportedExtension {
            path: path.to_path_buf(),
        });
    }

    let file = File::open(path).map_err(|e| IoError::io(path, &e))?;
    let value: Value = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| IoError::corrupt(path, e.to_string()))?;

    check_header(&value).map_err(|reason| IoError::corrupt(path, reason))?;

    let doc: ProjectFile =
        serde_json::from_value(value).map_err(|e| IoError::corrupt(path, e.to_string()))?;

    info!(
        path = %path.display(),
        name = %doc.name,
        wells = doc.wells.len(),
        "read project file"
    );
    Ok(doc)
}

/// Returns `true` if `path` carries the `.gwref` extension.
pub fn has_project_extension(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(FILE_EXTENSION))
}

fn check_header(value: &Value) -> Result<(), String> {
    let Some(object) = value.as_object() else {
        return Err("top-level value is not an object".to_string());
    };
    match object.get("format").and_then(Value::as_str) {
        Some(FORMAT_NAME) => {}
        Some(other) => return Err(format!("unknown format {other:?}")),
        None => return Err("missing format header".to_string()),
    }
    match object.get("version").and_then(Value::as_u64) {
        Some(v) if v == u64::from(FORMAT_VERSION) => {
            debug!(version = v, "project header ok");
            Ok(())
        }
        Some(v) => Err(format!("unsupported version {v}")),
        None => Err("missing or non-integer version".to_string()),
    }
}
