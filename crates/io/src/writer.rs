//! `.gwref` writer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::document::{FILE_EXTENSION, ProjectFile};
use crate::error::IoError;
use crate::reader::has_project_extension;

/// Returns `path` with its extension forced to `.gwref`.
///
/// `site` and `site.json` both become `site.gwref`.
pub fn project_path(path: &Path) -> PathBuf {
    if has_project_extension(path) {
        path.to_path_buf()
    } else {
        path.with_extension(FILE_EXTENSION)
    }
}

/// Writes `doc` as pretty-printed JSON and returns the path actually written.
///
/// The target is [`project_path`]`(path)`; an existing file is replaced.
///
/// # Errors
///
/// Returns [`IoError::Io`] if the file cannot be created or flushed, or
/// [`IoError::Serialization`] if encoding fails.
pub fn write_project(path: &Path, doc: &ProjectFile) -> Result<PathBuf, IoError> {
    let target = project_path(path);

    let file = File::create(&target).map_err(|e| IoError::io(&target, &e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, doc).map_err(|e| {
        if e.is_io() {
            IoError::Io {
                path: target.clone(),
                reason: e.to_string(),
            }
        } else {
            IoError::Serialization {
                reason: e.to_string(),
            }
        }
    })?;
    writer.flush().map_err(|e| IoError::io(&target, &e))?;

    info!(
        path = %target.display(),
        name = %doc.name,
        wells = doc.wells.len(),
        "wrote project file"
    );
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_path_forces_extension() {
        assert_eq!(project_path(Path::new("site")), PathBuf::from("site.gwref"));
        assert_eq!(
            project_path(Path::new("dir/site.json")),
            PathBuf::from("dir/site.gwref")
        );
        assert_eq!(
            project_path(Path::new("site.gwref")),
            PathBuf::from("site.gwref")
        );
    }

    #[test]
    fn unwritable_directory_is_io_error() {
        let doc = ProjectFile::new("x", chrono::NaiveDateTime::default());
        let err = write_project(Path::new("/nonexistent-dir/sub/site"), &doc).unwrap_err();
        assert!(matches!(
            err,
            IoError::Io { .. } | IoError::FileNotFound { .. }
        ));
    }
}
