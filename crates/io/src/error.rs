//! Error types for gwref-io.

use std::path::PathBuf;

/// Error type for all fallible operations in the gwref-io crate.
///
/// Any document that cannot be turned into a consistent project is reported
/// as [`IoError::CorruptFile`]; callers never receive a partial project.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Wraps an operating-system I/O failure.
    #[error("i/o error on {}: {reason}", path.display())]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Description of the underlying failure.
        reason: String,
    },

    /// Returned when a file is not a valid `.gwref` document.
    #[error("corrupt project file {}: {reason}", path.display())]
    CorruptFile {
        /// Path of the offending file.
        path: PathBuf,
        /// What was wrong with it.
        reason: String,
    },

    /// Returned when reading a file without the `.gwref` extension.
    #[error("unsupported file extension: {} (expected .gwref)", path.display())]
    UnsupportedExtension {
        /// Path that was rejected.
        path: PathBuf,
    },

    /// Returned when a document cannot be encoded as JSON.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the encoder failure.
        reason: String,
    },
}

impl IoError {
    pub(crate) fn io(path: &std::path::Path, e: &std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::NotFound {
            return IoError::FileNotFound {
                path: path.to_path_buf(),
            };
        }
        IoError::Io {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }
    }

    pub(crate) fn corrupt(path: &std::path::Path, reason: impl Into<String>) -> Self {
        IoError::CorruptFile {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}
