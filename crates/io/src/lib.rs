//! # gwref-io
//!
//! Versioned JSON persistence for `.gwref` project files.
//!
//! This crate only knows the document layout ([`ProjectFile`] and its
//! records). Converting between documents and in-memory models lives in
//! `gwref-model`.

mod document;
mod error;
mod reader;
mod writer;

pub use document::{
    AlignmentRecord, CalibrationRecord, FILE_EXTENSION, FORMAT_NAME, FORMAT_VERSION, ModeRecord,
    PeriodRecord, ProjectFile, RoleRecord, SampleRecord, StyleRecord, StyleValueRecord,
    TimeRecord, WellRecord,
};
pub use error::IoError;
pub use reader::{has_project_extension, read_project};
pub use writer::{project_path, write_project};
