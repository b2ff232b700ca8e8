//! Line codecs for persisted records
//!
//! Each record occupies one line of a text file. Students and programs use
//! different layouts; both are implemented behind [`RecordCodec`] so the file
//! store can load and save either kind.

pub mod program_line;
pub mod student_line;

pub use program_line::ProgramCodec;
pub use student_line::StudentCodec;

use crate::core::error::{RecordKind, RegistryError, Result};

/// Separator between the fields of a student line and between subjects of a course
pub const FIELD_SEPARATOR: &str = " | ";
/// Separator between grade entries and between program courses
pub const ENTRY_SEPARATOR: &str = "; ";
/// Separator inside a grade entry and between a course number and its subjects
pub const ARROW: &str = " -> ";
/// Separator between a label and its value
pub const LABEL_SEPARATOR: &str = ": ";

/// Converts a record to and from its single-line text form
pub trait RecordCodec {
    /// The record type handled by this codec
    type Record;

    /// Record kind, used in format errors and log lines
    const KIND: RecordKind;

    /// Encode a record. Never fails for a valid entity.
    fn encode(&self, record: &Self::Record) -> String;

    /// Decode one line
    ///
    /// # Errors
    /// Returns `MalformedRecord` when the line lacks mandatory fields, or the
    /// entity's own validation error when a field value is rejected
    fn decode(&self, line: &str) -> Result<Self::Record>;
}

/// Build a format error for `line`
pub(crate) fn malformed(record: RecordKind, line: &str) -> RegistryError {
    RegistryError::MalformedRecord {
        record,
        line: line.to_string(),
    }
}
