//! Program line codec
//!
//! `<name>: <course> -> <subject> - <kind> | <subject> - <kind>; <course> -> ...`

use super::{malformed, RecordCodec, ARROW, ENTRY_SEPARATOR, FIELD_SEPARATOR, LABEL_SEPARATOR};
use crate::core::error::{RecordKind, Result};
use crate::core::models::{Program, Subject};
use crate::core::tokens::parse_int;
use std::fmt::Write;

/// Codec for program database lines
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgramCodec;

impl RecordCodec for ProgramCodec {
    type Record = Program;

    const KIND: RecordKind = RecordKind::Program;

    fn encode(&self, program: &Program) -> String {
        let mut line = format!("{}{LABEL_SEPARATOR}", program.name());

        for (idx, (course, subjects)) in program.courses().iter().enumerate() {
            if idx > 0 {
                line.push_str(ENTRY_SEPARATOR);
            }
            let subjects: Vec<String> = subjects
                .iter()
                .map(|s| format!("{} - {}", s.name(), s.kind()))
                .collect();
            let _ = write!(line, "{course}{ARROW}{}", subjects.join(FIELD_SEPARATOR));
        }

        line
    }

    fn decode(&self, line: &str) -> Result<Program> {
        let (name, course_spec) = line
            .split_once(LABEL_SEPARATOR)
            .ok_or_else(|| malformed(Self::KIND, line))?;

        let mut program = Program::new(name)?;

        for course_part in course_spec.split(ENTRY_SEPARATOR) {
            let (course, subjects) = course_part
                .split_once(ARROW)
                .ok_or_else(|| malformed(Self::KIND, line))?;
            let course = parse_int(course.trim())?;

            let subjects = subjects
                .split(FIELD_SEPARATOR)
                .map(|entry| parse_subject(entry, line))
                .collect::<Result<Vec<_>>>()?;

            program.add_course(course, subjects)?;
        }

        Ok(program)
    }
}

/// Parse `<subject name> - <kind>`; the kind is taken from the last ` - `
fn parse_subject(entry: &str, line: &str) -> Result<Subject> {
    let (name, kind) = entry
        .rsplit_once(" - ")
        .ok_or_else(|| malformed(RecordKind::Program, line))?;
    Subject::parse(name, kind)
}
