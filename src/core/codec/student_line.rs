//! Student line codec
//!
//! ```text
//! Name: Jane Doe | Faculty number: 1001 | Program: CS | Year: 2 | Group: 3 | Status: ENROLLED | Grades: Algo -> mandatory -> 5.50; DB -> optional -> ungraded
//! ```
//!
//! The grades field is omitted when the student has no grade entries.

use super::{malformed, RecordCodec, ARROW, ENTRY_SEPARATOR, FIELD_SEPARATOR, LABEL_SEPARATOR};
use crate::core::error::{RecordKind, Result};
use crate::core::models::{Grade, GradeEntry, Student, StudentStatus, Subject};
use crate::core::tokens::{parse_decimal, parse_int};

/// Marker written in place of a grade for subjects not yet examined
pub const UNGRADED: &str = "ungraded";

/// Number of fields preceding the optional grades field
const REQUIRED_FIELDS: usize = 6;

/// Codec for student database lines
#[derive(Debug, Clone, Copy, Default)]
pub struct StudentCodec;

impl RecordCodec for StudentCodec {
    type Record = Student;

    const KIND: RecordKind = RecordKind::Student;

    fn encode(&self, student: &Student) -> String {
        let mut line = format!(
            "Name: {} | Faculty number: {} | Program: {} | Year: {} | Group: {} | Status: {}",
            student.name(),
            student.faculty_number(),
            student.program(),
            student.year(),
            student.group(),
            student.status()
        );

        if !student.grades().is_empty() {
            let entries: Vec<String> = student
                .grades()
                .iter()
                .map(|(subject, grade)| {
                    format!(
                        "{}{ARROW}{}{ARROW}{}",
                        subject.name(),
                        subject.kind(),
                        encode_grade(*grade)
                    )
                })
                .collect();
            line.push_str(FIELD_SEPARATOR);
            line.push_str("Grades: ");
            line.push_str(&entries.join(ENTRY_SEPARATOR));
        }

        line
    }

    fn decode(&self, line: &str) -> Result<Student> {
        let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
        if fields.len() < REQUIRED_FIELDS {
            return Err(malformed(Self::KIND, line));
        }

        let values = fields
            .iter()
            .map(|field| field_value(field).ok_or_else(|| malformed(Self::KIND, line)))
            .collect::<Result<Vec<_>>>()?;

        let mut student = Student::new(
            parse_int(values[1].trim())?,
            values[0],
            values[2],
            parse_int(values[3].trim())?,
            parse_int(values[4].trim())?,
        )?;
        student.set_status(values[5].parse::<StudentStatus>()?);

        if let Some(grades) = values.get(REQUIRED_FIELDS) {
            for entry in grades.split(ENTRY_SEPARATOR).filter(|e| !e.trim().is_empty()) {
                let (subject, grade) = decode_grade_entry(entry)
                    .ok_or_else(|| malformed(Self::KIND, line))??;
                student.put_grade(subject, grade);
            }
        }

        Ok(student)
    }
}

/// Text after the first `": "`; labels themselves are not checked
fn field_value(field: &str) -> Option<&str> {
    field.split_once(LABEL_SEPARATOR).map(|(_, value)| value)
}

fn encode_grade(grade: GradeEntry) -> String {
    grade.map_or_else(|| UNGRADED.to_string(), |g| g.to_string())
}

/// Split `<subject> -> <kind> -> <grade>` from the right. `None` means the
/// entry does not have three parts.
fn decode_grade_entry(entry: &str) -> Option<Result<(Subject, GradeEntry)>> {
    let (rest, grade) = entry.rsplit_once(ARROW)?;
    let (name, kind) = rest.rsplit_once(ARROW)?;

    Some(decode_grade(grade.trim()).and_then(|grade| Ok((Subject::parse(name, kind)?, grade))))
}

fn decode_grade(text: &str) -> Result<GradeEntry> {
    if text.eq_ignore_ascii_case(UNGRADED) {
        return Ok(None);
    }
    Grade::new(parse_decimal(text)?).map(Some)
}
