//! Read-only reports over the student records
//!
//! `print`, `printall` and `protocol` reuse the persisted line format of a
//! student; `report` renders the grades template in [`grades`].

pub mod grades;

pub use grades::GradesReport;

use crate::core::codec::{RecordCodec, StudentCodec};
use crate::core::error::Result;
use crate::core::models::Student;
use crate::core::store::StudentStore;
use crate::core::tokens::{name_key, require_text};
use askama::Template;
use std::fmt::Write;

/// Printed by `printall` when no student matches
pub const NO_STUDENTS_MESSAGE: &str = "There are no enrolled students in this program or year.";
/// Header of the first `protocol` section
pub const PROTOCOL_BY_PROGRAM_HEADER: &str = ">>>>>Program report by course<<<<<";
/// Header of the second `protocol` section
pub const PROTOCOL_BY_YEAR_HEADER: &str = ">>>>>Program report by year<<<<<";

/// Builds report text from a student store
#[derive(Debug, Clone, Copy)]
pub struct StudentReporter<'a> {
    students: &'a StudentStore,
}

impl<'a> StudentReporter<'a> {
    /// Create a reporter over `students`
    #[must_use]
    pub const fn new(students: &'a StudentStore) -> Self {
        Self { students }
    }

    /// The student's record line
    ///
    /// # Errors
    /// Returns `StudentNotFound`
    pub fn print(&self, faculty_number: u32) -> Result<String> {
        let student = self.students.get_or_err(&faculty_number)?;
        Ok(StudentCodec.encode(student))
    }

    /// Record lines of every student in `program` and `year`, one per line
    ///
    /// # Errors
    /// Returns `ExpectedText` for a numeric program name
    pub fn print_all(&self, program: &str, year: u32) -> Result<String> {
        let program = name_key(require_text(program)?);
        let matching: Vec<&Student> = self
            .students
            .all()
            .filter(|s| u32::from(s.year()) == year && name_key(s.program()) == program)
            .collect();

        if matching.is_empty() {
            return Ok(NO_STUDENTS_MESSAGE.to_string());
        }
        Ok(lines(matching))
    }

    /// Students enrolled in `subject`, grouped by program and then by year
    ///
    /// # Errors
    /// Returns `ExpectedText` for a numeric subject name
    pub fn protocol(&self, subject: &str) -> Result<String> {
        let subject = require_text(subject)?;
        let mut enrolled: Vec<&Student> = self
            .students
            .all()
            .filter(|s| s.entry_for(subject).is_some())
            .collect();

        let mut out = String::new();
        out.push_str(PROTOCOL_BY_PROGRAM_HEADER);
        out.push('\n');
        enrolled.sort_by(|a, b| {
            a.program()
                .cmp(b.program())
                .then(a.faculty_number().cmp(&b.faculty_number()))
        });
        out.push_str(&lines(enrolled.iter().copied()));

        out.push('\n');
        out.push_str(PROTOCOL_BY_YEAR_HEADER);
        out.push('\n');
        enrolled.sort_by_key(|s| (s.year(), s.faculty_number()));
        out.push_str(&lines(enrolled));

        Ok(out)
    }

    /// Grades report for one student
    ///
    /// # Errors
    /// Returns `StudentNotFound`, or `Render` if the template fails
    pub fn report(&self, faculty_number: u32) -> Result<String> {
        let student = self.students.get_or_err(&faculty_number)?;
        if student.grades().is_empty() {
            return Ok(format!("Student {faculty_number} has no grades yet."));
        }
        Ok(GradesReport::new(student).render()?)
    }
}

/// Encoded students, each followed by a line break
fn lines<'a>(students: impl IntoIterator<Item = &'a Student>) -> String {
    students.into_iter().fold(String::new(), |mut out, student| {
        let _ = writeln!(out, "{}", StudentCodec.encode(student));
        out
    })
}
