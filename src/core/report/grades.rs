//! Per-student grades report rendered from `templates/grades_report.txt`

use crate::core::models::{Grade, Student, Subject};
use askama::Template;

/// One examined subject in the report
#[derive(Debug, Clone)]
pub struct ExamLine {
    /// Subject name
    pub subject: String,
    /// Grade formatted to two decimals
    pub grade: String,
}

impl ExamLine {
    fn new(subject: &Subject, grade: Grade) -> Self {
        Self {
            subject: subject.name().to_string(),
            grade: grade.to_string(),
        }
    }
}

/// Template context for a student's grades report
#[derive(Debug, Template)]
#[template(path = "grades_report.txt")]
pub struct GradesReport<'a> {
    /// Faculty number
    pub faculty_number: u32,
    /// Student name
    pub name: &'a str,
    /// Subjects graded 3.00 or more
    pub taken: Vec<ExamLine>,
    /// Subjects graded below 3.00
    pub failed: Vec<ExamLine>,
    /// Subjects not yet examined
    pub pending: Vec<&'a str>,
    /// Average of the taken exams; empty when nothing was taken
    pub average: String,
}

impl<'a> GradesReport<'a> {
    /// Build the report context for `student`
    #[must_use]
    pub fn new(student: &'a Student) -> Self {
        Self {
            faculty_number: student.faculty_number(),
            name: student.name(),
            taken: student
                .taken_exams()
                .map(|(subject, grade)| ExamLine::new(subject, grade))
                .collect(),
            failed: student
                .failed_exams()
                .map(|(subject, grade)| ExamLine::new(subject, grade))
                .collect(),
            pending: student.pending_subjects().map(Subject::name).collect(),
            average: student.average_grade_text().unwrap_or_default(),
        }
    }
}
