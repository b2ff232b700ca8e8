//! Student model

use super::program::{FIRST_COURSE, LAST_COURSE};
use super::{Grade, Subject};
use crate::core::error::{RegistryError, Result};
use crate::core::tokens::{require_name, RESERVED_NAME_CHARS, RESERVED_PROGRAM_CHARS};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Enrollment status of a student
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StudentStatus {
    /// Actively enrolled in courses
    Enrolled,
    /// Interrupted the education program
    Dropped,
    /// Completed the whole program
    Graduated,
}

impl StudentStatus {
    /// Whether the lifecycle allows moving from `self` to `next`.
    ///
    /// `ENROLLED -> {DROPPED, GRADUATED}`, `DROPPED -> ENROLLED`, `GRADUATED` is
    /// terminal. Staying in the same status is always allowed.
    #[must_use]
    pub const fn can_become(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Enrolled, _)
                | (Self::Dropped, Self::Dropped | Self::Enrolled)
                | (Self::Graduated, Self::Graduated)
        )
    }
}

impl FromStr for StudentStatus {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "ENROLLED" => Ok(Self::Enrolled),
            "DROPPED" => Ok(Self::Dropped),
            "GRADUATED" => Ok(Self::Graduated),
            _ => Err(RegistryError::InvalidStatus(s.to_string())),
        }
    }
}

impl fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enrolled => write!(f, "ENROLLED"),
            Self::Dropped => write!(f, "DROPPED"),
            Self::Graduated => write!(f, "GRADUATED"),
        }
    }
}

/// Grade map entry: `None` means enrolled in the subject but not yet examined
pub type GradeEntry = Option<Grade>;

/// Represents a student enrolled in a program
#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    faculty_number: u32,
    name: String,
    /// Name of the program the student is enrolled in
    program: String,
    year: u8,
    group: u32,
    status: StudentStatus,
    grades: BTreeMap<Subject, GradeEntry>,
}

impl Student {
    /// Create an enrolled student with no grades
    ///
    /// # Errors
    /// Returns the validation error of the first invalid field
    pub fn new(faculty_number: u32, name: &str, program: &str, year: u32, group: u32) -> Result<Self> {
        let mut student = Self {
            faculty_number: 0,
            name: String::new(),
            program: String::new(),
            year: FIRST_COURSE,
            group: 0,
            status: StudentStatus::Enrolled,
            grades: BTreeMap::new(),
        };
        student.set_faculty_number(faculty_number)?;
        student.set_name(name)?;
        student.set_program(program)?;
        student.set_year(year)?;
        student.set_group(group)?;
        Ok(student)
    }

    fn set_faculty_number(&mut self, faculty_number: u32) -> Result<()> {
        if faculty_number == 0 {
            return Err(RegistryError::NotPositive {
                field: "faculty number",
            });
        }
        self.faculty_number = faculty_number;
        Ok(())
    }

    /// Set the student's name
    ///
    /// # Errors
    /// Returns `EmptyField` for a blank name, `ReservedCharacter` for a name
    /// containing `|`, `;` or a line break
    pub fn set_name(&mut self, name: &str) -> Result<()> {
        self.name = require_name("Student", "name", name, &RESERVED_NAME_CHARS)?.to_string();
        Ok(())
    }

    /// Set the program name. Existence of the program is checked by the rules engine.
    ///
    /// # Errors
    /// Returns `EmptyField` for a blank program name, `ReservedCharacter` for
    /// one that could not be written to a program line
    pub fn set_program(&mut self, program: &str) -> Result<()> {
        self.program =
            require_name("Student", "program", program, &RESERVED_PROGRAM_CHARS)?.to_string();
        Ok(())
    }

    /// Set the year of study
    ///
    /// # Errors
    /// Returns `YearOutOfRange` outside [1, 4]
    pub fn set_year(&mut self, year: u32) -> Result<()> {
        self.year = u8::try_from(year)
            .ok()
            .filter(|y| (FIRST_COURSE..=LAST_COURSE).contains(y))
            .ok_or(RegistryError::YearOutOfRange(year))?;
        Ok(())
    }

    /// Set the group
    ///
    /// # Errors
    /// Returns `NotPositive` for group 0
    pub fn set_group(&mut self, group: u32) -> Result<()> {
        if group == 0 {
            return Err(RegistryError::NotPositive { field: "group" });
        }
        self.group = group;
        Ok(())
    }

    /// Set the status without lifecycle checks; the rules engine enforces transitions
    pub fn set_status(&mut self, status: StudentStatus) {
        self.status = status;
    }

    /// Faculty number
    #[must_use]
    pub const fn faculty_number(&self) -> u32 {
        self.faculty_number
    }

    /// Student name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Program name
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Year of study
    #[must_use]
    pub const fn year(&self) -> u8 {
        self.year
    }

    /// Group number
    #[must_use]
    pub const fn group(&self) -> u32 {
        self.group
    }

    /// Current status
    #[must_use]
    pub const fn status(&self) -> StudentStatus {
        self.status
    }

    /// Read-only view of the grade map
    #[must_use]
    pub const fn grades(&self) -> &BTreeMap<Subject, GradeEntry> {
        &self.grades
    }

    /// First grade-map entry whose subject has this name (case-insensitive)
    #[must_use]
    pub fn entry_for(&self, subject_name: &str) -> Option<(&Subject, GradeEntry)> {
        self.grades
            .iter()
            .find(|(subject, _)| subject.is_named(subject_name))
            .map(|(subject, grade)| (subject, *grade))
    }

    /// Whether the subject has been examined with a grade of at least 3.00
    #[must_use]
    pub fn has_passed(&self, subject: &Subject) -> bool {
        self.grades
            .get(subject)
            .copied()
            .flatten()
            .is_some_and(Grade::is_passing)
    }

    /// Taken exams: subjects graded 3.00 or more
    pub fn taken_exams(&self) -> impl Iterator<Item = (&Subject, Grade)> {
        self.graded().filter(|(_, grade)| grade.is_passing())
    }

    /// Failed exams: subjects graded below 3.00
    pub fn failed_exams(&self) -> impl Iterator<Item = (&Subject, Grade)> {
        self.graded().filter(|(_, grade)| !grade.is_passing())
    }

    /// Subjects the student is enrolled in but has not been examined on
    pub fn pending_subjects(&self) -> impl Iterator<Item = &Subject> {
        self.grades
            .iter()
            .filter(|(_, grade)| grade.is_none())
            .map(|(subject, _)| subject)
    }

    fn graded(&self) -> impl Iterator<Item = (&Subject, Grade)> {
        self.grades
            .iter()
            .filter_map(|(subject, grade)| grade.map(|g| (subject, g)))
    }

    /// Mandatory subjects that are not passed, including ungraded ones
    #[must_use]
    pub fn failed_mandatory_count(&self) -> usize {
        self.grades
            .keys()
            .filter(|subject| subject.is_mandatory() && !self.has_passed(subject))
            .count()
    }

    /// Mean of taken exams, or `None` when no exam has been passed
    #[must_use]
    pub fn average_grade(&self) -> Option<f64> {
        let (sum, count) = self
            .taken_exams()
            .fold((0.0, 0_u32), |(sum, count), (_, g)| (sum + g.value(), count + 1));
        (count > 0).then(|| sum / f64::from(count))
    }

    /// Average grade formatted to two decimals
    #[must_use]
    pub fn average_grade_text(&self) -> Option<String> {
        self.average_grade().map(|avg| format!("{avg:.2}"))
    }

    /// Add an ungraded entry for a subject
    pub(crate) fn enroll_in(&mut self, subject: Subject) {
        self.grades.insert(subject, None);
    }

    /// Store a grade entry as-is (used when decoding persisted records)
    pub(crate) fn put_grade(&mut self, subject: Subject, grade: GradeEntry) {
        self.grades.insert(subject, grade);
    }
}
