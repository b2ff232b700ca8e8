//! Program model

use super::Subject;
use crate::core::error::{RegistryError, Result};
use crate::core::tokens::{name_key, require_name, RESERVED_PROGRAM_CHARS};
use std::collections::{BTreeMap, BTreeSet};

/// First course of study
pub const FIRST_COURSE: u8 = 1;
/// Last course of study
pub const LAST_COURSE: u8 = 4;

/// Represents an academic program and the subjects it offers per course
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    /// Program name (e.g., "Computer Science")
    name: String,

    /// Subjects offered in each course (1–4); a present entry is never empty
    courses: BTreeMap<u8, BTreeSet<Subject>>,
}

impl Program {
    /// Create a program without any courses
    ///
    /// # Errors
    /// Returns `EmptyField` when the name is blank, `ReservedCharacter` when it
    /// contains `|`, `;`, `:` or a line break
    pub fn new(name: &str) -> Result<Self> {
        let mut program = Self {
            name: String::new(),
            courses: BTreeMap::new(),
        };
        program.set_name(name)?;
        Ok(program)
    }

    /// Builder-style variant of adding the subjects of one course
    ///
    /// # Errors
    /// Returns `CourseOutOfRange`, `DuplicateCourse` or `EmptyCourse`
    pub fn with_course(
        mut self,
        course: u32,
        subjects: impl IntoIterator<Item = Subject>,
    ) -> Result<Self> {
        self.add_course(course, subjects)?;
        Ok(self)
    }

    fn set_name(&mut self, name: &str) -> Result<()> {
        self.name = require_name("Program", "name", name, &RESERVED_PROGRAM_CHARS)?.to_string();
        Ok(())
    }

    /// Add the subjects offered in `course`; each course can be added once
    pub(crate) fn add_course(
        &mut self,
        course: u32,
        subjects: impl IntoIterator<Item = Subject>,
    ) -> Result<()> {
        let course = u8::try_from(course)
            .ok()
            .filter(|c| (FIRST_COURSE..=LAST_COURSE).contains(c))
            .ok_or(RegistryError::CourseOutOfRange(course))?;

        if self.courses.contains_key(&course) {
            return Err(RegistryError::DuplicateCourse(course));
        }

        let subjects: BTreeSet<Subject> = subjects.into_iter().collect();
        if subjects.is_empty() {
            return Err(RegistryError::EmptyCourse(course));
        }

        self.courses.insert(course, subjects);
        Ok(())
    }

    /// Program name as written
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Normalized lookup key
    #[must_use]
    pub fn key(&self) -> String {
        name_key(&self.name)
    }

    /// Read-only view of the subjects offered per course
    #[must_use]
    pub const fn courses(&self) -> &BTreeMap<u8, BTreeSet<Subject>> {
        &self.courses
    }

    /// Find a subject by name in one course
    #[must_use]
    pub fn find_subject(&self, course: u8, name: &str) -> Option<&Subject> {
        self.courses
            .get(&course)
            .and_then(|subjects| subjects.iter().find(|s| s.is_named(name)))
    }

    /// Mandatory subjects of all courses strictly before `year`
    pub fn mandatory_before(&self, year: u8) -> impl Iterator<Item = &Subject> {
        self.courses
            .range(..year)
            .flat_map(|(_, subjects)| subjects.iter())
            .filter(|s| s.is_mandatory())
    }
}
