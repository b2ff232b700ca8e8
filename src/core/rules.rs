//! Student lifecycle rules
//!
//! [`Registrar`] owns the student and program stores and is the only place
//! students are mutated after creation. Every operation validates completely
//! before it touches the store, so a failed call leaves the store unchanged.
//!
//! Status lifecycle: `ENROLLED -> {DROPPED, GRADUATED}`, `DROPPED -> ENROLLED`,
//! `GRADUATED` is terminal. Re-setting the current status is allowed.

use crate::core::error::{RegistryError, Result};
use crate::core::models::program::LAST_COURSE;
use crate::core::models::{Grade, Student, StudentStatus};
use crate::core::store::{ProgramStore, StudentStore};
use crate::core::tokens::{name_key, parse_int, require_text};
use crate::info;
use std::fmt;

/// Mandatory subjects a student may leave unpassed and still move up a year
pub const ALLOWED_FAILED_MANDATORY: usize = 2;

/// Attribute targeted by [`Registrar::change`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOption {
    /// Transfer to another program
    Program,
    /// Move to another group
    Group,
    /// Move up one year
    Year,
}

impl ChangeOption {
    /// Parse an option name (case-insensitive)
    ///
    /// # Errors
    /// `ExpectedText` for a numeric token, `UnknownOption` otherwise
    pub fn parse(option: &str) -> Result<Self> {
        match name_key(require_text(option)?).as_str() {
            "program" => Ok(Self::Program),
            "group" => Ok(Self::Group),
            "year" => Ok(Self::Year),
            _ => Err(RegistryError::UnknownOption(option.to_string())),
        }
    }
}

/// Operator-facing outcome of a successful mutation
#[derive(Debug, Clone, PartialEq)]
pub enum Confirmation {
    /// A new student was created
    Enrolled {
        /// Student name
        name: String,
        /// Faculty number
        faculty_number: u32,
        /// Group
        group: u32,
        /// Program name
        program: String,
    },
    /// The student moved up one year
    YearChanged(u32),
    /// The student was transferred to another program
    ProgramChanged {
        /// Faculty number
        faculty_number: u32,
        /// New program name
        program: String,
    },
    /// The student moved to another group
    GroupChanged {
        /// Faculty number
        faculty_number: u32,
        /// New group
        group: u32,
    },
    /// The student's status was set
    StatusChanged(u32),
    /// The student was enrolled in a subject
    SubjectEnrolled {
        /// Faculty number
        faculty_number: u32,
        /// Subject name
        subject: String,
    },
    /// A grade was recorded
    GradeAdded {
        /// Faculty number
        faculty_number: u32,
        /// Subject name
        subject: String,
        /// Recorded grade
        grade: Grade,
    },
}

impl fmt::Display for Confirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enrolled {
                name,
                faculty_number,
                group,
                program,
            } => write!(
                f,
                "Successfully enrolled student {name} with faculty number {faculty_number} in group {group} of program {program}."
            ),
            Self::YearChanged(fn_) => write!(f, "Successfully changed student {fn_} year."),
            Self::ProgramChanged {
                faculty_number,
                program,
            } => write!(
                f,
                "Successfully changed student {faculty_number} program to {program}."
            ),
            Self::GroupChanged {
                faculty_number,
                group,
            } => write!(
                f,
                "Successfully changed student {faculty_number} group to {group}."
            ),
            Self::StatusChanged(fn_) => write!(f, "Successfully changed student {fn_} status."),
            Self::SubjectEnrolled {
                faculty_number,
                subject,
            } => write!(
                f,
                "Successfully enrolled student {faculty_number} in course {subject}."
            ),
            Self::GradeAdded {
                faculty_number,
                subject,
                grade,
            } => write!(
                f,
                "Successfully added grade {grade} for course {subject} in student {faculty_number} record."
            ),
        }
    }
}

/// The rules engine: owns both record stores
#[derive(Debug, Clone, Default)]
pub struct Registrar {
    students: StudentStore,
    programs: ProgramStore,
}

impl Registrar {
    /// Create an engine over a loaded program database and no students
    #[must_use]
    pub fn new(programs: ProgramStore) -> Self {
        Self {
            students: StudentStore::new(),
            programs,
        }
    }

    /// Student records
    #[must_use]
    pub const fn students(&self) -> &StudentStore {
        &self.students
    }

    /// Program database
    #[must_use]
    pub const fn programs(&self) -> &ProgramStore {
        &self.programs
    }

    pub(crate) fn students_mut(&mut self) -> &mut StudentStore {
        &mut self.students
    }

    pub(crate) fn programs_mut(&mut self) -> &mut ProgramStore {
        &mut self.programs
    }

    /// Drop every student and program
    pub fn clear(&mut self) {
        self.students.clear();
        self.programs.clear();
    }

    /// Enroll a new student in the first year of `program`
    ///
    /// # Errors
    /// `StudentExists`, `ExpectedText` for numeric program or name,
    /// `ProgramNotFound`, or a student validation error
    pub fn enroll(
        &mut self,
        faculty_number: u32,
        program: &str,
        group: u32,
        name: &str,
    ) -> Result<Confirmation> {
        if self.students.contains(&faculty_number) {
            return Err(RegistryError::StudentExists(faculty_number));
        }
        let program = self.programs.find(require_text(program)?)?.name().to_string();
        let name = require_text(name)?;

        let student = Student::new(faculty_number, name, &program, 1, group)?;
        self.students.add_new(student)?;

        info!("Enrolled student {faculty_number} in {program}, group {group}");
        Ok(Confirmation::Enrolled {
            name: name.to_string(),
            faculty_number,
            group,
            program,
        })
    }

    /// Move a student up one year
    ///
    /// # Errors
    /// `StudentNotFound`, `StudentDropped`, `YearOutOfRange` past the last
    /// year, `InsufficientExamsForYearTransfer`
    pub fn advance(&mut self, faculty_number: u32) -> Result<Confirmation> {
        let student = self.students.get_mut_or_err(&faculty_number)?;
        ensure_active(student)?;
        advance_year(student)
    }

    /// Change a student's program, group or year
    ///
    /// `year` only accepts the year right after the current one and follows the
    /// same rule as [`Registrar::advance`]. A program transfer requires every
    /// mandatory subject of the new program's earlier courses to be graded
    /// above 3.00; the grade map is kept as is.
    ///
    /// # Errors
    /// `ExpectedText`/`UnknownOption` for the option, `StudentNotFound`,
    /// `StudentDropped`, then the per-option errors
    pub fn change(&mut self, faculty_number: u32, option: &str, value: &str) -> Result<Confirmation> {
        let option = ChangeOption::parse(option)?;
        let student = self.students.get_mut_or_err(&faculty_number)?;
        ensure_active(student)?;

        match option {
            ChangeOption::Program => {
                let program = self.programs.find(require_text(value)?)?;
                let missing: Vec<String> = program
                    .mandatory_before(student.year())
                    .filter(|subject| {
                        !student
                            .grades()
                            .get(subject)
                            .copied()
                            .flatten()
                            .is_some_and(|g| g.value() > Grade::PASSING)
                    })
                    .map(|subject| subject.name().to_string())
                    .collect();
                if !missing.is_empty() {
                    return Err(RegistryError::InsufficientExamsForProgramTransfer { missing });
                }

                let program = program.name().to_string();
                student.set_program(&program)?;
                info!("Transferred student {faculty_number} to program {program}");
                Ok(Confirmation::ProgramChanged {
                    faculty_number,
                    program,
                })
            }
            ChangeOption::Group => {
                let group = parse_int(value)?;
                student.set_group(group)?;
                info!("Moved student {faculty_number} to group {group}");
                Ok(Confirmation::GroupChanged {
                    faculty_number,
                    group,
                })
            }
            ChangeOption::Year => {
                let requested = parse_int(value)?;
                if requested != u32::from(student.year()) + 1 {
                    return Err(RegistryError::YearSkip {
                        current: student.year(),
                        requested,
                    });
                }
                advance_year(student)
            }
        }
    }

    /// Mark a student as graduated
    ///
    /// # Errors
    /// `StudentNotFound`, `InvalidTransition` for a dropped student,
    /// `InsufficientExamsForGraduation` unless every enrolled subject is passed
    pub fn graduate(&mut self, faculty_number: u32) -> Result<Confirmation> {
        let student = self.students.get_mut_or_err(&faculty_number)?;
        ensure_transition(student, StudentStatus::Graduated)?;

        let all_passed = !student.grades().is_empty()
            && student.grades().keys().all(|subject| student.has_passed(subject));
        if !all_passed {
            return Err(RegistryError::InsufficientExamsForGraduation);
        }

        student.set_status(StudentStatus::Graduated);
        info!("Student {faculty_number} graduated");
        Ok(Confirmation::StatusChanged(faculty_number))
    }

    /// Interrupt a student's education
    ///
    /// # Errors
    /// `StudentNotFound`, `InvalidTransition` for a graduated student
    pub fn interrupt(&mut self, faculty_number: u32) -> Result<Confirmation> {
        self.set_status(faculty_number, StudentStatus::Dropped)
    }

    /// Resume a student's education
    ///
    /// # Errors
    /// `StudentNotFound`, `InvalidTransition` for a graduated student
    pub fn resume(&mut self, faculty_number: u32) -> Result<Confirmation> {
        self.set_status(faculty_number, StudentStatus::Enrolled)
    }

    fn set_status(&mut self, faculty_number: u32, status: StudentStatus) -> Result<Confirmation> {
        let student = self.students.get_mut_or_err(&faculty_number)?;
        ensure_transition(student, status)?;
        student.set_status(status);
        info!("Student {faculty_number} is now {status}");
        Ok(Confirmation::StatusChanged(faculty_number))
    }

    /// Enroll a student in a subject of their current year
    ///
    /// # Errors
    /// `ExpectedText`, `StudentNotFound`, `ProgramNotFound` when the
    /// student's program is not in the database, `SubjectUnavailable`,
    /// `AlreadyEnrolledInSubject`
    pub fn enroll_in(&mut self, faculty_number: u32, subject: &str) -> Result<Confirmation> {
        let subject_name = require_text(subject)?;
        let student = self.students.get_mut_or_err(&faculty_number)?;
        let program = self.programs.find(student.program())?;

        let subject = program
            .find_subject(student.year(), subject_name)
            .ok_or_else(|| RegistryError::SubjectUnavailable {
                subject: subject_name.to_string(),
            })?;
        if student.grades().contains_key(subject) {
            return Err(RegistryError::AlreadyEnrolledInSubject {
                subject: subject.name().to_string(),
            });
        }

        student.enroll_in(subject.clone());
        info!(
            "Enrolled student {faculty_number} in subject {}",
            subject.name()
        );
        Ok(Confirmation::SubjectEnrolled {
            faculty_number,
            subject: subject_name.to_string(),
        })
    }

    /// Record a grade, replacing any previous one
    ///
    /// # Errors
    /// `ExpectedText`, `ExpectedNumber`, `GradeOutOfRange`, `StudentNotFound`,
    /// `StudentDropped`, `SubjectNotEnrolled`
    pub fn add_grade(&mut self, faculty_number: u32, subject: &str, grade: f64) -> Result<Confirmation> {
        let subject_name = require_text(subject)?;
        let student = self.students.get_mut_or_err(&faculty_number)?;
        ensure_active(student)?;
        let grade = Grade::new(grade)?;

        let subject = student
            .entry_for(subject_name)
            .map(|(subject, _)| subject.clone())
            .ok_or_else(|| RegistryError::SubjectNotEnrolled {
                subject: subject_name.to_string(),
            })?;

        student.put_grade(subject, Some(grade));
        info!("Recorded grade {grade} in {subject_name} for student {faculty_number}");
        Ok(Confirmation::GradeAdded {
            faculty_number,
            subject: subject_name.to_string(),
            grade,
        })
    }
}

fn ensure_active(student: &Student) -> Result<()> {
    if student.status() == StudentStatus::Dropped {
        return Err(RegistryError::StudentDropped(student.faculty_number()));
    }
    Ok(())
}

fn ensure_transition(student: &Student, next: StudentStatus) -> Result<()> {
    if student.status().can_become(next) {
        Ok(())
    } else {
        Err(RegistryError::InvalidTransition {
            faculty_number: student.faculty_number(),
            from: student.status().to_string(),
            to: next.to_string(),
        })
    }
}

/// Shared by `advance` and `change year`; the caller has already checked the status
fn advance_year(student: &mut Student) -> Result<Confirmation> {
    let next = u32::from(student.year()) + 1;
    if next > u32::from(LAST_COURSE) {
        return Err(RegistryError::YearOutOfRange(next));
    }

    let failed = student.failed_mandatory_count();
    if failed > ALLOWED_FAILED_MANDATORY {
        return Err(RegistryError::InsufficientExamsForYearTransfer {
            failed,
            allowed: ALLOWED_FAILED_MANDATORY,
        });
    }

    student.set_year(next)?;
    info!("Student {} advanced to year {next}", student.faculty_number());
    Ok(Confirmation::YearChanged(student.faculty_number()))
}
