//! Error taxonomy for the registrar.
//!
//! Every variant carries the values that caused it; the operator-facing text is
//! produced by `Display` at the dispatch boundary.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Broad category of a [`RegistryError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An entity field failed a range, non-empty or enum check
    Validation,
    /// A persisted line did not split into the required fields
    Format,
    /// A lookup by faculty number, program or subject found nothing
    NotFound,
    /// The operation is forbidden by the student's status or academic policy
    StateConflict,
    /// A token was numeric where text was expected, or the other way around
    ArgumentType,
    /// Reading or writing a records file failed
    Io,
    /// The command line itself was not acceptable
    Command,
    /// A report template failed to render
    Render,
}

/// Which kind of persisted record a format error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// A student line
    Student,
    /// A program line
    Program,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Student => write!(f, "student"),
            Self::Program => write!(f, "program"),
        }
    }
}

/// The error type shared by the codec, store, rules engine and session
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A required text field was empty
    #[error("{entity} {field} can not be empty.")]
    EmptyField {
        /// Entity owning the field (e.g. "Student")
        entity: &'static str,
        /// Field name (e.g. "name")
        field: &'static str,
    },

    /// A numeric field that must be positive was zero
    #[error("Student {field} must be a positive number.")]
    NotPositive {
        /// Field name (e.g. "group")
        field: &'static str,
    },

    /// Student year outside [1, 4]
    #[error("Student year must be between 1 and 4, got {0}.")]
    YearOutOfRange(u32),

    /// Program course number outside [1, 4]
    #[error("Program course must be between 1 and 4, got {0}.")]
    CourseOutOfRange(u32),

    /// A program course was declared without subjects
    #[error("Subjects collection in course {0} of a program can not be empty.")]
    EmptyCourse(u8),

    /// A name contains a character that delimits persisted fields
    #[error("{entity} {field} can not contain {character:?}.")]
    ReservedCharacter {
        /// Entity owning the field (e.g. "Student")
        entity: &'static str,
        /// Field name (e.g. "name")
        field: &'static str,
        /// Offending character
        character: char,
    },

    /// A program line lists the same course twice
    #[error("Course {0} is listed more than once in the program.")]
    DuplicateCourse(u8),

    /// Unknown student status text
    #[error("Student status must be \"enrolled\", \"dropped\" or \"graduated\", got \"{0}\".")]
    InvalidStatus(String),

    /// Unknown subject kind text
    #[error("Subject type must be \"optional\" or \"mandatory\", got \"{0}\".")]
    InvalidSubjectKind(String),

    /// Grade outside [2.00, 6.00]
    #[error("Grade value must be between 2.00 and 6.00, got {0:.2}.")]
    GradeOutOfRange(f64),

    /// A year change other than exactly one year forward
    #[error("The student can not skip years (current year {current}, requested {requested}).")]
    YearSkip {
        /// Year the student is in
        current: u8,
        /// Year that was requested
        requested: u32,
    },

    /// A persisted line is missing mandatory fields
    #[error("Invalid {record} data format: \"{line}\".")]
    MalformedRecord {
        /// Record type being decoded
        record: RecordKind,
        /// Offending text
        line: String,
    },

    /// A persisted line is not valid UTF-8
    #[error("The line is not valid UTF-8 text.")]
    InvalidEncoding,

    /// No student with this faculty number
    #[error("The student is not part of the database!")]
    StudentNotFound {
        /// Faculty number that was looked up
        faculty_number: u32,
    },

    /// No program with this name
    #[error("The program \"{name}\" is not part of the database.")]
    ProgramNotFound {
        /// Program name that was looked up
        name: String,
    },

    /// The subject is not offered in the student's current year of their program
    #[error("The subject \"{subject}\" is part of another year of study or is not part of the student's program!")]
    SubjectUnavailable {
        /// Subject name requested
        subject: String,
    },

    /// The student has no grade entry for the subject
    #[error("The student is not enrolled in subject \"{subject}\".")]
    SubjectNotEnrolled {
        /// Subject name requested
        subject: String,
    },

    /// Faculty number already taken
    #[error("The student with faculty number {0} already exists in the database.")]
    StudentExists(u32),

    /// Program name already loaded
    #[error("The program \"{0}\" already exists in the database.")]
    ProgramExists(String),

    /// Subject already has a grade entry
    #[error("The student is already enrolled in subject \"{subject}\".")]
    AlreadyEnrolledInSubject {
        /// Subject name requested
        subject: String,
    },

    /// The student has interrupted education
    #[error("Student {0} has interrupted education.")]
    StudentDropped(u32),

    /// A status change that the lifecycle does not allow
    #[error("Student {faculty_number} can not move from {from} to {to}.")]
    InvalidTransition {
        /// Faculty number of the student
        faculty_number: u32,
        /// Current status
        from: String,
        /// Requested status
        to: String,
    },

    /// Graduation requested without every exam passed
    #[error("The student must pass all the exams from his/her program.")]
    InsufficientExamsForGraduation,

    /// Program transfer requested with past mandatory exams not passed
    #[error("The student has to take all mandatory past exams from the new program in order to be enrolled in it (missing: {}).", .missing.join(", "))]
    InsufficientExamsForProgramTransfer {
        /// Mandatory subjects of the new program without a passing grade
        missing: Vec<String>,
    },

    /// Year transfer requested with too many failed mandatory exams
    #[error("The student failed {failed} mandatory exams (at most {allowed} allowed) so he/she cannot advance to next year.")]
    InsufficientExamsForYearTransfer {
        /// Number of mandatory subjects not passed
        failed: usize,
        /// Tolerated number of failures
        allowed: usize,
    },

    /// A token that must be numeric was not
    #[error("The value \"{0}\" must be a number.")]
    ExpectedNumber(String),

    /// A token that must be text looked numeric
    #[error("The value \"{0}\" can not be a number.")]
    ExpectedText(String),

    /// `change` option other than program, group or year
    #[error("Wrong parameter \"{0}\", expected program, group or year.")]
    UnknownOption(String),

    /// Unknown command name
    #[error("Unknown command name.")]
    UnknownCommand(String),

    /// Command given with the wrong number of tokens
    #[error("Invalid number of arguments.")]
    WrongArgumentCount {
        /// Tokens required, including the command name
        expected: usize,
        /// Tokens received
        actual: usize,
    },

    /// A command needing an open records file was issued without one
    #[error("File not opened.")]
    FileNotLoaded,

    /// `open` while another records file is open
    #[error("{0} is already opened.")]
    AlreadyOpen(String),

    /// Saving would drop lines that were skipped when the file was opened
    #[error("Not saving {file}: line(s) {} could not be loaded and would be lost.", join_numbers(.lines))]
    SkippedLinesNotSaved {
        /// File name of the open records file
        file: String,
        /// 1-based numbers of the skipped lines
        lines: Vec<usize>,
    },

    /// The directory that should hold a records file does not exist
    #[error("Invalid path: {}", .0.display())]
    MissingDirectory(PathBuf),

    /// Reading or writing a records file failed
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// File being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Report template rendering failed
    #[error("Failed to render report: {0}")]
    Render(#[from] askama::Error),
}

impl RegistryError {
    /// Category of this error
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyField { .. }
            | Self::NotPositive { .. }
            | Self::YearOutOfRange(_)
            | Self::CourseOutOfRange(_)
            | Self::EmptyCourse(_)
            | Self::ReservedCharacter { .. }
            | Self::DuplicateCourse(_)
            | Self::InvalidStatus(_)
            | Self::InvalidSubjectKind(_)
            | Self::GradeOutOfRange(_)
            | Self::YearSkip { .. } => ErrorKind::Validation,
            Self::MalformedRecord { .. } | Self::InvalidEncoding => ErrorKind::Format,
            Self::StudentNotFound { .. }
            | Self::ProgramNotFound { .. }
            | Self::SubjectUnavailable { .. }
            | Self::SubjectNotEnrolled { .. } => ErrorKind::NotFound,
            Self::StudentExists(_)
            | Self::ProgramExists(_)
            | Self::AlreadyEnrolledInSubject { .. }
            | Self::StudentDropped(_)
            | Self::InvalidTransition { .. }
            | Self::InsufficientExamsForGraduation
            | Self::InsufficientExamsForProgramTransfer { .. }
            | Self::InsufficientExamsForYearTransfer { .. } => ErrorKind::StateConflict,
            Self::ExpectedNumber(_) | Self::ExpectedText(_) | Self::UnknownOption(_) => {
                ErrorKind::ArgumentType
            }
            Self::UnknownCommand(_)
            | Self::WrongArgumentCount { .. }
            | Self::FileNotLoaded
            | Self::AlreadyOpen(_) => ErrorKind::Command,
            Self::SkippedLinesNotSaved { .. } | Self::MissingDirectory(_) | Self::Io { .. } => {
                ErrorKind::Io
            }
            Self::Render(_) => ErrorKind::Render,
        }
    }

    /// Wrap an I/O error with the path it happened on
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

fn join_numbers(numbers: &[usize]) -> String {
    numbers
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Convenience `Result` alias over [`RegistryError`]
pub type Result<T> = std::result::Result<T, RegistryError>;
