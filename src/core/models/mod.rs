//! Data models for `registrar`

pub mod grade;
pub mod program;
pub mod student;
pub mod subject;

pub use grade::Grade;
pub use program::Program;
pub use student::{GradeEntry, Student, StudentStatus};
pub use subject::{Subject, SubjectKind};
