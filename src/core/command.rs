//! Operator command names and their arities

use crate::core::error::{RegistryError, Result};
use std::fmt;
use std::str::FromStr;

/// A command the session understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Open a records file
    Open,
    /// Close the open records file
    Close,
    /// Save to the open records file
    Save,
    /// Save to another path
    SaveAs,
    /// Show the command reference
    Help,
    /// Leave the shell
    Exit,
    /// Enroll a new student
    Enroll,
    /// Move a student up one year
    Advance,
    /// Change program, group or year
    Change,
    /// Graduate a student
    Graduate,
    /// Interrupt a student's education
    Interrupt,
    /// Resume a student's education
    Resume,
    /// Enroll a student in a subject
    EnrollIn,
    /// Record a grade
    AddGrade,
    /// Print one student
    Print,
    /// Print the students of a program and year
    PrintAll,
    /// Students enrolled in a subject
    Protocol,
    /// Grades report of a student
    Report,
}

impl CommandKind {
    /// Every command, in help order
    pub const ALL: [Self; 18] = [
        Self::Open,
        Self::Close,
        Self::Save,
        Self::SaveAs,
        Self::Help,
        Self::Exit,
        Self::Enroll,
        Self::Advance,
        Self::Change,
        Self::Graduate,
        Self::Interrupt,
        Self::Resume,
        Self::EnrollIn,
        Self::AddGrade,
        Self::Print,
        Self::PrintAll,
        Self::Protocol,
        Self::Report,
    ];

    /// Name typed by the operator
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Close => "close",
            Self::Save => "save",
            Self::SaveAs => "saveas",
            Self::Help => "help",
            Self::Exit => "exit",
            Self::Enroll => "enroll",
            Self::Advance => "advance",
            Self::Change => "change",
            Self::Graduate => "graduate",
            Self::Interrupt => "interrupt",
            Self::Resume => "resume",
            Self::EnrollIn => "enrollin",
            Self::AddGrade => "addgrade",
            Self::Print => "print",
            Self::PrintAll => "printall",
            Self::Protocol => "protocol",
            Self::Report => "report",
        }
    }

    /// Number of tokens, including the command name
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::Close | Self::Save | Self::Help | Self::Exit => 1,
            Self::Open
            | Self::SaveAs
            | Self::Advance
            | Self::Graduate
            | Self::Interrupt
            | Self::Resume
            | Self::Print
            | Self::Protocol
            | Self::Report => 2,
            Self::EnrollIn | Self::PrintAll => 3,
            Self::Change | Self::AddGrade => 4,
            Self::Enroll => 5,
        }
    }

    /// Whether the command needs an open records file
    #[must_use]
    pub const fn requires_open_file(self) -> bool {
        !matches!(self, Self::Open | Self::Help | Self::Exit)
    }

    /// Whether the command changes student records
    #[must_use]
    pub const fn mutates(self) -> bool {
        matches!(
            self,
            Self::Enroll
                | Self::Advance
                | Self::Change
                | Self::Graduate
                | Self::Interrupt
                | Self::Resume
                | Self::EnrollIn
                | Self::AddGrade
        )
    }

    /// Check the token count
    ///
    /// # Errors
    /// Returns `WrongArgumentCount`
    pub fn check_arity(self, actual: usize) -> Result<()> {
        if actual == self.arity() {
            Ok(())
        } else {
            Err(RegistryError::WrongArgumentCount {
                expected: self.arity(),
                actual,
            })
        }
    }
}

impl FromStr for CommandKind {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| RegistryError::UnknownCommand(s.to_string()))
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("ENROLLIN".parse::<CommandKind>().unwrap(), CommandKind::EnrollIn);
        assert_eq!("SaveAs".parse::<CommandKind>().unwrap(), CommandKind::SaveAs);
        let err = "dance".parse::<CommandKind>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown command name.");
    }

    #[test]
    fn test_arities() {
        let expected = [
            ("open", 2),
            ("close", 1),
            ("save", 1),
            ("saveas", 2),
            ("help", 1),
            ("exit", 1),
            ("enroll", 5),
            ("advance", 2),
            ("change", 4),
            ("graduate", 2),
            ("interrupt", 2),
            ("resume", 2),
            ("enrollin", 3),
            ("addgrade", 4),
            ("print", 2),
            ("printall", 3),
            ("protocol", 2),
            ("report", 2),
        ];
        for (name, arity) in expected {
            assert_eq!(name.parse::<CommandKind>().unwrap().arity(), arity, "{name}");
        }
    }

    #[test]
    fn test_check_arity() {
        assert!(CommandKind::Enroll.check_arity(5).is_ok());
        let err = CommandKind::Enroll.check_arity(4).unwrap_err();
        assert_eq!(err.to_string(), "Invalid number of arguments.");
    }

    #[test]
    fn test_open_file_requirement() {
        assert!(!CommandKind::Open.requires_open_file());
        assert!(!CommandKind::Help.requires_open_file());
        assert!(!CommandKind::Exit.requires_open_file());
        assert!(CommandKind::Report.requires_open_file());
        assert!(CommandKind::Close.requires_open_file());
    }
}
