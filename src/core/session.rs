//! Operator session: tracks the open records file and dispatches commands
//!
//! A session tokenizes a command line, checks the command name and arity,
//! then routes it to the rules engine, the reporter or the file layer. Errors
//! are returned to the caller, which prints them and keeps accepting commands.

use crate::core::codec::{ProgramCodec, StudentCodec};
use crate::core::command::CommandKind;
use crate::core::error::{RegistryError, Result};
use crate::core::report::StudentReporter;
use crate::core::rules::Registrar;
use crate::core::store::{LoadReport, RecordFile};
use crate::core::tokens::{parse_decimal, parse_int, tokenize};
use crate::{debug, warn};
use std::fmt::Write;
use std::path::{Path, PathBuf};

/// Command reference printed by `help`
pub const HELP_TEXT: &str = include_str!("../assets/help.txt");
/// Printed when the shell starts
pub const GREETING: &str = "WELCOME to my Student program!";
/// Shell prompt
pub const PROMPT: &str = "Enter command: ";
/// Printed when the shell stops
pub const EXIT_MESSAGE: &str = "Exiting...";

/// Result of a successfully executed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Text to show the operator
    Message(String),
    /// The operator asked to leave
    Exit,
}

impl Outcome {
    /// Text to show, if any
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Message(text) => Some(text),
            Self::Exit => None,
        }
    }
}

/// One operator session over a records file and the program database
#[derive(Debug)]
pub struct Session {
    registrar: Registrar,
    programs_file: PathBuf,
    open_file: Option<PathBuf>,
    skipped_lines: Vec<usize>,
    students_io: RecordFile<StudentCodec>,
    programs_io: RecordFile<ProgramCodec>,
}

impl Session {
    /// Create a session that loads programs from `programs_file` on every `open`
    pub fn new(programs_file: impl Into<PathBuf>) -> Self {
        Self {
            registrar: Registrar::default(),
            programs_file: programs_file.into(),
            open_file: None,
            skipped_lines: Vec::new(),
            students_io: RecordFile::new(StudentCodec),
            programs_io: RecordFile::new(ProgramCodec),
        }
    }

    /// The rules engine and its stores
    #[must_use]
    pub const fn registrar(&self) -> &Registrar {
        &self.registrar
    }

    /// Path of the open records file
    #[must_use]
    pub fn open_file(&self) -> Option<&Path> {
        self.open_file.as_deref()
    }

    /// Lines of the open records file that were skipped when it was loaded
    #[must_use]
    pub fn skipped_lines(&self) -> &[usize] {
        &self.skipped_lines
    }

    /// Fail when the open records file had skipped lines that a save would drop
    ///
    /// # Errors
    /// `FileNotLoaded`, `SkippedLinesNotSaved`
    pub fn ensure_nothing_skipped(&self) -> Result<()> {
        let path = self.open_file.as_deref().ok_or(RegistryError::FileNotLoaded)?;
        if self.skipped_lines.is_empty() {
            return Ok(());
        }
        Err(RegistryError::SkippedLinesNotSaved {
            file: display_name(path),
            lines: self.skipped_lines.clone(),
        })
    }

    /// Tokenize and execute one command line
    ///
    /// # Errors
    /// Returns the command's error; the session stays usable
    pub fn execute_line(&mut self, line: &str) -> Result<Outcome> {
        self.execute(&tokenize(line))
    }

    /// Execute an already tokenized command; token 0 is the command name
    ///
    /// # Errors
    /// `UnknownCommand`, `WrongArgumentCount`, `FileNotLoaded`, or the error of
    /// the command itself
    pub fn execute<S: AsRef<str>>(&mut self, tokens: &[S]) -> Result<Outcome> {
        let args: Vec<&str> = tokens.iter().map(AsRef::as_ref).collect();
        let result = self.dispatch(&args);
        if let Err(e) = &result {
            debug!("Rejected command {args:?}: {e}");
        }
        result
    }

    fn dispatch(&mut self, args: &[&str]) -> Result<Outcome> {
        let name = args.first().copied().unwrap_or_default();
        let kind: CommandKind = name.parse()?;
        kind.check_arity(args.len())?;
        if kind.requires_open_file() && self.open_file.is_none() {
            return Err(RegistryError::FileNotLoaded);
        }

        let text = match kind {
            CommandKind::Exit => return Ok(Outcome::Exit),
            CommandKind::Help => HELP_TEXT.trim_end().to_string(),
            CommandKind::Open => self.open(Path::new(args[1]))?,
            CommandKind::Close => self.close()?,
            CommandKind::Save => self.save()?,
            CommandKind::SaveAs => self.save_as(Path::new(args[1]))?,
            CommandKind::Print => self.reporter().print(parse_int(args[1])?)?,
            CommandKind::PrintAll => self.reporter().print_all(args[1], parse_int(args[2])?)?,
            CommandKind::Protocol => self.reporter().protocol(args[1])?,
            CommandKind::Report => self.reporter().report(parse_int(args[1])?)?,
            CommandKind::Enroll => {
                let faculty_number = parse_int(args[1])?;
                let group = parse_int(args[3])?;
                self.registrar
                    .enroll(faculty_number, args[2], group, args[4])?
                    .to_string()
            }
            CommandKind::Advance => self.registrar.advance(parse_int(args[1])?)?.to_string(),
            CommandKind::Change => self
                .registrar
                .change(parse_int(args[1])?, args[2], args[3])?
                .to_string(),
            CommandKind::Graduate => self.registrar.graduate(parse_int(args[1])?)?.to_string(),
            CommandKind::Interrupt => self.registrar.interrupt(parse_int(args[1])?)?.to_string(),
            CommandKind::Resume => self.registrar.resume(parse_int(args[1])?)?.to_string(),
            CommandKind::EnrollIn => self
                .registrar
                .enroll_in(parse_int(args[1])?, args[2])?
                .to_string(),
            CommandKind::AddGrade => {
                let faculty_number = parse_int(args[1])?;
                let grade = parse_decimal(args[3])?;
                self.registrar
                    .add_grade(faculty_number, args[2], grade)?
                    .to_string()
            }
        };

        Ok(Outcome::Message(text))
    }

    fn reporter(&self) -> StudentReporter<'_> {
        StudentReporter::new(self.registrar.students())
    }

    /// Load the program database and the records file at `path`
    ///
    /// Skipped lines are listed after the confirmation. If either file cannot
    /// be opened nothing stays loaded.
    ///
    /// # Errors
    /// `AlreadyOpen`, `MissingDirectory`, `Io`
    pub fn open(&mut self, path: &Path) -> Result<String> {
        if let Some(current) = &self.open_file {
            return Err(RegistryError::AlreadyOpen(display_name(current)));
        }

        let loaded = self
            .programs_io
            .open(&self.programs_file, self.registrar.programs_mut())
            .and_then(|programs| {
                self.students_io
                    .open(path, self.registrar.students_mut())
                    .map(|students| (programs, students))
            });
        let (programs, students) = match loaded {
            Ok(reports) => reports,
            Err(e) => {
                self.registrar.clear();
                return Err(e);
            }
        };

        for student in self.registrar.students().all() {
            if self.registrar.programs().find(student.program()).is_err() {
                warn!(
                    "Student {} belongs to unknown program {}",
                    student.faculty_number(),
                    student.program()
                );
            }
        }

        self.open_file = Some(path.to_path_buf());
        self.skipped_lines = students.failures.iter().map(|f| f.line).collect();

        let mut text = format!("Successfully opened {}", display_name(path));
        append_failures(&mut text, "program database", &programs);
        append_failures(&mut text, &display_name(path), &students);
        Ok(text)
    }

    /// Forget the open file and clear both stores
    ///
    /// # Errors
    /// `FileNotLoaded`
    pub fn close(&mut self) -> Result<String> {
        let path = self.open_file.take().ok_or(RegistryError::FileNotLoaded)?;
        self.skipped_lines.clear();
        self.registrar.clear();
        Ok(format!("Successfully closed {}", display_name(&path)))
    }

    /// Rewrite the open file with the current student records
    ///
    /// # Errors
    /// `FileNotLoaded`, `Io`
    pub fn save(&mut self) -> Result<String> {
        let path = self.open_file.clone().ok_or(RegistryError::FileNotLoaded)?;
        self.students_io.save(&path, self.registrar.students())?;
        Ok(format!("Successfully saved {}", display_name(&path)))
    }

    /// Write the current student records to `path`; the open file is unchanged
    ///
    /// # Errors
    /// `FileNotLoaded`, `MissingDirectory`, `Io`
    pub fn save_as(&mut self, path: &Path) -> Result<String> {
        if self.open_file.is_none() {
            return Err(RegistryError::FileNotLoaded);
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                return Err(RegistryError::MissingDirectory(parent.to_path_buf()));
            }
        }
        self.students_io.save(path, self.registrar.students())?;
        Ok(format!("Successfully saved {}", display_name(path)))
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

fn append_failures(text: &mut String, source: &str, report: &LoadReport) {
    for failure in &report.failures {
        let _ = write!(text, "\nWarning: skipped {source} {failure}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;
    use std::fs;
    use tempfile::TempDir;

    const PROGRAMS: &str = "CS: 1 -> Algorithms - mandatory | Drawing - optional; 2 -> Databases - mandatory\n";

    fn session(dir: &TempDir) -> Session {
        let programs = dir.path().join("programs.txt");
        fs::write(&programs, PROGRAMS).unwrap();
        Session::new(programs)
    }

    fn run(session: &mut Session, line: &str) -> String {
        match session.execute_line(line).unwrap() {
            Outcome::Message(text) => text,
            Outcome::Exit => String::from("<exit>"),
        }
    }

    #[test]
    fn test_commands_need_open_file() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);

        let err = session.execute_line("print 1").unwrap_err();
        assert_eq!(err.to_string(), "File not opened.");
        assert!(session.execute_line("help").is_ok());
        assert_eq!(session.execute_line("EXIT").unwrap(), Outcome::Exit);
    }

    #[test]
    fn test_unknown_command_and_arity() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);

        let err = session.execute_line("fly away").unwrap_err();
        assert_eq!(err.to_string(), "Unknown command name.");
        let err = session.execute_line("help me").unwrap_err();
        assert_eq!(err.to_string(), "Invalid number of arguments.");
        assert!(session.execute_line("").is_err());
    }

    #[test]
    fn test_open_creates_missing_file_and_loads_programs() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);
        let records = dir.path().join("students.txt");

        let text = run(&mut session, &format!("open {}", records.display()));
        assert_eq!(text, "Successfully opened students.txt");
        assert!(records.exists());
        assert_eq!(session.registrar().programs().len(), 1);

        let err = session
            .execute_line(&format!("open {}", records.display()))
            .unwrap_err();
        assert_eq!(err.to_string(), "students.txt is already opened.");
    }

    #[test]
    fn test_open_reports_skipped_lines() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);
        let records = dir.path().join("students.txt");
        fs::write(
            &records,
            "Name: Jane | Faculty number: 1 | Program: CS | Year: 1 | Group: 1 | Status: ENROLLED\nnot a record\n",
        )
        .unwrap();

        let text = run(&mut session, &format!("open {}", records.display()));
        assert!(text.starts_with("Successfully opened students.txt\n"));
        assert!(text.contains("skipped students.txt line 2"));
        assert_eq!(session.registrar().students().len(), 1);
        assert_eq!(session.skipped_lines(), &[2]);

        let err = session.ensure_nothing_skipped().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);

        run(&mut session, "close");
        assert!(session.skipped_lines().is_empty());
    }

    #[test]
    fn test_open_with_missing_directory_loads_nothing() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);
        let records = dir.path().join("missing").join("students.txt");

        let err = session
            .execute_line(&format!("open {}", records.display()))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(session.open_file().is_none());
        assert!(session.registrar().programs().is_empty());
    }

    #[test]
    fn test_full_session_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);
        let records = dir.path().join("students.txt");

        run(&mut session, &format!("open {}", records.display()));
        assert_eq!(
            run(&mut session, "enroll 12345 CS 3 \"Jane Doe\""),
            "Successfully enrolled student Jane Doe with faculty number 12345 in group 3 of program CS."
        );
        assert_eq!(
            run(&mut session, "report 12345"),
            "Student 12345 has no grades yet."
        );
        run(&mut session, "enrollin 12345 Algorithms");
        run(&mut session, "addgrade 12345 Algorithms 5,50");
        assert_eq!(
            run(&mut session, "graduate 12345"),
            "Successfully changed student 12345 status."
        );
        assert_eq!(run(&mut session, "save"), "Successfully saved students.txt");
        assert_eq!(run(&mut session, "close"), "Successfully closed students.txt");
        assert!(session.registrar().students().is_empty());

        let saved = fs::read_to_string(&records).unwrap();
        assert_eq!(
            saved,
            "Name: Jane Doe | Faculty number: 12345 | Program: CS | Year: 1 | Group: 3 | Status: GRADUATED | Grades: Algorithms -> mandatory -> 5.50\n"
        );
    }

    #[test]
    fn test_grade_behaves_the_same_after_reload() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);
        let records = dir.path().join("students.txt");

        run(&mut session, &format!("open {}", records.display()));
        run(&mut session, "enroll 3 CS 1 Ana");
        run(&mut session, "enrollin 3 Algorithms");
        run(&mut session, "addgrade 3 Algorithms 2.999");
        let before = session.registrar().students().get(&3).unwrap().clone();
        run(&mut session, "save");
        run(&mut session, "close");

        run(&mut session, &format!("open {}", records.display()));
        assert_eq!(session.registrar().students().get(&3), Some(&before));
        assert_eq!(
            run(&mut session, "graduate 3"),
            "Successfully changed student 3 status."
        );
    }

    #[test]
    fn test_separator_in_name_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);
        let records = dir.path().join("students.txt");
        run(&mut session, &format!("open {}", records.display()));

        for name in ["\"Jane | Doe\"", "\"Jane; Doe\""] {
            let err = session
                .execute_line(&format!("enroll 4 CS 1 {name}"))
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }
        assert!(session.registrar().students().is_empty());
    }

    #[test]
    fn test_argument_type_errors() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);
        run(
            &mut session,
            &format!("open {}", dir.path().join("s.txt").display()),
        );

        let err = session.execute_line("print abc").unwrap_err();
        assert_eq!(err.to_string(), "The value \"abc\" must be a number.");
        let err = session.execute_line("enroll 1 CS 3 42").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentType);
        let err = session.execute_line("addgrade 1 Algorithms high").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentType);
    }

    #[test]
    fn test_save_as_keeps_open_file() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);
        let records = dir.path().join("students.txt");
        let copy = dir.path().join("copy.txt");

        run(&mut session, &format!("open {}", records.display()));
        run(&mut session, "enroll 7 CS 1 Ivan");
        assert_eq!(
            run(&mut session, &format!("saveas {}", copy.display())),
            "Successfully saved copy.txt"
        );
        assert_eq!(session.open_file(), Some(records.as_path()));
        assert!(fs::read_to_string(&copy).unwrap().contains("Faculty number: 7"));
        assert_eq!(fs::read_to_string(&records).unwrap(), "");
    }
}
