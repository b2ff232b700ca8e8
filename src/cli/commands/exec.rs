//! One-shot command handler

use registrar::config::Config;
use registrar::core::command::CommandKind;
use registrar::{verbose, Outcome, Result, Session};
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

/// Open `file`, run `tokens` as one command and save if it changed a student
pub fn run(file: &Path, tokens: &[String], config: &Config) -> ExitCode {
    let mut session = Session::new(&config.paths.programs_file);
    let mut stderr = io::stderr();
    match execute(&mut session, file, tokens, &mut stderr) {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Output lines of a one-shot run: the command's text, then the save confirmation.
///
/// Load warnings are always written to `warnings`. A command that changes a
/// student is refused when the records file had skipped lines.
fn execute(
    session: &mut Session,
    file: &Path,
    tokens: &[String],
    warnings: &mut impl Write,
) -> Result<Vec<String>> {
    let kind: CommandKind = tokens.first().map_or("", String::as_str).parse()?;

    let opened = session.open(file)?;
    let mut opened_lines = opened.lines();
    if let Some(confirmation) = opened_lines.next() {
        verbose!("{confirmation}");
    }
    for warning in opened_lines {
        let _ = writeln!(warnings, "{warning}");
    }

    if kind.mutates() {
        session.ensure_nothing_skipped()?;
    }

    let mut lines = Vec::new();
    if let Outcome::Message(text) = session.execute(tokens)? {
        lines.push(text);
    }
    if kind.mutates() {
        lines.push(session.save()?);
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use registrar::RegistryError;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Session) {
        let dir = TempDir::new().unwrap();
        let programs = dir.path().join("programs.txt");
        fs::write(&programs, "CS: 1 -> Algorithms - mandatory\n").unwrap();
        let session = Session::new(programs);
        (dir, session)
    }

    fn tokens(line: &[&str]) -> Vec<String> {
        line.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_mutating_command_is_saved() {
        let (dir, mut session) = setup();
        let records = dir.path().join("students.txt");

        let lines = execute(
            &mut session,
            &records,
            &tokens(&["enroll", "5", "CS", "2", "Ana Ivanova"]),
            &mut io::sink(),
        )
        .unwrap();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "Successfully saved students.txt");
        let saved = fs::read_to_string(&records).unwrap();
        assert!(saved.starts_with("Name: Ana Ivanova | Faculty number: 5"));
    }

    #[test]
    fn test_read_only_command_is_not_saved() {
        let (dir, mut session) = setup();
        let records = dir.path().join("students.txt");
        fs::write(
            &records,
            "Name: Ana | Faculty number: 5 | Program: CS | Year: 1 | Group: 2 | Status: ENROLLED\n",
        )
        .unwrap();

        let lines = execute(
            &mut session,
            &records,
            &tokens(&["print", "5"]),
            &mut io::sink(),
        )
        .unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("Name: Ana | Faculty number: 5"));
    }

    #[test]
    fn test_unknown_command_fails_before_open() {
        let (dir, mut session) = setup();
        let records = dir.path().join("students.txt");

        let err = execute(&mut session, &records, &tokens(&["dance"]), &mut io::sink())
            .unwrap_err();
        assert_eq!(err.to_string(), "Unknown command name.");
        assert!(!records.exists());
    }

    const ANA: &str =
        "Name: Ana | Faculty number: 5 | Program: CS | Year: 1 | Group: 2 | Status: ENROLLED";

    #[test]
    fn test_mutating_command_refused_after_skipped_lines() {
        let (dir, mut session) = setup();
        let records = dir.path().join("students.txt");
        let content = format!("{ANA}\nthis line is damaged\n");
        fs::write(&records, &content).unwrap();

        let mut warnings = Vec::new();
        let err = execute(
            &mut session,
            &records,
            &tokens(&["enroll", "6", "CS", "1", "Ivan"]),
            &mut warnings,
        )
        .unwrap_err();

        assert!(matches!(
            &err,
            RegistryError::SkippedLinesNotSaved { lines, .. } if lines == &[2]
        ));
        assert!(err.to_string().starts_with("Not saving students.txt: line(s) 2"));
        let warnings = String::from_utf8(warnings).unwrap();
        assert!(warnings.starts_with("Warning: skipped students.txt line 2"));
        assert_eq!(fs::read_to_string(&records).unwrap(), content);
        assert!(session.registrar().students().get(&6).is_none());
    }

    #[test]
    fn test_read_only_command_still_runs_after_skipped_lines() {
        let (dir, mut session) = setup();
        let records = dir.path().join("students.txt");
        fs::write(&records, format!("garbage\n{ANA}\n")).unwrap();

        let mut warnings = Vec::new();
        let lines = execute(
            &mut session,
            &records,
            &tokens(&["print", "5"]),
            &mut warnings,
        )
        .unwrap();

        assert_eq!(lines.len(), 1);
        assert!(String::from_utf8(warnings)
            .unwrap()
            .contains("skipped students.txt line 1"));
    }
}
