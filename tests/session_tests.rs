//! Integration tests for command sessions over records files

use registrar::core::report::{NO_STUDENTS_MESSAGE, PROTOCOL_BY_PROGRAM_HEADER};
use registrar::{Outcome, Session};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const PROGRAMS: &str = "\
Software Engineering: 1 -> Data Structures - mandatory | Physics - optional; 2 -> Compilers - mandatory
Statistics: 1 -> Probability - mandatory
";

fn open_session(dir: &TempDir, records: &Path) -> Session {
    let programs = dir.path().join("programs.txt");
    fs::write(&programs, PROGRAMS).unwrap();
    let mut session = Session::new(programs);
    session
        .execute_line(&format!("open {}", records.display()))
        .unwrap();
    session
}

fn run(session: &mut Session, line: &str) -> String {
    match session.execute_line(line) {
        Ok(Outcome::Message(text)) => text,
        Ok(Outcome::Exit) => String::from("<exit>"),
        Err(e) => panic!("`{line}` failed: {e}"),
    }
}

#[test]
fn test_records_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let records = dir.path().join("students.txt");

    let mut session = open_session(&dir, &records);
    run(&mut session, "enroll 1 \"Software Engineering\" 2 \"Ana Petrova\"");
    run(&mut session, "enroll 2 statistics 1 Boris");
    run(&mut session, "enrollin 1 \"data structures\"");
    run(&mut session, "addgrade 1 \"Data Structures\" 4.25");
    run(&mut session, "enrollin 1 Physics");
    run(&mut session, "interrupt 2");
    run(&mut session, "save");
    run(&mut session, "close");

    let mut session = open_session(&dir, &records);
    assert_eq!(session.registrar().students().len(), 2);
    assert_eq!(
        run(&mut session, "print 1"),
        "Name: Ana Petrova | Faculty number: 1 | Program: Software Engineering | Year: 1 | Group: 2 | Status: ENROLLED | Grades: Data Structures -> mandatory -> 4.25; Physics -> optional -> ungraded"
    );
    assert_eq!(
        run(&mut session, "print 2"),
        "Name: Boris | Faculty number: 2 | Program: Statistics | Year: 1 | Group: 1 | Status: DROPPED"
    );

    let report = run(&mut session, "report 1");
    assert!(report.contains("Data Structures - 4.25"));
    assert!(report.contains("Pending exams:\nPhysics"));
}

#[test]
fn test_read_only_commands() {
    let dir = TempDir::new().unwrap();
    let records = dir.path().join("students.txt");
    let mut session = open_session(&dir, &records);

    run(&mut session, "enroll 30 Statistics 1 Vera");
    run(&mut session, "enroll 20 \"Software Engineering\" 1 Gosho");
    run(&mut session, "enrollin 30 Probability");

    let listed = run(&mut session, "printall statistics 1");
    assert!(listed.starts_with("Name: Vera | Faculty number: 30"));
    assert_eq!(run(&mut session, "printall Statistics 2"), NO_STUDENTS_MESSAGE);

    let protocol = run(&mut session, "protocol probability");
    assert!(protocol.starts_with(PROTOCOL_BY_PROGRAM_HEADER));
    assert_eq!(protocol.matches("Faculty number: 30").count(), 2);
    assert!(!protocol.contains("Faculty number: 20"));
}

#[test]
fn test_failed_command_leaves_state_unchanged() {
    let dir = TempDir::new().unwrap();
    let records = dir.path().join("students.txt");
    let mut session = open_session(&dir, &records);

    run(&mut session, "enroll 5 Statistics 1 Dimitar");
    let before = run(&mut session, "print 5");

    for line in [
        "advance 6",
        "change 5 program Biology",
        "change 5 year 3",
        "graduate 5",
        "addgrade 5 Probability 5",
        "enrollin 5 Compilers",
    ] {
        assert!(session.execute_line(line).is_err(), "{line}");
    }
    assert_eq!(run(&mut session, "print 5"), before);
}
