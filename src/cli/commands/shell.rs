//! Interactive shell handler

use registrar::config::Config;
use registrar::core::session::{EXIT_MESSAGE, GREETING, PROMPT};
use registrar::{debug, Outcome, Session};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Run the shell over stdin/stdout
///
/// `file`, or the configured `records_file` when `file` is `None`, is opened
/// before the first prompt.
pub fn run(file: Option<&Path>, config: &Config) -> ExitCode {
    let mut session = Session::new(&config.paths.programs_file);
    let start_file = file.map(Path::to_path_buf).or_else(|| {
        (!config.paths.records_file.is_empty()).then(|| PathBuf::from(&config.paths.records_file))
    });

    let stdin = io::stdin();
    let stdout = io::stdout();
    match run_loop(&mut session, start_file.as_deref(), stdin.lock(), stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("✗ Shell I/O failed: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Read commands from `input` until `exit` or end of input
fn run_loop(
    session: &mut Session,
    start_file: Option<&Path>,
    input: impl BufRead,
    mut out: impl Write,
) -> io::Result<()> {
    writeln!(out, "{GREETING}")?;

    if let Some(path) = start_file {
        match session.open(path) {
            Ok(message) => writeln!(out, "{message}")?,
            Err(e) => writeln!(out, "Error: {e}")?,
        }
    }

    let mut lines = input.lines();
    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;

        let Some(line) = lines.next().transpose()? else {
            debug!("End of input, leaving shell");
            writeln!(out)?;
            writeln!(out, "{EXIT_MESSAGE}")?;
            return Ok(());
        };
        if line.trim().is_empty() {
            continue;
        }

        match session.execute_line(&line) {
            Ok(Outcome::Message(text)) => writeln!(out, "{text}")?,
            Ok(Outcome::Exit) => {
                writeln!(out, "{EXIT_MESSAGE}")?;
                return Ok(());
            }
            Err(e) => writeln!(out, "Error: {e}")?,
        }
    }
}
