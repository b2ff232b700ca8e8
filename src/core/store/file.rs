//! Line-oriented file persistence for record stores

use super::{RecordStore, StoreRecord};
use crate::core::codec::RecordCodec;
use crate::core::error::{RegistryError, Result};
use crate::{debug, info, warn};
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// A line that could not be loaded
#[derive(Debug)]
pub struct LineFailure {
    /// 1-based line number in the file
    pub line: usize,
    /// Why the line was rejected
    pub error: RegistryError,
}

impl fmt::Display for LineFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.error)
    }
}

/// Outcome of loading a file into a store
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Records added to the store
    pub loaded: usize,
    /// Lines that were skipped, in file order
    pub failures: Vec<LineFailure>,
}

impl LoadReport {
    /// Whether every non-blank line was loaded
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Loads and saves one kind of record through its codec
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordFile<C> {
    codec: C,
}

impl<C> RecordFile<C>
where
    C: RecordCodec,
    C::Record: StoreRecord,
{
    /// Create a file layer for `codec`
    pub const fn new(codec: C) -> Self {
        Self { codec }
    }

    /// Decode each line and add it to `store`.
    ///
    /// Blank lines are skipped. Lines that fail to decode, or whose key is
    /// already present, are collected in the report and do not stop the load.
    pub fn load_lines<'a>(
        &self,
        lines: impl IntoIterator<Item = &'a str>,
        store: &mut RecordStore<C::Record>,
    ) -> LoadReport {
        self.load_results(lines.into_iter().map(Ok), store)
    }

    fn load_results<S: AsRef<str>>(
        &self,
        lines: impl IntoIterator<Item = Result<S>>,
        store: &mut RecordStore<C::Record>,
    ) -> LoadReport {
        let mut report = LoadReport::default();

        for (idx, line) in lines.into_iter().enumerate() {
            let result = line.and_then(|line| {
                let line = line.as_ref();
                if line.trim().is_empty() {
                    return Ok(false);
                }
                let record = self.codec.decode(line)?;
                store.add_new(record).map(|()| true)
            });
            match result {
                Ok(true) => report.loaded += 1,
                Ok(false) => {}
                Err(error) => {
                    let failure = LineFailure {
                        line: idx + 1,
                        error,
                    };
                    warn!("Skipping {} record at {failure}", C::KIND);
                    report.failures.push(failure);
                }
            }
        }

        report
    }

    /// Load `path` into `store`.
    ///
    /// The parent directory must exist. A missing file is created empty and
    /// nothing is loaded.
    ///
    /// # Errors
    /// Returns `MissingDirectory` when the parent directory does not exist, or
    /// `Io` when the file cannot be created or read
    pub fn open(&self, path: &Path, store: &mut RecordStore<C::Record>) -> Result<LoadReport> {
        ensure_parent_dir(path)?;

        if !path.exists() {
            File::create(path).map_err(|e| RegistryError::io(path, e))?;
            debug!("Created empty {} file {}", C::KIND, path.display());
            return Ok(LoadReport::default());
        }

        let reader = BufReader::new(File::open(path).map_err(|e| RegistryError::io(path, e))?);
        let lines = reader
            .split(b'\n')
            .map(|bytes| -> Result<Result<String>> {
                let mut bytes = bytes.map_err(|e| RegistryError::io(path, e))?;
                if bytes.last() == Some(&b'\r') {
                    bytes.pop();
                }
                Ok(String::from_utf8(bytes).map_err(|_| RegistryError::InvalidEncoding))
            })
            .collect::<Result<Vec<_>>>()?;

        let report = self.load_results(lines, store);
        info!(
            "Loaded {} {} records from {} ({} skipped)",
            report.loaded,
            C::KIND,
            path.display(),
            report.failures.len()
        );
        Ok(report)
    }

    /// Rewrite `path` with every record of `store`, one per line.
    /// Returns the number of records written.
    ///
    /// # Errors
    /// Returns `Io` when the file cannot be written
    pub fn save(&self, path: &Path, store: &RecordStore<C::Record>) -> Result<usize> {
        let file = File::create(path).map_err(|e| RegistryError::io(path, e))?;
        let mut writer = BufWriter::new(file);

        let mut written = 0;
        for record in store.all() {
            writeln!(writer, "{}", self.codec.encode(record))
                .map_err(|e| RegistryError::io(path, e))?;
            written += 1;
        }
        writer.flush().map_err(|e| RegistryError::io(path, e))?;

        info!("Saved {written} {} records to {}", C::KIND, path.display());
        Ok(written)
    }
}

/// A bare file name refers to the current directory, which always exists
fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => {
            Err(RegistryError::MissingDirectory(parent.to_path_buf()))
        }
        _ => Ok(()),
    }
}
