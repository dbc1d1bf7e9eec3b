//! Per-run failure log.

use crate::utils::{print_error, print_warning};
use chrono::{SecondsFormat, Utc};
use std::{
    fmt::Display,
    fs::OpenOptions,
    io::{self, Write},
    path::{Path, PathBuf},
};

/// Append-only text log of the failures of one recovery run.
///
/// The file is opened in append mode for every entry, so it is only created if something fails.
#[derive(Debug, Clone)]
pub struct RunLog {
    path: PathBuf,
}

impl RunLog {
    /// Creates a log that will be written at the given path.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends a timestamped entry to the log file.
    pub fn append<M: Display, D: Display>(&self, message: M, detail: D) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        write!(
            file,
            "[{}] {}\n{}\n\n",
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            message,
            detail
        )
    }

    /// Records a recoverable failure: it is appended to the log and reported to the user.
    pub fn record_failure<M: AsRef<str>, D: Display>(&self, message: M, detail: D) {
        if let Err(e) = self.append(message.as_ref(), detail) {
            print_warning(format!(
                "could not write to the log file {}: {}",
                self.path.display(),
                e
            ));
        }
        print_error(message);
    }
}
