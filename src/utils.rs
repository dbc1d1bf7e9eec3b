//! Utilities module.

use colored::Colorize;
use log::{error, warn};
use std::{fs, io, path::Path};

/// Prints the given error to the user.
pub fn print_error<S: AsRef<str>>(error: S) {
    error!("{}", error.as_ref());
}

/// Prints the given warning to the user.
pub fn print_warning<S: AsRef<str>>(warning: S) {
    warn!("{}", warning.as_ref());
}

/// Prints a successful step line, unless in quiet mode.
pub fn print_success<S: AsRef<str>>(message: S, quiet: bool) {
    if !quiet {
        println!("{} {}", "✔".green().bold(), message.as_ref().green());
    }
}

/// Prints the announcement of a step, unless in quiet mode.
pub fn print_step<S: AsRef<str>>(message: S, quiet: bool) {
    if !quiet {
        println!("{}", message.as_ref().blue());
    }
}

/// Removes the given directory, if it exists, and creates it again empty.
pub fn recreate_dir<P: AsRef<Path>>(path: P) -> io::Result<()> {
    match fs::remove_dir_all(path.as_ref()) {
        Ok(()) => {}
        Err(ref e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }
    fs::create_dir_all(path)
}
