//! External tool invocation.
//!
//! Every external program goes through a [`ToolRunner`], which returns the exit code and the
//! captured output instead of failing. This makes the tolerant steps of the recovery testable
//! without running the real tools.

use crate::run_log::RunLog;
use std::{
    ffi::{OsStr, OsString},
    fmt, io,
    process::{Command, Stdio},
};

/// How the output of an external tool is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// The tool writes directly to the user's terminal.
    Streamed,
    /// The output is captured and only used for diagnostics.
    Captured,
}

/// An external command line to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: OsString,
    args: Vec<OsString>,
    mode: OutputMode,
}

impl Invocation {
    /// Creates a new captured invocation of the given program.
    pub fn new<S: AsRef<OsStr>>(program: S) -> Self {
        Self {
            program: program.as_ref().to_os_string(),
            args: Vec::new(),
            mode: OutputMode::Captured,
        }
    }

    /// Adds an argument.
    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Streams the tool output to the terminal.
    pub fn streamed(mut self) -> Self {
        self.mode = OutputMode::Streamed;
        self
    }

    /// Program to execute.
    pub fn program(&self) -> &OsStr {
        &self.program
    }

    /// Arguments of the program.
    pub fn args(&self) -> impl Iterator<Item = &OsStr> {
        self.args.iter().map(OsString::as_os_str)
    }

    /// Output mode of the invocation.
    pub fn mode(&self) -> OutputMode {
        self.mode
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            let arg = arg.to_string_lossy();
            if arg.contains(' ') {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Result of an external tool execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    code: Option<i32>,
    stdout: String,
    stderr: String,
}

impl ToolOutput {
    /// Creates a new tool output.
    pub fn new<O: Into<String>, E: Into<String>>(code: Option<i32>, stdout: O, stderr: E) -> Self {
        Self {
            code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// Output of a tool that exited successfully without printing anything.
    pub fn success() -> Self {
        Self::new(Some(0), "", "")
    }

    /// Returns true if the tool exited with status code 0.
    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }

    /// Captured standard output.
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    /// Diagnostic text describing a failed execution.
    pub fn diagnostic(&self) -> String {
        let status = match self.code {
            Some(code) => format!("exit status: {}", code),
            None => "terminated by signal".to_owned(),
        };
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            status
        } else {
            format!("{}\n{}", status, stderr)
        }
    }
}

/// Executes external tools.
pub trait ToolRunner {
    /// Runs the invocation until the tool exits.
    ///
    /// An error is only returned if the tool could not be started at all.
    fn run(&self, invocation: &Invocation) -> io::Result<ToolOutput>;
}

/// Runner that spawns real system processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> io::Result<ToolOutput> {
        let mut command = Command::new(invocation.program());
        let _ = command.args(invocation.args()).stdin(Stdio::null());

        match invocation.mode() {
            OutputMode::Streamed => {
                let status = command.status()?;
                Ok(ToolOutput::new(status.code(), "", ""))
            }
            OutputMode::Captured => {
                let output = command.output()?;
                Ok(ToolOutput::new(
                    output.status.code(),
                    String::from_utf8_lossy(&output.stdout),
                    String::from_utf8_lossy(&output.stderr),
                ))
            }
        }
    }
}

/// Runs the invocation, recording any failure in the run log.
///
/// Returns the output only if the tool exited successfully.
pub fn run_tolerant<S: AsRef<str>>(
    runner: &dyn ToolRunner,
    invocation: &Invocation,
    log: &RunLog,
    message: S,
) -> Option<ToolOutput> {
    match runner.run(invocation) {
        Ok(output) if output.is_success() => Some(output),
        Ok(output) => {
            log.record_failure(
                message,
                format!("command: {}\n{}", invocation, output.diagnostic()),
            );
            None
        }
        Err(e) => {
            log.record_failure(
                message,
                format!("command: {}\ncould not be executed: {}", invocation, e),
            );
            None
        }
    }
}
