//! JSON report generation module.

use crate::{
    config::Config,
    results::{report::Generator, RecoveryReport},
};
use anyhow::{Context, Result};
use std::{
    fs::File,
    io::{BufWriter, Write},
};

/// File name of the JSON report.
pub const JSON_REPORT_FILE: &str = "recovery-report.json";

/// JSON report generator.
#[derive(Debug, Default)]
pub struct Json;

impl Json {
    /// Creates a new JSON report generator.
    pub fn new() -> Self {
        Self
    }
}

impl Generator for Json {
    fn generate(&mut self, config: &Config, report: &RecoveryReport) -> Result<()> {
        if config.is_verbose() {
            println!("Starting JSON report generation. First we create the file.")
        }
        let path = report.report_folder(config).join(JSON_REPORT_FILE);
        let mut f = BufWriter::new(
            File::create(&path).with_context(|| format!("could not create {}", path.display()))?,
        );
        serde_json::to_writer_pretty(&mut f, report)?;
        f.flush()?;

        Ok(())
    }
}
