//! Markdown report generation module.

use crate::{
    config::Config,
    results::{handlebars_helpers::thousands, report::Generator, RecoveryReport},
};
use anyhow::{Context, Result};
use handlebars::{no_escape, Handlebars};
use serde::Serialize;
use std::{fs::File, io::Write};

/// File name of the Markdown report.
pub const MARKDOWN_REPORT_FILE: &str = "recovery-report.md";

const REPORT_TEMPLATE: &str = "report";
const ANALYSIS_TEMPLATE: &str = "analysis";

/// Markdown report generator.
pub struct Markdown<'r> {
    /// Handlebars template structure.
    handler: Handlebars<'r>,
}

impl<'r> Markdown<'r> {
    /// Creates a new Markdown generator with the embedded templates.
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(no_escape);
        handlebars.register_helper("thousands", Box::new(thousands));
        handlebars
            .register_template_string(
                REPORT_TEMPLATE,
                include_str!("../../../templates/recovery-report.md.hbs"),
            )
            .context("error registering the report template")?;
        handlebars
            .register_template_string(
                ANALYSIS_TEMPLATE,
                include_str!("../../../templates/bundle-analysis.md.hbs"),
            )
            .context("error registering the analysis template")?;

        Ok(Self {
            handler: handlebars,
        })
    }

    /// Renders the recovery report.
    pub fn render_report(&self, report: &RecoveryReport) -> Result<String> {
        self.handler
            .render(REPORT_TEMPLATE, report)
            .context("could not render the recovery report")
    }

    /// Renders a bundle analysis document.
    pub fn render_analysis<T: Serialize>(&self, document: &T) -> Result<String> {
        self.handler
            .render(ANALYSIS_TEMPLATE, document)
            .context("could not render the bundle analysis")
    }
}

impl<'r> Generator for Markdown<'r> {
    fn generate(&mut self, config: &Config, report: &RecoveryReport) -> Result<()> {
        if config.is_verbose() {
            println!("Starting Markdown report generation.");
        }
        let path = report.report_folder(config).join(MARKDOWN_REPORT_FILE);
        let rendered = self.render_report(report)?;

        let mut f =
            File::create(&path).with_context(|| format!("could not create {}", path.display()))?;
        f.write_all(rendered.as_bytes())?;

        Ok(())
    }
}
