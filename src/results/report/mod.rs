//! Report generation module.

mod json;
mod markdown;

use crate::{config::Config, results::RecoveryReport};
use anyhow::Result;

pub use self::{
    json::{Json, JSON_REPORT_FILE},
    markdown::{Markdown, MARKDOWN_REPORT_FILE},
};

/// Trait that represents a type that can generate a report.
pub trait Generator {
    /// Generates an actual report.
    fn generate(&mut self, config: &Config, report: &RecoveryReport) -> Result<()>;
}
