//! Recovery results and reports.

mod handlebars_helpers;
pub mod report;

use crate::{
    config::Config,
    operation::Operation,
    package::{Package, REPORT_SUFFIX},
    run_log::RunLog,
    utils::print_warning,
};
use anyhow::{Context, Result};
use chrono::Local;
use serde_derive::Serialize;
use std::{fmt, fs, path::PathBuf, time::Duration};

pub use self::report::{Generator, Json, Markdown};

/// Output folder of one executed step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputEntry {
    operation: Operation,
    label: &'static str,
    path: Option<String>,
}

impl OutputEntry {
    /// Folder name, relative to the output folder. `None` for steps without output folder.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }
}

/// Summary of a recovery run.
#[derive(Debug, Clone, Serialize)]
pub struct RecoveryReport {
    tool_version: &'static str,
    package: String,
    base_name: String,
    generated_at: String,
    generated_at_rfc3339: String,
    operations: Vec<Operation>,
    outputs: Vec<OutputEntry>,
    log_file: String,
}

impl RecoveryReport {
    /// Creates the report of the given executed steps.
    pub fn new(package: &Package, operations: &[Operation], log: &RunLog) -> Self {
        let now = Local::now();
        let outputs = operations
            .iter()
            .map(|&operation| OutputEntry {
                operation,
                label: operation.label(),
                path: operation
                    .output_suffix()
                    .map(|suffix| format!("{}{}/", package.base_name(), suffix)),
            })
            .collect();

        Self {
            tool_version: env!("CARGO_PKG_VERSION"),
            package: package.file_name(),
            base_name: package.base_name().to_owned(),
            generated_at: now.format("%Y-%m-%d %H:%M:%S").to_string(),
            generated_at_rfc3339: now.to_rfc3339(),
            operations: operations.to_vec(),
            outputs,
            log_file: log
                .path()
                .file_name()
                .map_or_else(|| log.path().display().to_string(), |n| {
                    n.to_string_lossy().into_owned()
                }),
        }
    }

    /// File name of the recovered package.
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Base name of the package.
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// Output folders of the executed steps.
    pub fn outputs(&self) -> &[OutputEntry] {
        &self.outputs
    }

    /// Folder where the reports are written.
    pub fn report_folder(&self, config: &Config) -> PathBuf {
        config
            .output_folder()
            .join(format!("{}{}", self.base_name, REPORT_SUFFIX))
    }

    /// Writes the Markdown report and, if configured, the JSON report.
    ///
    /// Returns the path of the Markdown report.
    pub fn generate(&self, config: &Config) -> Result<PathBuf> {
        let folder = self.report_folder(config);
        fs::create_dir_all(&folder)
            .with_context(|| format!("could not create {}", folder.display()))?;

        let mut markdown = Markdown::new()?;
        markdown
            .generate(config, self)
            .context("could not generate the Markdown report")?;

        if config.has_to_generate_json() {
            let mut json = Json::new();
            if let Err(e) = json.generate(config, self) {
                print_warning(format!(
                    "there was an error generating the JSON report: {:#}",
                    e
                ));
            } else if config.is_verbose() {
                println!("JSON report generated.");
            }
        }

        Ok(folder.join(report::MARKDOWN_REPORT_FILE))
    }
}

/// Time spent in one step of the recovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Benchmark {
    label: String,
    duration: Duration,
}

impl Benchmark {
    /// Creates a new benchmark.
    pub fn new<S: Into<String>>(label: S, duration: Duration) -> Self {
        Self {
            label: label.into(),
            duration,
        }
    }

    /// Label of the benchmark.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Display for Benchmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}.{:03}s",
            self.label,
            self.duration.as_secs(),
            self.duration.subsec_millis()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{Benchmark, RecoveryReport};
    use crate::{config::Config, operation::Operation, package::Package, run_log::RunLog};
    use std::{fs, time::Duration};

    fn setup() -> (tempfile::TempDir, Config, Package, RunLog) {
        let dir = tempfile::tempdir().unwrap();
        let apk = dir.path().join("demo.apk");
        fs::write(&apk, b"PK").unwrap();
        let package = Package::validate(&apk).unwrap();
        let mut config = Config::default();
        config.set_quiet(true);
        config.set_output_folder(dir.path());
        let log = RunLog::new(package.log_path(dir.path()));
        (dir, config, package, log)
    }

    #[test]
    fn it_outputs() {
        let (_dir, _config, package, log) = setup();
        let report = RecoveryReport::new(
            &package,
            &[Operation::Unzip, Operation::Visualizer, Operation::Beautify],
            &log,
        );

        assert_eq!(report.package(), "demo.apk");
        assert_eq!(report.base_name(), "demo");
        let paths: Vec<_> = report.outputs().iter().map(|o| o.path()).collect();
        assert_eq!(
            paths,
            vec![Some("demo-unzip/"), None, Some("demo-beautified/")]
        );
    }

    #[test]
    fn it_generate_markdown() {
        let (dir, config, package, log) = setup();
        let report = RecoveryReport::new(&package, &[Operation::Unzip, Operation::Assets], &log);

        let path = report.generate(&config).unwrap();
        assert_eq!(
            path,
            dir.path().join("demo-report").join("recovery-report.md")
        );
        assert!(path.is_file());

        let markdown = fs::read_to_string(&path).unwrap();
        assert!(markdown.starts_with("# Recovery report - demo"));
        assert!(markdown.contains("- **APK**: `demo.apk`"));
        assert!(markdown.contains("- **Executed steps**: unzip, assets"));
        assert!(markdown.contains("`demo-unzip/`"));
        assert!(markdown.contains("`demo-assets/`"));
        assert!(markdown.contains("`demo-recovery.log`"));
        assert!(!dir.path().join("demo-report").join("recovery-report.json").exists());
    }

    #[test]
    fn it_generate_json() {
        let (dir, mut config, package, log) = setup();
        config.set_json(true);
        let report = RecoveryReport::new(&package, &[Operation::Apktool], &log);

        let _ = report.generate(&config).unwrap();
        let json = fs::read_to_string(dir.path().join("demo-report").join("recovery-report.json"))
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["base_name"], "demo");
        assert_eq!(value["operations"][0], "apktool");
        assert_eq!(value["outputs"][0]["path"], "demo-apktool/");
    }

    #[test]
    fn it_benchmark_display() {
        let benchmark = Benchmark::new("unzip", Duration::from_millis(1_042));
        assert_eq!(benchmark.to_string(), "unzip: 1.042s");
        assert_eq!(benchmark.label(), "unzip");
    }
}
