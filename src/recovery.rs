//! Recovery orchestration.
//!
//! A [`Recovery`] holds the state of one run: the extraction directory produced so far, the
//! memoized bundle lookup and the run log. Steps are executed sequentially, in the selected order.
//! Only the dependency check can stop the run; every later failure is logged and the next step
//! runs.

use crate::{
    assets, bundle,
    bundle::BundleCache,
    config::Config,
    decompilation, dependencies, javascript,
    operation::Operation,
    package::Package,
    process::ToolRunner,
    results::{Benchmark, RecoveryReport},
    run_log::RunLog,
    utils::{print_success, print_warning},
};
use anyhow::{Context, Result};
use colored::Colorize;
use log::debug;
use std::{
    fs,
    path::{Path, PathBuf},
    time::Instant,
};

/// State of a recovery run.
pub struct Recovery<'a> {
    config: &'a Config,
    package: &'a Package,
    runner: &'a dyn ToolRunner,
    log: RunLog,
    operations: Vec<Operation>,
    extraction_dir: Option<PathBuf>,
    extraction_attempted: bool,
    bundle: BundleCache,
    benchmarks: Vec<Benchmark>,
}

impl<'a> Recovery<'a> {
    /// Prepares the recovery of the package with the given resolved steps.
    pub fn new(
        config: &'a Config,
        package: &'a Package,
        runner: &'a dyn ToolRunner,
        operations: Vec<Operation>,
    ) -> Self {
        Self {
            config,
            package,
            runner,
            log: RunLog::new(package.log_path(config.output_folder())),
            operations,
            extraction_dir: None,
            extraction_attempted: false,
            bundle: BundleCache::new(),
            benchmarks: Vec::new(),
        }
    }

    /// Runs the recovery.
    ///
    /// Fails only if a required external tool is missing, before anything is written. Returns
    /// the path of the final report, if one was generated.
    pub fn run(&mut self) -> Result<Option<PathBuf>> {
        let start = Instant::now();
        if !self.config.is_quiet() {
            println!("{}", "Starting the recovery…".bold().blue());
            println!(
                "{}",
                format!("Logs will be saved in {}", self.log.path().display())
                    .as_str()
                    .dimmed()
            );
            println!();
        }

        dependencies::check(self.runner, &self.operations, self.config)?;
        fs::create_dir_all(self.config.output_folder()).with_context(|| {
            format!(
                "could not create the output folder {}",
                self.config.output_folder().display()
            )
        })?;
        decompilation::inspect(self.config, self.package, self.runner, &self.log);

        for operation in self.operations.clone() {
            let operation_start = Instant::now();
            self.execute(operation);
            if self.config.is_bench() {
                self.benchmarks
                    .push(Benchmark::new(operation.to_string(), operation_start.elapsed()));
            }
        }

        let report = self.generate_report();
        if self.config.is_bench() {
            self.benchmarks
                .push(Benchmark::new("Total recovery", start.elapsed()));
        }

        if let Some(path) = &report {
            if self.config.is_open() {
                if let Err(e) = open::that(path) {
                    print_warning(format!("the report could not be opened: {}", e));
                }
            }
        }
        Ok(report)
    }

    /// Executes one step.
    fn execute(&mut self, operation: Operation) {
        debug!("executing the {} step", operation);
        match operation {
            Operation::Unzip => {
                let dir = decompilation::unzip(self.config, self.package, self.runner, &self.log);
                self.record_extraction(dir);
            }
            Operation::Apktool => {
                let dir =
                    decompilation::apktool(self.config, self.package, self.runner, &self.log);
                self.record_extraction(dir);
            }
            Operation::Beautify => {
                let bundle = self.bundle.get_or_find(
                    self.extraction_dir.as_deref(),
                    self.config.bundle_search_paths(),
                    self.config.is_quiet(),
                );
                let _ = javascript::beautify(
                    self.config,
                    self.package,
                    bundle,
                    self.runner,
                    &self.log,
                );
            }
            Operation::Analyze => {
                self.ensure_extraction(operation);
                let bundle = self.bundle.get_or_find(
                    self.extraction_dir.as_deref(),
                    self.config.bundle_search_paths(),
                    self.config.is_quiet(),
                );
                let _ = bundle::analyze(self.config, self.package, bundle, &self.log);
            }
            Operation::Assets => {
                self.ensure_extraction(operation);
                match &self.extraction_dir {
                    Some(dir) => {
                        let _ = assets::extract_assets(self.config, self.package, dir, &self.log);
                    }
                    None => print_warning("skipping the assets: the package was not extracted"),
                }
            }
            Operation::Visualizer => {
                let bundle = self.bundle.get_or_find(
                    self.extraction_dir.as_deref(),
                    self.config.bundle_search_paths(),
                    self.config.is_quiet(),
                );
                let _ = javascript::visualize(self.config, bundle, self.runner, &self.log);
            }
        }
    }

    /// Runs `unzip` first if no extraction has been attempted in this run.
    fn ensure_extraction(&mut self, operation: Operation) {
        if self.extraction_dir.is_none() && !self.extraction_attempted {
            debug!("no extraction yet, running unzip before the {} step", operation);
            let dir = decompilation::unzip(self.config, self.package, self.runner, &self.log);
            self.record_extraction(dir);
        }
    }

    /// Keeps the directory of a successful extraction.
    fn record_extraction(&mut self, dir: Option<PathBuf>) {
        self.extraction_attempted = true;
        if dir.is_some() {
            self.extraction_dir = dir;
        }
    }

    /// Generates the final report if the package was extracted.
    fn generate_report(&self) -> Option<PathBuf> {
        if self.extraction_dir.is_none() {
            debug!("the package was not extracted, no report will be generated");
            return None;
        }

        let report = RecoveryReport::new(self.package, &self.operations, &self.log);
        match report.generate(self.config) {
            Ok(path) => {
                print_success(
                    format!("Final report generated: {}", path.display()),
                    self.config.is_quiet(),
                );
                Some(path)
            }
            Err(e) => {
                self.log
                    .record_failure("Error generating the final report", format!("{:#}", e));
                None
            }
        }
    }

    /// Directory of the last successful extraction.
    pub fn extraction_dir(&self) -> Option<&Path> {
        self.extraction_dir.as_deref()
    }

    /// Run log of the recovery.
    pub fn log(&self) -> &RunLog {
        &self.log
    }

    /// Measured durations, if benchmarking was enabled.
    pub fn benchmarks(&self) -> &[Benchmark] {
        &self.benchmarks
    }
}
