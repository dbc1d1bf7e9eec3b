//! Bundle statistics and library detection.

use crate::{
    config::Config,
    operation::Operation,
    package::Package,
    results::report::Markdown,
    run_log::RunLog,
    utils::{print_step, print_success, print_warning},
};
use anyhow::{Context, Result};
use chrono::Local;
use lazy_static::lazy_static;
use regex::Regex;
use serde_derive::Serialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Name of the analysis document.
pub const ANALYSIS_FILE: &str = "bundle-analysis.md";

lazy_static! {
    /// Module definition emitted by the Metro bundler for every module of the bundle.
    static ref MODULE_MARKER: Regex =
        Regex::new(r"__d\(function\(g,r,i,a,m,e,d\)").expect("invalid module marker regex");
}

/// Statistics of a JavaScript bundle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BundleAnalysis {
    size: u64,
    size_mib: String,
    lines: usize,
    characters: usize,
    modules: usize,
    libraries: Vec<String>,
}

impl BundleAnalysis {
    /// Analyzes the bundle contents against the given library catalogue.
    pub fn new<S: AsRef<str>>(content: &str, size: u64, catalogue: &[S]) -> Self {
        Self {
            size,
            size_mib: format!("{:.2}", size as f64 / 1024.0 / 1024.0),
            lines: bytecount::count(content.as_bytes(), b'\n') + 1,
            characters: bytecount::num_chars(content.as_bytes()),
            modules: count_modules(content),
            libraries: detect_libraries(content, catalogue),
        }
    }

    /// Size in MiB, with two decimals.
    pub fn size_mib(&self) -> &str {
        &self.size_mib
    }

    /// Number of lines.
    pub fn lines(&self) -> usize {
        self.lines
    }

    /// Number of characters.
    pub fn characters(&self) -> usize {
        self.characters
    }

    /// Number of Metro module definitions.
    pub fn modules(&self) -> usize {
        self.modules
    }

    /// Libraries of the catalogue found in the bundle.
    pub fn libraries(&self) -> &[String] {
        &self.libraries
    }
}

/// Counts the Metro module definitions of the bundle.
pub fn count_modules(content: &str) -> usize {
    MODULE_MARKER.find_iter(content).count()
}

/// Returns the libraries of the catalogue mentioned in the bundle.
///
/// A library is detected if its name appears double quoted, single quoted, or without hyphens.
pub fn detect_libraries<S: AsRef<str>>(content: &str, catalogue: &[S]) -> Vec<String> {
    catalogue
        .iter()
        .map(AsRef::as_ref)
        .filter(|library| {
            content.contains(&format!("\"{}\"", library))
                || content.contains(&format!("'{}'", library))
                || content.contains(&library.replace('-', ""))
        })
        .map(str::to_owned)
        .collect()
}

/// Data of the analysis document.
#[derive(Debug, Serialize)]
pub struct AnalysisDocument<'a> {
    base_name: &'a str,
    generated_at: String,
    analysis: &'a BundleAnalysis,
}

/// Runs the bundle analysis and writes `<base>-analysis/bundle-analysis.md`.
///
/// Skipped with a warning if there is no bundle. Errors are recorded in the run log. Returns the
/// analysis document path if it was written.
pub fn analyze(
    config: &Config,
    package: &Package,
    bundle: Option<&Path>,
    log: &RunLog,
) -> Option<PathBuf> {
    let bundle = match bundle {
        Some(b) => b,
        None => {
            print_warning("skipping the analysis: bundle not found");
            return None;
        }
    };

    let out_dir = package.output_path(
        config.output_folder(),
        Operation::Analyze.output_suffix().unwrap_or_default(),
    );
    print_step(
        format!("Analyzing the bundle in {}/", out_dir.display()),
        config.is_quiet(),
    );

    match write_analysis(config, package, bundle, &out_dir) {
        Ok(path) => {
            print_success(
                format!("Analysis finished: {}", path.display()),
                config.is_quiet(),
            );
            if !config.is_quiet() {
                println!();
            }
            Some(path)
        }
        Err(e) => {
            log.record_failure("Error in the bundle analysis", format!("{:#}", e));
            None
        }
    }
}

/// Analyzes the bundle and renders the analysis document.
fn write_analysis(config: &Config, package: &Package, bundle: &Path, out_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("could not create {}", out_dir.display()))?;

    let bytes = fs::read(bundle).with_context(|| format!("could not read {}", bundle.display()))?;
    // Hermes bytecode bundles are not UTF-8, invalid sequences are replaced.
    let content = String::from_utf8_lossy(&bytes);
    let analysis = BundleAnalysis::new(&content, bytes.len() as u64, config.libraries());

    let document = AnalysisDocument {
        base_name: package.base_name(),
        generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        analysis: &analysis,
    };
    let rendered = Markdown::new()?.render_analysis(&document)?;

    let path = out_dir.join(ANALYSIS_FILE);
    fs::write(&path, rendered).with_context(|| format!("could not write {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::{analyze, count_modules, detect_libraries, BundleAnalysis};
    use crate::{config::Config, config::COMMON_LIBRARIES, package::Package, run_log::RunLog};
    use std::fs;

    const SAMPLE: &str = "var __BUNDLE_START_TIME__=Date.now();\n\
                          __d(function(g,r,i,a,m,e,d){var t=r(d[0]);\"react-native\"},0);\n\
                          __d(function(g,r,i,a,m,e,d){require('axios')},1);\n\
                          __d(function(g,r,i,a,m,e,d){reactnativepaper},2);";

    #[test]
    fn it_count_modules() {
        assert_eq!(count_modules(SAMPLE), 3);
        assert_eq!(count_modules("__d(function(global,require){})"), 0);
    }

    #[test]
    fn it_detect_libraries() {
        let libraries = detect_libraries(SAMPLE, &COMMON_LIBRARIES);
        assert_eq!(
            libraries,
            vec!["react-native", "react", "axios", "react-native-paper"]
        );
        assert!(detect_libraries("nothing here", &["lodash"]).is_empty());
    }

    #[test]
    fn it_bundle_analysis() {
        let analysis = BundleAnalysis::new("ab\ncd\né", 3 * 1024 * 1024 / 2, &["redux"]);
        assert_eq!(analysis.lines(), 3);
        assert_eq!(analysis.characters(), 7);
        assert_eq!(analysis.size_mib(), "1.50");
        assert_eq!(analysis.modules(), 0);
        assert!(analysis.libraries().is_empty());
    }

    #[test]
    fn it_analyze() {
        let dir = tempfile::tempdir().unwrap();
        let apk = dir.path().join("demo.apk");
        fs::write(&apk, b"PK").unwrap();
        let package = Package::validate(&apk).unwrap();
        let bundle = dir.path().join("index.android.bundle");
        fs::write(&bundle, SAMPLE).unwrap();

        let mut config = Config::default();
        config.set_quiet(true);
        config.set_output_folder(dir.path());
        let log = RunLog::new(package.log_path(dir.path()));

        let path = analyze(&config, &package, Some(&bundle), &log).unwrap();
        assert_eq!(
            path,
            dir.path().join("demo-analysis").join("bundle-analysis.md")
        );

        let document = fs::read_to_string(&path).unwrap();
        assert!(document.contains("demo"));
        assert!(document.contains("**Modules detected**: 3"));
        assert!(document.contains("- axios"));
        assert!(!log.path().exists());
    }

    #[test]
    fn it_analyze_without_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let apk = dir.path().join("demo.apk");
        fs::write(&apk, b"PK").unwrap();
        let package = Package::validate(&apk).unwrap();
        let mut config = Config::default();
        config.set_quiet(true);
        config.set_output_folder(dir.path());
        let log = RunLog::new(package.log_path(dir.path()));

        assert!(analyze(&config, &package, None, &log).is_none());
        assert!(!dir.path().join("demo-analysis").exists());
        assert!(!log.path().exists());
    }

    #[test]
    fn it_analyze_binary_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let apk = dir.path().join("demo.apk");
        fs::write(&apk, b"PK").unwrap();
        let package = Package::validate(&apk).unwrap();
        let bundle = dir.path().join("index.android.bundle");
        let mut content = vec![0xc6_u8, 0x1f, 0xbc, 0x03, 0xc1, 0x03, 0x19, 0xff, 0x00];
        content.extend_from_slice(b"\"axios\" __d(function(g,r,i,a,m,e,d){}");
        fs::write(&bundle, &content).unwrap();
        let mut config = Config::default();
        config.set_quiet(true);
        config.set_output_folder(dir.path());
        let log = RunLog::new(package.log_path(dir.path()));

        let path = analyze(&config, &package, Some(&bundle), &log).unwrap();
        let document = fs::read_to_string(&path).unwrap();
        assert!(document.contains("**Modules detected**: 1"));
        assert!(document.contains("- axios"));
        assert!(!log.path().exists());
    }

    #[test]
    fn it_analyze_read_error_is_logged() {
        let dir = tempfile::tempdir().unwrap();
        let apk = dir.path().join("demo.apk");
        fs::write(&apk, b"PK").unwrap();
        let package = Package::validate(&apk).unwrap();
        let mut config = Config::default();
        config.set_quiet(true);
        config.set_output_folder(dir.path());
        let log = RunLog::new(package.log_path(dir.path()));

        let missing = dir.path().join("missing.bundle");
        assert!(analyze(&config, &package, Some(&missing), &log).is_none());
        let contents = fs::read_to_string(log.path()).unwrap();
        assert_eq!(contents.matches("Error in the bundle analysis").count(), 1);
    }
}
