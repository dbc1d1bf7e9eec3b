//! Package extraction and decompilation.

use crate::{
    config::Config,
    operation::Operation,
    package::Package,
    process::{run_tolerant, Invocation, ToolRunner},
    run_log::RunLog,
    utils::{print_step, print_success, print_warning, recreate_dir},
};
use colored::Colorize;
use std::path::PathBuf;

/// Extracts the package with `unzip` into `<base>-unzip`.
///
/// The output directory is removed and created again first, so no file from a previous run
/// survives. Returns the directory if the extraction succeeded.
pub fn unzip(
    config: &Config,
    package: &Package,
    runner: &dyn ToolRunner,
    log: &RunLog,
) -> Option<PathBuf> {
    let out_dir = package.output_path(config.output_folder(), output_suffix(Operation::Unzip));
    print_step(
        format!("Extracting the package with unzip in {}/", out_dir.display()),
        config.is_quiet(),
    );

    if let Err(e) = recreate_dir(&out_dir) {
        log.record_failure(
            "Error preparing the unzip output folder",
            format!("{}: {}", out_dir.display(), e),
        );
        return None;
    }

    let invocation = Invocation::new(config.tools().unzip())
        .arg("-q")
        .arg(package.path())
        .arg("-d")
        .arg(&out_dir)
        .streamed();
    run_tolerant(runner, &invocation, log, "Error in the unzip extraction")?;

    print_success(
        format!("Unzip extraction finished: {}/", out_dir.display()),
        config.is_quiet(),
    );
    if !config.is_quiet() {
        println!();
    }
    Some(out_dir)
}

/// Decompiles the package resources and manifest with APKTool into `<base>-apktool`.
///
/// APKTool is run with `-f`, so it replaces any previous output. Returns the directory if the
/// decompilation succeeded.
pub fn apktool(
    config: &Config,
    package: &Package,
    runner: &dyn ToolRunner,
    log: &RunLog,
) -> Option<PathBuf> {
    let out_dir = package.output_path(config.output_folder(), output_suffix(Operation::Apktool));
    print_step(
        format!("Decompiling the package with APKTool in {}/", out_dir.display()),
        config.is_quiet(),
    );

    let invocation = Invocation::new(config.tools().apktool())
        .arg("d")
        .arg(package.path())
        .arg("-o")
        .arg(&out_dir)
        .arg("-f")
        .streamed();
    run_tolerant(runner, &invocation, log, "Error in the APKTool decompilation")?;

    print_success(
        format!("APKTool decompilation finished: {}/", out_dir.display()),
        config.is_quiet(),
    );
    if !config.is_quiet() {
        println!();
    }
    Some(out_dir)
}

/// Lists the package contents and warns if it does not look like a React Native APK.
///
/// This never stops the recovery: listing errors are only logged.
pub fn inspect(config: &Config, package: &Package, runner: &dyn ToolRunner, log: &RunLog) {
    if config.is_verbose() {
        println!("Checking the structure of {}…", package.file_name().as_str().italic());
    }

    let invocation = Invocation::new(config.tools().unzip())
        .arg("-l")
        .arg(package.path());
    let listing = match run_tolerant(runner, &invocation, log, "Error validating the APK") {
        Some(output) => output,
        None => {
            print_warning("the APK structure could not be fully validated");
            return;
        }
    };

    let inspection = Inspection::from_listing(listing.stdout());
    if inspection.has_manifest {
        print_success(
            "Valid APK: AndroidManifest.xml found",
            !config.is_verbose(),
        );
    } else {
        print_warning("the APK might not be valid: AndroidManifest.xml not found");
    }
    if inspection.has_javascript {
        print_success("Possible JavaScript bundles detected", !config.is_verbose());
    } else {
        print_warning("no obvious JavaScript bundle found in the APK");
    }
}

/// Relevant facts from an archive listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Inspection {
    has_manifest: bool,
    has_javascript: bool,
}

impl Inspection {
    /// Reads the output of `unzip -l`.
    fn from_listing(listing: &str) -> Self {
        let mut inspection = Self {
            has_manifest: false,
            has_javascript: false,
        };
        for entry in listing.lines().map(str::trim_end) {
            if entry.ends_with("AndroidManifest.xml") {
                inspection.has_manifest = true;
            }
            if entry.ends_with(".bundle") || entry.ends_with(".js") {
                inspection.has_javascript = true;
            }
        }
        inspection
    }
}

/// Output directory suffix of an extraction step.
fn output_suffix(operation: Operation) -> &'static str {
    operation.output_suffix().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{apktool, inspect, unzip, Inspection};
    use crate::{
        config::Config,
        package::Package,
        process::{
            stub::{succeeding, StubRunner},
            Invocation, ToolOutput,
        },
        run_log::RunLog,
    };
    use std::{fs, path::PathBuf};

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

    /// Simulates `unzip -q <apk> -d <dir>` by writing one file in the destination.
    fn fake_unzip(invocation: &Invocation) -> std::io::Result<ToolOutput> {
        let args: Vec<_> = invocation.args().collect();
        let dest = PathBuf::from(args[3]);
        fs::create_dir_all(dest.join("assets"))?;
        fs::write(dest.join("assets").join("index.android.bundle"), "__d(0);")?;
        Ok(ToolOutput::success())
    }

    #[test]
    fn it_unzip() {
        let (dir, config, package, log) = setup();
        let runner = StubRunner::new(fake_unzip);

        let out = unzip(&config, &package, &runner, &log).unwrap();
        assert_eq!(out, dir.path().join("demo-unzip"));
        assert!(out.join("assets").join("index.android.bundle").is_file());
        assert_eq!(
            runner.calls(),
            vec![format!(
                "unzip -q {} -d {}",
                package.path().display(),
                out.display()
            )]
        );
        assert!(!log.path().exists());
    }

    #[test]
    fn it_unzip_replaces_previous_output() {
        let (dir, config, package, log) = setup();
        let stale = dir.path().join("demo-unzip").join("stale");
        fs::create_dir_all(&stale).unwrap();
        fs::write(stale.join("old.js"), "old").unwrap();
        fs::write(dir.path().join("demo-unzip").join("old.txt"), "old").unwrap();

        let runner = StubRunner::new(fake_unzip);
        let out = unzip(&config, &package, &runner, &log).unwrap();

        let mut entries: Vec<_> = fs::read_dir(&out)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        entries.sort();
        assert_eq!(entries, vec!["assets"]);
    }

    #[test]
    fn it_unzip_failure_is_logged() {
        let (_dir, config, package, log) = setup();
        let runner = StubRunner::new(|_: &Invocation| {
            Ok(ToolOutput::new(Some(9), "", "End-of-central-directory signature not found"))
        });

        assert!(unzip(&config, &package, &runner, &log).is_none());
        let contents = fs::read_to_string(log.path()).unwrap();
        assert_eq!(contents.matches("Error in the unzip extraction").count(), 1);
        assert!(contents.contains("End-of-central-directory"));
    }

    #[test]
    fn it_apktool() {
        let (dir, config, package, log) = setup();
        let runner = succeeding();

        let out = apktool(&config, &package, &runner, &log).unwrap();
        assert_eq!(out, dir.path().join("demo-apktool"));
        assert_eq!(
            runner.calls(),
            vec![format!(
                "apktool d {} -o {} -f",
                package.path().display(),
                out.display()
            )]
        );
    }

    #[test]
    fn it_inspection() {
        let listing = "Archive:  demo.apk\n  Length      Date    Time    Name\n\
                       ---------  ---------- -----   ----\n\
                       \x20    2932  1981-01-01 01:01   AndroidManifest.xml\n\
                       \x20  512000  1981-01-01 01:01   assets/index.android.bundle\n";
        let inspection = Inspection::from_listing(listing);
        assert!(inspection.has_manifest);
        assert!(inspection.has_javascript);

        let inspection = Inspection::from_listing("  100  1981-01-01 01:01   classes.dex\n");
        assert!(!inspection.has_manifest);
        assert!(!inspection.has_javascript);
    }

    #[test]
    fn it_inspect_failure_is_tolerated() {
        let (_dir, config, package, log) = setup();
        let runner = StubRunner::new(|_: &Invocation| Ok(ToolOutput::new(Some(1), "", "")));

        inspect(&config, &package, &runner, &log);
        assert!(fs::read_to_string(log.path())
            .unwrap()
            .contains("Error validating the APK"));
    }
}
