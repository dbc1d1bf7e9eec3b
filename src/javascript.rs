//! JavaScript bundle formatting and visualization.

use crate::{
    config::Config,
    operation::Operation,
    package::Package,
    process::{run_tolerant, Invocation, ToolRunner},
    run_log::RunLog,
    utils::{print_step, print_success, print_warning},
};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Name of the beautified bundle.
pub const BEAUTIFIED_FILE: &str = "index.pretty.js";

/// Formats the bundle with `js-beautify` into `<base>-beautified/index.pretty.js`.
///
/// Skipped with a warning if there is no bundle. Returns the formatted file if the tool
/// succeeded.
pub fn beautify(
    config: &Config,
    package: &Package,
    bundle: Option<&Path>,
    runner: &dyn ToolRunner,
    log: &RunLog,
) -> Option<PathBuf> {
    let bundle = match bundle {
        Some(b) => b,
        None => {
            print_warning("skipping beautify: bundle not found");
            return None;
        }
    };

    let out_dir = package.output_path(
        config.output_folder(),
        Operation::Beautify.output_suffix().unwrap_or_default(),
    );
    let out_file = out_dir.join(BEAUTIFIED_FILE);
    print_step(
        format!("Running beautify in {}/", out_dir.display()),
        config.is_quiet(),
    );

    if let Err(e) = fs::create_dir_all(&out_dir) {
        log.record_failure(
            "Error preparing the beautify output folder",
            format!("{}: {}", out_dir.display(), e),
        );
        return None;
    }

    let invocation = Invocation::new(config.tools().npx())
        .arg(config.tools().beautifier())
        .arg(bundle)
        .arg("-o")
        .arg(&out_file)
        .streamed();
    run_tolerant(runner, &invocation, log, "Error in beautify")?;

    print_success(
        format!("Beautify finished: {}", out_file.display()),
        config.is_quiet(),
    );
    if !config.is_quiet() {
        println!();
    }
    Some(out_file)
}

/// Runs the bundle visualizer on the bundle.
///
/// The visualizer may not be installed, so its failure is only logged. Returns true if it ran
/// successfully.
pub fn visualize(
    config: &Config,
    bundle: Option<&Path>,
    runner: &dyn ToolRunner,
    log: &RunLog,
) -> bool {
    let bundle = match bundle {
        Some(b) => b,
        None => {
            print_warning("skipping the visualizer: bundle not found");
            return false;
        }
    };

    print_step("Running the bundle visualizer…", config.is_quiet());
    let invocation = Invocation::new(config.tools().npx())
        .arg(config.tools().visualizer())
        .arg(bundle);
    if run_tolerant(
        runner,
        &invocation,
        log,
        "Error in the bundle visualizer (it might not be installed)",
    )
    .is_none()
    {
        return false;
    }

    print_success("Bundle visualizer executed", config.is_quiet());
    if !config.is_quiet() {
        println!();
    }
    true
}
