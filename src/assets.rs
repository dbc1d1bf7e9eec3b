//! Asset extraction.

use crate::{
    config::Config,
    copy_folder,
    operation::Operation,
    package::Package,
    run_log::RunLog,
    utils::{print_step, print_success},
};
use log::debug;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Copies the conventional asset folders of the extraction into `<base>-assets`.
///
/// Every configured folder present in the extraction directory is copied recursively. A folder
/// that fails to copy is logged and the rest are still copied. Returns the assets directory and
/// the number of copied folders, or `None` if the directory could not be created.
pub fn extract_assets(
    config: &Config,
    package: &Package,
    extraction_dir: &Path,
    log: &RunLog,
) -> Option<(PathBuf, usize)> {
    let out_dir = package.output_path(
        config.output_folder(),
        Operation::Assets.output_suffix().unwrap_or_default(),
    );
    print_step(
        format!("Extracting assets in {}/", out_dir.display()),
        config.is_quiet(),
    );

    if let Err(e) = fs::create_dir_all(&out_dir) {
        log.record_failure(
            "Error preparing the assets output folder",
            format!("{}: {}", out_dir.display(), e),
        );
        return None;
    }

    let mut copied = 0;
    for folder in config.asset_folders() {
        let from = extraction_dir.join(folder);
        if !from.is_dir() {
            debug!("no {} folder in {}", folder, extraction_dir.display());
            continue;
        }

        match copy_folder(&from, &out_dir.join(folder)) {
            Ok(()) => copied += 1,
            Err(e) => log.record_failure(
                format!("Error copying the {} assets", folder),
                format!("{:#}", e),
            ),
        }
    }

    print_success(
        format!("{} asset folders copied: {}/", copied, out_dir.display()),
        config.is_quiet(),
    );
    if !config.is_quiet() {
        println!();
    }
    Some((out_dir, copied))
}
