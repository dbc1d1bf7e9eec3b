//! Interactive prompts and user facing summaries.

use crate::{
    config::Config,
    error::ErrorKind,
    operation::{Operation, Selection, ALL_OPERATIONS},
    package::{Package, REPORT_SUFFIX},
    run_log::RunLog,
    results::Benchmark,
};
use anyhow::Result;
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect, Select};
use std::path::PathBuf;

/// Prints the welcome banner.
pub fn print_banner() {
    println!("{}", crate::BANNER.cyan());
}

/// Asks for the path of the APK to recover, until a valid one is given.
pub fn prompt_package() -> Result<Package> {
    let path: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Path of the APK file")
        .validate_with(|input: &String| -> std::result::Result<(), String> {
            Package::validate(input.trim())
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .interact_text()
        .map_err(prompt_error)?;

    let package = Package::validate(path.trim())?;
    println!(
        "{} {}",
        "✔".green().bold(),
        format!("Valid APK found: {}", package.file_name().as_str().bold())
            .as_str()
            .green()
    );
    println!();
    Ok(package)
}

/// One entry of the recovery menu.
enum MenuEntry {
    Full,
    Single(Operation),
    Custom,
}

/// Shows the recovery menu and returns the user selection.
///
/// A custom selection with no steps is returned as is, so it is rejected when resolved.
pub fn prompt_selection() -> Result<Selection> {
    let mut entries = vec![MenuEntry::Full];
    entries.extend(ALL_OPERATIONS.iter().map(|&op| MenuEntry::Single(op)));
    entries.push(MenuEntry::Custom);

    let items: Vec<String> = entries
        .iter()
        .map(|entry| match entry {
            MenuEntry::Full => "Full recovery (all the main steps)".to_owned(),
            MenuEntry::Single(op) => op.label().to_owned(),
            MenuEntry::Custom => "Custom selection".to_owned(),
        })
        .collect();

    let theme = ColorfulTheme::default();
    println!("{}", "Choose a recovery option:".cyan().bold());
    let chosen = Select::with_theme(&theme)
        .with_prompt("Select an option")
        .items(&items)
        .default(0)
        .max_length(10)
        .interact()
        .map_err(prompt_error)?;

    match entries.get(chosen) {
        Some(MenuEntry::Full) => Ok(Selection::Full),
        Some(MenuEntry::Single(op)) => Ok(Selection::Single(*op)),
        Some(MenuEntry::Custom) | None => {
            let labels: Vec<&str> = ALL_OPERATIONS.iter().map(|op| op.label()).collect();
            let picked = MultiSelect::with_theme(&theme)
                .with_prompt("Select the steps to run (space to toggle)")
                .items(&labels)
                .interact()
                .map_err(prompt_error)?;
            Ok(Selection::Custom(
                picked
                    .into_iter()
                    .filter_map(|i| ALL_OPERATIONS.get(i).copied())
                    .collect(),
            ))
        }
    }
}

/// Converts a prompt error into the fatal error kind.
fn prompt_error(error: dialoguer::Error) -> anyhow::Error {
    ErrorKind::Prompt {
        message: error.to_string(),
    }
    .into()
}

/// Output folders of the package that exist in the output folder, in step order.
pub fn existing_outputs(config: &Config, package: &Package) -> Vec<PathBuf> {
    ALL_OPERATIONS
        .iter()
        .filter_map(|op| op.output_suffix())
        .chain(Some(REPORT_SUFFIX))
        .map(|suffix| package.output_path(config.output_folder(), suffix))
        .filter(|path| path.is_dir())
        .collect()
}

/// Prints the completion summary: created folders, next steps and the log file.
pub fn print_summary(config: &Config, package: &Package, log: &RunLog) {
    if config.is_quiet() {
        return;
    }

    println!();
    println!("{}", "Recovery finished!".green().bold());
    println!("{}", "Created files and folders:".cyan().bold());
    for path in existing_outputs(config, package) {
        println!("{} {}/", "✔".green(), path.display());
    }

    println!();
    println!("{}", "Next steps:".yellow().bold());
    println!(
        "1. Read the report in {}",
        format!("{}{}/", package.base_name(), REPORT_SUFFIX)
            .as_str()
            .cyan()
    );
    println!("2. Look at the formatted code (if generated)");
    println!("3. Use the extracted assets");
    println!("4. Recreate your React Native project");
    println!();
    if log.path().exists() {
        println!(
            "{}",
            format!("Logs saved in {}", log.path().display())
                .as_str()
                .dimmed()
        );
    } else {
        println!("{}", "No errors were logged.".dimmed());
    }
    println!();
}

/// Prints the benchmarks of the run.
pub fn print_benchmarks(benchmarks: &[Benchmark]) {
    println!("{}", "Benchmarks:".bold());
    for benchmark in benchmarks {
        println!("{}", benchmark);
    }
}
