//! React Native APK recovery
//!
//! Recovers the sources and assets of a React Native Android application from its APK, by
//! orchestrating external tools (`unzip`, APKTool, `js-beautify` and the bundle visualizer) and
//! writing Markdown reports of the results.

#![warn(
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results,
    variant_size_differences
)]

pub mod assets;
pub mod bundle;
/// Command Line Interface
pub mod cli;
pub mod config;
pub mod decompilation;
pub mod dependencies;
pub mod error;
pub mod javascript;
pub mod operation;
pub mod package;
pub mod process;
pub mod recovery;
pub mod results;
pub mod run_log;
pub mod ui;
pub mod utils;

use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use log::{Level, LevelFilter};
use std::{env, fs, io::Write, path::Path};
use utils::print_warning;

pub use crate::{
    config::Config,
    error::ErrorKind,
    operation::{Operation, Selection},
    package::Package,
    process::{Invocation, SystemRunner, ToolOutput, ToolRunner},
    recovery::Recovery,
    run_log::RunLog,
};

/// Banner shown when the tool starts.
pub static BANNER: &str = include_str!("banner.txt");

/// Logging target prefix of the crate.
const LOG_TARGET: &str = "rn_apk_recovery";

/// Loads the configuration and applies the command line options to it.
pub fn initialize_config(cli: &ArgMatches<'_>) -> Result<Config> {
    let mut config = Config::load(cli.value_of("config").map(Path::new))?;
    config.decorate_with_cli(cli);

    if config.is_verbose() {
        let mut loaded = config.loaded_files().peekable();
        if loaded.peek().is_none() {
            print_warning("no configuration file found, using the default configuration");
        }
        for file in loaded {
            println!("Configuration loaded from {}.", file.display());
        }
    }

    Ok(config)
}

/// Copies the contents of `from` into `to` recursively, creating `to` if needed.
pub fn copy_folder<P: AsRef<Path>>(from: P, to: P) -> Result<()> {
    let (from, to) = (from.as_ref(), to.as_ref());
    if !to.exists() {
        fs::create_dir_all(to).with_context(|| format!("could not create {}", to.display()))?;
    }

    for f in fs::read_dir(from).with_context(|| format!("could not read {}", from.display()))? {
        let path = f?.path();
        let name = path
            .file_name()
            .ok_or_else(|| anyhow!("invalid entry in {}", from.display()))?;
        if path.is_dir() {
            copy_folder(path.as_path(), to.join(name).as_path())?;
        } else {
            let _ = fs::copy(&path, to.join(name))
                .with_context(|| format!("could not copy {}", path.display()))?;
        }
    }
    Ok(())
}

/// Initializes the logger.
///
/// `RUST_LOG` takes precedence. Otherwise the crate logs at debug level in verbose mode, at info
/// level by default and only warnings and errors in quiet mode.
pub fn initialize_logger(is_verbose: bool, is_quiet: bool) {
    let log_level = if is_verbose {
        LevelFilter::Debug
    } else if is_quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    let _ = builder.format(|buf, record| match record.level() {
        Level::Warn => writeln!(
            buf,
            "{}{}",
            "Warning: ".bold().yellow(),
            record.args().to_string().as_str().yellow()
        ),
        Level::Error => writeln!(
            buf,
            "{}{}",
            "Error: ".bold().red(),
            record.args().to_string().as_str().red()
        ),
        Level::Debug => writeln!(
            buf,
            "{}{}",
            "Debug: ".bold(),
            record.args().to_string().as_str().bold()
        ),
        Level::Info => writeln!(buf, "{}", record.args()),
        Level::Trace => writeln!(buf, "{}: {}", record.level(), record.args()),
    });

    if let Ok(env_log) = env::var("RUST_LOG") {
        let _ = builder.parse_filters(&env_log);
    } else {
        let _ = builder.filter(Some(LOG_TARGET), log_level);
    }

    if let Err(e) = builder.try_init() {
        eprintln!("Could not initialize logger: {}", e);
    }
}
