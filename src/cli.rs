//! Command line interface definition.
//!
//! This module only depends on `clap`, since the build script includes it to generate the shell
//! completion scripts.

use clap::{crate_version, App, Arg};

/// Values accepted by the `--steps` option.
pub const STEP_VALUES: [&str; 7] = [
    "full",
    "unzip",
    "apktool",
    "beautify",
    "analyze",
    "assets",
    "visualizer",
];

/// Generates the command line interface.
pub fn generate() -> App<'static, 'static> {
    App::new("React Native APK Recovery")
        .version(crate_version!())
        .about("Recovers JavaScript sources, assets and reports from React Native APK files")
        .arg(
            Arg::with_name("package")
                .help("Path to the .apk file. It will be asked interactively if not provided")
                .value_name("PACKAGE")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("steps")
                .short("s")
                .long("steps")
                .value_name("STEP")
                .help("Comma separated recovery steps to run, in order. If omitted, a menu is shown")
                .takes_value(true)
                .multiple(true)
                .require_delimiter(true)
                .possible_values(&STEP_VALUES)
                .case_insensitive(true)
                .conflicts_with("full"),
        )
        .arg(
            Arg::with_name("full")
                .long("full")
                .help("Runs the full recovery (unzip, apktool, beautify, analyze and assets)"),
        )
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("FILE")
                .takes_value(true)
                .help("Configuration file to use instead of the default lookup"),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .value_name("FOLDER")
                .takes_value(true)
                .help("Folder where the output directories will be created"),
        )
        .arg(
            Arg::with_name("json")
                .long("json")
                .help("Also generates a JSON version of the recovery report"),
        )
        .arg(
            Arg::with_name("open")
                .long("open")
                .help("Opens the recovery report once it has been generated"),
        )
        .arg(
            Arg::with_name("bench")
                .long("bench")
                .help("Shows the time spent in each recovery step"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .conflicts_with("quiet")
                .help("If you'd like the tool to explain every step of the recovery"),
        )
        .arg(
            Arg::with_name("quiet")
                .short("q")
                .long("quiet")
                .conflicts_with("verbose")
                .help("Only warnings and errors will be shown"),
        )
}
