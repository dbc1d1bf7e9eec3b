//! React Native APK recovery command line tool.

use anyhow::Result;
use clap::ArgMatches;
use rn_apk_recovery_core::{
    cli, initialize_config, initialize_logger, ui, utils::print_error, ErrorKind, Package,
    Recovery, Selection, SystemRunner,
};
use std::process;

fn main() {
    let cli = cli::generate().get_matches();
    initialize_logger(cli.is_present("verbose"), cli.is_present("quiet"));

    if let Err(e) = run(&cli) {
        print_error(format!("{:#}", e));
        process::exit(e.downcast_ref::<ErrorKind>().map_or(1, ErrorKind::exit_code));
    }
}

/// Resolves the package and the steps, then runs the recovery.
fn run(cli: &ArgMatches<'_>) -> Result<()> {
    let config = initialize_config(cli)?;
    if !config.is_quiet() {
        ui::print_banner();
    }

    let package = match cli.value_of("package") {
        Some(path) => Package::validate(path)?,
        None => ui::prompt_package()?,
    };

    let selection = if cli.is_present("full") {
        Selection::Full
    } else if let Some(values) = cli.values_of("steps") {
        Selection::from_values(values)?
    } else {
        ui::prompt_selection()?
    };
    let operations = selection.resolve()?;

    let runner = SystemRunner;
    let mut recovery = Recovery::new(&config, &package, &runner, operations);
    let _ = recovery.run()?;

    ui::print_summary(&config, &package, recovery.log());
    if config.is_bench() {
        ui::print_benchmarks(recovery.benchmarks());
    }

    Ok(())
}
