//! External dependency checks.
//!
//! Before running any step, the tools needed by the selection are executed with a lightweight
//! version query. A tool that can not be executed stops the recovery before anything is written.

use crate::{
    config::{Config, Tools},
    error::ErrorKind,
    operation::Operation,
    process::{Invocation, ToolRunner},
};
use anyhow::Result;
use colored::Colorize;
use log::debug;

/// An external tool needed by the recovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    name: &'static str,
    probe: Invocation,
}

impl Dependency {
    /// Name shown to the user.
    pub fn name(&self) -> &str {
        self.name
    }

    /// Invocation used to check that the tool is present.
    pub fn probe(&self) -> &Invocation {
        &self.probe
    }
}

/// Returns the tools required to run the given steps.
///
/// `unzip` and `npx` are always required, APKTool only if its step was selected.
pub fn required(operations: &[Operation], tools: &Tools) -> Vec<Dependency> {
    let mut dependencies = vec![
        Dependency {
            name: "unzip",
            probe: Invocation::new(tools.unzip()).arg("-v"),
        },
        Dependency {
            name: "npm/npx",
            probe: Invocation::new(tools.npx()).arg("--version"),
        },
    ];

    if operations.contains(&Operation::Apktool) {
        dependencies.push(Dependency {
            name: "apktool",
            probe: Invocation::new(tools.apktool()).arg("--version"),
        });
    }

    dependencies
}

/// Checks that every tool required by the given steps can be executed.
///
/// Fails with [`ErrorKind::MissingDependency`] on the first missing tool.
pub fn check(runner: &dyn ToolRunner, operations: &[Operation], config: &Config) -> Result<()> {
    if !config.is_quiet() {
        println!("{}", "Checking dependencies…".cyan());
    }

    for dependency in required(operations, config.tools()) {
        let present = match runner.run(dependency.probe()) {
            Ok(output) => {
                if !output.is_success() {
                    debug!("`{}` failed: {}", dependency.probe(), output.diagnostic());
                }
                output.is_success()
            }
            Err(e) => {
                debug!("`{}` could not be executed: {}", dependency.probe(), e);
                false
            }
        };

        if !present {
            if !config.is_quiet() {
                println!("{} {}", "✘".red().bold(), format!("{} - MISSING", dependency.name()).as_str().red());
            }
            return Err(ErrorKind::MissingDependency {
                name: dependency.name().to_owned(),
            }
            .into());
        }

        if !config.is_quiet() {
            println!("{} {}", "✔".green().bold(), dependency.name().green());
        }
    }

    if !config.is_quiet() {
        println!();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{check, required};
    use crate::{
        config::Config,
        error::ErrorKind,
        operation::Operation,
        process::{stub::StubRunner, Invocation, ToolOutput},
    };
    use std::io;

    #[test]
    fn it_required_base_set() {
        let config = Config::default();
        let names: Vec<_> = required(&[Operation::Unzip, Operation::Beautify], config.tools())
            .iter()
            .map(|d| d.name().to_owned())
            .collect();
        assert_eq!(names, vec!["unzip", "npm/npx"]);
    }

    #[test]
    fn it_required_apktool() {
        let config = Config::default();
        let dependencies = required(&[Operation::Apktool], config.tools());
        assert_eq!(dependencies.len(), 3);
        assert_eq!(dependencies[2].name(), "apktool");
        assert_eq!(dependencies[2].probe().to_string(), "apktool --version");
    }

    #[test]
    fn it_check_passes() {
        let mut config = Config::default();
        config.set_quiet(true);
        let runner = StubRunner::new(|_: &Invocation| Ok(ToolOutput::success()));

        check(&runner, &[Operation::Apktool], &config).unwrap();
        assert_eq!(
            runner.calls(),
            vec!["unzip -v", "npx --version", "apktool --version"]
        );
    }

    #[test]
    fn it_check_missing_tool() {
        let mut config = Config::default();
        config.set_quiet(true);
        let runner = StubRunner::new(|invocation: &Invocation| {
            if invocation.program() == "apktool" {
                Err(io::Error::new(io::ErrorKind::NotFound, "not found"))
            } else {
                Ok(ToolOutput::success())
            }
        });

        let error = check(&runner, &[Operation::Unzip, Operation::Apktool], &config).unwrap_err();
        match error.downcast_ref::<ErrorKind>() {
            Some(ErrorKind::MissingDependency { name }) => assert_eq!(name, "apktool"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn it_check_stops_at_first_failure() {
        let mut config = Config::default();
        config.set_quiet(true);
        let runner = StubRunner::new(|_: &Invocation| Ok(ToolOutput::new(Some(127), "", "")));

        assert!(check(&runner, &[Operation::Apktool], &config).is_err());
        assert_eq!(runner.calls(), vec!["unzip -v"]);
    }
}
