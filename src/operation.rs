//! Recovery steps and the user selection of them.

use crate::error::ErrorKind;
use anyhow::Result;
use serde::{Serialize, Serializer};
use std::{fmt, str::FromStr};

/// A single recovery step.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Copy, Clone)]
pub enum Operation {
    /// Plain archive extraction with `unzip`.
    Unzip,
    /// Resource and manifest decompilation with APKTool.
    Apktool,
    /// JavaScript bundle formatting.
    Beautify,
    /// Bundle statistics and library detection.
    Analyze,
    /// Copy of images, icons and raw resources.
    Assets,
    /// React Native bundle visualizer.
    Visualizer,
}

/// Steps of the full recovery, in execution order.
pub const FULL_RECOVERY: [Operation; 5] = [
    Operation::Unzip,
    Operation::Apktool,
    Operation::Beautify,
    Operation::Analyze,
    Operation::Assets,
];

/// Every step, in menu order.
pub const ALL_OPERATIONS: [Operation; 6] = [
    Operation::Unzip,
    Operation::Apktool,
    Operation::Beautify,
    Operation::Analyze,
    Operation::Assets,
    Operation::Visualizer,
];

impl Operation {
    /// Human readable name of the step.
    pub fn label(self) -> &'static str {
        match self {
            Self::Unzip => "Basic extraction (unzip)",
            Self::Apktool => "Advanced decompilation (APKTool)",
            Self::Beautify => "Beautify JavaScript",
            Self::Analyze => "Bundle analysis",
            Self::Assets => "Extract assets",
            Self::Visualizer => "Bundle visualizer",
        }
    }

    /// Suffix of the output directory created by the step, if it creates one.
    pub fn output_suffix(self) -> Option<&'static str> {
        match self {
            Self::Unzip => Some("-unzip"),
            Self::Apktool => Some("-apktool"),
            Self::Beautify => Some("-beautified"),
            Self::Analyze => Some("-analysis"),
            Self::Assets => Some("-assets"),
            Self::Visualizer => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unzip => "unzip",
            Self::Apktool => "apktool",
            Self::Beautify => "beautify",
            Self::Analyze => "analyze",
            Self::Assets => "assets",
            Self::Visualizer => "visualizer",
        };
        f.write_str(name)
    }
}

impl FromStr for Operation {
    type Err = ErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "unzip" => Ok(Self::Unzip),
            "apktool" => Ok(Self::Apktool),
            "beautify" => Ok(Self::Beautify),
            "analyze" => Ok(Self::Analyze),
            "assets" => Ok(Self::Assets),
            "visualizer" => Ok(Self::Visualizer),
            other => Err(ErrorKind::invalid_input(format!(
                "unknown recovery step `{}`",
                other
            ))),
        }
    }
}

impl Serialize for Operation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Recovery steps chosen by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The full recovery.
    Full,
    /// One single step.
    Single(Operation),
    /// A custom list of steps, in the order they were picked.
    Custom(Vec<Operation>),
}

impl Selection {
    /// Builds the selection from command line values.
    ///
    /// The single value `full` selects the full recovery, any other list of values is a custom
    /// selection.
    pub fn from_values<I, S>(values: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let values: Vec<S> = values.into_iter().collect();
        if values.len() == 1 {
            match values[0].as_ref().trim().to_lowercase().as_str() {
                "full" => return Ok(Self::Full),
                "custom" => {
                    return Err(ErrorKind::invalid_input(
                        "`custom` needs the list of steps to run",
                    )
                    .into())
                }
                single => return Ok(Self::Single(single.parse()?)),
            }
        }

        let mut operations = Vec::with_capacity(values.len());
        for value in &values {
            if value.as_ref().eq_ignore_ascii_case("full") {
                return Err(ErrorKind::invalid_input(
                    "`full` can not be combined with other steps",
                )
                .into());
            }
            operations.push(value.as_ref().parse::<Operation>()?);
        }
        Ok(Self::Custom(operations))
    }

    /// Resolves the selection to the ordered list of steps to run.
    pub fn resolve(&self) -> Result<Vec<Operation>> {
        match self {
            Self::Full => Ok(FULL_RECOVERY.to_vec()),
            Self::Single(operation) => Ok(vec![*operation]),
            Self::Custom(operations) => {
                let mut resolved = Vec::with_capacity(operations.len());
                for operation in operations {
                    if !resolved.contains(operation) {
                        resolved.push(*operation);
                    }
                }
                if resolved.is_empty() {
                    return Err(ErrorKind::EmptySelection.into());
                }
                Ok(resolved)
            }
        }
    }
}
