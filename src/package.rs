//! Validated APK package descriptor.

use crate::error::ErrorKind;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Expected extension of the packages.
const PACKAGE_EXTENSION: &str = ".apk";
/// Suffix of the run log file name.
const LOG_SUFFIX: &str = "-recovery.log";
/// Suffix of the report directory name.
pub const REPORT_SUFFIX: &str = "-report";

/// An APK file that exists and can be recovered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    path: PathBuf,
    base_name: String,
}

impl Package {
    /// Validates the given path as an APK package.
    ///
    /// Fails with [`ErrorKind::InvalidInput`] if the path is empty, does not point to an existing
    /// file or does not have the `.apk` extension. Nothing is written to disk.
    pub fn validate<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let display = path.to_string_lossy();
        if display.trim().is_empty() {
            return Err(ErrorKind::invalid_input("please provide the path of the APK file").into());
        }
        if !path.exists() {
            return Err(ErrorKind::invalid_input(format!("file not found: {}", display)).into());
        }
        if !path.is_file() {
            return Err(ErrorKind::invalid_input(format!("{} is not a file", display)).into());
        }
        if !display.to_lowercase().ends_with(PACKAGE_EXTENSION) {
            return Err(ErrorKind::invalid_input(format!(
                "the file must have the {} extension: {}",
                PACKAGE_EXTENSION, display
            ))
            .into());
        }

        let base_name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .filter(|stem| !stem.is_empty())
            .ok_or_else(|| ErrorKind::invalid_input(format!("invalid file name: {}", display)))?;

        Ok(Self {
            path: path.to_path_buf(),
            base_name,
        })
    }

    /// Path of the APK file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name without the extension, used as prefix for every output.
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// File name of the package.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map_or_else(|| self.base_name.clone(), |n| n.to_string_lossy().into_owned())
    }

    /// Output path `<base><suffix>` inside the given folder.
    pub fn output_path<P: AsRef<Path>>(&self, folder: P, suffix: &str) -> PathBuf {
        folder
            .as_ref()
            .join(format!("{}{}", self.base_name, suffix))
    }

    /// Path of the run log inside the given folder.
    pub fn log_path<P: AsRef<Path>>(&self, folder: P) -> PathBuf {
        self.output_path(folder, LOG_SUFFIX)
    }
}
