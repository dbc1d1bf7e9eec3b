//! Bundle locator.

use crate::utils::{print_success, print_warning};
use log::debug;
use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

/// Extensions of the files the recursive search considers.
const BUNDLE_EXTENSIONS: [&str; 2] = ["bundle", "js"];
/// Words that must appear in the name of a bundle found by the recursive search.
const BUNDLE_NAME_HINTS: [&str; 2] = ["bundle", "index"];

/// Finds the JavaScript bundle in the given extraction directory.
///
/// The conventional locations are checked first, in order. If none exists, the directory is
/// searched recursively for a `.bundle` or `.js` file with `bundle` or `index` in its name.
/// Without an extraction directory nothing is searched.
pub fn find_bundle<S: AsRef<str>>(
    dir: Option<&Path>,
    search_paths: &[S],
    quiet: bool,
) -> Option<PathBuf> {
    let dir = dir?;

    for relative in search_paths {
        let candidate = dir.join(relative.as_ref());
        if candidate.is_file() {
            print_success(
                format!(
                    "Bundle found: {}",
                    candidate.file_name().map_or_else(
                        || candidate.display().to_string(),
                        |n| n.to_string_lossy().into_owned()
                    )
                ),
                quiet,
            );
            return Some(candidate);
        }
    }

    debug!(
        "no bundle in the conventional paths of {}, searching recursively",
        dir.display()
    );
    if let Some(found) = search_recursively(dir) {
        print_success(
            format!("Bundle found by search: {}", found.display()),
            quiet,
        );
        return Some(found);
    }

    print_warning("JavaScript bundle not found");
    None
}

/// Depth first search, in file name order, of a file that looks like a bundle.
fn search_recursively(dir: &Path) -> Option<PathBuf> {
    WalkDir::new(dir)
        .sort_by(|a, b| a.file_name().cmp(b.file_name()))
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("skipping unreadable entry during the bundle search: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .find(|path| looks_like_bundle(path))
}

/// Checks the extension and the name of a candidate file.
fn looks_like_bundle(path: &Path) -> bool {
    let has_extension = path
        .extension()
        .and_then(OsStr::to_str)
        .map_or(false, |ext| BUNDLE_EXTENSIONS.contains(&ext));
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    has_extension && BUNDLE_NAME_HINTS.iter().any(|hint| name.contains(hint))
}

/// Bundle lookup memoized for one recovery run.
///
/// The first lookup is cached, whether it found a bundle or not, and every later request gets
/// the same answer. A later extraction in the same run is not searched again, even if it would
/// contain a bundle.
#[derive(Debug, Default, Clone)]
pub struct BundleCache {
    lookup: Option<Option<PathBuf>>,
}

impl BundleCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the bundle has already been looked up in this run.
    pub fn is_resolved(&self) -> bool {
        self.lookup.is_some()
    }

    /// Returns the cached bundle, looking it up in the given directory on the first call.
    pub fn get_or_find<S: AsRef<str>>(
        &mut self,
        dir: Option<&Path>,
        search_paths: &[S],
        quiet: bool,
    ) -> Option<&Path> {
        if self.lookup.is_none() {
            self.lookup = Some(find_bundle(dir, search_paths, quiet));
        }
        self.lookup.as_ref().and_then(Option::as_deref)
    }
}
