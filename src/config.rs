//! Configuration module.
//!
//! Handles and configures the initial settings and variables needed to run the recovery. The
//! configuration is loaded from a TOML file and then decorated with the command line options.

use crate::error::ErrorKind;
use anyhow::{Context, Result};
use clap::ArgMatches;
use serde_derive::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Conventional locations of the React Native bundle inside an extracted package, in lookup
/// order.
pub const BUNDLE_SEARCH_PATHS: [&str; 4] = [
    "assets/index.android.bundle",
    "assets/index.bundle",
    "assets/main.jsbundle",
    "assets/bundle.js",
];

/// Folders copied by the asset extraction.
pub const ASSET_FOLDERS: [&str; 5] = ["assets", "res", "drawable", "mipmap", "raw"];

/// Libraries searched for in the bundle analysis.
pub const COMMON_LIBRARIES: [&str; 13] = [
    "react-native",
    "react",
    "redux",
    "axios",
    "lodash",
    "moment",
    "expo",
    "navigation",
    "@react-native-community",
    "react-native-vector-icons",
    "react-native-paper",
    "react-native-gesture-handler",
    "react-native-screens",
];

/// Local configuration file.
const LOCAL_CONFIG_FILE: &str = "config.toml";
/// System wide configuration file.
#[cfg(target_family = "unix")]
const GLOBAL_CONFIG_FILE: &str = "/etc/rn-apk-recovery/config.toml";

/// Largest accepted configuration file.
const MAX_CONFIG_SIZE: u64 = 1024 * 1024;

/// Configuration of the external tools.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Tools {
    unzip: String,
    apktool: String,
    npx: String,
    beautifier: String,
    visualizer: String,
}

impl Tools {
    /// Program used to extract and list archives.
    pub fn unzip(&self) -> &str {
        &self.unzip
    }

    /// APKTool program.
    pub fn apktool(&self) -> &str {
        &self.apktool
    }

    /// `npx` program, used to run the JavaScript tooling.
    pub fn npx(&self) -> &str {
        &self.npx
    }

    /// npm package of the JavaScript formatter.
    pub fn beautifier(&self) -> &str {
        &self.beautifier
    }

    /// npm package of the bundle visualizer.
    pub fn visualizer(&self) -> &str {
        &self.visualizer
    }
}

impl Default for Tools {
    fn default() -> Self {
        Self {
            unzip: "unzip".to_owned(),
            apktool: "apktool".to_owned(),
            npx: "npx".to_owned(),
            beautifier: "js-beautify".to_owned(),
            visualizer: "react-native-bundle-visualizer".to_owned(),
        }
    }
}

/// Recovery configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Verbose mode.
    #[serde(skip)]
    verbose: bool,
    /// Quiet mode.
    #[serde(skip)]
    quiet: bool,
    /// Opens the report once generated.
    #[serde(skip)]
    open: bool,
    /// Benchmark mode.
    bench: bool,
    /// Also generate the JSON report.
    json: bool,
    /// Folder where the output directories are created.
    output_folder: PathBuf,
    /// External tools.
    tools: Tools,
    /// Conventional bundle locations.
    bundle_search_paths: Vec<String>,
    /// Asset folders to copy.
    asset_folders: Vec<String>,
    /// Library catalogue for the bundle analysis.
    libraries: Vec<String>,
    /// Configuration files loaded, in order.
    #[serde(skip)]
    loaded_files: Vec<PathBuf>,
}

impl Config {
    /// Loads the configuration from the given TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let size = fs::metadata(path)
            .with_context(|| format!("could not read metadata of {}", path.display()))?
            .len();
        if size > MAX_CONFIG_SIZE {
            return Err(ErrorKind::Config {
                message: format!("{} is too big", path.display()),
            }
            .into());
        }

        let toml = fs::read_to_string(path)
            .with_context(|| format!("could not read {}", path.display()))?;
        let mut config = Self::from_toml(&toml).map_err(|e| ErrorKind::Config {
            message: format!("{}: {}", path.display(), e),
        })?;
        config.loaded_files.push(path.to_path_buf());

        Ok(config)
    }

    /// Parses the configuration from a TOML string.
    fn from_toml(toml: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml)
    }

    /// Loads the configuration using the default lookup.
    ///
    /// The given file is used if provided. Otherwise the local `config.toml` is used and, on
    /// UNIX, the system wide `/etc/rn-apk-recovery/config.toml` if the local one does not
    /// exist. If no file is found, the default configuration is used.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let local = Path::new(LOCAL_CONFIG_FILE);
        if local.exists() {
            return Self::from_file(local);
        }

        #[cfg(target_family = "unix")]
        {
            let global = Path::new(GLOBAL_CONFIG_FILE);
            if global.exists() {
                return Self::from_file(global);
            }
        }

        Ok(Self::default())
    }

    /// Modifies the configuration with the command line options.
    pub fn decorate_with_cli(&mut self, cli: &ArgMatches<'_>) {
        self.verbose = cli.is_present("verbose");
        self.quiet = cli.is_present("quiet");
        self.open = cli.is_present("open");
        if cli.is_present("bench") {
            self.bench = true;
        }
        if cli.is_present("json") {
            self.json = true;
        }
        if let Some(output) = cli.value_of("output") {
            self.output_folder = PathBuf::from(output);
        }
    }

    /// Returns the configuration files that were loaded.
    pub fn loaded_files(&self) -> impl Iterator<Item = &Path> {
        self.loaded_files.iter().map(PathBuf::as_path)
    }

    /// Returns true if the recovery is in verbose mode.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Sets the verbose mode.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Returns true if the recovery is in quiet mode.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Sets the quiet mode.
    pub fn set_quiet(&mut self, quiet: bool) {
        self.quiet = quiet;
    }

    /// Returns true if the report has to be opened once generated.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Returns true if step timings have to be shown.
    pub fn is_bench(&self) -> bool {
        self.bench
    }

    /// Sets the benchmark mode.
    pub fn set_bench(&mut self, bench: bool) {
        self.bench = bench;
    }

    /// Returns true if the JSON report has to be generated.
    pub fn has_to_generate_json(&self) -> bool {
        self.json
    }

    /// Sets the JSON report generation.
    pub fn set_json(&mut self, json: bool) {
        self.json = json;
    }

    /// Folder where the output directories are created.
    pub fn output_folder(&self) -> &Path {
        &self.output_folder
    }

    /// Sets the output folder.
    pub fn set_output_folder<P: Into<PathBuf>>(&mut self, folder: P) {
        self.output_folder = folder.into();
    }

    /// External tools configuration.
    pub fn tools(&self) -> &Tools {
        &self.tools
    }

    /// Conventional bundle locations, relative to the extraction directory.
    pub fn bundle_search_paths(&self) -> &[String] {
        &self.bundle_search_paths
    }

    /// Asset folders to copy.
    pub fn asset_folders(&self) -> &[String] {
        &self.asset_folders
    }

    /// Library catalogue for the bundle analysis.
    pub fn libraries(&self) -> &[String] {
        &self.libraries
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verbose: false,
            quiet: false,
            open: false,
            bench: false,
            json: false,
            output_folder: PathBuf::from("."),
            tools: Tools::default(),
            bundle_search_paths: BUNDLE_SEARCH_PATHS.iter().map(|&p| p.to_owned()).collect(),
            asset_folders: ASSET_FOLDERS.iter().map(|&f| f.to_owned()).collect(),
            libraries: COMMON_LIBRARIES.iter().map(|&l| l.to_owned()).collect(),
            loaded_files: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, ASSET_FOLDERS, BUNDLE_SEARCH_PATHS, COMMON_LIBRARIES};
    use crate::{cli, error::ErrorKind};
    use std::{fs, path::Path};

    #[test]
    fn it_config() {
        let mut config = Config::default();

        assert!(!config.is_verbose());
        assert!(!config.is_quiet());
        assert!(!config.is_open());
        assert!(!config.is_bench());
        assert!(!config.has_to_generate_json());
        assert_eq!(config.output_folder(), Path::new("."));
        assert_eq!(config.tools().unzip(), "unzip");
        assert_eq!(config.tools().apktool(), "apktool");
        assert_eq!(config.tools().npx(), "npx");
        assert_eq!(config.tools().beautifier(), "js-beautify");
        assert_eq!(
            config.tools().visualizer(),
            "react-native-bundle-visualizer"
        );
        assert_eq!(config.bundle_search_paths(), &BUNDLE_SEARCH_PATHS[..]);
        assert_eq!(config.asset_folders(), &ASSET_FOLDERS[..]);
        assert_eq!(config.libraries(), &COMMON_LIBRARIES[..]);
        assert_eq!(config.loaded_files().next(), None);

        config.set_verbose(true);
        config.set_quiet(true);
        config.set_bench(true);
        config.set_json(true);
        config.set_output_folder("out");

        assert!(config.is_verbose());
        assert!(config.is_quiet());
        assert!(config.is_bench());
        assert!(config.has_to_generate_json());
        assert_eq!(config.output_folder(), Path::new("out"));
    }

    #[test]
    fn it_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "json = true\n\
             output_folder = \"recovered\"\n\
             libraries = [\"mobx\"]\n\
             \n\
             [tools]\n\
             apktool = \"/opt/apktool/apktool\"\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert!(config.has_to_generate_json());
        assert!(!config.is_bench());
        assert_eq!(config.output_folder(), Path::new("recovered"));
        assert_eq!(config.libraries(), &["mobx".to_owned()][..]);
        assert_eq!(config.tools().apktool(), "/opt/apktool/apktool");
        assert_eq!(config.tools().unzip(), "unzip");
        assert_eq!(config.bundle_search_paths(), &BUNDLE_SEARCH_PATHS[..]);
        assert_eq!(config.loaded_files().collect::<Vec<_>>(), vec![path.as_path()]);
    }

    #[test]
    fn it_config_sample() {
        let sample = Path::new(env!("CARGO_MANIFEST_DIR")).join("config.toml.sample");
        let config = Config::from_file(&sample).unwrap();
        let default = Config::default();

        assert_eq!(config.tools(), default.tools());
        assert_eq!(config.output_folder(), default.output_folder());
        assert_eq!(config.bundle_search_paths(), default.bundle_search_paths());
        assert_eq!(config.asset_folders(), default.asset_folders());
        assert_eq!(config.libraries(), default.libraries());
    }

    #[test]
    fn it_config_unknown_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "threads = 4\n").unwrap();

        let error = Config::from_file(&path).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<ErrorKind>(),
            Some(ErrorKind::Config { .. })
        ));
    }

    #[test]
    fn it_decorate_with_cli() {
        let matches = cli::generate().get_matches_from(vec![
            "rn-apk-recovery",
            "app.apk",
            "--json",
            "--bench",
            "-v",
            "--open",
            "-o",
            "target/out",
        ]);

        let mut config = Config::default();
        config.decorate_with_cli(&matches);

        assert!(config.is_verbose());
        assert!(config.is_open());
        assert!(!config.is_quiet());
        assert!(config.is_bench());
        assert!(config.has_to_generate_json());
        assert_eq!(config.output_folder(), Path::new("target/out"));
    }
}
