use crate::build::DEFAULT_SCRUBBED_VARS;
use crate::error::{GitVersionsError, Result};
use crate::patch::DEFAULT_HEADER_FIX_COMMIT;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const LOCAL_CONFIG: &str = "./gitversions.toml";
const USER_CONFIG: &str = ".gitversions.toml";

/// Represents the complete configuration for git-versions.
///
/// Every value can be overridden from the command line; flags win over the file.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    /// Git checkout to build from
    #[serde(default)]
    pub source: Option<PathBuf>,

    /// Root under which each version is installed
    #[serde(default)]
    pub destination: Option<PathBuf>,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub selection: SelectionConfig,

    #[serde(default)]
    pub patches: PatchesConfig,
}

fn default_make() -> String {
    "make".to_string()
}

fn default_scrub_env() -> Vec<String> {
    DEFAULT_SCRUBBED_VARS.iter().map(|v| v.to_string()).collect()
}

fn default_true() -> bool {
    true
}

fn default_header_fix_commit() -> String {
    DEFAULT_HEADER_FIX_COMMIT.to_string()
}

/// How `make` is invoked.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BuildConfig {
    #[serde(default = "default_make")]
    pub make: String,

    #[serde(default)]
    pub jobs: Option<u32>,

    /// Extra variables or flags, e.g. `NO_TCLTK=1`
    #[serde(default)]
    pub extra_args: Vec<String>,

    /// Environment variables removed while building
    #[serde(default = "default_scrub_env")]
    pub scrub_env: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            make: default_make(),
            jobs: None,
            extra_args: Vec::new(),
            scrub_env: default_scrub_env(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SelectionConfig {
    #[serde(default = "default_true")]
    pub include_rc: bool,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        SelectionConfig { include_rc: true }
    }
}

/// Source corrections that need outside input.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PatchesConfig {
    /// Commit cherry-picked onto releases 1.0.0 through 1.7.0.9, which miss a system header.
    ///
    /// The built-in default is an abbreviated id that has not been checked against every
    /// clone. Set this to the fix commit as it exists in your checkout before building any
    /// release in that range; an id that does not resolve stops the run with a patch error
    /// naming this key.
    #[serde(default = "default_header_fix_commit")]
    pub header_fix_commit: String,
}

impl Default for PatchesConfig {
    fn default() -> Self {
        PatchesConfig {
            header_fix_commit: default_header_fix_commit(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gitversions.toml` in current directory
/// 3. `.gitversions.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Errors
/// A config error if a file exists but cannot be read or parsed. An explicit path that does
/// not exist is an error too.
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    if let Some(path) = config_path {
        return read_config(Path::new(path));
    }

    let local = Path::new(LOCAL_CONFIG);
    if local.exists() {
        return read_config(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
        let user = config_dir.join(USER_CONFIG);
        if user.exists() {
            return read_config(&user);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path).map_err(|e| {
        GitVersionsError::config(format!("Cannot read {}: {}", path.display(), e))
    })?;
    parse_config(&contents)
        .map_err(|e| GitVersionsError::config(format!("{}: {}", path.display(), e)))
}

/// Parse TOML text into a `Config`
pub fn parse_config(contents: &str) -> std::result::Result<Config, toml::de::Error> {
    toml::from_str(contents)
}
