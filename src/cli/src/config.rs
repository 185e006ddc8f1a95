use std::{
    fs, io,
    path::{Path, PathBuf},
    thread::available_parallelism,
};

use color_eyre::eyre::WrapErr;
use interpreter::DEFAULT_MAX_INCLUDE_DEPTH;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Settings read from `config.toml`. Every field has a default, so an empty or missing file works.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub solver: SolverConfig,
    pub script: ScriptConfig,
}

/// How to launch the two-phase solver
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    /// Executable to run, looked up in `PATH`
    pub command: String,
    /// Extra arguments passed after the generated ones
    pub args: Vec<String>,
    /// Longest solution the solver should accept
    pub max_length: u32,
    /// Defaults to the available parallelism
    pub threads: Option<usize>,
    /// Where the solver dumps its pruning tables
    pub table_dir: Option<PathBuf>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            command: "twophase".to_owned(),
            args: Vec::new(),
            max_length: 30,
            threads: None,
            table_dir: None,
        }
    }
}

impl SolverConfig {
    pub fn threads(&self) -> usize {
        if let Some(threads) = self.threads {
            return threads;
        }

        match available_parallelism() {
            Ok(v) => v.get(),
            Err(e) => {
                warn!("Failed to get available parallelism; defaulting to 1: {e}");
                1
            }
        }
    }

    pub fn table_dir(&self) -> PathBuf {
        if let Some(dir) = &self.table_dir {
            return dir.clone();
        }

        // rob-twophase dumps its tables in its working directory
        let mut cache = dirs::cache_dir().unwrap_or_else(std::env::temp_dir);
        cache.push("rob-twophase-tables");
        cache
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScriptConfig {
    pub max_include_depth: usize,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        ScriptConfig {
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
        }
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("yasg").join("config.toml"))
    }

    /// Load the configuration at `path`, or from the default location if none is given.
    ///
    /// Only an explicitly given file has to exist.
    pub fn load(path: Option<&Path>) -> color_eyre::Result<Config> {
        let (path, required) = match path {
            Some(path) => (path.to_owned(), true),
            None => match Config::default_path() {
                Some(path) => (path, false),
                None => return Ok(Config::default()),
            },
        };

        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if !required && e.kind() == io::ErrorKind::NotFound => {
                debug!("No configuration at {}, using defaults", path.display());
                return Ok(Config::default());
            }
            Err(e) => {
                return Err(e)
                    .wrap_err_with(|| format!("Failed to read configuration file {}", path.display()));
            }
        };

        debug!("Loading configuration from {}", path.display());

        toml::from_str(&text)
            .wrap_err_with(|| format!("Failed to parse configuration file {}", path.display()))
    }
}
