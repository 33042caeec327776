//! `triples.toml` project configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Name of the configuration file searched for.
pub const CONFIG_FILE: &str = "triples.toml";

/// The top-level configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriplesConfig {
    /// Fragment source settings.
    #[serde(default)]
    pub fragments: FragmentsConfig,
    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

/// `[fragments]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FragmentsConfig {
    /// Fragment directory, relative to the config file's directory.
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// Fragment merged beneath every triple.
    #[serde(default)]
    pub prelude: Option<String>,
}

impl Default for FragmentsConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            prelude: None,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from("triples")
}

/// `[log]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default)]
    pub level: Option<String>,
}

/// Effective settings after applying command-line overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub root: PathBuf,
    pub prelude: Option<String>,
}

impl TriplesConfig {
    /// Search upward from `start_dir` for a `triples.toml` file, parse and
    /// return it along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(CONFIG_FILE);
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let config: TriplesConfig = toml::from_str(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                return Ok(Some((config, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Parse a configuration from a TOML string.
    #[cfg(test)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing triples.toml")
    }

    /// Combine the file settings with command-line overrides.
    ///
    /// A configured root is relative to `config_dir`; a root given on the
    /// command line is used as is.
    pub fn settings(
        &self,
        config_dir: &Path,
        root: Option<PathBuf>,
        prelude: Option<String>,
    ) -> Settings {
        Settings {
            root: root.unwrap_or_else(|| config_dir.join(&self.fragments.root)),
            prelude: prelude.or_else(|| self.fragments.prelude.clone()),
        }
    }

    /// Log filter used when `RUST_LOG` is unset.
    pub fn log_filter(&self, verbose: bool) -> String {
        if verbose {
            return "debug".to_string();
        }
        self.log.level.clone().unwrap_or_else(|| "info".to_string())
    }
}
