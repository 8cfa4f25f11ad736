//! Ambient settings for igcopy.
//!
//! What gets mirrored is decided on the command line; this crate only covers
//! how the tool behaves while doing it (logging and ledger access). Values are
//! layered, later sources overriding earlier ones:
//!
//! 1. Built-in defaults.
//! 2. A TOML file: `$IGCOPY_CONFIG` if set, otherwise `config.toml` in the
//!    platform configuration directory. A missing file is fine.
//! 3. `IGCOPY_`-prefixed environment variables, with `__` separating nested
//!    keys (`IGCOPY_LOG__LEVEL=debug`).

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::level_filters::LevelFilter;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV: &str = "IGCOPY_CONFIG";
const ENV_PREFIX: &str = "IGCOPY_";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log: LogConfig,
    pub ledger: LedgerConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default level filter, used when `RUST_LOG` is not set.
    pub level: String,
    /// Colour diagnostics written to stderr.
    pub ansi: bool,
}
impl Default for LogConfig {
    fn default() -> Self {
        Self { level: "warn".to_string(), ansi: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// How long to wait on a locked ledger file, in milliseconds.
    pub busy_timeout_ms: u64,
}
impl Default for LedgerConfig {
    fn default() -> Self {
        Self { busy_timeout_ms: 1500 }
    }
}
impl LedgerConfig {
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

impl Config {
    /// Load and validate the configuration from the default locations.
    pub fn load() -> Result<Self> {
        Self::load_from(default_path().as_deref())
    }

    /// Load and validate the configuration, reading `file` (if any) between
    /// the defaults and the environment.
    pub fn load_from(file: Option<&Path>) -> Result<Self> {
        let config: Self = Self::figment(file)
            .extract()
            .or_raise(|| ErrorKind::Load(file.map(Path::to_path_buf).unwrap_or_default()))?;
        config.validate()?;
        Ok(config)
    }

    fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(file) = file {
            figment = figment.merge(Toml::file(file));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).ignore(&["config"]).split("__"))
    }

    pub fn validate(&self) -> Result<()> {
        self.log.level_filter()?;
        if self.ledger.busy_timeout_ms == 0 {
            exn::bail!(ErrorKind::Invalid("ledger.busy_timeout_ms".to_string()));
        }
        Ok(())
    }
}

impl LogConfig {
    pub fn level_filter(&self) -> Result<LevelFilter> {
        LevelFilter::from_str(self.level.trim()).or_raise(|| ErrorKind::Invalid("log.level".to_string()))
    }
}

/// `$IGCOPY_CONFIG`, falling back to the platform configuration directory.
pub fn default_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }
    ProjectDirs::from("", "", "igcopy").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}
