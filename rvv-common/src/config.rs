//! Configuration loading and catalog folder resolution

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "RVV_CONFIG";

/// Environment variable naming a directory of catalog TOML files
pub const CATALOG_DIR_ENV_VAR: &str = "RVV_CATALOG_DIR";

/// Contents of `config.toml`
///
/// Every field has a default so that a partial (or empty) file is accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Directory holding `company.toml`, `fund.toml`, `gp.toml` catalogs
    #[serde(default)]
    pub catalog_dir: Option<PathBuf>,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

/// Logging section of `config.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Optional log file; stderr when absent
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Export section of `config.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Default destination for the populated template
    #[serde(default)]
    pub output: Option<PathBuf>,

    /// Template workbook (`.xlsx`) to fill; a CSV grid is written without one
    #[serde(default)]
    pub template: Option<PathBuf>,
}

impl TomlConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Read config {} failed: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }
}

/// Locate the configuration file following this priority order:
/// 1. Command-line argument (highest priority)
/// 2. `RVV_CONFIG` environment variable
/// 3. Per-user config dir (`~/.config/rvv/config.toml` on Linux)
/// 4. `/etc/rvv/config.toml` (Linux only)
pub fn locate_config_file(cli_arg: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = cli_arg {
        return Ok(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        return Ok(PathBuf::from(path));
    }

    let user_config = dirs::config_dir().map(|d| d.join("rvv").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Ok(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/rvv/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
    }

    Err(Error::Config("No config file found".to_string()))
}

/// Load configuration, falling back to defaults
///
/// A missing or unreadable config file never aborts startup: the problem is
/// logged and compiled defaults are used instead.
pub fn load_config(cli_arg: Option<&Path>) -> TomlConfig {
    let path = match locate_config_file(cli_arg) {
        Ok(path) => path,
        Err(e) => {
            debug!("{}; using defaults", e);
            return TomlConfig::default();
        }
    };

    match TomlConfig::load(&path) {
        Ok(config) => {
            debug!("Loaded config from {}", path.display());
            config
        }
        Err(e) => {
            warn!("Ignoring config {}: {}", path.display(), e);
            TomlConfig::default()
        }
    }
}

/// Resolve the catalog directory following this priority order:
/// 1. Command-line argument (highest priority)
/// 2. `RVV_CATALOG_DIR` environment variable
/// 3. `catalog_dir` from the TOML config
/// 4. None: use the built-in catalogs
pub fn resolve_catalog_dir(cli_arg: Option<&Path>, config: &TomlConfig) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CATALOG_DIR_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    config.catalog_dir.clone()
}
