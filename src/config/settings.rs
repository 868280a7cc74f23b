//! Application settings loading from config.toml
//!
//! This module reads the optional `config.toml` next to the binary. The file can
//! name the database, the directory exports are written to, and a `[building]`
//! table used to seed the building profile on first run. `DATABASE_URL` in the
//! environment (or `.env`) always wins over the file.

use crate::config::database;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default location of the settings file
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// `SeaORM` connection URL
    #[serde(default)]
    pub database_url: Option<String>,
    /// Directory CSV exports are written to
    #[serde(default)]
    pub export_dir: Option<PathBuf>,
    /// Building profile to seed when the database has none
    #[serde(default)]
    pub building: Option<BuildingConfig>,
}

/// Building profile as written in config.toml
#[derive(Debug, Deserialize, Clone)]
pub struct BuildingConfig {
    /// Building name
    pub name: String,
    /// Building manager
    #[serde(default)]
    pub manager: String,
    /// Assistant manager
    #[serde(default)]
    pub assistant: String,
    /// Auditor
    #[serde(default)]
    pub auditor: String,
    /// Contact phone
    #[serde(default)]
    pub phone: String,
    /// Postal address
    #[serde(default)]
    pub address: String,
}

impl AppConfig {
    /// Resolved database URL: environment, then file, then the built-in default.
    #[must_use]
    pub fn database_url(&self) -> String {
        database::get_database_url(self.database_url.as_deref())
    }

    /// Directory for exports, defaulting to the working directory.
    #[must_use]
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Loads settings from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path_ref.display()),
    })
}

/// Loads `config.toml` from the working directory, or defaults when it is absent.
///
/// A file that exists but does not parse is still an error.
pub fn load_app_configuration() -> Result<AppConfig> {
    if Path::new(DEFAULT_CONFIG_PATH).exists() {
        load_config(DEFAULT_CONFIG_PATH)
    } else {
        tracing::info!("No {DEFAULT_CONFIG_PATH} found, using defaults.");
        Ok(AppConfig::default())
    }
}
