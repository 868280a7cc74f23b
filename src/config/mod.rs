/// Database configuration and connection management
pub mod database;

/// Application settings loading from config.toml and the environment
pub mod settings;

pub use settings::{AppConfig, BuildingConfig, load_app_configuration, load_config};
