//! Configuration module for skdocs
//!
//! Handles loading settings from YAML files and environment variables.

mod settings;

pub use settings::*;

use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

/// Environment variable naming an explicit settings file
pub const SETTINGS_PATH_VAR: &str = "SKDOCS_SETTINGS_PATH";

/// Candidate settings files, in lookup order
pub fn settings_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(path) = std::env::var(SETTINGS_PATH_VAR) {
        paths.push(PathBuf::from(path));
    }

    paths.push(PathBuf::from("settings.yml"));
    paths.push(PathBuf::from("config/settings.yml"));

    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("skdocs/settings.yml"));
    }

    paths
}

/// Load settings from the first existing settings file, or use defaults.
/// Environment overrides are applied either way.
pub fn load() -> Result<Settings> {
    let mut settings = match settings_paths().into_iter().find(|p| p.exists()) {
        Some(path) => {
            info!("Loading settings from: {}", path.display());
            Settings::from_file(&path)?
        }
        None => {
            info!("No settings file found, using defaults");
            Settings::default()
        }
    };

    settings.merge_env();
    Ok(settings)
}
