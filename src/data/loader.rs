//! RON preset loader
//!
//! Loads generation presets from external RON files, with a lenient
//! variant that falls back to the built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use ron::ser::PrettyConfig;

use super::config::{default_presets, GenerationConfig};
use crate::error::ConfigError;

/// Read and parse a preset, surfacing every failure
pub fn load_config(path: impl AsRef<Path>) -> Result<GenerationConfig, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Load a preset, or the default config if the file is missing or malformed
pub fn load_or_default(path: impl AsRef<Path>) -> GenerationConfig {
    let path = path.as_ref();
    match load_config(path) {
        Ok(config) => {
            info!("Loaded preset {}", path.display());
            config
        }
        Err(e) => {
            warn!("{}. Using default preset.", e);
            GenerationConfig::default()
        }
    }
}

/// Write the built-in presets to `dir` as `<name>.ron`, creating it if needed
pub fn export_presets(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, ConfigError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
        path: dir.display().to_string(),
        source,
    })?;

    let mut written = Vec::new();
    for (name, config) in default_presets() {
        let path = dir.join(format!("{}.ron", name));
        let content = ron::ser::to_string_pretty(&config, PrettyConfig::default())?;
        fs::write(&path, content).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        written.push(path);
    }
    info!("Exported {} presets to {}", written.len(), dir.display());
    Ok(written)
}
