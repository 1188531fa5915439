//! Load character builds and simulation settings from YAML or JSON files.
//! The format is chosen by file extension.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::character::Character;
use crate::combat::SimulationConfig;
use crate::error::LoadError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Json,
}

fn format_for(path: &Path) -> Result<Format, LoadError> {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("yaml") | Some("yml") => Ok(Format::Yaml),
        Some("json") => Ok(Format::Json),
        _ => Err(LoadError::UnsupportedFormat(path.display().to_string())),
    }
}

fn load_file<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let format = format_for(path)?;
    let display = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: display.clone(),
        source,
    })?;
    match format {
        Format::Yaml => serde_yaml::from_str(&raw).map_err(|source| LoadError::Yaml {
            path: display,
            source,
        }),
        Format::Json => serde_json::from_str(&raw).map_err(|source| LoadError::Json {
            path: display,
            source,
        }),
    }
}

/// Load a character build. Stats are not validated here; [Character::snapshot] does that.
pub fn load_character(path: impl AsRef<Path>) -> Result<Character, LoadError> {
    let path = path.as_ref();
    let character: Character = load_file(path)?;
    tracing::debug!(
        path = %path.display(),
        armor = character.armor.len(),
        weapons = character.weapons.len(),
        "loaded build"
    );
    Ok(character)
}

/// Load simulation settings. Missing fields fall back to [SimulationConfig::default].
pub fn load_simulation_config(path: impl AsRef<Path>) -> Result<SimulationConfig, LoadError> {
    load_file(path.as_ref())
}
