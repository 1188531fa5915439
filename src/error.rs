use thiserror::Error;

use crate::combat::Hand;

/// Inputs rejected at simulation entry. Raised before any batch runs, never mid-loop.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("simulation time must be positive and finite, got {0}")]
    InvalidSimTime(f64),
    #[error("batch count must be at least 1")]
    NoBatches,
    #[error("opponent level must be between 1 and 255, got {0}")]
    InvalidOpponentLevel(i32),
    #[error("{hand:?} weapon skill must be between 1 and 1000, got {skill}")]
    InvalidWeaponSkill { hand: Hand, skill: i32 },
    #[error("weapon skill moves in whole points, got {0}")]
    FractionalWeaponSkill(f64),
    #[error("dual wielding requires exactly two weapons, found {found}")]
    WeaponCount { found: usize },
    #[error("{hand:?} weapon is invalid: {reason}")]
    InvalidWeapon { hand: Hand, reason: String },
    #[error("invalid armor set: {0}")]
    InvalidArmor(String),
    #[error("haste multiplier must be positive, got {0}")]
    InvalidHaste(f64),
}

/// Failures reading build or configuration files.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid YAML in {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("unsupported file extension for {0} (expected .yaml, .yml or .json)")]
    UnsupportedFormat(String),
}
