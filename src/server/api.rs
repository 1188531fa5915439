//! JSON payloads for the HTTP API. Each handler takes the raw request body and returns the
//! serialized response, leaving status codes to [crate::server::routes].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::character::{sample_fury_warrior, Character, CharacterTotals};
use crate::combat::{simulate_parallel, DpsSummary, SimulationConfig};
use crate::error::SimulationError;
use crate::weights::{compute_stat_weights, Stat, StatWeight};

/// Upper bound on batches accepted by `/api/simulate`.
pub const MAX_SIMULATE_BATCHES: usize = 100_000;
/// Stat weights run three simulations per stat, so they get a lower cap.
pub const MAX_WEIGHT_BATCHES: usize = 20_000;
/// Upper bound on simulated seconds per batch for both endpoints.
pub const MAX_SIM_TIME: f64 = 3600.0;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request body: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Simulation(#[from] SimulationError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimulateRequest {
    /// Inline build; the bundled sample build when absent.
    #[serde(default)]
    pub build: Option<Character>,
    #[serde(default)]
    pub config: SimulationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatWeightsRequest {
    #[serde(default)]
    pub build: Option<Character>,
    #[serde(default)]
    pub config: SimulationConfig,
    #[serde(default)]
    pub stats: Option<Vec<Stat>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulateResponse {
    pub summary: DpsSummary,
    pub totals: CharacterTotals,
    pub config: SimulationConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeightRow {
    #[serde(flatten)]
    pub weight: StatWeight,
    pub per_unit: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatWeightsResponse {
    pub weights: Vec<WeightRow>,
    pub config: SimulationConfig,
}

pub fn health_payload() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({
        "status": "ok",
        "service": "furysim-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub fn simulate_payload(body: &str) -> Result<String, ApiError> {
    let req: SimulateRequest = serde_json::from_str(body)?;
    let build = req.build.unwrap_or_else(sample_fury_warrior);
    let config = cap_workload(req.config, MAX_SIMULATE_BATCHES);

    let snapshot = build.snapshot()?;
    let samples = simulate_parallel(&snapshot, &config)?;
    let response = SimulateResponse {
        summary: samples.summary(),
        totals: build.compute_all_stats(),
        config,
    };
    Ok(serde_json::to_string_pretty(&response)?)
}

pub fn stat_weights_payload(body: &str) -> Result<String, ApiError> {
    let req: StatWeightsRequest = serde_json::from_str(body)?;
    let build = req.build.unwrap_or_else(sample_fury_warrior);
    let config = cap_workload(req.config, MAX_WEIGHT_BATCHES);
    let stats = req.stats.unwrap_or_else(|| Stat::DEFAULT_SET.to_vec());

    let weights = compute_stat_weights(&build, &stats, &config)?
        .into_iter()
        .map(|weight| WeightRow {
            per_unit: weight.per_unit(),
            weight,
        })
        .collect();
    Ok(serde_json::to_string_pretty(&StatWeightsResponse { weights, config })?)
}

/// Clamp the batch count and fight length so one request cannot stall the accept loop.
fn cap_workload(mut config: SimulationConfig, max_batches: usize) -> SimulationConfig {
    if config.batches > max_batches {
        tracing::warn!(requested = config.batches, max_batches, "batch count capped");
        config.batches = max_batches;
    }
    if config.sim_time > MAX_SIM_TIME {
        tracing::warn!(requested = config.sim_time, max = MAX_SIM_TIME, "sim time capped");
        config.sim_time = MAX_SIM_TIME;
    }
    config
}
