//! Engine configuration.
//!
//! All values are plain data, constructed once and shared read-only. Every
//! section has a `Default`; [`CognitivePhysicsConfig::from_env`] overlays
//! `CPE_*` environment variables and [`CognitivePhysicsConfig::from_json_file`]
//! reads a (possibly partial) JSON document.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Parameters of the gated focus transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZeroShiftConfig {
    /// Cooldown imposed per unit of cost after a successful shift.
    pub stability_factor: f64,
    /// Resources charged when the ethics gate is uncertain.
    pub uncertainty_penalty: f64,
}

impl Default for ZeroShiftConfig {
    fn default() -> Self {
        Self {
            stability_factor: 0.5,
            uncertainty_penalty: 1.0,
        }
    }
}

/// Parameters of costed exploration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChaosConfig {
    /// Budget consumed by a single injection.
    pub chaos_cost: f64,
    /// Cooldown added by an injection.
    pub instability_factor: f64,
    /// Amount shaved off compression, floored at 0.1.
    pub compression_reduction: f64,
    /// Multiplier callers may apply to distances while in chaos.
    pub distance_distortion: f64,
}

impl Default for ChaosConfig {
    fn default() -> Self {
        Self {
            chaos_cost: 5.0,
            instability_factor: 1.0,
            compression_reduction: 0.2,
            distance_distortion: 1.5,
        }
    }
}

/// Parameters of outcome-driven compression tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionaryConfig {
    /// Compression reduction per unit of coherence on success.
    pub learning_rate: f64,
    /// Compression increase on failure.
    pub penalty_factor: f64,
    pub min_compression: f64,
    pub max_compression: f64,
}

impl Default for EvolutionaryConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.05,
            penalty_factor: 0.1,
            min_compression: 0.1,
            max_compression: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CognitivePhysicsConfig {
    pub zero_shift: ZeroShiftConfig,
    pub chaos: ChaosConfig,
    pub evolution: EvolutionaryConfig,
    /// Score collapse branches concurrently instead of one after another.
    pub concurrent_collapse: bool,
}

impl CognitivePhysicsConfig {
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            zero_shift: ZeroShiftConfig {
                stability_factor: env_f64("CPE_STABILITY_FACTOR", d.zero_shift.stability_factor),
                uncertainty_penalty: env_f64("CPE_UNCERTAINTY_PENALTY", d.zero_shift.uncertainty_penalty),
            },
            chaos: ChaosConfig {
                chaos_cost: env_f64("CPE_CHAOS_COST", d.chaos.chaos_cost),
                instability_factor: env_f64("CPE_INSTABILITY_FACTOR", d.chaos.instability_factor),
                compression_reduction: env_f64("CPE_COMPRESSION_REDUCTION", d.chaos.compression_reduction),
                distance_distortion: env_f64("CPE_DISTANCE_DISTORTION", d.chaos.distance_distortion),
            },
            evolution: EvolutionaryConfig {
                learning_rate: env_f64("CPE_LEARNING_RATE", d.evolution.learning_rate),
                penalty_factor: env_f64("CPE_PENALTY_FACTOR", d.evolution.penalty_factor),
                min_compression: env_f64("CPE_MIN_COMPRESSION", d.evolution.min_compression),
                max_compression: env_f64("CPE_MAX_COMPRESSION", d.evolution.max_compression),
            },
            concurrent_collapse: std::env::var("CPE_CONCURRENT_COLLAPSE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(d.concurrent_collapse),
        }
    }

    /// Load from a JSON file. Missing sections and fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let cfg: Self = serde_json::from_str(&raw)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(cfg)
    }

    /// Reject configurations that would break the compression or budget
    /// invariants.
    pub fn validate(&self) -> Result<(), CoreError> {
        let e = &self.evolution;
        if !(e.min_compression > 0.0) {
            return Err(invalid(format!("min_compression must be > 0, got {}", e.min_compression)));
        }
        if !(e.min_compression <= e.max_compression) {
            return Err(invalid(format!(
                "min_compression {} exceeds max_compression {}",
                e.min_compression, e.max_compression
            )));
        }
        let non_negative = [
            ("stability_factor", self.zero_shift.stability_factor),
            ("uncertainty_penalty", self.zero_shift.uncertainty_penalty),
            ("chaos_cost", self.chaos.chaos_cost),
            ("instability_factor", self.chaos.instability_factor),
            ("compression_reduction", self.chaos.compression_reduction),
            ("distance_distortion", self.chaos.distance_distortion),
            ("learning_rate", e.learning_rate),
            ("penalty_factor", e.penalty_factor),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(format!("{} must be finite and >= 0, got {}", name, value)));
            }
        }
        Ok(())
    }
}

fn env_f64(key: &str, default: f64) -> f64 {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn invalid(msg: String) -> CoreError {
    CoreError::InvalidConfig(msg)
}
