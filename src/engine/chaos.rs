//! Costed exploration: trade budget and stability for cheaper future moves.

use crate::config::ChaosConfig;
use crate::logging::log_chaos;
use crate::state::CognitiveState;

use super::outcome::{ChaosResult, FailureReason};

/// Compression never drops below this through chaos, whatever the
/// evolutionary bounds say.
pub const CHAOS_COMPRESSION_FLOOR: f64 = 0.1;

#[derive(Debug, Clone, Default)]
pub struct ChaosInjector {
    config: ChaosConfig,
}

impl ChaosInjector {
    pub fn new(config: ChaosConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChaosConfig {
        &self.config
    }

    pub fn inject(&self, state: &CognitiveState) -> ChaosResult {
        let cost = self.config.chaos_cost;
        if state.resources() < cost {
            let result = ChaosResult::failed(
                state.clone(),
                FailureReason::InsufficientChaosBudget {
                    required: cost,
                    available: state.resources(),
                },
            );
            log_chaos(state.focus(), 0.0, state.compression(), Some("insufficient_chaos_budget"));
            return result;
        }

        let compression =
            (state.compression() - self.config.compression_reduction).max(CHAOS_COMPRESSION_FLOOR);
        let next = state
            .with_resources(state.resources() - cost)
            .with_compression(compression)
            .with_cooldown(state.cooldown() + self.config.instability_factor);
        log_chaos(state.focus(), cost, compression, None);
        ChaosResult::ok(next, cost)
    }

    /// Distance as perceived while in chaos. Not applied automatically.
    pub fn distort_distance(&self, distance: f64) -> f64 {
        distance * self.config.distance_distortion
    }
}
