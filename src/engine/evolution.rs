//! Outcome-driven compression tuning.
//!
//! A single bounded scalar: success lowers compression (cheaper future
//! shifts) in proportion to coherence, failure raises it by a fixed penalty.

use crate::config::EvolutionaryConfig;
use crate::logging::log_adaptation;
use crate::state::CognitiveState;

#[derive(Debug, Clone, Default)]
pub struct EvolutionaryAdapter {
    config: EvolutionaryConfig,
}

impl EvolutionaryAdapter {
    pub fn new(config: EvolutionaryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EvolutionaryConfig {
        &self.config
    }

    pub fn on_success(&self, state: &CognitiveState, coherence: f64) -> CognitiveState {
        let coherence = if coherence.is_nan() { 0.0 } else { coherence.clamp(0.0, 1.0) };
        let after = self.bound(state.compression() - self.config.learning_rate * coherence);
        log_adaptation("evolution.success", state.compression(), after, Some(coherence));
        state.with_compression(after)
    }

    pub fn on_failure(&self, state: &CognitiveState) -> CognitiveState {
        let after = self.bound(state.compression() + self.config.penalty_factor);
        log_adaptation("evolution.failure", state.compression(), after, None);
        state.with_compression(after)
    }

    fn bound(&self, compression: f64) -> f64 {
        compression.clamp(self.config.min_compression, self.config.max_compression)
    }
}
