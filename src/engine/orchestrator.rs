//! Orchestrator: per-operator transforms plus the multi-target trajectory
//! runner.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::adapter::{AllowAll, EmbeddingProvider, EthicsGate};
use crate::config::CognitivePhysicsConfig;
use crate::error::CoreError;
use crate::logging::log_trajectory;
use crate::state::{CognitiveBranch, CognitiveState};

use super::chaos::{ChaosInjector, CHAOS_COMPRESSION_FLOOR};
use super::evolution::EvolutionaryAdapter;
use super::outcome::{ChaosResult, FailureReason, ZeroShiftResult};
use super::superposition::{Collapsed, SuperpositionEngine};
use super::zero_shift::ZeroShiftOperator;

/// Cooldown drained before each trajectory step.
const COOLDOWN_TICK: f64 = 1.0;

/// One successful step of a trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub target: String,
    pub cost: f64,
    pub coherence: f64,
    /// Compression after adaptation.
    pub compression: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TrajectoryOutcome {
    /// Every target was reached. `state` is the final adapted state.
    Completed {
        state: CognitiveState,
        steps: Vec<StepRecord>,
    },
    /// Stopped at the first failure. `state` is the caller's input state;
    /// nothing reached along the way is handed back.
    Aborted {
        state: CognitiveState,
        failed_at: usize,
        target: String,
        reason: FailureReason,
    },
}

impl TrajectoryOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    pub fn state(&self) -> &CognitiveState {
        match self {
            Self::Completed { state, .. } | Self::Aborted { state, .. } => state,
        }
    }

    pub fn reason(&self) -> Option<&FailureReason> {
        match self {
            Self::Completed { .. } => None,
            Self::Aborted { reason, .. } => Some(reason),
        }
    }
}

#[derive(Default)]
pub struct CognitivePhysicsEngineBuilder {
    config: CognitivePhysicsConfig,
    embedding: Option<Arc<dyn EmbeddingProvider>>,
    ethics: Option<Arc<dyn EthicsGate>>,
}

impl CognitivePhysicsEngineBuilder {
    pub fn config(mut self, config: CognitivePhysicsConfig) -> Self {
        self.config = config;
        self
    }

    pub fn embedding(self, provider: impl EmbeddingProvider + 'static) -> Self {
        self.shared_embedding(Arc::new(provider))
    }

    pub fn shared_embedding(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding = Some(provider);
        self
    }

    pub fn ethics(self, gate: impl EthicsGate + 'static) -> Self {
        self.shared_ethics(Arc::new(gate))
    }

    pub fn shared_ethics(mut self, gate: Arc<dyn EthicsGate>) -> Self {
        self.ethics = Some(gate);
        self
    }

    /// The embedding provider is mandatory; the ethics gate defaults to
    /// [`AllowAll`].
    pub fn build(self) -> Result<CognitivePhysicsEngine, CoreError> {
        self.config.validate()?;
        let embedding = self.embedding.ok_or(CoreError::MissingCollaborator("embedding"))?;
        let ethics = self.ethics.unwrap_or_else(|| Arc::new(AllowAll));

        Ok(CognitivePhysicsEngine {
            zero_shift: ZeroShiftOperator::new(
                self.config.zero_shift.clone(),
                embedding.clone(),
                ethics.clone(),
            ),
            chaos: ChaosInjector::new(self.config.chaos.clone()),
            evolution: EvolutionaryAdapter::new(self.config.evolution.clone()),
            superposition: SuperpositionEngine::new(embedding, ethics),
            config: self.config,
        })
    }
}

/// Holds configuration and collaborator handles only. Callers own and
/// thread the state.
#[derive(Clone)]
pub struct CognitivePhysicsEngine {
    config: CognitivePhysicsConfig,
    zero_shift: ZeroShiftOperator,
    chaos: ChaosInjector,
    evolution: EvolutionaryAdapter,
    superposition: SuperpositionEngine,
}

impl CognitivePhysicsEngine {
    pub fn builder() -> CognitivePhysicsEngineBuilder {
        CognitivePhysicsEngineBuilder::default()
    }

    pub fn config(&self) -> &CognitivePhysicsConfig {
        &self.config
    }

    // =========================================================================
    // Individual transforms
    // =========================================================================

    pub async fn shift(
        &self,
        state: &CognitiveState,
        target: &str,
    ) -> Result<ZeroShiftResult, CoreError> {
        self.zero_shift.shift(state, target).await
    }

    /// Shift with the chaos distance distortion applied to the cost.
    pub async fn shift_in_chaos(
        &self,
        state: &CognitiveState,
        target: &str,
    ) -> Result<ZeroShiftResult, CoreError> {
        self.zero_shift
            .shift_scaled(state, target, self.chaos.distort_distance(1.0))
            .await
    }

    pub fn inject_chaos(&self, state: &CognitiveState) -> ChaosResult {
        self.chaos.inject(state)
    }

    pub fn distort_distance(&self, distance: f64) -> f64 {
        self.chaos.distort_distance(distance)
    }

    pub fn on_success(&self, state: &CognitiveState, coherence: f64) -> CognitiveState {
        self.evolution.on_success(state, coherence)
    }

    pub fn on_failure(&self, state: &CognitiveState) -> CognitiveState {
        self.evolution.on_failure(state)
    }

    pub fn entangle<S: AsRef<str>>(
        &self,
        state: &CognitiveState,
        targets: &[S],
    ) -> Vec<CognitiveBranch> {
        self.superposition.entangle(state, targets)
    }

    pub async fn collapse(
        &self,
        origin: &str,
        branches: &[CognitiveBranch],
    ) -> Result<Option<Collapsed>, CoreError> {
        if self.config.concurrent_collapse {
            self.superposition.collapse_concurrent(origin, branches).await
        } else {
            self.superposition.collapse(origin, branches).await
        }
    }

    /// Entangle `state` over `targets` and collapse back against its focus.
    pub async fn superpose<S: AsRef<str>>(
        &self,
        state: &CognitiveState,
        targets: &[S],
    ) -> Result<Option<Collapsed>, CoreError> {
        let branches = self.entangle(state, targets);
        self.collapse(state.focus(), &branches).await
    }

    // =========================================================================
    // Trajectory
    // =========================================================================

    /// Visit `targets` in order, adapting compression after every step.
    ///
    /// The first failure aborts the run; remaining targets are not
    /// attempted and the caller gets its input state back with the reason.
    pub async fn execute_trajectory<S: AsRef<str>>(
        &self,
        state: &CognitiveState,
        targets: &[S],
    ) -> Result<TrajectoryOutcome, CoreError> {
        let mut current = state.clone();
        let mut steps = Vec::with_capacity(targets.len());

        for (i, target) in targets.iter().enumerate() {
            let target = target.as_ref();
            let ticked = current.with_cooldown((current.cooldown() - COOLDOWN_TICK).max(0.0));
            let result = self.zero_shift.shift(&ticked, target).await?;

            if let Some(reason) = result.failure {
                let terminal = self.evolution.on_failure(&result.state);
                log_trajectory(
                    "trajectory.aborted",
                    state.focus(),
                    targets.len(),
                    i,
                    Some(reason.code()),
                    &terminal,
                );
                return Ok(TrajectoryOutcome::Aborted {
                    state: state.clone(),
                    failed_at: i,
                    target: target.to_string(),
                    reason,
                });
            }

            let shifted = result.state;
            let coherence = (1.0 - result.cost / shifted.compression().max(CHAOS_COMPRESSION_FLOOR))
                .clamp(0.0, 1.0);
            current = self.evolution.on_success(&shifted, coherence);
            steps.push(StepRecord {
                target: target.to_string(),
                cost: result.cost,
                coherence,
                compression: current.compression(),
            });
        }

        log_trajectory(
            "trajectory.completed",
            state.focus(),
            targets.len(),
            steps.len(),
            None,
            &current,
        );
        Ok(TrajectoryOutcome::Completed { state: current, steps })
    }
}
