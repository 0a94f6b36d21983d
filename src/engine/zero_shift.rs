//! ZeroShift: the atomic, gated move of focus from one domain to another.
//!
//! Preconditions are checked in a fixed order and the first one that trips
//! is the reported reason:
//!
//! 1. blank target
//! 2. active cooldown
//! 3. ethics verdict (deny, then uncertain with penalty)
//! 4. budget against `distance * compression`
//!
//! The input state is only borrowed. The successor is assembled after the
//! last await, so a dropped future can never leave a half-applied update.

use std::sync::Arc;

use crate::adapter::{EmbeddingProvider, EthicsDecision, EthicsGate};
use crate::config::ZeroShiftConfig;
use crate::distance::semantic_distance_between;
use crate::error::CoreError;
use crate::logging::log_shift;
use crate::state::CognitiveState;

use super::outcome::{FailureReason, ZeroShiftResult};

#[derive(Clone)]
pub struct ZeroShiftOperator {
    config: ZeroShiftConfig,
    embedding: Arc<dyn EmbeddingProvider>,
    ethics: Arc<dyn EthicsGate>,
}

impl ZeroShiftOperator {
    pub fn new(
        config: ZeroShiftConfig,
        embedding: Arc<dyn EmbeddingProvider>,
        ethics: Arc<dyn EthicsGate>,
    ) -> Self {
        Self { config, embedding, ethics }
    }

    pub fn config(&self) -> &ZeroShiftConfig {
        &self.config
    }

    pub async fn shift(
        &self,
        state: &CognitiveState,
        target: &str,
    ) -> Result<ZeroShiftResult, CoreError> {
        self.shift_scaled(state, target, 1.0).await
    }

    /// Shift with the semantic distance multiplied by `distance_scale`
    /// before compression is applied.
    pub async fn shift_scaled(
        &self,
        state: &CognitiveState,
        target: &str,
        distance_scale: f64,
    ) -> Result<ZeroShiftResult, CoreError> {
        let result = self.attempt(state, target, distance_scale).await?;
        log_shift(
            state.focus(),
            target,
            result.cost,
            result.failure.as_ref().map(FailureReason::code),
            &result.state,
        );
        Ok(result)
    }

    async fn attempt(
        &self,
        state: &CognitiveState,
        target: &str,
        distance_scale: f64,
    ) -> Result<ZeroShiftResult, CoreError> {
        if target.trim().is_empty() {
            return Ok(ZeroShiftResult::failed(state.clone(), FailureReason::EmptyTarget));
        }

        if state.cooldown() > 0.0 {
            return Ok(ZeroShiftResult::failed(
                state.clone(),
                FailureReason::CooldownActive { remaining: state.cooldown() },
            ));
        }

        let verdict = self
            .ethics
            .evaluate(state.focus(), target)
            .await
            .map_err(|e| CoreError::ethics(state.focus(), target, e))?;
        match verdict.decision {
            EthicsDecision::Allow => {}
            EthicsDecision::Deny => {
                return Ok(ZeroShiftResult::failed(
                    state.clone(),
                    FailureReason::EthicsDenied { reason: verdict.reason },
                ));
            }
            EthicsDecision::Uncertain => {
                let penalty = self.config.uncertainty_penalty;
                let penalized = state.with_resources((state.resources() - penalty).max(0.0));
                return Ok(ZeroShiftResult::failed(
                    penalized,
                    FailureReason::EthicsUncertain { reason: verdict.reason, penalty },
                ));
            }
        }

        // Staying put is free and leaves no trace in history.
        if target == state.focus() {
            return Ok(ZeroShiftResult::ok(state.clone(), 0.0));
        }

        let distance =
            semantic_distance_between(self.embedding.as_ref(), state.focus(), target).await?;
        let cost = (distance * distance_scale).max(0.0) * state.compression();

        if state.resources() < cost {
            return Ok(ZeroShiftResult::failed(
                state.clone(),
                FailureReason::InsufficientResources {
                    required: cost,
                    available: state.resources(),
                },
            ));
        }

        let next = state
            .moved_to(target)
            .with_resources(state.resources() - cost)
            .with_cooldown(cost * self.config.stability_factor);
        Ok(ZeroShiftResult::ok(next, cost))
    }
}
