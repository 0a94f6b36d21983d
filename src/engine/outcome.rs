//! Result values for expected domain conditions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::state::CognitiveState;

/// Why a transition did not happen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum FailureReason {
    EmptyTarget,
    CooldownActive { remaining: f64 },
    EthicsDenied { reason: String },
    /// Soft failure: the penalty has already been charged.
    EthicsUncertain { reason: String, penalty: f64 },
    InsufficientResources { required: f64, available: f64 },
    InsufficientChaosBudget { required: f64, available: f64 },
}

impl FailureReason {
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyTarget => "empty_target",
            Self::CooldownActive { .. } => "cooldown_active",
            Self::EthicsDenied { .. } => "ethics_denied",
            Self::EthicsUncertain { .. } => "ethics_uncertain",
            Self::InsufficientResources { .. } => "insufficient_resources",
            Self::InsufficientChaosBudget { .. } => "insufficient_chaos_budget",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTarget => write!(f, "empty target"),
            Self::CooldownActive { remaining } => {
                write!(f, "cooldown active ({:.3} remaining)", remaining)
            }
            Self::EthicsDenied { reason } => write!(f, "ethics gate denied: {}", reason),
            Self::EthicsUncertain { reason, penalty } => {
                write!(f, "ethics gate uncertain ({} charged): {}", penalty, reason)
            }
            Self::InsufficientResources { required, available } => write!(
                f,
                "insufficient resources (need {:.4}, have {:.4})",
                required, available
            ),
            Self::InsufficientChaosBudget { required, available } => write!(
                f,
                "insufficient resources for chaos (need {:.4}, have {:.4})",
                required, available
            ),
        }
    }
}

/// Outcome of a single transition attempt.
///
/// `state` is meaningful on failure too: an uncertain ethics verdict still
/// charges its penalty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionResult {
    pub state: CognitiveState,
    /// Resources spent. Zero on failure.
    pub cost: f64,
    pub failure: Option<FailureReason>,
}

pub type ZeroShiftResult = TransitionResult;
pub type ChaosResult = TransitionResult;

impl TransitionResult {
    pub(crate) fn ok(state: CognitiveState, cost: f64) -> Self {
        Self { state, cost, failure: None }
    }

    pub(crate) fn failed(state: CognitiveState, reason: FailureReason) -> Self {
        Self { state, cost: 0.0, failure: Some(reason) }
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}
