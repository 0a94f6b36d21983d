//! Cognitive state: one immutable point on a trajectory through concept space.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::CoreError;

/// Snapshot of an agent's attention and budget.
///
/// Values are never mutated in place. Every operator takes `&CognitiveState`
/// and hands back a fresh successor, so a state that was forked into several
/// branches keeps no shared mutable storage with any of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCognitiveState")]
pub struct CognitiveState {
    focus: String,
    resources: f64,
    compression: f64,
    history: Vec<String>,
    cooldown: f64,
    entanglement: BTreeSet<String>,
}

impl CognitiveState {
    /// Fresh state at `focus` with the given budget.
    ///
    /// Negative or non-finite budgets are floored to zero.
    pub fn new(focus: impl Into<String>, resources: f64) -> Self {
        let focus = focus.into();
        Self {
            history: vec![focus.clone()],
            focus,
            resources: non_negative(resources),
            compression: 1.0,
            cooldown: 0.0,
            entanglement: BTreeSet::new(),
        }
    }

    pub fn focus(&self) -> &str {
        &self.focus
    }

    pub fn resources(&self) -> f64 {
        self.resources
    }

    pub fn compression(&self) -> f64 {
        self.compression
    }

    /// Visited domains, oldest first. Never empty.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn cooldown(&self) -> f64 {
        self.cooldown
    }

    pub fn entanglement(&self) -> &BTreeSet<String> {
        &self.entanglement
    }

    pub fn is_entangled(&self) -> bool {
        !self.entanglement.is_empty()
    }

    /// Hex SHA-256 of the canonical JSON encoding.
    pub fn fingerprint(&self) -> String {
        let encoded = serde_json::to_vec(self).unwrap_or_default();
        hex::encode(Sha256::digest(&encoded))
    }

    // -------------------------------------------------------------------------
    // Successor constructors. Crate-private so that states only evolve
    // through the operators in `engine`.
    // -------------------------------------------------------------------------

    pub(crate) fn with_resources(&self, resources: f64) -> Self {
        Self {
            resources: non_negative(resources),
            ..self.clone()
        }
    }

    pub(crate) fn with_compression(&self, compression: f64) -> Self {
        Self {
            compression,
            ..self.clone()
        }
    }

    pub(crate) fn with_cooldown(&self, cooldown: f64) -> Self {
        Self {
            cooldown: non_negative(cooldown),
            ..self.clone()
        }
    }

    pub(crate) fn with_entanglement(&self, entanglement: BTreeSet<String>) -> Self {
        Self {
            entanglement,
            ..self.clone()
        }
    }

    /// Move focus to `target`, appending it to history.
    pub(crate) fn moved_to(&self, target: &str) -> Self {
        let mut history = Vec::with_capacity(self.history.len() + 1);
        history.extend(self.history.iter().cloned());
        history.push(target.to_string());
        Self {
            focus: target.to_string(),
            history,
            ..self.clone()
        }
    }

    #[cfg(test)]
    pub(crate) fn tuned(mut self, compression: f64, cooldown: f64) -> Self {
        self.compression = compression;
        self.cooldown = cooldown;
        self
    }

    #[cfg(test)]
    pub(crate) fn with_raw_history(mut self, history: Vec<String>) -> Self {
        self.history = history;
        self
    }
}

/// Wire shape of [`CognitiveState`], checked before it becomes a state.
#[derive(Deserialize)]
struct RawCognitiveState {
    focus: String,
    resources: f64,
    compression: f64,
    history: Vec<String>,
    cooldown: f64,
    #[serde(default)]
    entanglement: BTreeSet<String>,
}

impl TryFrom<RawCognitiveState> for CognitiveState {
    type Error = CoreError;

    fn try_from(raw: RawCognitiveState) -> Result<Self, CoreError> {
        let invalid = |msg: &str| -> Result<Self, CoreError> {
            Err(CoreError::InvalidState(msg.to_string()))
        };
        if raw.history.last() != Some(&raw.focus) {
            return invalid("history must be non-empty and end at focus");
        }
        if !raw.resources.is_finite() || raw.resources < 0.0 {
            return invalid("resources must be finite and non-negative");
        }
        if !raw.cooldown.is_finite() || raw.cooldown < 0.0 {
            return invalid("cooldown must be finite and non-negative");
        }
        if !raw.compression.is_finite() || raw.compression <= 0.0 {
            return invalid("compression must be finite and positive");
        }
        Ok(Self {
            focus: raw.focus,
            resources: raw.resources,
            compression: raw.compression,
            history: raw.history,
            cooldown: raw.cooldown,
            entanglement: raw.entanglement,
        })
    }
}

fn non_negative(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        0.0
    }
}

/// One candidate successor inside a superposition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CognitiveBranch {
    pub state: CognitiveState,
    /// Relative coherence prior, `1/N` across the `N` siblings.
    pub weight: f64,
}
