//! Superposition: fork a state into weighted branches, then collapse to the
//! best-scoring one.
//!
//! `score = (coherence + ethics) * weight` where coherence is
//! `1 - distance(origin, branch focus)` and ethics is 1.0 / 0.5 / 0.0 for
//! allow / uncertain / deny. Branches are ranked in input order with a
//! strict comparison, so the earliest branch wins a tie. The concurrent
//! variant gathers scores in input order and reuses the same scan.

use std::collections::BTreeSet;
use std::sync::Arc;

use futures_util::future::try_join_all;

use crate::adapter::{EmbeddingProvider, EthicsGate};
use crate::distance::semantic_distance_between;
use crate::error::CoreError;
use crate::logging::log_collapse;
use crate::state::{CognitiveBranch, CognitiveState};

/// Winner of a collapse. Its state is never entangled.
#[derive(Debug, Clone, PartialEq)]
pub struct Collapsed {
    pub state: CognitiveState,
    pub index: usize,
    pub score: f64,
}

#[derive(Clone)]
pub struct SuperpositionEngine {
    embedding: Arc<dyn EmbeddingProvider>,
    ethics: Arc<dyn EthicsGate>,
}

impl SuperpositionEngine {
    pub fn new(embedding: Arc<dyn EmbeddingProvider>, ethics: Arc<dyn EthicsGate>) -> Self {
        Self { embedding, ethics }
    }

    /// One branch per target, all sharing `state.entanglement ∪ targets`.
    pub fn entangle<S: AsRef<str>>(
        &self,
        state: &CognitiveState,
        targets: &[S],
    ) -> Vec<CognitiveBranch> {
        if targets.is_empty() {
            return Vec::new();
        }
        let weight = 1.0 / targets.len() as f64;
        let mut entangled: BTreeSet<String> = state.entanglement().clone();
        entangled.extend(targets.iter().map(|t| t.as_ref().to_string()));

        targets
            .iter()
            .map(|t| CognitiveBranch {
                state: state.moved_to(t.as_ref()).with_entanglement(entangled.clone()),
                weight,
            })
            .collect()
    }

    /// Score branches one after another and pick the winner.
    pub async fn collapse(
        &self,
        origin: &str,
        branches: &[CognitiveBranch],
    ) -> Result<Option<Collapsed>, CoreError> {
        let mut scores = Vec::with_capacity(branches.len());
        for branch in branches {
            scores.push(self.score(origin, branch).await?);
        }
        Ok(select(origin, branches, &scores))
    }

    /// Score all branches concurrently; the winner is the same as
    /// [`collapse`](Self::collapse) would pick.
    pub async fn collapse_concurrent(
        &self,
        origin: &str,
        branches: &[CognitiveBranch],
    ) -> Result<Option<Collapsed>, CoreError> {
        let scores = try_join_all(branches.iter().map(|b| self.score(origin, b))).await?;
        Ok(select(origin, branches, &scores))
    }

    async fn score(&self, origin: &str, branch: &CognitiveBranch) -> Result<f64, CoreError> {
        let focus = branch.state.focus();
        let distance = semantic_distance_between(self.embedding.as_ref(), origin, focus).await?;
        let verdict = self
            .ethics
            .evaluate(origin, focus)
            .await
            .map_err(|e| CoreError::ethics(origin, focus, e))?;
        let coherence = 1.0 - distance;
        Ok((coherence + verdict.decision.score()) * branch.weight)
    }
}

/// Earliest strictly-greatest score wins. NaN never wins.
fn select(origin: &str, branches: &[CognitiveBranch], scores: &[f64]) -> Option<Collapsed> {
    let mut best: Option<(usize, f64)> = None;
    let mut best_score = f64::NEG_INFINITY;
    for (i, &score) in scores.iter().enumerate() {
        if score > best_score {
            best_score = score;
            best = Some((i, score));
        }
    }

    let labelled: Vec<(&str, f64)> = branches
        .iter()
        .zip(scores)
        .map(|(b, &s)| (b.state.focus(), s))
        .collect();
    log_collapse(
        origin,
        best.map(|(i, _)| (branches[i].state.focus(), i)),
        &labelled,
    );

    best.map(|(index, score)| Collapsed {
        state: branches[index].state.with_entanglement(BTreeSet::new()),
        index,
        score,
    })
}
