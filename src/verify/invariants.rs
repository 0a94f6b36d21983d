use crate::config::EvolutionaryConfig;
use crate::engine::CHAOS_COMPRESSION_FLOOR;
use crate::state::CognitiveState;

#[derive(Debug, Clone, PartialEq)]
pub struct InvariantViolation {
    pub msg: String,
}

fn violation(msg: impl Into<String>) -> Result<(), InvariantViolation> {
    Err(InvariantViolation { msg: msg.into() })
}

/// Structural invariants every reachable state satisfies.
pub fn assert_state_invariants(state: &CognitiveState) -> Result<(), InvariantViolation> {
    if !state.resources().is_finite() || state.resources() < 0.0 {
        return violation("resources negative or non-finite");
    }
    if !state.cooldown().is_finite() || state.cooldown() < 0.0 {
        return violation("cooldown negative or non-finite");
    }
    match state.history().last() {
        None => return violation("history empty"),
        Some(last) if last != state.focus() => {
            return violation("history does not end at focus");
        }
        Some(_) => {}
    }
    Ok(())
}

/// Compression bounds. Chaos may push compression down to its own floor
/// when that sits below the evolutionary minimum, so the effective lower
/// bound is the smaller of the two.
pub fn assert_compression_bounds(
    state: &CognitiveState,
    cfg: &EvolutionaryConfig,
) -> Result<(), InvariantViolation> {
    let lower = cfg.min_compression.min(CHAOS_COMPRESSION_FLOOR);
    let c = state.compression();
    if !(c >= lower - 1e-12 && c <= cfg.max_compression + 1e-12) {
        return violation(format!(
            "compression {} outside [{}, {}]",
            c, lower, cfg.max_compression
        ));
    }
    Ok(())
}

/// A state handed back outside a superposition carries no entanglement.
pub fn assert_disentangled(state: &CognitiveState) -> Result<(), InvariantViolation> {
    if state.is_entangled() {
        return violation("entanglement not cleared");
    }
    Ok(())
}
