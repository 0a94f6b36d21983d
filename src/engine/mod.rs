//! The Cognitive Physics Engine.
//!
//! ```text
//!                 ┌──────────────┐
//!   state ───────►│  ZeroShift   │──► TransitionResult ──┐
//!                 └──────────────┘                       │
//!        ▲               ▲  ethics gate, embeddings      ▼
//!        │        ┌──────────────┐              ┌─────────────────┐
//!        │        │ Superposition│              │  Evolutionary   │
//!        │        │ entangle /   │              │  adapter        │
//!        │        │ collapse     │              │ (compression)   │
//!        │        └──────────────┘              └─────────────────┘
//!        │        ┌──────────────┐                       │
//!        └────────│    Chaos     │◄──────────────────────┘
//!                 └──────────────┘
//! ```
//!
//! Every operator maps an immutable snapshot to a new snapshot or an
//! explicit failure. [`CognitivePhysicsEngine`] wires them together and owns
//! nothing but configuration and collaborator handles.

pub mod chaos;
pub mod evolution;
pub mod orchestrator;
pub mod outcome;
pub mod superposition;
pub mod zero_shift;

pub use chaos::{ChaosInjector, CHAOS_COMPRESSION_FLOOR};
pub use evolution::EvolutionaryAdapter;
pub use orchestrator::{
    CognitivePhysicsEngine, CognitivePhysicsEngineBuilder, StepRecord, TrajectoryOutcome,
};
pub use outcome::{ChaosResult, FailureReason, TransitionResult, ZeroShiftResult};
pub use superposition::{Collapsed, SuperpositionEngine};
pub use zero_shift::ZeroShiftOperator;
