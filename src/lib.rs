//! Cognitive Physics Engine.
//!
//! Reasoning modelled as a resource-bounded trajectory through a metric
//! concept space. An agent's focus moves between domains; each move costs
//! budget in proportion to semantic distance and a tunable compression
//! coefficient, and every move is gated by a three-valued ethics check.
//!
//! - [`state`]: immutable [`CognitiveState`] snapshots
//! - [`distance`]: cosine-based semantic distance
//! - [`adapter`]: embedding and ethics collaborator contracts
//! - [`engine`]: ZeroShift, chaos, evolution, superposition, orchestration
//! - [`verify`]: state invariant checks
//!
//! ```no_run
//! use cognitive_physics::adapter::HashEmbedding;
//! use cognitive_physics::{CognitivePhysicsEngine, CognitiveState};
//!
//! # async fn demo() -> Result<(), cognitive_physics::CoreError> {
//! let engine = CognitivePhysicsEngine::builder()
//!     .embedding(HashEmbedding::new(64))
//!     .build()?;
//! let start = CognitiveState::new("math", 100.0);
//! let outcome = engine.execute_trajectory(&start, &["physics", "music"]).await?;
//! println!("{:?}", outcome.state().history());
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod config;
pub mod distance;
pub mod engine;
pub mod error;
pub mod logging;
pub mod state;
pub mod verify;

pub use config::CognitivePhysicsConfig;
pub use engine::{CognitivePhysicsEngine, FailureReason, TrajectoryOutcome};
pub use error::CoreError;
pub use state::{CognitiveBranch, CognitiveState};
