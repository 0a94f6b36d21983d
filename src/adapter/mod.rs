//! Collaborator contracts consumed by the engine, with reference
//! implementations for default wiring and tests.

pub mod embedding;
pub mod ethics;
pub mod retry;

pub use embedding::{CachedEmbedding, EmbeddingProvider, HashEmbedding, StaticEmbedding};
pub use ethics::{AllowAll, DenyListGate, EthicsDecision, EthicsGate, EthicsGateResult};
pub use retry::{is_transient, RetryConfig, RetryEmbedding, TransientError};
