//! Hard failures: wiring defects and collaborator breakage.
//!
//! Expected domain conditions (cooldown, ethics verdicts, budget exhaustion)
//! never show up here; they are reported as [`crate::engine::FailureReason`]
//! values inside a transition result.

use thiserror::Error;

type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum CoreError {
    /// Two embeddings of different dimensionality were compared.
    #[error("embedding dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    /// The engine was built without a required collaborator.
    #[error("missing collaborator: {0}")]
    MissingCollaborator(&'static str),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A serialized state that no sequence of operators could have produced.
    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("embedding backend failed for {label:?}")]
    Embedding {
        label: String,
        #[source]
        source: BoxedSource,
    },

    #[error("ethics backend failed for {from:?} -> {to:?}")]
    Ethics {
        from: String,
        to: String,
        #[source]
        source: BoxedSource,
    },
}

impl CoreError {
    pub(crate) fn embedding(label: &str, err: anyhow::Error) -> Self {
        Self::Embedding {
            label: label.to_string(),
            source: err.into(),
        }
    }

    pub(crate) fn ethics(from: &str, to: &str, err: anyhow::Error) -> Self {
        Self::Ethics {
            from: from.to_string(),
            to: to.to_string(),
            source: err.into(),
        }
    }

    /// Stable code for structured logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::DimensionMismatch { .. } => "dimension_mismatch",
            Self::MissingCollaborator(_) => "missing_collaborator",
            Self::InvalidConfig(_) => "invalid_config",
            Self::InvalidState(_) => "invalid_state",
            Self::Embedding { .. } => "embedding_backend",
            Self::Ethics { .. } => "ethics_backend",
        }
    }
}
