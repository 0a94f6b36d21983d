//! Backoff for flaky embedding backends.
//!
//! The engine itself never retries; wrapping a provider in
//! [`RetryEmbedding`] puts that policy on the collaborator side. Only
//! failures the provider marks as [`TransientError`] are retried: an
//! unknown label or a malformed response fails on the first attempt.

use anyhow::Result;
use async_trait::async_trait;
use rand::Rng;
use thiserror::Error;
use tokio::time::{sleep, Duration};

use super::embedding::EmbeddingProvider;
use crate::logging::log_retry;

/// Marker for a failure worth retrying (timeouts, rate limits, busy
/// backends). Providers return it through `anyhow`, possibly with context.
#[derive(Debug, Error)]
#[error("transient embedding failure: {0}")]
pub struct TransientError(pub String);

impl TransientError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// True when any error in the chain is a [`TransientError`].
pub fn is_transient(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| cause.is::<TransientError>())
}

#[derive(Clone, Debug)]
pub struct RetryConfig {
    /// Total calls per label, first one included. Zero behaves like one.
    pub attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    /// Relative spread applied to each delay, `0.0..=1.0`.
    pub jitter: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: 4,
            base_delay: Duration::from_millis(50),
            max_delay: Duration::from_secs(2),
            jitter: 0.2,
        }
    }
}

impl RetryConfig {
    /// Delay before retry number `retry` (0-based): doubling, capped, then
    /// scaled by a factor drawn from `[1 - jitter, 1 + jitter]`.
    fn backoff(&self, retry: u32) -> Duration {
        let doubled = self.base_delay.saturating_mul(1u32 << retry.min(16));
        let capped = doubled.min(self.max_delay);
        let spread = self.jitter.clamp(0.0, 1.0);
        if spread == 0.0 {
            return capped;
        }
        let factor = rand::thread_rng().gen_range((1.0 - spread)..=(1.0 + spread));
        capped.mul_f64(factor)
    }
}

/// Provider decorator that retries transient `embed` failures.
pub struct RetryEmbedding<P> {
    inner: P,
    config: RetryConfig,
}

impl<P: EmbeddingProvider> RetryEmbedding<P> {
    pub fn new(inner: P, config: RetryConfig) -> Self {
        Self { inner, config }
    }
}

#[async_trait]
impl<P: EmbeddingProvider> EmbeddingProvider for RetryEmbedding<P> {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let attempts = self.config.attempts.max(1);
        let mut retry = 0;
        loop {
            match self.inner.embed(text).await {
                Ok(vector) => return Ok(vector),
                Err(err) if retry + 1 < attempts && is_transient(&err) => {
                    let delay = self.config.backoff(retry);
                    log_retry(text, retry + 1, attempts, &err, delay);
                    sleep(delay).await;
                    retry += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
