use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};

/// Turns a domain label into a vector.
///
/// Implementations must return vectors of one fixed dimensionality. Any
/// timeout or retry policy belongs to the implementation, not the engine.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Fixed label table. Unknown labels are an error.
#[derive(Debug, Clone, Default)]
pub struct StaticEmbedding {
    table: HashMap<String, Vec<f32>>,
}

impl StaticEmbedding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, label: impl Into<String>, vector: Vec<f32>) -> Self {
        self.table.insert(label.into(), vector);
        self
    }
}

#[async_trait]
impl EmbeddingProvider for StaticEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.table
            .get(text)
            .cloned()
            .ok_or_else(|| anyhow!("no embedding for label {:?}", text))
    }
}

/// Deterministic pseudo-random unit vectors seeded from the label's SHA-256.
///
/// Carries no semantics: related words are not closer than unrelated ones.
/// Useful for demos and wiring tests where only stability matters.
#[derive(Debug, Clone, Copy)]
pub struct HashEmbedding {
    dim: usize,
}

impl HashEmbedding {
    pub fn new(dim: usize) -> Self {
        Self { dim: dim.max(1) }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    fn vector_for(&self, text: &str) -> Vec<f32> {
        let digest = Sha256::digest(text.as_bytes());
        let mut seed = [0u8; 8];
        seed.copy_from_slice(&digest[..8]);
        let mut rng = StdRng::seed_from_u64(u64::from_le_bytes(seed));

        let mut v: Vec<f32> = (0..self.dim).map(|_| rng.gen_range(-1.0f32..1.0)).collect();
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            v.iter_mut().for_each(|x| *x /= norm);
        }
        v
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.vector_for(text))
    }
}

/// Memoizes another provider per label.
///
/// Superposition scoring embeds the same origin once per branch; caching
/// keeps that to one backend call. Failures are not cached.
pub struct CachedEmbedding<P> {
    inner: P,
    cache: Mutex<HashMap<String, Vec<f32>>>,
}

impl<P: EmbeddingProvider> CachedEmbedding<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn cached_labels(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }

    fn lookup(&self, text: &str) -> Option<Vec<f32>> {
        self.cache.lock().ok().and_then(|c| c.get(text).cloned())
    }
}

#[async_trait]
impl<P: EmbeddingProvider> EmbeddingProvider for CachedEmbedding<P> {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if let Some(hit) = self.lookup(text) {
            return Ok(hit);
        }
        // Lock is never held across the await.
        let v = self.inner.embed(text).await?;
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(text.to_string(), v.clone());
        }
        Ok(v)
    }
}
