//! Semantic distance between domains.
//!
//! `0.0` means identical, `1.0` maximally distant. Everything that prices a
//! move through concept space goes through [`semantic_distance`].

use crate::adapter::EmbeddingProvider;
use crate::error::CoreError;

/// Cosine similarity in `[-1, 1]`.
///
/// Zero-length or all-zero inputs yield `0.0` rather than dividing by zero.
/// Mismatched lengths are a wiring defect and fail hard.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64, CoreError> {
    if a.len() != b.len() {
        return Err(CoreError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    let (mut dot, mut norm_a, mut norm_b) = (0.0f64, 0.0f64, 0.0f64);
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (x as f64, y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }
    Ok((dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0))
}

/// Normalized distance `clamp(1 - cos, 0, 1)`.
pub fn semantic_distance(a: &[f32], b: &[f32]) -> Result<f64, CoreError> {
    Ok((1.0 - cosine_similarity(a, b)?).clamp(0.0, 1.0))
}

/// Embed both labels and measure the distance between them.
///
/// Identical labels short-circuit to `0.0` without touching the provider.
pub async fn semantic_distance_between(
    provider: &dyn EmbeddingProvider,
    from: &str,
    to: &str,
) -> Result<f64, CoreError> {
    if from == to {
        return Ok(0.0);
    }
    let a = provider
        .embed(from)
        .await
        .map_err(|e| CoreError::embedding(from, e))?;
    let b = provider
        .embed(to)
        .await
        .map_err(|e| CoreError::embedding(to, e))?;
    semantic_distance(&a, &b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::StaticEmbedding;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_identical_vectors() {
        let v = [0.3, -0.2, 0.9];
        assert!(approx(cosine_similarity(&v, &v).unwrap(), 1.0));
        assert!(approx(semantic_distance(&v, &v).unwrap(), 0.0));
    }

    #[test]
    fn test_orthogonal_and_opposite() {
        assert!(approx(semantic_distance(&[1.0, 0.0], &[0.0, 1.0]).unwrap(), 1.0));
        assert!(approx(cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]).unwrap(), -1.0));
        // Opposite vectors are clamped to the maximal distance, not 2.0.
        assert!(approx(semantic_distance(&[1.0, 0.0], &[-1.0, 0.0]).unwrap(), 1.0));
    }

    #[test]
    fn test_zero_inputs_are_defined() {
        assert_eq!(cosine_similarity(&[], &[]).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]).unwrap(), 0.0);
        assert_eq!(semantic_distance(&[0.0, 0.0], &[0.0, 0.0]).unwrap(), 1.0);
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = cosine_similarity(&[1.0], &[1.0, 0.0]).unwrap_err();
        assert!(matches!(err, CoreError::DimensionMismatch { left: 1, right: 2 }));
    }

    #[test]
    fn test_scale_invariance() {
        let d1 = semantic_distance(&[1.0, 2.0], &[2.0, 1.0]).unwrap();
        let d2 = semantic_distance(&[10.0, 20.0], &[2.0, 1.0]).unwrap();
        assert!(approx(d1, d2));
    }

    #[tokio::test]
    async fn test_distance_between_uses_provider() {
        let provider = StaticEmbedding::new()
            .with("math", vec![1.0, 0.0])
            .with("art", vec![0.0, 1.0]);
        let d = semantic_distance_between(&provider, "math", "art").await.unwrap();
        assert!(approx(d, 1.0));
    }

    #[tokio::test]
    async fn test_distance_between_same_label_skips_provider() {
        let provider = StaticEmbedding::new();
        let d = semantic_distance_between(&provider, "ghost", "ghost").await.unwrap();
        assert_eq!(d, 0.0);
    }

    #[tokio::test]
    async fn test_distance_between_unknown_label_is_hard_error() {
        let provider = StaticEmbedding::new().with("math", vec![1.0]);
        let err = semantic_distance_between(&provider, "math", "ghost").await.unwrap_err();
        assert!(matches!(err, CoreError::Embedding { ref label, .. } if label == "ghost"));
    }
}
