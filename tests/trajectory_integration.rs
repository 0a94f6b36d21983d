//! Integration test: multi-step trajectories, forking, cancellation and
//! collaborator decorators wired through the engine.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use cognitive_physics::adapter::{
    CachedEmbedding, DenyListGate, EmbeddingProvider, HashEmbedding, RetryConfig, RetryEmbedding,
    StaticEmbedding, TransientError,
};
use cognitive_physics::engine::TrajectoryOutcome;
use cognitive_physics::verify::invariants::{
    assert_compression_bounds, assert_disentangled, assert_state_invariants,
};
use cognitive_physics::{CognitivePhysicsConfig, CognitivePhysicsEngine, CognitiveState};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-5
}

fn ring() -> StaticEmbedding {
    // Points on a quarter circle, 10 degrees apart.
    let mut e = StaticEmbedding::new();
    for (i, name) in ["d0", "d1", "d2", "d3", "d4", "d5", "d6", "d7", "d8", "d9"].iter().enumerate() {
        let theta = (i as f64 * 10.0).to_radians();
        e = e.with(*name, vec![theta.cos() as f32, theta.sin() as f32]);
    }
    e
}

/// Walk a long trajectory and check the books balance step by step.
#[tokio::test]
async fn test_long_trajectory_accounting() {
    let engine = CognitivePhysicsEngine::builder().embedding(ring()).build().unwrap();
    let start = CognitiveState::new("d0", 5.0);
    let targets = ["d1", "d2", "d3", "d4", "d5", "d6", "d7", "d8", "d9"];

    let out = engine.execute_trajectory(&start, &targets).await.unwrap();
    let TrajectoryOutcome::Completed { state, steps } = out else {
        panic!("trajectory should complete");
    };

    assert_eq!(steps.len(), targets.len());
    let spent: f64 = steps.iter().map(|s| s.cost).sum();
    assert!(approx(state.resources(), 5.0 - spent));
    assert_eq!(state.history().len(), targets.len() + 1);
    assert_eq!(state.focus(), "d9");

    // Every step is the same angular distance, so compression only falls.
    for pair in steps.windows(2) {
        assert!(pair[1].compression < pair[0].compression);
        assert!(pair[1].cost < pair[0].cost);
    }
    assert!(assert_state_invariants(&state).is_ok());
    assert!(assert_compression_bounds(&state, &engine.config().evolution).is_ok());
}

#[tokio::test]
async fn test_trajectory_runs_out_of_budget() {
    let engine = CognitivePhysicsEngine::builder().embedding(ring()).build().unwrap();
    // 10 degrees costs ~0.0152 at full compression.
    let start = CognitiveState::new("d0", 0.04);
    let out = engine
        .execute_trajectory(&start, &["d1", "d2", "d3", "d4"])
        .await
        .unwrap();
    match out {
        TrajectoryOutcome::Aborted { state, failed_at, reason, .. } => {
            assert_eq!(reason.code(), "insufficient_resources");
            assert!(failed_at >= 2);
            assert_eq!(state, start);
        }
        other => panic!("expected abort, got {:?}", other),
    }
}

#[tokio::test]
async fn test_uncertain_step_aborts_trajectory() {
    let engine = CognitivePhysicsEngine::builder()
        .embedding(ring())
        .ethics(DenyListGate::new().uncertain("d2"))
        .build()
        .unwrap();
    let start = CognitiveState::new("d0", 5.0);
    let out = engine.execute_trajectory(&start, &["d1", "d2", "d3"]).await.unwrap();
    assert_eq!(out.reason().map(|r| r.code()), Some("ethics_uncertain"));
    assert_eq!(out.state(), &start);
}

/// Two callers forking from one snapshot get independent successors.
#[tokio::test]
async fn test_parallel_forks_are_independent() {
    let engine = Arc::new(CognitivePhysicsEngine::builder().embedding(ring()).build().unwrap());
    let start = CognitiveState::new("d0", 1.0);

    let (a, b) = tokio::join!(
        {
            let engine = engine.clone();
            let start = start.clone();
            tokio::spawn(async move { engine.shift(&start, "d3").await })
        },
        {
            let engine = engine.clone();
            let start = start.clone();
            tokio::spawn(async move { engine.shift(&start, "d6").await })
        }
    );
    let a = a.unwrap().unwrap();
    let b = b.unwrap().unwrap();
    assert_eq!(a.state.focus(), "d3");
    assert_eq!(b.state.focus(), "d6");
    assert_eq!(a.state.history().len(), 2);
    assert_eq!(b.state.history().len(), 2);
    assert_eq!(start.history().len(), 1);
    assert_eq!(start.resources(), 1.0);
}

struct Stalling;

#[async_trait]
impl EmbeddingProvider for Stalling {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(vec![1.0])
    }
}

/// Dropping an in-flight shift leaves the caller's state as it was.
#[tokio::test]
async fn test_cancelled_shift_is_atomic() {
    let engine = CognitivePhysicsEngine::builder().embedding(Stalling).build().unwrap();
    let start = CognitiveState::new("here", 10.0);
    let before = start.clone();

    let timed = tokio::time::timeout(Duration::from_millis(20), engine.shift(&start, "there")).await;
    assert!(timed.is_err());
    assert_eq!(start, before);
}

#[tokio::test]
async fn test_chaos_instability_blocks_until_tick() {
    let engine = CognitivePhysicsEngine::builder().embedding(ring()).build().unwrap();
    let start = CognitiveState::new("d0", 20.0);

    let chaotic = engine.inject_chaos(&start);
    assert!(chaotic.is_success());
    let s = chaotic.state;
    assert!(approx(s.resources(), 15.0));
    assert!(approx(s.compression(), 0.8));

    // Instability blocks the next direct shift; a trajectory tick clears it.
    assert!(!engine.shift(&s, "d1").await.unwrap().is_success());
    let out = engine.execute_trajectory(&s, &["d1"]).await.unwrap();
    assert!(out.is_success());
}

#[tokio::test]
async fn test_distorted_shift_costs_more() {
    let mut cfg = CognitivePhysicsConfig::default();
    cfg.chaos.instability_factor = 0.0;
    let engine = CognitivePhysicsEngine::builder()
        .config(cfg)
        .embedding(ring())
        .build()
        .unwrap();
    let s = engine.inject_chaos(&CognitiveState::new("d0", 20.0)).state;
    assert_eq!(s.cooldown(), 0.0);

    let plain = engine.shift(&s, "d1").await.unwrap();
    let wild = engine.shift_in_chaos(&s, "d1").await.unwrap();
    assert!(plain.is_success() && wild.is_success());
    assert!(approx(plain.cost, (1.0 - 10f64.to_radians().cos()) * 0.8));
    assert!(approx(wild.cost, plain.cost * 1.5));
}

#[tokio::test]
async fn test_superposition_then_shift_from_winner() {
    let engine = CognitivePhysicsEngine::builder()
        .embedding(ring())
        .ethics(DenyListGate::new().deny("d1"))
        .build()
        .unwrap();
    let start = CognitiveState::new("d0", 10.0);
    // d1 is closest but denied: (0.985 + 0) / 3 < d2 at (0.94 + 1) / 3.
    let won = engine.superpose(&start, &["d1", "d2", "d9"]).await.unwrap().unwrap();
    assert_eq!(won.state.focus(), "d2");
    assert!(assert_disentangled(&won.state).is_ok());
    assert_eq!(won.state.resources(), 10.0);

    let next = engine.shift(&won.state, "d3").await.unwrap();
    assert!(next.is_success());
    assert_eq!(next.state.history(), ["d0", "d2", "d3"].map(String::from));
}

struct FlakyRing {
    inner: StaticEmbedding,
    calls: Arc<AtomicU32>,
}

#[async_trait]
impl EmbeddingProvider for FlakyRing {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n % 2 == 0 {
            return Err(TransientError::new("rate limited").into());
        }
        self.inner.embed(text).await
    }
}

#[tokio::test]
async fn test_retrying_cached_provider_through_engine() {
    let calls = Arc::new(AtomicU32::new(0));
    let provider = CachedEmbedding::new(RetryEmbedding::new(
        FlakyRing { inner: ring(), calls: calls.clone() },
        RetryConfig {
            attempts: 3,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
            jitter: 0.0,
        },
    ));
    let engine = CognitivePhysicsEngine::builder().embedding(provider).build().unwrap();

    let out = engine
        .execute_trajectory(&CognitiveState::new("d0", 5.0), &["d1", "d0", "d1"])
        .await
        .unwrap();
    assert!(out.is_success());
    // Two labels, each failing once before succeeding; later steps hit the cache.
    assert_eq!(calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_hash_embedding_trajectory_invariants() {
    let mut cfg = CognitivePhysicsConfig::default();
    cfg.concurrent_collapse = true;
    let engine = CognitivePhysicsEngine::builder()
        .config(cfg)
        .embedding(HashEmbedding::new(32))
        .build()
        .unwrap();

    let start = CognitiveState::new("origin", 50.0);
    let won = engine
        .superpose(&start, &["alpha", "beta", "gamma", "delta"])
        .await
        .unwrap()
        .unwrap();
    assert!(assert_state_invariants(&won.state).is_ok());

    let out = engine
        .execute_trajectory(&won.state, &["epsilon", "zeta", "eta"])
        .await
        .unwrap();
    assert!(out.is_success());
    assert!(assert_state_invariants(out.state()).is_ok());
    assert!(assert_compression_bounds(out.state(), &engine.config().evolution).is_ok());
    assert_eq!(out.state().fingerprint(), out.state().clone().fingerprint());
}
