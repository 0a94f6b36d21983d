//! Run one trajectory from the command line.
//!
//! ```text
//! trajectory <focus> <resources> <target>...
//! ```
//!
//! Config comes from `CPE_*` variables (or `CPE_CONFIG` pointing at a JSON
//! file). Embeddings are hash-seeded (`CPE_EMBED_DIM`, default 64); the gate
//! reads comma lists from `CPE_DENY` and `CPE_UNCERTAIN`.

use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use serde_json::json;

use cognitive_physics::adapter::{CachedEmbedding, DenyListGate, HashEmbedding};
use cognitive_physics::logging::{log, obj, v_num, v_str, Domain, Level};
use cognitive_physics::verify::invariants::{
    assert_compression_bounds, assert_disentangled, assert_state_invariants,
};
use cognitive_physics::{CognitivePhysicsConfig, CognitivePhysicsEngine, CognitiveState};

fn load_config() -> Result<CognitivePhysicsConfig> {
    match std::env::var("CPE_CONFIG") {
        Ok(path) => CognitivePhysicsConfig::from_json_file(path),
        Err(_) => Ok(CognitivePhysicsConfig::from_env()),
    }
}

async fn run(args: &[String]) -> Result<bool> {
    let [focus, resources, targets @ ..] = args else {
        bail!("usage: trajectory <focus> <resources> <target>...");
    };
    let resources: f64 = resources
        .parse()
        .with_context(|| format!("resources must be a number, got {:?}", resources))?;

    let cfg = load_config()?;
    let dim = std::env::var("CPE_EMBED_DIM")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(64);
    let gate = DenyListGate::from_lists(
        &std::env::var("CPE_DENY").unwrap_or_default(),
        &std::env::var("CPE_UNCERTAIN").unwrap_or_default(),
    );

    log(
        Level::Info,
        Domain::System,
        "startup",
        obj(&[
            ("focus", v_str(focus)),
            ("resources", v_num(resources)),
            ("targets", json!(targets)),
            ("embed_dim", json!(dim)),
        ]),
    );

    let evolution = cfg.evolution.clone();
    let engine = CognitivePhysicsEngine::builder()
        .config(cfg)
        .embedding(CachedEmbedding::new(HashEmbedding::new(dim)))
        .ethics(gate)
        .build()?;

    let start = CognitiveState::new(focus.as_str(), resources);
    let outcome = engine.execute_trajectory(&start, targets).await?;

    let end = outcome.state();
    let checks = assert_state_invariants(end)
        .and_then(|_| assert_compression_bounds(end, &evolution))
        .and_then(|_| assert_disentangled(end));
    if let Err(v) = checks {
        bail!("invariant violated: {}", v.msg);
    }

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(outcome.is_success())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::from(2)
        }
    }
}
