//! Structured logging for cognitive trajectories.
//!
//! Every record is one JSON object per line:
//! `{"ts", "run_id", "seq", "lvl", "component", "event", "msg", "data"}`.
//!
//! Environment:
//! - `LOG_LEVEL`: minimum level (`trace` .. `fatal`, default `info`)
//! - `LOG_DOMAINS`: comma-separated domain filter, or `all`
//! - `LOG_DIR`: if set, records are also appended under `<LOG_DIR>/<run_id>/`
//! - `RUN_ID`: overrides the generated run id

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use crate::state::CognitiveState;

// =============================================================================
// Log Levels
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Fatal = 5,
}

impl Level {
    pub fn from_env() -> Self {
        match std::env::var("LOG_LEVEL").as_deref() {
            Ok("trace") => Level::Trace,
            Ok("debug") => Level::Debug,
            Ok("info") => Level::Info,
            Ok("warn") => Level::Warn,
            Ok("error") => Level::Error,
            Ok("fatal") => Level::Fatal,
            _ => Level::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Fatal => "fatal",
        }
    }
}

// =============================================================================
// Log Domains (categories for filtering)
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Shift,         // ZeroShift attempts
    Chaos,         // Chaos injection
    Evolution,     // Compression adaptation
    Superposition, // Entangle / collapse
    Trajectory,    // Multi-target runs
    Adapter,       // Collaborator calls, retries
    System,        // Startup, config
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Shift => "shift",
            Domain::Chaos => "chaos",
            Domain::Evolution => "evolution",
            Domain::Superposition => "superposition",
            Domain::Trajectory => "trajectory",
            Domain::Adapter => "adapter",
            Domain::System => "system",
        }
    }

    pub fn is_enabled(&self) -> bool {
        domain_allowed(std::env::var("LOG_DOMAINS").ok().as_deref(), *self)
    }
}

fn domain_allowed(filter: Option<&str>, domain: Domain) -> bool {
    match filter {
        None | Some("all") => true,
        Some(domains) => domains.split(',').any(|d| d.trim() == domain.as_str()),
    }
}

/// Whether a record at `level` in `domain` would be written.
///
/// Emitters check this before computing anything expensive for the record.
pub fn enabled(level: Level, domain: Domain) -> bool {
    level >= Level::from_env() && domain.is_enabled()
}

// =============================================================================
// Sequence counter and run context
// =============================================================================

static LOG_SEQ: AtomicU64 = AtomicU64::new(0);
static RUN_CONTEXT: OnceLock<RunContext> = OnceLock::new();

fn next_seq() -> u64 {
    LOG_SEQ.fetch_add(1, Ordering::SeqCst)
}

#[derive(Debug)]
struct FileSinks {
    events: Mutex<BufWriter<File>>,
    trace: Mutex<BufWriter<File>>,
}

#[derive(Debug)]
struct RunContext {
    run_id: String,
    files: Option<FileSinks>,
}

fn ensure_run_context() -> &'static RunContext {
    RUN_CONTEXT.get_or_init(|| {
        let run_id = std::env::var("RUN_ID")
            .unwrap_or_else(|_| format!("r-{}-{}", ts_epoch_ms(), process::id()));
        let files = std::env::var("LOG_DIR").ok().and_then(|base| open_sinks(&base, &run_id));
        RunContext { run_id, files }
    })
}

fn open_sinks(base: &str, run_id: &str) -> Option<FileSinks> {
    let mut run_dir = PathBuf::from(base);
    run_dir.push(run_id);
    if let Err(err) = create_dir_all(&run_dir) {
        eprintln!("[log] failed to create run dir: {}", err);
        return None;
    }
    let open = |name: &str| match File::create(run_dir.join(name)) {
        Ok(f) => Some(Mutex::new(BufWriter::new(f))),
        Err(err) => {
            eprintln!("[log] failed to create {}: {}", name, err);
            None
        }
    };
    Some(FileSinks {
        events: open("events.jsonl")?,
        trace: open("trace.jsonl")?,
    })
}

fn write_line(writer: &Mutex<BufWriter<File>>, line: &str) {
    if let Ok(mut w) = writer.lock() {
        let _ = writeln!(w, "{}", line);
        let _ = w.flush();
    }
}

// =============================================================================
// Core logging functions
// =============================================================================

/// RFC3339 timestamp with milliseconds
pub fn ts_now() -> String {
    Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Epoch milliseconds
pub fn ts_epoch_ms() -> u64 {
    Utc::now().timestamp_millis() as u64
}

/// Emit a structured log entry
pub fn log(level: Level, domain: Domain, event: &str, fields: Map<String, Value>) {
    if !enabled(level, domain) {
        return;
    }
    let line = render(level, domain.as_str(), event, fields);
    let ctx = ensure_run_context();
    if let Some(files) = &ctx.files {
        match level {
            Level::Trace | Level::Debug => write_line(&files.trace, &line),
            _ => write_line(&files.events, &line),
        }
    }
    eprintln!("{}", line);
}

fn render(level: Level, component: &str, event: &str, fields: Map<String, Value>) -> String {
    let ctx = ensure_run_context();
    let mut data = fields;
    let msg = data.remove("msg").unwrap_or(Value::String(String::new()));

    let mut entry = Map::new();
    entry.insert("ts".to_string(), json!(ts_now()));
    entry.insert("run_id".to_string(), json!(ctx.run_id));
    entry.insert("seq".to_string(), json!(next_seq()));
    entry.insert("lvl".to_string(), json!(level.as_str().to_uppercase()));
    entry.insert("component".to_string(), json!(component));
    entry.insert("event".to_string(), json!(event));
    entry.insert("msg".to_string(), msg);
    entry.insert("data".to_string(), Value::Object(data));
    Value::Object(entry).to_string()
}

// =============================================================================
// Domain emitters
// =============================================================================

/// One ZeroShift attempt. `failure` is the reason code, `None` on success.
/// `result` is hashed only when the record is actually written.
pub fn log_shift(from: &str, to: &str, cost: f64, failure: Option<&str>, result: &CognitiveState) {
    if !enabled(Level::Debug, Domain::Shift) {
        return;
    }
    log(
        Level::Debug,
        Domain::Shift,
        if failure.is_none() { "shift.ok" } else { "shift.failed" },
        obj(&[
            ("from", v_str(from)),
            ("to", v_str(to)),
            ("cost", v_num(cost)),
            ("reason", failure.map(v_str).unwrap_or(Value::Null)),
            ("state_hash", v_str(&result.fingerprint())),
        ]),
    );
}

pub fn log_chaos(focus: &str, cost: f64, compression: f64, failure: Option<&str>) {
    log(
        Level::Debug,
        Domain::Chaos,
        if failure.is_none() { "chaos.injected" } else { "chaos.failed" },
        obj(&[
            ("focus", v_str(focus)),
            ("cost", v_num(cost)),
            ("compression", v_num(compression)),
            ("reason", failure.map(v_str).unwrap_or(Value::Null)),
        ]),
    );
}

pub fn log_adaptation(kind: &str, before: f64, after: f64, coherence: Option<f64>) {
    log(
        Level::Trace,
        Domain::Evolution,
        kind,
        obj(&[
            ("before", v_num(before)),
            ("after", v_num(after)),
            ("coherence", coherence.map(v_num).unwrap_or(Value::Null)),
        ]),
    );
}

/// Collapse decision with every candidate's score, in input order.
pub fn log_collapse(origin: &str, winner: Option<(&str, usize)>, scores: &[(&str, f64)]) {
    let alts: Vec<Value> = scores
        .iter()
        .map(|(focus, score)| json!({"focus": focus, "score": score}))
        .collect();
    log(
        Level::Debug,
        Domain::Superposition,
        "collapse",
        obj(&[
            ("origin", v_str(origin)),
            ("winner", winner.map(|(f, _)| v_str(f)).unwrap_or(Value::Null)),
            ("winner_index", winner.map(|(_, i)| json!(i)).unwrap_or(Value::Null)),
            ("candidates", Value::Array(alts)),
        ]),
    );
}

pub fn log_trajectory(
    event: &str,
    start: &str,
    targets: usize,
    steps_done: usize,
    reason: Option<&str>,
    end: &CognitiveState,
) {
    let level = if reason.is_some() { Level::Info } else { Level::Debug };
    if !enabled(level, Domain::Trajectory) {
        return;
    }
    log(
        level,
        Domain::Trajectory,
        event,
        obj(&[
            ("start", v_str(start)),
            ("targets", json!(targets)),
            ("steps_done", json!(steps_done)),
            ("reason", reason.map(v_str).unwrap_or(Value::Null)),
            ("state_hash", v_str(&end.fingerprint())),
        ]),
    );
}

pub fn log_retry(operation: &str, attempt: u32, total: u32, err: &anyhow::Error, delay: Duration) {
    log(
        Level::Warn,
        Domain::Adapter,
        "retry",
        obj(&[
            ("operation", v_str(operation)),
            ("attempt", json!(attempt)),
            ("total", json!(total)),
            ("error", v_str(&format!("{:#}", err))),
            ("delay_ms", json!(delay.as_millis() as u64)),
        ]),
    );
}

// =============================================================================
// Helpers
// =============================================================================

pub fn obj(pairs: &[(&str, Value)]) -> Map<String, Value> {
    let mut map = Map::new();
    for (k, v) in pairs {
        map.insert((*k).to_string(), v.clone());
    }
    map
}

pub fn v_str(s: &str) -> Value {
    Value::String(s.to_string())
}

pub fn v_num(n: f64) -> Value {
    json!(n)
}
