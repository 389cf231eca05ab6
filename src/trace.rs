use serde::Serialize;
use std::fs::{create_dir_all, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

// ---------- JSONL reasoning-trace writer ----------
//
// One envelope per pipeline phase so basic fields are queryable without
// deserializing the payload. Audit writes must never break the pipeline:
// failures go to stderr and are otherwise swallowed.

fn trace_dir(default_dir: &str) -> PathBuf {
    std::env::var_os("RAZIEL_TRACE_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default_dir))
}

pub fn record_cycle_trace<T: Serialize>(default_dir: &str, phase: &str, payload: &T) {
    let base = trace_dir(default_dir);

    if let Err(e) = create_dir_all(&base) {
        eprintln!("[trace] create_dir_all({:?}) failed: {e}", base);
        return;
    }

    let path = base.join("reasoning_trace.jsonl");

    let envelope = serde_json::json!({
        "ts": chrono::Utc::now().timestamp_millis(),
        "phase": phase,
        "payload": payload,
    });

    match serde_json::to_string(&envelope) {
        Ok(line) => {
            match OpenOptions::new().create(true).append(true).open(&path) {
                Ok(mut f) => {
                    if let Err(e) = writeln!(f, "{line}") {
                        eprintln!("[trace] write failed: {e}");
                    }
                }
                Err(e) => eprintln!("[trace] open {:?} failed: {e}", path),
            }
        }
        Err(e) => eprintln!("[trace] serialize failed: {e}"),
    }
}
