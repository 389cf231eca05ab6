// src/adaptation/examples.rs
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One input/output demonstration. Read-only once extracted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FewShotExample {
    pub input_text: String,
    pub output_text: String,
    pub example_id: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, Value>,
}

/// All-or-nothing batch validation: one malformed entry rejects the whole
/// batch. Pure; used from `can_execute`.
pub fn validate_examples(raw: &[Value], min_examples: usize, max_examples: usize) -> bool {
    if raw.len() < min_examples || raw.len() > max_examples {
        return false;
    }
    raw.iter().all(is_well_formed)
}

fn is_well_formed(v: &Value) -> bool {
    let Some(obj) = v.as_object() else {
        return false;
    };
    let input_ok = obj
        .get("input")
        .and_then(Value::as_str)
        .map(|s| !s.trim().is_empty())
        .unwrap_or(false);
    let output_ok = obj
        .get("output")
        .and_then(Value::as_str)
        .map(|s| !s.trim().is_empty())
        .unwrap_or(false);
    input_ok && output_ok
}

/// Normalize raw caller-supplied maps into typed examples. Call only after
/// `validate_examples`; unknown fields are ignored, `metadata` passes
/// through verbatim.
pub fn extract_examples(raw: &[Value]) -> Vec<FewShotExample> {
    raw.iter()
        .enumerate()
        .map(|(i, v)| FewShotExample {
            input_text: v["input"].as_str().unwrap_or_default().to_string(),
            output_text: v["output"].as_str().unwrap_or_default().to_string(),
            example_id: format!("example_{i}"),
            metadata: v
                .get("metadata")
                .and_then(Value::as_object)
                .map(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
                .unwrap_or_default(),
        })
        .collect()
}
