// src/uif/record.rs
use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

/// Shared mutable context threaded through a pipeline run.
///
/// Any skill may read existing keys and write new ones; keys are the
/// caller's namespace to manage. Warnings are append-only, and there is no
/// remove operation: earlier-stage results stay inspectable for every later
/// stage. Replacing a key is allowed but never silent.
#[derive(Debug, Clone, Default)]
pub struct InterfaceRecord {
    original_query: String,
    intermediate: HashMap<String, Value>,
    warnings: Vec<String>,
}

impl InterfaceRecord {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            original_query: query.into(),
            intermediate: HashMap::new(),
            warnings: Vec::new(),
        }
    }

    pub fn query(&self) -> &str {
        &self.original_query
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.intermediate.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.intermediate.get(key).and_then(|v| v.as_str())
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.intermediate.get(key).and_then(|v| v.as_bool())
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.intermediate.get(key).and_then(|v| v.as_f64())
    }

    /// Write an intermediate value. Replacing an existing key appends a
    /// warning naming it; the write itself always goes through.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        if self.intermediate.contains_key(&key) {
            self.warnings
                .push(format!("intermediate key '{key}' replaced"));
        }
        self.intermediate.insert(key, value);
    }

    /// Serde bridge for typed artifacts. Serialization failure degrades to
    /// a warning rather than an error; the record stays consumable.
    pub fn set_typed<T: Serialize>(&mut self, key: impl Into<String>, value: &T) {
        let key = key.into();
        match serde_json::to_value(value) {
            Ok(v) => self.set(key, v),
            Err(e) => self
                .warnings
                .push(format!("failed to serialize '{key}': {e}")),
        }
    }

    pub fn add_warning(&mut self, text: impl Into<String>) {
        self.warnings.push(text.into());
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// True when every listed key is present. Used by `can_execute`
    /// predicates, which must stay pure.
    pub fn keys_present(&self, keys: &[&str]) -> bool {
        keys.iter().all(|k| self.intermediate.contains_key(*k))
    }
}
