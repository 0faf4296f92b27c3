//! Per-attempt record of completed calls, used for loop detection.

use std::collections::HashMap;
use std::fmt::Write as _;

use serde::Serialize;
use serde_json::Value;

/// Renders the canonical identity of a call from its coerced arguments.
///
/// Two calls are identical when their keys are equal, so `add(2, 3)` and
/// `add( 2 ,"3")` share the key `add(2, 3)` once `"3"` is coerced to an
/// integer.
pub fn canonical_key(name: &str, args: &[Value]) -> String {
    let rendered: Vec<String> = args.iter().map(Value::to_string).collect();
    format!("{name}({})", rendered.join(", "))
}

/// One completed call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallRecord {
    /// Canonical call key.
    pub key: String,
    /// The textual result.
    pub result: String,
}

/// Completed calls of the current attempt, keyed by canonical call key.
///
/// An attempt lasts until the conversation starts a new thread. A call
/// whose key is already present is a repeat, which the invoker reports
/// instead of executing again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallHistory {
    records: Vec<CallRecord>,
    index: HashMap<String, usize>,
}

impl CallHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded result for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.index
            .get(key)
            .map(|&i| self.records[i].result.as_str())
    }

    /// Returns true if `key` has been recorded.
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Records a result. A second write for the same key replaces the
    /// result and keeps the original position.
    pub fn record(&mut self, key: impl Into<String>, result: impl Into<String>) {
        let key = key.into();
        let result = result.into();
        if let Some(&i) = self.index.get(&key) {
            self.records[i].result = result;
        } else {
            self.index.insert(key.clone(), self.records.len());
            self.records.push(CallRecord { key, result });
        }
    }

    /// Records in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &CallRecord> {
        self.records.iter()
    }

    /// Number of distinct calls recorded.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Forgets every record. Called when a new thread starts.
    pub fn clear(&mut self) {
        self.records.clear();
        self.index.clear();
    }

    /// One `key = result` line per record, for prompts.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for record in &self.records {
            let _ = writeln!(out, "- {} = {}", record.key, record.result);
        }
        out
    }
}
