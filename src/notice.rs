//! Purpose: Define a stable, structured schema for non-fatal stderr notices.
//! Exports: `Notice`, `notice_json`, `skip_notice`.
//! Role: Shared contract helper for CLI diagnostics (non-error events).
//! Invariants: Notices are non-fatal and never alter stdout payloads.
//! Invariants: JSON schema is stable once published; fields are additive-only.
use serde_json::{Map, Value, json};

use crate::core::keyfile::SkippedRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: String,
    pub time: String,
    pub cmd: String,
    pub path: String,
    pub line: Option<u64>,
    pub message: String,
    pub details: Map<String, Value>,
}

/// Notice for a record dropped under the skip policy.
pub fn skip_notice(record: &SkippedRecord, path: &str, cmd: &str, time: String) -> Notice {
    let mut details = Map::new();
    details.insert("declaration".to_string(), json!(record.declaration));
    Notice {
        kind: "skip".to_string(),
        time,
        cmd: cmd.to_string(),
        path: path.to_string(),
        line: Some(record.line),
        message: record.message.clone(),
        details,
    }
}

pub fn notice_json(notice: &Notice) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(notice.kind));
    inner.insert("time".to_string(), json!(notice.time));
    inner.insert("cmd".to_string(), json!(notice.cmd));
    inner.insert("path".to_string(), json!(notice.path));
    if let Some(line) = notice.line {
        inner.insert("line".to_string(), json!(line));
    }
    inner.insert("message".to_string(), json!(notice.message));
    inner.insert("details".to_string(), Value::Object(notice.details.clone()));

    let mut outer = Map::new();
    outer.insert("notice".to_string(), Value::Object(inner));
    Value::Object(outer)
}
