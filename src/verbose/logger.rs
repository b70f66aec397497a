use crate::verbose::VerboseLevel;
use serde_json::{Map, Value, json};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Per-run logger that does not depend on global variables.
///
/// Every line carries the run identifier it was created with, so the log
/// streams of concurrently running simulators stay distinguishable. Lines
/// are rendered as single-object JSON via `serde_json`, matching the shape
/// of the crate's `tracing` output.
#[derive(Debug, Clone)]
pub struct LocalLogger {
    level: VerboseLevel,
    run_tag: String,
}

impl LocalLogger {
    /// Creates a logger tagging every line with the given run identifier.
    pub fn with_run(level: VerboseLevel, run: impl Into<String>) -> Self {
        Self {
            level,
            run_tag: run.into(),
        }
    }

    pub fn set_level(&mut self, level: VerboseLevel) {
        self.level = level
    }

    pub fn log_with_fields(&self, event: &str, message: &str, fields: &[(&str, &dyn fmt::Display)]) {
        if self.level == VerboseLevel::None {
            return;
        }
        println!("{}", self.render_line(event, message, fields));
    }

    /// Builds the JSON log line: the fixed keys (`ts`, `level`, `run`,
    /// `event`, `msg`) first, then the caller's fields stringified
    /// through their `Display` impls.
    fn render_line(&self, event: &str, message: &str, fields: &[(&str, &dyn fmt::Display)]) -> String {
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        let mut line = Map::new();
        line.insert("ts".to_string(), json!(ts));
        line.insert("level".to_string(), json!(self.level.to_string()));
        line.insert("run".to_string(), json!(self.run_tag));
        line.insert("event".to_string(), json!(event));
        line.insert("msg".to_string(), json!(message));
        for (key, value) in fields {
            line.insert((*key).to_string(), json!(format!("{}", value)));
        }
        Value::Object(line).to_string()
    }
}
