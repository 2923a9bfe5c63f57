//! Diagnostics data model.
//!
//! Diagnostics attached to evaluation entries are pass-through values: the overlay never
//! rewrites them, it only forwards them (in order) to the host's diagnostic collection. A
//! [`Diagnostic`] therefore wraps the LSP `Diagnostic` object exactly as it was received,
//! including fields this crate has no model for (`tags`, `codeDescription`, vendor extensions).
//! The typed accessors are a read-only view for hosts and tests.

use crate::position::{Position, Range};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Diagnostic severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticSeverity {
    /// Error diagnostics.
    Error,
    /// Warning diagnostics.
    Warning,
    /// Informational diagnostics.
    Information,
    /// Hint diagnostics.
    Hint,
}

impl DiagnosticSeverity {
    /// Convert the numeric LSP `DiagnosticSeverity` into an enum.
    pub fn from_u64(value: u64) -> Option<Self> {
        match value {
            1 => Some(Self::Error),
            2 => Some(Self::Warning),
            3 => Some(Self::Information),
            4 => Some(Self::Hint),
            _ => None,
        }
    }

    /// The numeric LSP value of this severity.
    pub fn as_u64(self) -> u64 {
        match self {
            Self::Error => 1,
            Self::Warning => 2,
            Self::Information => 3,
            Self::Hint => 4,
        }
    }
}

/// A single diagnostic item, kept as the JSON value it arrived as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostic(Value);

fn position_from_value(value: &Value) -> Option<Position> {
    let line = u32::try_from(value.get("line")?.as_u64()?).ok()?;
    let character = u32::try_from(value.get("character")?.as_u64()?).ok()?;
    Some(Position { line, character })
}

impl Diagnostic {
    /// Create an LSP-shaped diagnostic with a range and a message.
    pub fn new(range: Range, message: impl Into<String>) -> Self {
        let position = |pos: Position| {
            Value::Object(Map::from_iter([
                ("line".to_string(), Value::from(pos.line)),
                ("character".to_string(), Value::from(pos.character)),
            ]))
        };
        let range = Value::Object(Map::from_iter([
            ("start".to_string(), position(range.start)),
            ("end".to_string(), position(range.end)),
        ]));
        Self(Value::Object(Map::from_iter([
            ("range".to_string(), range),
            ("message".to_string(), Value::String(message.into())),
        ])))
    }

    /// Wrap a diagnostic value as received.
    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    /// Set the severity.
    pub fn with_severity(mut self, severity: DiagnosticSeverity) -> Self {
        if let Value::Object(fields) = &mut self.0 {
            fields.insert("severity".to_string(), Value::from(severity.as_u64()));
        }
        self
    }

    /// The value as received.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Unwrap into the value as received.
    pub fn into_value(self) -> Value {
        self.0
    }

    /// The `range` field, if it is a well-formed LSP range.
    pub fn range(&self) -> Option<Range> {
        let range = self.0.get("range")?;
        let start = position_from_value(range.get("start")?)?;
        let end = position_from_value(range.get("end")?)?;
        Some(Range { start, end })
    }

    /// The `severity` field, if it is a known LSP severity.
    pub fn severity(&self) -> Option<DiagnosticSeverity> {
        self.0
            .get("severity")
            .and_then(Value::as_u64)
            .and_then(DiagnosticSeverity::from_u64)
    }

    /// The `message` field (empty when missing or not a string).
    pub fn message(&self) -> &str {
        self.0.get("message").and_then(Value::as_str).unwrap_or("")
    }

    /// The `code` field, with its original JSON type.
    pub fn code(&self) -> Option<&Value> {
        self.0.get("code")
    }

    /// Any other field, by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }
}
