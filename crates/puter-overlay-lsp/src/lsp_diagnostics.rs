//! LSP `Diagnostic` objects attached to evaluation entries.
//!
//! Diagnostics are forwarded to the host exactly as received: every item of the array is kept,
//! in order, with all of its fields and their original JSON types. Nothing is validated here;
//! items the host cannot place are its own concern.

use puter_overlay::Diagnostic;
use serde_json::Value;

/// Wrap each item of a diagnostics array, keeping order.
///
/// Anything other than an array yields no diagnostics.
pub fn diagnostics_from_value(value: &Value) -> Vec<Diagnostic> {
    let Some(items) = value.as_array() else {
        tracing::trace!(diagnostics = %value, "ignoring non-array diagnostics field");
        return Vec::new();
    };

    items
        .iter()
        .map(|item| {
            let diagnostic = Diagnostic::from_value(item.clone());
            if diagnostic.range().is_none() {
                tracing::trace!(diagnostic = %item, "forwarding diagnostic without a valid range");
            }
            diagnostic
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use puter_overlay::{DiagnosticSeverity, Position};
    use serde_json::json;

    #[test]
    fn test_items_are_kept_verbatim_and_in_order() {
        let value = json!([
            {
                "range": {
                    "start": { "line": 2, "character": 5 },
                    "end": { "line": 2, "character": 9 }
                },
                "severity": 1,
                "code": 42,
                "codeDescription": { "href": "https://example.invalid/42" },
                "tags": [1],
                "message": "unknown unit"
            },
            { "message": "no range", "severity": 7 },
            "not an object"
        ]);

        let diagnostics = diagnostics_from_value(&value);
        let values: Vec<Value> = diagnostics.iter().map(|d| d.as_value().clone()).collect();
        assert_eq!(Value::Array(values), value);

        assert_eq!(
            diagnostics[0].range().map(|r| r.start),
            Some(Position::new(2, 5))
        );
        assert_eq!(diagnostics[0].severity(), Some(DiagnosticSeverity::Error));
        assert_eq!(diagnostics[0].code(), Some(&json!(42)));
        assert_eq!(diagnostics[1].message(), "no range");
        assert_eq!(diagnostics[1].severity(), None);
    }

    #[test]
    fn test_non_array_yields_nothing() {
        assert!(diagnostics_from_value(&json!(null)).is_empty());
        assert!(diagnostics_from_value(&json!({ "message": "x" })).is_empty());
    }
}
