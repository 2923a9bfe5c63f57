use pretty_assertions::assert_eq;
use puter_overlay::{DocumentUri, EvaluationEntry, OverlayError};
use puter_overlay_lsp::{
    LATEST_SCHEMA_VERSION, NormalizedBatch, RawReport, ReportTarget, normalize_payload,
};
use serde_json::json;

fn reports(batch: NormalizedBatch) -> Vec<RawReport> {
    match batch {
        NormalizedBatch::Reports(reports) => reports,
        NormalizedBatch::ClearImplicit => panic!("expected reports, got ClearImplicit"),
    }
}

fn explicit(uri: &str) -> ReportTarget {
    ReportTarget::Explicit(DocumentUri::new(uri))
}

#[test]
fn test_bare_entry_array_targets_the_active_document() {
    let batch = normalize_payload(&json!([
        { "lineIndex": 2, "resultText": "=> 42", "diagnostics": [] },
        { "lineIndex": 0, "resultText": "40" }
    ]))
    .unwrap();

    let reports = reports(batch);
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].target, ReportTarget::Implicit);
    assert_eq!(
        reports[0].entries,
        vec![EvaluationEntry::new(2, "=> 42"), EvaluationEntry::new(0, "40")]
    );
}

#[test]
fn test_empty_payloads_clear_the_active_document() {
    assert_eq!(
        normalize_payload(&json!([])).unwrap(),
        NormalizedBatch::ClearImplicit
    );
    assert_eq!(
        normalize_payload(&json!({ "reports": [] })).unwrap(),
        NormalizedBatch::ClearImplicit
    );
    assert_eq!(
        normalize_payload(&json!({ "schemaVersion": 2, "reports": [] })).unwrap(),
        NormalizedBatch::ClearImplicit
    );
}

#[test]
fn test_legacy_interpretations_shape() {
    let batch = normalize_payload(&json!([{
        "uri": "file:///C%3A/notes/calc.txt",
        "interpretations": [
            {
                "LineIndex": 1,
                "EvalResult": "5 USD",
                "Diagnostics": [{
                    "range": {
                        "start": { "line": 1, "character": 0 },
                        "end": { "line": 1, "character": 3 }
                    },
                    "message": "stale rate"
                }]
            }
        ]
    }]))
    .unwrap();

    let reports = reports(batch);
    assert_eq!(reports[0].target, explicit("file:///c:/notes/calc.txt"));
    assert_eq!(reports[0].entries[0].line, 1);
    assert_eq!(reports[0].entries[0].result_text, "5 USD");
    assert_eq!(reports[0].entries[0].diagnostics[0].message(), "stale rate");
}

#[test]
fn test_reports_keep_payload_order() {
    let batch = normalize_payload(&json!({
        "reports": [
            { "documentUri": "file:///b.txt", "entries": [{ "lineIndex": 0, "resultText": "b" }] },
            { "documentUri": "file:///a.txt", "entries": [] }
        ]
    }))
    .unwrap();

    let targets: Vec<ReportTarget> = reports(batch).into_iter().map(|r| r.target).collect();
    assert_eq!(targets, vec![explicit("file:///b.txt"), explicit("file:///a.txt")]);
}

#[test]
fn test_nested_evaluations() {
    let single = normalize_payload(&json!({
        "documentUri": "untitled:Untitled-1",
        "evaluations": [{ "lineIndex": 3, "resultText": "7" }]
    }))
    .unwrap();
    let single = reports(single);
    assert_eq!(single.len(), 1);
    assert_eq!(single[0].target, explicit("untitled:Untitled-1"));
    assert_eq!(single[0].entries, vec![EvaluationEntry::new(3, "7")]);

    let listed = normalize_payload(&json!({
        "evaluations": [
            { "uri": "file:///a.txt", "evaluations": [{ "line": 0, "result": "1" }] },
            { "uri": "file:///b.txt", "entries": [] }
        ]
    }))
    .unwrap();
    let listed = reports(listed);
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].entries, vec![EvaluationEntry::new(0, "1")]);
    assert!(listed[1].entries.is_empty());
}

#[test]
fn test_schema_version_is_preferred_over_sniffing() {
    let v1 = normalize_payload(&json!({
        "schemaVersion": 1,
        "entries": [{ "lineIndex": 0, "resultText": "x" }]
    }))
    .unwrap();
    assert_eq!(reports(v1)[0].target, ReportTarget::Implicit);

    let latest = normalize_payload(&json!({
        "schemaVersion": LATEST_SCHEMA_VERSION,
        "reports": [{ "documentUri": "file:///a.txt", "entries": [] }]
    }))
    .unwrap();
    assert_eq!(reports(latest)[0].target, explicit("file:///a.txt"));

    let next = LATEST_SCHEMA_VERSION + 1;
    assert_eq!(
        normalize_payload(&json!({ "schemaVersion": next, "reports": [] })),
        Err(OverlayError::UnsupportedSchemaVersion(next))
    );
    assert!(matches!(
        normalize_payload(&json!({ "schemaVersion": LATEST_SCHEMA_VERSION, "entries": [] })),
        Err(OverlayError::MalformedPayload(_))
    ));
    assert!(matches!(
        normalize_payload(&json!({ "schemaVersion": "2" })),
        Err(OverlayError::MalformedPayload(_))
    ));
}

#[test]
fn test_malformed_entries_are_skipped_not_fatal() {
    let batch = normalize_payload(&json!([
        { "lineIndex": -1, "resultText": "negative" },
        { "lineIndex": "2", "resultText": "string line" },
        "not an entry",
        { "lineIndex": 4, "resultText": 12.5 },
        { "lineIndex": 5, "resultText": null, "unknown": true }
    ]))
    .unwrap();

    assert_eq!(batch.skipped_entries(), 3);
    let reports = reports(batch);
    assert_eq!(
        reports[0].entries,
        vec![EvaluationEntry::new(4, "12.5"), EvaluationEntry::new(5, "")]
    );
}

#[test]
fn test_unrecognized_payloads_are_malformed() {
    for payload in [
        json!(null),
        json!("text"),
        json!(42),
        json!({ "foo": "bar" }),
        json!([1, 2, 3]),
        json!({ "reports": "nope" }),
        json!([{ "documentUri": 7, "entries": [] }]),
        json!({ "reports": [{ "documentUri": "file:///a.txt" }] }),
    ] {
        assert!(
            matches!(
                normalize_payload(&payload),
                Err(OverlayError::MalformedPayload(_))
            ),
            "payload {payload} should be malformed"
        );
    }
}
