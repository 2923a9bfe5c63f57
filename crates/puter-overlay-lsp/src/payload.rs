//! Evaluation payload normalization.
//!
//! The payload of the evaluation notification has changed shape several times. This module is
//! the only place that knows about those shapes; everything downstream sees
//! [`NormalizedBatch`].
//!
//! Recognized shapes, oldest first:
//!
//! 1. a bare array of entries (`[{ "LineIndex", "EvalResult", "Diagnostics" }]` or the camelCase
//!    `lineIndex` / `resultText` / `diagnostics`), implicitly targeting the active document
//! 2. an array of reports (`[{ "uri" | "documentUri", "interpretations" | "entries" }]`)
//! 3. `{ "reports": [report, ...] }`
//! 4. `{ "documentUri"?, "evaluations": [entry, ...] }` or `{ "evaluations": [report, ...] }`
//! 5. a single report object
//!
//! A payload carrying `schemaVersion` is routed by version instead of by shape: version `1` is a
//! single report (`{ "documentUri"?, "entries" }`) and version `2` is `{ "reports" }`.

use crate::lsp_diagnostics::diagnostics_from_value;
use puter_overlay::{DocumentUri, EvaluationEntry, OverlayError};
use serde_json::Value;

const URI_KEYS: &[&str] = &["documentUri", "uri"];
const ENTRY_LIST_KEYS: &[&str] = &["entries", "interpretations", "evaluations"];
const LINE_KEYS: &[&str] = &["lineIndex", "LineIndex", "line"];
const RESULT_KEYS: &[&str] = &["resultText", "EvalResult", "evalResult", "result"];
const DIAGNOSTIC_KEYS: &[&str] = &["diagnostics", "Diagnostics"];

/// Highest `schemaVersion` understood by [`normalize_payload`].
pub const LATEST_SCHEMA_VERSION: u64 = 2;

/// `schemaVersion` of a payload that is one report object.
const SINGLE_REPORT_SCHEMA_VERSION: u64 = 1;

/// Which document a report applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportTarget {
    /// The report names its document.
    Explicit(DocumentUri),
    /// Legacy report without a document identity: the active document at arrival.
    Implicit,
}

/// A report whose target has not been resolved yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReport {
    /// Target document.
    pub target: ReportTarget,
    /// Well-formed entries, in payload order.
    pub entries: Vec<EvaluationEntry>,
    /// Number of entries dropped because they were malformed.
    pub skipped_entries: usize,
}

impl RawReport {
    /// An implicit-target report.
    pub fn implicit(entries: Vec<EvaluationEntry>) -> Self {
        Self {
            target: ReportTarget::Implicit,
            entries,
            skipped_entries: 0,
        }
    }
}

/// Canonical form of one notification payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedBatch {
    /// An empty batch: clear whatever is shown for the active document.
    ClearImplicit,
    /// One or more reports.
    Reports(Vec<RawReport>),
}

impl NormalizedBatch {
    /// Total number of malformed entries dropped across the batch.
    pub fn skipped_entries(&self) -> usize {
        match self {
            Self::ClearImplicit => 0,
            Self::Reports(reports) => reports.iter().map(|r| r.skipped_entries).sum(),
        }
    }

    /// Resolve into reports, turning [`NormalizedBatch::ClearImplicit`] into an empty implicit
    /// report.
    pub fn into_reports(self) -> Vec<RawReport> {
        match self {
            Self::ClearImplicit => vec![RawReport::implicit(Vec::new())],
            Self::Reports(reports) => reports,
        }
    }
}

fn first_field<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .find_map(|key| value.get(*key))
        .filter(|v| !v.is_null())
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn is_entry_object(value: &Value) -> bool {
    value.is_object() && first_field(value, LINE_KEYS).is_some()
}

fn is_report_object(value: &Value) -> bool {
    value.is_object() && first_field(value, ENTRY_LIST_KEYS).is_some_and(Value::is_array)
}

fn parse_entry(value: &Value) -> Option<EvaluationEntry> {
    let line = first_field(value, LINE_KEYS)?.as_u64()?;
    let line = usize::try_from(line).ok()?;

    let result_text = match first_field(value, RESULT_KEYS) {
        None => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };

    let diagnostics = first_field(value, DIAGNOSTIC_KEYS)
        .map(diagnostics_from_value)
        .unwrap_or_default();

    Some(EvaluationEntry {
        line,
        result_text,
        diagnostics,
    })
}

fn parse_entries(items: &[Value]) -> (Vec<EvaluationEntry>, usize) {
    let mut entries = Vec::with_capacity(items.len());
    let mut skipped = 0;
    for item in items {
        match parse_entry(item) {
            Some(entry) => entries.push(entry),
            None => {
                tracing::debug!(entry = %item, "skipping malformed evaluation entry");
                skipped += 1;
            }
        }
    }
    (entries, skipped)
}

fn parse_target(value: &Value) -> Result<ReportTarget, OverlayError> {
    match first_field(value, URI_KEYS) {
        None => Ok(ReportTarget::Implicit),
        Some(Value::String(uri)) if !uri.trim().is_empty() => {
            Ok(ReportTarget::Explicit(DocumentUri::new(uri)))
        }
        Some(other) => Err(OverlayError::MalformedPayload(format!(
            "document uri must be a non-empty string, got {}",
            value_kind(other)
        ))),
    }
}

fn parse_report(value: &Value) -> Result<RawReport, OverlayError> {
    let target = parse_target(value)?;
    let items = first_field(value, ENTRY_LIST_KEYS)
        .and_then(Value::as_array)
        .ok_or_else(|| OverlayError::MalformedPayload("report has no entry list".to_string()))?;
    let (entries, skipped_entries) = parse_entries(items);
    Ok(RawReport {
        target,
        entries,
        skipped_entries,
    })
}

fn normalize_report_list(items: &[Value]) -> Result<NormalizedBatch, OverlayError> {
    if items.is_empty() {
        return Ok(NormalizedBatch::ClearImplicit);
    }
    let reports = items
        .iter()
        .map(|item| {
            if is_report_object(item) {
                parse_report(item)
            } else {
                Err(OverlayError::MalformedPayload(format!(
                    "expected a report object, got {}",
                    value_kind(item)
                )))
            }
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(NormalizedBatch::Reports(reports))
}

fn normalize_array(items: &[Value]) -> Result<NormalizedBatch, OverlayError> {
    if items.is_empty() {
        return Ok(NormalizedBatch::ClearImplicit);
    }

    if items.iter().all(is_report_object) {
        return normalize_report_list(items);
    }

    if items.iter().any(is_entry_object) {
        let (entries, skipped_entries) = parse_entries(items);
        return Ok(NormalizedBatch::Reports(vec![RawReport {
            target: ReportTarget::Implicit,
            entries,
            skipped_entries,
        }]));
    }

    Err(OverlayError::MalformedPayload(
        "array elements are neither reports nor entries".to_string(),
    ))
}

fn normalize_versioned(version: &Value, payload: &Value) -> Result<NormalizedBatch, OverlayError> {
    let version = version.as_u64().ok_or_else(|| {
        OverlayError::MalformedPayload(format!(
            "schemaVersion must be a non-negative integer, got {}",
            value_kind(version)
        ))
    })?;

    match version {
        SINGLE_REPORT_SCHEMA_VERSION => Ok(NormalizedBatch::Reports(vec![parse_report(payload)?])),
        LATEST_SCHEMA_VERSION => {
            let reports = payload
                .get("reports")
                .and_then(Value::as_array)
                .ok_or_else(|| {
                    OverlayError::MalformedPayload(format!(
                        "schemaVersion {LATEST_SCHEMA_VERSION} requires `reports`"
                    ))
                })?;
            normalize_report_list(reports)
        }
        other => Err(OverlayError::UnsupportedSchemaVersion(other)),
    }
}

fn normalize_object(payload: &Value) -> Result<NormalizedBatch, OverlayError> {
    if let Some(version) = payload.get("schemaVersion") {
        return normalize_versioned(version, payload);
    }

    if let Some(reports) = first_field(payload, &["reports"]) {
        let reports = reports.as_array().ok_or_else(|| {
            OverlayError::MalformedPayload(format!(
                "`reports` must be an array, got {}",
                value_kind(reports)
            ))
        })?;
        return normalize_report_list(reports);
    }

    if let Some(evaluations) = first_field(payload, &["evaluations"]).and_then(Value::as_array)
        && !evaluations.is_empty()
        && evaluations.iter().all(is_report_object)
    {
        return normalize_report_list(evaluations);
    }

    if is_report_object(payload) {
        return Ok(NormalizedBatch::Reports(vec![parse_report(payload)?]));
    }

    Err(OverlayError::MalformedPayload(
        "object has no `reports`, `evaluations` or entry list".to_string(),
    ))
}

/// Normalize an evaluation notification payload.
pub fn normalize_payload(payload: &Value) -> Result<NormalizedBatch, OverlayError> {
    match payload {
        Value::Array(items) => normalize_array(items),
        Value::Object(_) => normalize_object(payload),
        other => Err(OverlayError::MalformedPayload(format!(
            "expected an array or an object, got {}",
            value_kind(other)
        ))),
    }
}
