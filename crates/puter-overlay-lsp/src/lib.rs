#![warn(missing_docs)]
//! `puter-overlay-lsp` - language-server bridge for `puter-overlay`.
//!
//! This crate turns the evaluation notifications of a language server into overlay updates:
//! payload normalization across every historical payload shape, LSP diagnostic parsing, and the
//! [`EvaluationReconciler`] that drives the `puter_overlay` store and projections.
//!
//! It is transport-agnostic. The host feeds `(method, params)` pairs (or whole JSON-RPC
//! messages) and focus changes; the reconciler talks back through
//! [`puter_overlay::EditorHost`].
//!
//! ```rust
//! use puter_overlay::{DecorationLayerId, Workspace};
//! use puter_overlay_lsp::EvaluationReconciler;
//! use serde_json::json;
//!
//! let mut workspace = Workspace::new();
//! let uri = workspace.open_document("file:///calc.txt", "a = 40\nb = 2\n// | a + b\n").unwrap();
//! workspace.set_active_document(&uri).unwrap();
//!
//! let mut reconciler = EvaluationReconciler::default();
//! reconciler.handle_notification(
//!     &mut workspace,
//!     "custom/evaluationReport",
//!     &json!({ "documentUri": "file:///calc.txt", "entries": [{ "lineIndex": 2, "resultText": "=> 42" }] }),
//! );
//!
//! let shown = workspace.decorations_for(&uri, DecorationLayerId::EVALUATION_RESULTS);
//! assert_eq!(shown[0].text, "=> 42");
//! ```

pub mod lsp_diagnostics;
pub mod lsp_events;
pub mod payload;
pub mod reconciler;

pub use lsp_diagnostics::diagnostics_from_value;
pub use lsp_events::{DID_CHANGE_CONFIGURATION_METHOD, DID_CLOSE_METHOD, OverlayNotification};
pub use payload::{
    LATEST_SCHEMA_VERSION, NormalizedBatch, RawReport, ReportTarget, normalize_payload,
};
pub use reconciler::{
    EvaluationReconciler, ProjectionOutcome, ReconcileOutcome, ReconcileSummary,
};
