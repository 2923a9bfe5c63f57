#![warn(missing_docs)]
//! Puter Overlay - Headless Evaluation Overlay Engine
//!
//! # Overview
//!
//! `puter-overlay` keeps a per-line overlay (inline evaluation results plus diagnostics)
//! consistent with the documents of a host editor. It does not compute results and it does not
//! draw anything: results are handed in as full-snapshot reports, and the overlay is projected
//! onto the host through the [`EditorHost`] adapter.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Notification Reconciler (puter-overlay-lsp)│  ← payload normalization
//! ├─────────────────────────────────────────────┤
//! │  Overlay Store                              │  ← per-document snapshots
//! ├──────────────────────┬──────────────────────┤
//! │  Annotation Renderer │  Diagnostic Publisher│  ← projections
//! ├──────────────────────┴──────────────────────┤
//! │  EditorHost adapter (Workspace in-memory)   │  ← host primitives
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use puter_overlay::{
//!     AnnotationRenderer, AnnotationStyle, DecorationLayerId, EvaluationEntry,
//!     EvaluationReport, OverlayStore, Workspace,
//! };
//!
//! let mut workspace = Workspace::new();
//! let uri = workspace.open_document("file:///notes.txt", "a = 40\nb = a + 2\n").unwrap();
//! workspace.set_active_document(&uri).unwrap();
//!
//! let mut store = OverlayStore::new();
//! store.apply_report(EvaluationReport {
//!     uri: uri.clone(),
//!     entries: vec![EvaluationEntry::new(1, "=> 42")],
//! });
//!
//! let mut renderer = AnnotationRenderer::new(AnnotationStyle::default());
//! renderer.render(&mut workspace, &uri, store.get(&uri).unwrap());
//!
//! let shown = workspace.decorations_for(&uri, DecorationLayerId::EVALUATION_RESULTS);
//! assert_eq!(shown.len(), 1);
//! assert_eq!(shown[0].text, "=> 42");
//! ```
//!
//! # Module Description
//!
//! - [`store`] - Overlay Store (per-document full-snapshot state)
//! - [`render`] - Annotation Renderer
//! - [`publish`] - Diagnostic Publisher
//! - [`host`] - Document/Editor adapter trait
//! - [`workspace`] - In-memory host implementation
//! - [`config`] - Engine configuration

pub mod config;
pub mod decorations;
pub mod diagnostics;
pub mod error;
pub mod host;
pub mod line_index;
pub mod position;
pub mod publish;
pub mod render;
pub mod store;
pub mod uri;
pub mod workspace;

pub use config::{
    DEFAULT_DIAGNOSTIC_COLLECTION, DEFAULT_NOTIFICATION_METHOD, OverlayConfig, SETTINGS_SECTION,
};
pub use decorations::{
    AnnotationStyle, Decoration, DecorationKind, DecorationLayerId, DecorationPlacement,
    FontStyle,
};
pub use diagnostics::{Diagnostic, DiagnosticSeverity};
pub use error::{LineLookupError, OverlayError};
pub use host::{EditorHost, LineInfo};
pub use line_index::LineIndex;
pub use position::{Position, Range};
pub use publish::DiagnosticPublisher;
pub use render::{AnnotationRenderer, RenderOutcome};
pub use store::{
    EvaluationEntry, EvaluationReport, OverlayState, OverlayStore, ReplaceOutcome, TrackingState,
};
pub use uri::DocumentUri;
pub use workspace::{Workspace, WorkspaceChange, WorkspaceChangeKind, WorkspaceError};
