//! In-memory editor host.
//!
//! [`Workspace`] is a small, UI-agnostic model of the host editor side of the overlay:
//!
//! - open documents (text, per-layer decorations)
//! - the focused document
//! - defined decoration layers and their styles
//! - named diagnostic collections keyed by document
//!
//! It implements [`EditorHost`], which makes it the reference adapter for headless frontends
//! and for tests. Subscribers are notified after every observable change, mirroring how a real
//! editor repaints after `setDecorations` / `DiagnosticCollection::set`.

use crate::decorations::{AnnotationStyle, Decoration, DecorationLayerId};
use crate::diagnostics::Diagnostic;
use crate::error::LineLookupError;
use crate::host::{EditorHost, LineInfo};
use crate::line_index::LineIndex;
use crate::uri::DocumentUri;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors returned by [`Workspace`] document operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkspaceError {
    #[error("document is already open: {0}")]
    /// `open_document` was called twice for the same URI.
    DocumentAlreadyOpen(String),
    #[error("document is not open: {0}")]
    /// The URI does not refer to an open document.
    UnknownDocument(String),
}

/// Kind of a [`WorkspaceChange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspaceChangeKind {
    /// A document was opened.
    DocumentOpened,
    /// A document was closed.
    DocumentClosed,
    /// A document's text was replaced.
    TextChanged,
    /// The focused document changed.
    ActiveDocumentChanged,
    /// A decoration layer was defined or restyled.
    LayerDefined,
    /// A decoration layer was released.
    LayerReleased,
    /// Decorations of a document were replaced.
    DecorationsChanged,
    /// Diagnostics of a document were replaced.
    DiagnosticsChanged,
}

/// A change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceChange {
    /// What changed.
    pub kind: WorkspaceChangeKind,
    /// The affected document, when the change is document-scoped.
    pub uri: Option<DocumentUri>,
    /// Workspace version after the change.
    pub version: u64,
}

/// Change callback type.
pub type WorkspaceChangeCallback = Box<dyn FnMut(&WorkspaceChange) + Send>;

struct DocumentEntry {
    line_index: LineIndex,
    decorations: BTreeMap<DecorationLayerId, Vec<Decoration>>,
}

/// In-memory host editor state.
#[derive(Default)]
pub struct Workspace {
    documents: BTreeMap<DocumentUri, DocumentEntry>,
    active: Option<DocumentUri>,
    layers: BTreeMap<DecorationLayerId, AnnotationStyle>,
    collections: BTreeMap<String, BTreeMap<DocumentUri, Vec<Diagnostic>>>,
    version: u64,
    callbacks: Vec<WorkspaceChangeCallback>,
}

impl Workspace {
    /// Create an empty workspace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to changes.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&WorkspaceChange) + Send + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    fn notify(&mut self, kind: WorkspaceChangeKind, uri: Option<&DocumentUri>) {
        self.version += 1;
        let change = WorkspaceChange {
            kind,
            uri: uri.cloned(),
            version: self.version,
        };
        for callback in &mut self.callbacks {
            callback(&change);
        }
    }

    /// Workspace version (incremented on every change).
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Open a document.
    pub fn open_document(
        &mut self,
        uri: impl Into<DocumentUri>,
        text: &str,
    ) -> Result<DocumentUri, WorkspaceError> {
        let uri = uri.into();
        if self.documents.contains_key(&uri) {
            return Err(WorkspaceError::DocumentAlreadyOpen(uri.to_string()));
        }
        self.documents.insert(
            uri.clone(),
            DocumentEntry {
                line_index: LineIndex::from_text(text),
                decorations: BTreeMap::new(),
            },
        );
        self.notify(WorkspaceChangeKind::DocumentOpened, Some(&uri));
        Ok(uri)
    }

    /// Close a document. Its decorations go with it; diagnostic collections are untouched.
    pub fn close_document(&mut self, uri: &DocumentUri) -> Result<(), WorkspaceError> {
        if self.documents.remove(uri).is_none() {
            return Err(WorkspaceError::UnknownDocument(uri.to_string()));
        }
        if self.active.as_ref() == Some(uri) {
            self.active = None;
            self.notify(WorkspaceChangeKind::ActiveDocumentChanged, None);
        }
        self.notify(WorkspaceChangeKind::DocumentClosed, Some(uri));
        Ok(())
    }

    /// Replace a document's text.
    pub fn set_text(&mut self, uri: &DocumentUri, text: &str) -> Result<(), WorkspaceError> {
        let entry = self
            .documents
            .get_mut(uri)
            .ok_or_else(|| WorkspaceError::UnknownDocument(uri.to_string()))?;
        entry.line_index.replace_text(text);
        self.notify(WorkspaceChangeKind::TextChanged, Some(uri));
        Ok(())
    }

    /// Focus a document.
    pub fn set_active_document(&mut self, uri: &DocumentUri) -> Result<(), WorkspaceError> {
        if !self.documents.contains_key(uri) {
            return Err(WorkspaceError::UnknownDocument(uri.to_string()));
        }
        if self.active.as_ref() != Some(uri) {
            self.active = Some(uri.clone());
            self.notify(WorkspaceChangeKind::ActiveDocumentChanged, Some(uri));
        }
        Ok(())
    }

    /// Unfocus every editor.
    pub fn clear_active_document(&mut self) {
        if self.active.take().is_some() {
            self.notify(WorkspaceChangeKind::ActiveDocumentChanged, None);
        }
    }

    /// The focused document.
    pub fn active(&self) -> Option<&DocumentUri> {
        self.active.as_ref()
    }

    /// Returns `true` if `uri` is open.
    pub fn is_open(&self, uri: &DocumentUri) -> bool {
        self.documents.contains_key(uri)
    }

    /// Text of an open document.
    pub fn document_text(&self, uri: &DocumentUri) -> Option<String> {
        self.documents.get(uri).map(|d| d.line_index.get_text())
    }

    /// Line count of an open document.
    pub fn line_count(&self, uri: &DocumentUri) -> Option<usize> {
        self.documents.get(uri).map(|d| d.line_index.line_count())
    }

    /// Decorations of `layer` currently applied to `uri` (sorted by range).
    pub fn decorations_for(&self, uri: &DocumentUri, layer: DecorationLayerId) -> &[Decoration] {
        self.documents
            .get(uri)
            .and_then(|d| d.decorations.get(&layer))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total number of decorations applied to `uri` across all layers.
    pub fn decoration_count(&self, uri: &DocumentUri) -> usize {
        self.documents
            .get(uri)
            .map(|d| d.decorations.values().map(Vec::len).sum())
            .unwrap_or(0)
    }

    /// Diagnostics of `uri` in the named collection.
    pub fn diagnostics_for(&self, collection: &str, uri: &DocumentUri) -> &[Diagnostic] {
        self.collections
            .get(collection)
            .and_then(|c| c.get(uri))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Documents holding diagnostics in the named collection.
    pub fn documents_with_diagnostics(&self, collection: &str) -> Vec<&DocumentUri> {
        self.collections
            .get(collection)
            .map(|c| c.keys().collect())
            .unwrap_or_default()
    }

    /// Style of a defined layer.
    pub fn layer_style(&self, layer: DecorationLayerId) -> Option<&AnnotationStyle> {
        self.layers.get(&layer)
    }

    /// Number of defined layers.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }
}

impl EditorHost for Workspace {
    fn active_document(&self) -> Option<DocumentUri> {
        self.active.clone()
    }

    fn line_info(&self, uri: &DocumentUri, line: usize) -> Result<LineInfo, LineLookupError> {
        let entry = self
            .documents
            .get(uri)
            .ok_or(LineLookupError::UnknownDocument)?;
        let end_column = entry.line_index.line_utf16_len(line).ok_or_else(|| {
            LineLookupError::LineOutOfRange {
                line,
                line_count: entry.line_index.line_count(),
            }
        })?;
        Ok(LineInfo { line, end_column })
    }

    fn define_decoration_layer(&mut self, layer: DecorationLayerId, style: &AnnotationStyle) {
        self.layers.insert(layer, style.clone());
        self.notify(WorkspaceChangeKind::LayerDefined, None);
    }

    fn release_decoration_layer(&mut self, layer: DecorationLayerId) {
        if self.layers.remove(&layer).is_none() {
            return;
        }
        for entry in self.documents.values_mut() {
            entry.decorations.remove(&layer);
        }
        self.notify(WorkspaceChangeKind::LayerReleased, None);
    }

    fn apply_decorations(
        &mut self,
        uri: &DocumentUri,
        layer: DecorationLayerId,
        mut decorations: Vec<Decoration>,
    ) {
        if !self.layers.contains_key(&layer) {
            tracing::warn!(
                uri = %uri,
                layer = layer.0,
                "decorations applied to an undefined layer"
            );
            return;
        }
        let Some(entry) = self.documents.get_mut(uri) else {
            tracing::debug!(uri = %uri, "decorations applied to a document that is not open");
            return;
        };

        if decorations.is_empty() {
            entry.decorations.remove(&layer);
        } else {
            decorations.sort_by_key(|d| (d.range.start, d.range.end));
            entry.decorations.insert(layer, decorations);
        }
        self.notify(WorkspaceChangeKind::DecorationsChanged, Some(uri));
    }

    fn set_diagnostics(
        &mut self,
        collection: &str,
        uri: &DocumentUri,
        diagnostics: Vec<Diagnostic>,
    ) {
        let entries = self.collections.entry(collection.to_string()).or_default();
        if diagnostics.is_empty() {
            entries.remove(uri);
        } else {
            entries.insert(uri.clone(), diagnostics);
        }
        self.notify(WorkspaceChangeKind::DiagnosticsChanged, Some(uri));
    }
}
