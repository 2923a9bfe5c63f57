//! Overlay Store: the reconciled per-document evaluation state.
//!
//! Pure data, no I/O. Every report is a full snapshot of a document's evaluation state, so
//! [`OverlayStore::replace`] swaps a document's [`OverlayState`] wholesale instead of patching
//! it.

use crate::diagnostics::Diagnostic;
use crate::uri::DocumentUri;
use std::collections::{BTreeMap, HashMap};

/// The evaluation result of one source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationEntry {
    /// Zero-based line index.
    pub line: usize,
    /// Text shown after the line. Empty text shows nothing.
    pub result_text: String,
    /// Diagnostics produced while evaluating the line.
    pub diagnostics: Vec<Diagnostic>,
}

impl EvaluationEntry {
    /// Create an entry without diagnostics.
    pub fn new(line: usize, result_text: impl Into<String>) -> Self {
        Self {
            line,
            result_text: result_text.into(),
            diagnostics: Vec::new(),
        }
    }

    /// Attach diagnostics.
    pub fn with_diagnostics(mut self, diagnostics: Vec<Diagnostic>) -> Self {
        self.diagnostics = diagnostics;
        self
    }
}

/// A full-snapshot report for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationReport {
    /// Target document.
    pub uri: DocumentUri,
    /// Entries, in payload order.
    pub entries: Vec<EvaluationEntry>,
}

/// The current overlay of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlayState {
    annotations: BTreeMap<usize, String>,
    diagnostics: Vec<Diagnostic>,
}

impl OverlayState {
    /// Build the state described by `entries`.
    ///
    /// A later entry for the same line overrides an earlier one. Diagnostics are flattened in
    /// entry order, including those of entries with empty result text.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = EvaluationEntry>,
    {
        let mut state = Self::default();
        for entry in entries {
            if entry.result_text.is_empty() {
                state.annotations.remove(&entry.line);
            } else {
                state.annotations.insert(entry.line, entry.result_text);
            }
            state.diagnostics.extend(entry.diagnostics);
        }
        state
    }

    /// Line → result text, ordered by line.
    pub fn annotations(&self) -> &BTreeMap<usize, String> {
        &self.annotations
    }

    /// Result text for `line`, if any.
    pub fn annotation(&self, line: usize) -> Option<&str> {
        self.annotations.get(&line).map(String::as_str)
    }

    /// Flattened diagnostics, in payload order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Returns `true` if any annotation would be visible.
    pub fn has_annotations(&self) -> bool {
        !self.annotations.is_empty()
    }

    /// Returns `true` if the state holds neither annotations nor diagnostics.
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty() && self.diagnostics.is_empty()
    }
}

/// Lifecycle state of a document in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingState {
    /// No report has been seen (or the document was closed).
    Untracked,
    /// At least one report has been seen.
    Tracked {
        /// Whether the current state has visible annotations.
        has_annotations: bool,
    },
}

/// Result of [`OverlayStore::replace`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceOutcome {
    /// First report for the document.
    Created,
    /// A tracked document received a non-empty snapshot.
    Replaced,
    /// A tracked, non-empty document was emptied.
    Cleared,
    /// A tracked, empty document received another empty snapshot.
    Unchanged,
}

impl ReplaceOutcome {
    /// Returns `true` if projections (render/publish) must be refreshed.
    pub fn needs_projection(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Per-document overlay states.
#[derive(Debug, Default)]
pub struct OverlayStore {
    documents: HashMap<DocumentUri, OverlayState>,
}

impl OverlayStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the state of `uri` with `state`.
    pub fn replace(&mut self, uri: DocumentUri, state: OverlayState) -> ReplaceOutcome {
        let next_is_empty = state.is_empty();
        match self.documents.insert(uri, state) {
            None => ReplaceOutcome::Created,
            Some(previous) => match (previous.is_empty(), next_is_empty) {
                (true, true) => ReplaceOutcome::Unchanged,
                (false, true) => ReplaceOutcome::Cleared,
                _ => ReplaceOutcome::Replaced,
            },
        }
    }

    /// Apply a report (full-snapshot replace).
    pub fn apply_report(&mut self, report: EvaluationReport) -> ReplaceOutcome {
        let state = OverlayState::from_entries(report.entries);
        self.replace(report.uri, state)
    }

    /// Explicitly clear a tracked document. Untracked documents stay untracked.
    pub fn clear(&mut self, uri: &DocumentUri) -> ReplaceOutcome {
        match self.documents.get_mut(uri) {
            None => ReplaceOutcome::Unchanged,
            Some(state) if state.is_empty() => ReplaceOutcome::Unchanged,
            Some(state) => {
                *state = OverlayState::default();
                ReplaceOutcome::Cleared
            }
        }
    }

    /// Forget a document entirely (`Tracked -> Untracked`).
    pub fn remove(&mut self, uri: &DocumentUri) -> Option<OverlayState> {
        self.documents.remove(uri)
    }

    /// Current state of a document.
    pub fn get(&self, uri: &DocumentUri) -> Option<&OverlayState> {
        self.documents.get(uri)
    }

    /// Lifecycle state of a document.
    pub fn tracking_state(&self, uri: &DocumentUri) -> TrackingState {
        match self.documents.get(uri) {
            None => TrackingState::Untracked,
            Some(state) => TrackingState::Tracked {
                has_annotations: state.has_annotations(),
            },
        }
    }

    /// Tracked documents with their state (unordered).
    pub fn iter(&self) -> impl Iterator<Item = (&DocumentUri, &OverlayState)> {
        self.documents.iter()
    }

    /// Number of tracked documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns `true` if no document is tracked.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
