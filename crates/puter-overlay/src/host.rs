//! The Document/Editor adapter.
//!
//! The overlay never owns documents or editors. Everything it needs from the host editor goes
//! through [`EditorHost`]: which document is focused, where a line ends, and two
//! fire-and-forget projection primitives (decorations and diagnostics).

use crate::decorations::{AnnotationStyle, Decoration, DecorationLayerId};
use crate::diagnostics::Diagnostic;
use crate::error::LineLookupError;
use crate::uri::DocumentUri;

/// Line metadata returned by [`EditorHost::line_info`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineInfo {
    /// Zero-based line index.
    pub line: usize,
    /// Column just after the last character of the line (UTF-16 code units).
    pub end_column: usize,
}

/// Host editor primitives used by the overlay engine.
pub trait EditorHost {
    /// The document of the focused editor, or `None` when no editor is focused.
    fn active_document(&self) -> Option<DocumentUri>;

    /// Resolve a line of a live document.
    fn line_info(&self, uri: &DocumentUri, line: usize) -> Result<LineInfo, LineLookupError>;

    /// Define (or restyle) a long-lived decoration layer.
    fn define_decoration_layer(&mut self, layer: DecorationLayerId, style: &AnnotationStyle);

    /// Release a decoration layer and everything rendered through it.
    fn release_decoration_layer(&mut self, layer: DecorationLayerId);

    /// Replace every decoration of `layer` in `uri` with `decorations`.
    fn apply_decorations(
        &mut self,
        uri: &DocumentUri,
        layer: DecorationLayerId,
        decorations: Vec<Decoration>,
    );

    /// Replace the diagnostics of `uri` in the named collection.
    fn set_diagnostics(
        &mut self,
        collection: &str,
        uri: &DocumentUri,
        diagnostics: Vec<Diagnostic>,
    );

    /// Returns `true` if `uri` is the focused document.
    fn is_active(&self, uri: &DocumentUri) -> bool {
        self.active_document().as_ref() == Some(uri)
    }
}
