//! Annotation Renderer: projects an [`OverlayState`] onto the active editor.
//!
//! The renderer owns exactly one decoration layer for its whole lifetime. Every render call
//! replaces the complete target set of that layer for the document, so a render can never
//! leave annotations behind from a previous cycle, and rendering the same state twice yields the
//! same decorations.

use crate::decorations::{AnnotationStyle, Decoration, DecorationLayerId};
use crate::error::OverlayError;
use crate::host::EditorHost;
use crate::position::Position;
use crate::store::OverlayState;
use crate::uri::DocumentUri;

/// Result of [`AnnotationRenderer::render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The document is not the active editor; nothing was applied.
    Inactive,
    /// The layer was replaced for the document.
    Applied {
        /// Annotations now visible.
        shown: usize,
        /// Annotations skipped because their line no longer exists.
        skipped: usize,
    },
}

/// Projects annotation state onto the host's decoration layer.
#[derive(Debug)]
pub struct AnnotationRenderer {
    layer: DecorationLayerId,
    style: AnnotationStyle,
    defined: bool,
    shown: Option<DocumentUri>,
}

impl AnnotationRenderer {
    /// Create a renderer for the [`DecorationLayerId::EVALUATION_RESULTS`] layer.
    pub fn new(style: AnnotationStyle) -> Self {
        Self::with_layer(DecorationLayerId::EVALUATION_RESULTS, style)
    }

    /// Create a renderer for a specific layer.
    pub fn with_layer(layer: DecorationLayerId, style: AnnotationStyle) -> Self {
        Self {
            layer,
            style,
            defined: false,
            shown: None,
        }
    }

    /// The layer this renderer draws into.
    pub fn layer(&self) -> DecorationLayerId {
        self.layer
    }

    /// The current layer style.
    pub fn style(&self) -> &AnnotationStyle {
        &self.style
    }

    /// The document whose annotations are currently visible, if any.
    pub fn shown_document(&self) -> Option<&DocumentUri> {
        self.shown.as_ref()
    }

    fn ensure_layer<H: EditorHost>(&mut self, host: &mut H) {
        if !self.defined {
            host.define_decoration_layer(self.layer, &self.style);
            self.defined = true;
        }
    }

    /// Compute the decorations for `state` against the live document.
    ///
    /// Entries whose line cannot be resolved are returned as errors instead of being clamped.
    pub fn project<H: EditorHost>(
        host: &H,
        uri: &DocumentUri,
        state: &OverlayState,
    ) -> (Vec<Decoration>, Vec<OverlayError>) {
        let mut decorations = Vec::with_capacity(state.annotations().len());
        let mut skipped = Vec::new();

        for (&line, text) in state.annotations() {
            let info = match host.line_info(uri, line) {
                Ok(info) => info,
                Err(err) => {
                    skipped.push(err.into_overlay_error(uri.as_str()));
                    continue;
                }
            };
            let (Ok(line), Ok(column)) = (u32::try_from(line), u32::try_from(info.end_column))
            else {
                skipped.push(OverlayError::UnresolvableLine {
                    line,
                    line_count: 0,
                });
                continue;
            };
            decorations.push(Decoration::evaluation_result(
                Position::new(line, column),
                text.clone(),
            ));
        }

        (decorations, skipped)
    }

    /// Render `state` for `uri` if it is the active document.
    pub fn render<H: EditorHost>(
        &mut self,
        host: &mut H,
        uri: &DocumentUri,
        state: &OverlayState,
    ) -> RenderOutcome {
        if !host.is_active(uri) {
            tracing::trace!(uri = %uri, "skipping render for inactive document");
            return RenderOutcome::Inactive;
        }

        self.ensure_layer(host);

        if let Some(previous) = self.shown.take()
            && previous != *uri
        {
            host.apply_decorations(&previous, self.layer, Vec::new());
        }

        let (decorations, skipped) = Self::project(&*host, uri, state);
        for err in &skipped {
            tracing::debug!(uri = %uri, error = %err, "skipping annotation");
        }

        let shown = decorations.len();
        host.apply_decorations(uri, self.layer, decorations);
        if shown > 0 {
            self.shown = Some(uri.clone());
        }

        RenderOutcome::Applied {
            shown,
            skipped: skipped.len(),
        }
    }

    /// Remove the annotations of `uri` if they are currently visible.
    ///
    /// Returns `true` if anything was cleared.
    pub fn withdraw<H: EditorHost>(&mut self, host: &mut H, uri: &DocumentUri) -> bool {
        if self.shown.as_ref() != Some(uri) {
            return false;
        }
        self.shown = None;
        host.apply_decorations(uri, self.layer, Vec::new());
        true
    }

    /// Change the layer style in place (the layer itself is kept).
    pub fn restyle<H: EditorHost>(&mut self, host: &mut H, style: AnnotationStyle) {
        if self.style == style {
            return;
        }
        self.style = style;
        if self.defined {
            host.define_decoration_layer(self.layer, &self.style);
        }
    }

    /// Clear visible annotations and release the layer.
    pub fn dispose<H: EditorHost>(&mut self, host: &mut H) {
        if let Some(uri) = self.shown.take() {
            host.apply_decorations(&uri, self.layer, Vec::new());
        }
        if self.defined {
            host.release_decoration_layer(self.layer);
            self.defined = false;
        }
    }
}
