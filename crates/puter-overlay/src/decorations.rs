//! Decorations (virtual text) data model.
//!
//! Decorations are display-only annotations anchored to document positions; they never modify
//! document text. Evaluation results are rendered as zero-width decorations placed after the
//! last character of their line.
//!
//! Styling lives on the *layer*, not on individual decorations: a host defines a layer once
//! (with an [`AnnotationStyle`]) and every render replaces the target ranges of that layer.

use crate::position::{Position, Range};
use serde::{Deserialize, Serialize};

/// A decoration layer (channel) identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DecorationLayerId(pub u32);

impl DecorationLayerId {
    /// Inline evaluation results.
    pub const EVALUATION_RESULTS: Self = Self(1);
}

/// Where to render a decoration relative to its anchor range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecorationPlacement {
    /// Render after the anchor.
    After,
}

/// A coarse decoration kind tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DecorationKind {
    /// The result of evaluating a line.
    EvaluationResult,
}

/// A single decoration item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoration {
    /// Anchor range.
    pub range: Range,
    /// Relative placement.
    pub placement: DecorationPlacement,
    /// A coarse decoration kind.
    pub kind: DecorationKind,
    /// Virtual text to render.
    pub text: String,
}

impl Decoration {
    /// A zero-width evaluation-result decoration rendered after `anchor`.
    pub fn evaluation_result(anchor: Position, text: impl Into<String>) -> Self {
        Self {
            range: Range::point(anchor),
            placement: DecorationPlacement::After,
            kind: DecorationKind::EvaluationResult,
            text: text.into(),
        }
    }
}

/// Font style of annotation text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    /// Upright text.
    Normal,
    /// Italic text.
    Italic,
}

/// Visual style of an annotation layer.
///
/// The defaults keep results visually subordinate to code: a muted foreground, italic text, and
/// a left margin separating the result from the end of the line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnnotationStyle {
    /// Foreground color (`#rrggbb`).
    pub color: String,
    /// Font style.
    pub font_style: FontStyle,
    /// Left margin between the line end and the annotation, in `em`.
    pub margin_left_em: f32,
}

impl Default for AnnotationStyle {
    fn default() -> Self {
        Self {
            color: "#637777".to_string(),
            font_style: FontStyle::Italic,
            margin_left_em: 3.0,
        }
    }
}
