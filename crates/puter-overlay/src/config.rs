//! Overlay configuration.
//!
//! Settings are delivered the same way the host delivers them to the language client: as a
//! `workspace/didChangeConfiguration`-style JSON object, with the overlay reading its own
//! section. Every field has a default, so a missing section is a valid configuration.

use crate::decorations::AnnotationStyle;
use crate::error::OverlayError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Settings section read by [`OverlayConfig::from_settings`].
pub const SETTINGS_SECTION: &str = "puter";

/// Notification method carrying evaluation reports.
pub const DEFAULT_NOTIFICATION_METHOD: &str = "custom/evaluationReport";

/// Name of the host diagnostic collection the overlay publishes into.
pub const DEFAULT_DIAGNOSTIC_COLLECTION: &str = "puter";

/// Overlay engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OverlayConfig {
    /// Notification method carrying evaluation reports.
    pub notification_method: String,
    /// Host diagnostic collection name.
    pub diagnostic_collection: String,
    /// Style of the evaluation-result annotation layer.
    pub annotation_style: AnnotationStyle,
    /// Publish diagnostics for documents that are not active as soon as their report arrives.
    ///
    /// When `false`, diagnostics are deferred together with annotations until the document is
    /// activated.
    pub publish_background_diagnostics: bool,
    /// Accept reports without a document identity and apply them to the active document.
    pub accept_implicit_target: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            notification_method: DEFAULT_NOTIFICATION_METHOD.to_string(),
            diagnostic_collection: DEFAULT_DIAGNOSTIC_COLLECTION.to_string(),
            annotation_style: AnnotationStyle::default(),
            publish_background_diagnostics: false,
            accept_implicit_target: true,
        }
    }
}

impl OverlayConfig {
    /// Read the [`SETTINGS_SECTION`] of a settings object.
    ///
    /// Accepts either the full `didChangeConfiguration` params (`{ "settings": { ... } }`) or the
    /// bare settings object. A missing section yields the defaults.
    pub fn from_settings(settings: &Value) -> Result<Self, OverlayError> {
        match Self::section(settings) {
            None => Ok(Self::default()),
            Some(section) => serde_json::from_value(section.clone())
                .map_err(|err| OverlayError::InvalidConfig(err.to_string())),
        }
    }

    /// The [`SETTINGS_SECTION`] of a settings object, if present and not `null`.
    pub fn section(settings: &Value) -> Option<&Value> {
        let settings = settings.get("settings").unwrap_or(settings);
        settings.get(SETTINGS_SECTION).filter(|v| !v.is_null())
    }
}
