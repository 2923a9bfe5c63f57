//! Notification Reconciler.
//!
//! Glues the pieces together: a notification payload is normalized, each report replaces its
//! document's state in the [`OverlayStore`], and the new state is projected through the
//! [`AnnotationRenderer`] (active document only) and the [`DiagnosticPublisher`].
//!
//! Annotations for documents that are not focused are kept in the store and shown when the
//! document is activated ([`EvaluationReconciler::on_active_document_changed`]).

use crate::lsp_events::OverlayNotification;
use crate::payload::{ReportTarget, normalize_payload};
use puter_overlay::{
    AnnotationRenderer, DiagnosticPublisher, DocumentUri, EditorHost, EvaluationReport,
    OverlayConfig, OverlayError, OverlayStore, RenderOutcome, ReplaceOutcome, TrackingState,
};
use serde_json::Value;

/// What happened to one report after it reached the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionOutcome {
    /// The state did not change; nothing was projected.
    Unchanged,
    /// The document is active and its annotations were rendered.
    Rendered {
        /// Annotations skipped because their line does not exist.
        skipped_lines: usize,
    },
    /// The document is not active; annotations wait for activation.
    Deferred,
}

/// Per-notification counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    /// Reports applied to the store.
    pub reports: usize,
    /// Reports rendered immediately.
    pub rendered: usize,
    /// Reports stored for a document that is not active.
    pub deferred: usize,
    /// Malformed entries dropped during normalization.
    pub skipped_entries: usize,
    /// Annotations not shown because their line does not exist.
    pub skipped_lines: usize,
    /// Implicit-target reports that could not be resolved to a document.
    pub untargeted: usize,
}

/// Result of [`EvaluationReconciler::on_evaluation_notification`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The notification was dropped as a whole; prior state is untouched.
    Dropped(OverlayError),
    /// The notification was applied.
    Applied(ReconcileSummary),
}

/// Owns the overlay state and keeps the host projections in sync with it.
#[derive(Debug)]
pub struct EvaluationReconciler {
    config: OverlayConfig,
    store: OverlayStore,
    renderer: AnnotationRenderer,
    publisher: DiagnosticPublisher,
}

impl Default for EvaluationReconciler {
    fn default() -> Self {
        Self::new(OverlayConfig::default())
    }
}

impl EvaluationReconciler {
    /// Create a reconciler. Nothing is sent to the host until the first report.
    pub fn new(config: OverlayConfig) -> Self {
        let renderer = AnnotationRenderer::new(config.annotation_style.clone());
        let publisher = DiagnosticPublisher::new(config.diagnostic_collection.clone());
        Self {
            config,
            store: OverlayStore::new(),
            renderer,
            publisher,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// The overlay store.
    pub fn store(&self) -> &OverlayStore {
        &self.store
    }

    /// Lifecycle state of a document.
    pub fn tracking_state(&self, uri: &DocumentUri) -> TrackingState {
        self.store.tracking_state(uri)
    }

    /// Dispatch a notification by method name.
    ///
    /// Returns `true` if the method is one the overlay handles.
    pub fn handle_notification<H: EditorHost>(
        &mut self,
        host: &mut H,
        method: &str,
        params: &Value,
    ) -> bool {
        let Some(notification) = OverlayNotification::from_method_and_params(
            method,
            params,
            &self.config.notification_method,
        ) else {
            return false;
        };
        self.dispatch(host, notification);
        true
    }

    /// Dispatch a raw JSON-RPC notification message.
    ///
    /// Returns `true` if the message is a notification the overlay handles.
    pub fn handle_message<H: EditorHost>(&mut self, host: &mut H, msg: &Value) -> bool {
        let Some(notification) =
            OverlayNotification::from_message(msg, &self.config.notification_method)
        else {
            return false;
        };
        self.dispatch(host, notification);
        true
    }

    fn dispatch<H: EditorHost>(&mut self, host: &mut H, notification: OverlayNotification) {
        match notification {
            OverlayNotification::EvaluationReport(payload) => {
                self.on_evaluation_notification(host, &payload);
            }
            OverlayNotification::DocumentClosed(uri) => {
                self.on_document_closed(host, &uri);
            }
            OverlayNotification::ConfigurationChanged(settings) => {
                if let Err(err) = self.on_configuration_changed(host, &settings) {
                    tracing::warn!(error = %err, "ignoring configuration change");
                }
            }
        }
    }

    /// Apply one evaluation notification payload.
    ///
    /// A payload that cannot be normalized is dropped as a whole and leaves every document as it
    /// was. Otherwise each report replaces the state of its document, in payload order.
    pub fn on_evaluation_notification<H: EditorHost>(
        &mut self,
        host: &mut H,
        payload: &Value,
    ) -> ReconcileOutcome {
        let batch = match normalize_payload(payload) {
            Ok(batch) => batch,
            Err(err) => {
                tracing::warn!(error = %err, "dropping evaluation notification");
                return ReconcileOutcome::Dropped(err);
            }
        };

        let mut summary = ReconcileSummary {
            skipped_entries: batch.skipped_entries(),
            ..ReconcileSummary::default()
        };
        if summary.skipped_entries > 0 {
            tracing::debug!(
                count = summary.skipped_entries,
                "skipped malformed evaluation entries"
            );
        }

        let active = host.active_document();
        for report in batch.into_reports() {
            let uri = match report.target {
                ReportTarget::Explicit(uri) => uri,
                ReportTarget::Implicit => match &active {
                    Some(uri) if self.config.accept_implicit_target => uri.clone(),
                    _ => {
                        tracing::debug!(
                            has_active = active.is_some(),
                            "dropping report without a target document"
                        );
                        summary.untargeted += 1;
                        continue;
                    }
                },
            };

            let outcome = self.store.apply_report(EvaluationReport {
                uri: uri.clone(),
                entries: report.entries,
            });
            summary.reports += 1;

            match self.project(host, &uri, outcome) {
                ProjectionOutcome::Unchanged => {}
                ProjectionOutcome::Rendered { skipped_lines } => {
                    summary.rendered += 1;
                    summary.skipped_lines += skipped_lines;
                }
                ProjectionOutcome::Deferred => summary.deferred += 1,
            }
        }

        if summary.reports == 0 && summary.untargeted > 0 && active.is_none() {
            tracing::debug!("no active editor for implicit evaluation report");
            return ReconcileOutcome::Dropped(OverlayError::NoActiveEditor);
        }

        tracing::trace!(?summary, "applied evaluation notification");
        ReconcileOutcome::Applied(summary)
    }

    fn should_publish(&self, uri: &DocumentUri, is_active: bool) -> bool {
        is_active
            || self.config.publish_background_diagnostics
            || self.publisher.has_published(uri)
    }

    fn project<H: EditorHost>(
        &mut self,
        host: &mut H,
        uri: &DocumentUri,
        outcome: ReplaceOutcome,
    ) -> ProjectionOutcome {
        if !outcome.needs_projection() {
            return ProjectionOutcome::Unchanged;
        }
        let is_active = host.is_active(uri);
        let publish = self.should_publish(uri, is_active);
        let Some(state) = self.store.get(uri) else {
            return ProjectionOutcome::Unchanged;
        };

        // Annotations first, then diagnostics.
        let projection = if is_active {
            match self.renderer.render(host, uri, state) {
                RenderOutcome::Applied { skipped, .. } => ProjectionOutcome::Rendered {
                    skipped_lines: skipped,
                },
                RenderOutcome::Inactive => ProjectionOutcome::Deferred,
            }
        } else {
            self.renderer.withdraw(host, uri);
            ProjectionOutcome::Deferred
        };

        if publish {
            self.publisher.publish(host, uri, state.diagnostics());
        }
        projection
    }

    /// Focus moved to another editor (or to none).
    ///
    /// Withdraws the annotations of the previously shown document and renders the retained state
    /// of the newly active one. Returns the render outcome, or `None` if the new active document
    /// has no tracked state.
    pub fn on_active_document_changed<H: EditorHost>(
        &mut self,
        host: &mut H,
    ) -> Option<RenderOutcome> {
        let active = host.active_document();
        if let Some(shown) = self.renderer.shown_document().cloned()
            && active.as_ref() != Some(&shown)
        {
            self.renderer.withdraw(host, &shown);
        }

        let uri = active?;
        let state = self.store.get(&uri)?;
        let outcome = self.renderer.render(host, &uri, state);
        if !state.diagnostics().is_empty() || self.publisher.has_published(&uri) {
            self.publisher.publish(host, &uri, state.diagnostics());
        }
        tracing::trace!(uri = %uri, ?outcome, "rendered retained overlay");
        Some(outcome)
    }

    /// The document was closed: forget its state and clear what is shown for it.
    ///
    /// Returns `true` if anything was tracked or shown.
    pub fn on_document_closed<H: EditorHost>(&mut self, host: &mut H, uri: &DocumentUri) -> bool {
        let removed = self.store.remove(uri).is_some();
        let withdrew = self.renderer.withdraw(host, uri);
        let cleared = self.publisher.clear(host, uri);
        if removed {
            tracing::debug!(uri = %uri, "forgot overlay of closed document");
        }
        removed || withdrew || cleared
    }

    /// Explicitly clear a document's overlay, keeping it tracked.
    pub fn clear_document<H: EditorHost>(
        &mut self,
        host: &mut H,
        uri: &DocumentUri,
    ) -> ProjectionOutcome {
        let outcome = self.store.clear(uri);
        self.project(host, uri, outcome)
    }

    /// Apply new settings.
    ///
    /// The annotation layer is restyled in place. Switching the diagnostic collection clears the
    /// old one and republishes into the new one. Settings without the overlay section are
    /// ignored, and an invalid section leaves the current configuration in place.
    pub fn on_configuration_changed<H: EditorHost>(
        &mut self,
        host: &mut H,
        settings: &Value,
    ) -> Result<(), OverlayError> {
        if OverlayConfig::section(settings).is_none() {
            tracing::trace!("settings carry no overlay section");
            return Ok(());
        }
        let config = OverlayConfig::from_settings(settings)?;

        self.renderer.restyle(host, config.annotation_style.clone());

        let collection_changed = config.diagnostic_collection != self.publisher.collection();
        // Renaming clears the old collection; remember what has to move over.
        let mut targets = Vec::new();
        if collection_changed {
            targets = self.publisher.published_documents();
            self.publisher
                .rename_collection(host, config.diagnostic_collection.clone());
        }
        let background_enabled =
            config.publish_background_diagnostics && !self.config.publish_background_diagnostics;

        tracing::debug!(
            collection_changed,
            background_enabled,
            "applied overlay configuration"
        );
        self.config = config;

        if collection_changed || background_enabled {
            self.republish(host, targets);
        }
        Ok(())
    }

    /// Publish the diagnostics of `targets`, the active document and, with background
    /// publishing enabled, every tracked document.
    fn republish<H: EditorHost>(&mut self, host: &mut H, mut targets: Vec<DocumentUri>) {
        targets.extend(host.active_document());
        if self.config.publish_background_diagnostics {
            targets.extend(self.store.iter().map(|(uri, _)| uri.clone()));
        }
        targets.sort();
        targets.dedup();

        for uri in &targets {
            if let Some(state) = self.store.get(uri)
                && !state.diagnostics().is_empty()
            {
                self.publisher.publish(host, uri, state.diagnostics());
            }
        }
    }

    /// Tear down: clear every annotation and diagnostic and forget all state.
    pub fn dispose<H: EditorHost>(&mut self, host: &mut H) {
        self.renderer.dispose(host);
        self.publisher.dispose(host);
        self.store = OverlayStore::new();
        tracing::debug!("disposed evaluation overlay");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use puter_overlay::{DecorationLayerId, Workspace};
    use serde_json::json;
    use tracing_test::traced_test;

    fn active_workspace() -> (Workspace, DocumentUri) {
        let mut workspace = Workspace::new();
        let uri = workspace
            .open_document("file:///calc.txt", "a = 40\nb = 2\n// | a + b\nc\nd")
            .unwrap();
        workspace.set_active_document(&uri).unwrap();
        (workspace, uri)
    }

    #[test]
    #[traced_test]
    fn test_malformed_payload_is_logged_and_dropped() {
        let (mut workspace, uri) = active_workspace();
        let mut reconciler = EvaluationReconciler::default();

        reconciler.on_evaluation_notification(
            &mut workspace,
            &json!([{ "lineIndex": 2, "resultText": "=> 42" }]),
        );
        let outcome = reconciler.on_evaluation_notification(&mut workspace, &json!("garbage"));

        assert!(matches!(
            outcome,
            ReconcileOutcome::Dropped(OverlayError::MalformedPayload(_))
        ));
        assert!(logs_contain("dropping evaluation notification"));
        assert_eq!(
            workspace
                .decorations_for(&uri, DecorationLayerId::EVALUATION_RESULTS)
                .len(),
            1
        );
    }

    #[test]
    #[traced_test]
    fn test_invalid_configuration_is_logged_and_ignored() {
        let (mut workspace, _) = active_workspace();
        let mut reconciler = EvaluationReconciler::default();

        let handled = reconciler.handle_notification(
            &mut workspace,
            "workspace/didChangeConfiguration",
            &json!({ "settings": { "puter": { "annotationStyle": 7 } } }),
        );

        assert!(handled);
        assert!(logs_contain("ignoring configuration change"));
        assert_eq!(reconciler.config(), &OverlayConfig::default());
    }

    #[test]
    fn test_unknown_methods_are_not_handled() {
        let (mut workspace, _) = active_workspace();
        let mut reconciler = EvaluationReconciler::default();
        assert!(!reconciler.handle_notification(
            &mut workspace,
            "textDocument/didOpen",
            &json!({})
        ));
    }

    #[test]
    fn test_untargeted_report_without_active_editor() {
        let mut workspace = Workspace::new();
        let mut reconciler = EvaluationReconciler::default();

        let payload = json!([{ "lineIndex": 0, "resultText": "1" }]);
        let outcome = reconciler.on_evaluation_notification(&mut workspace, &payload);
        assert_eq!(
            outcome,
            ReconcileOutcome::Dropped(OverlayError::NoActiveEditor)
        );
        assert!(reconciler.store().is_empty());
    }
}
