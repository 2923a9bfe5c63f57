//! Diagnostic Publisher: projects overlay diagnostics onto a host diagnostic collection.

use crate::diagnostics::Diagnostic;
use crate::host::EditorHost;
use crate::uri::DocumentUri;
use std::collections::HashSet;

/// Publishes diagnostics into one named host collection.
///
/// Every publish replaces the document's set. The publisher remembers which documents hold a
/// non-empty set so it can clear exactly those on close or teardown.
#[derive(Debug)]
pub struct DiagnosticPublisher {
    collection: String,
    published: HashSet<DocumentUri>,
}

impl DiagnosticPublisher {
    /// Create a publisher for the named collection.
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            published: HashSet::new(),
        }
    }

    /// The host collection name.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Returns `true` if `uri` currently holds published diagnostics.
    pub fn has_published(&self, uri: &DocumentUri) -> bool {
        self.published.contains(uri)
    }

    /// Documents that currently hold published diagnostics, sorted.
    pub fn published_documents(&self) -> Vec<DocumentUri> {
        let mut uris: Vec<DocumentUri> = self.published.iter().cloned().collect();
        uris.sort();
        uris
    }

    /// Replace the diagnostics of `uri` (an empty slice clears them).
    pub fn publish<H: EditorHost>(
        &mut self,
        host: &mut H,
        uri: &DocumentUri,
        diagnostics: &[Diagnostic],
    ) {
        if diagnostics.is_empty() {
            self.published.remove(uri);
        } else {
            self.published.insert(uri.clone());
        }
        tracing::trace!(uri = %uri, count = diagnostics.len(), "publishing diagnostics");
        host.set_diagnostics(&self.collection, uri, diagnostics.to_vec());
    }

    /// Clear the diagnostics of `uri` if any were published.
    ///
    /// Returns `true` if a clear was sent to the host.
    pub fn clear<H: EditorHost>(&mut self, host: &mut H, uri: &DocumentUri) -> bool {
        if !self.published.remove(uri) {
            return false;
        }
        host.set_diagnostics(&self.collection, uri, Vec::new());
        true
    }

    /// Move to another collection, clearing everything published in the old one.
    pub fn rename_collection<H: EditorHost>(
        &mut self,
        host: &mut H,
        collection: impl Into<String>,
    ) {
        let collection = collection.into();
        if collection == self.collection {
            return;
        }
        self.dispose(host);
        self.collection = collection;
    }

    /// Clear every document this publisher published into.
    pub fn dispose<H: EditorHost>(&mut self, host: &mut H) {
        let mut uris: Vec<DocumentUri> = self.published.drain().collect();
        uris.sort();
        for uri in uris {
            host.set_diagnostics(&self.collection, &uri, Vec::new());
        }
    }
}
