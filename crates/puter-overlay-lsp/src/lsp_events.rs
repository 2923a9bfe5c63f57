//! Typed view of the JSON-RPC notifications the overlay reacts to.
//!
//! The bridge is transport-agnostic: the host hands over `(method, params)` pairs (or whole
//! JSON-RPC messages) and this module picks out the ones that matter. Everything else is
//! ignored.

use puter_overlay::DocumentUri;
use serde_json::Value;

/// `textDocument/didClose`
pub const DID_CLOSE_METHOD: &str = "textDocument/didClose";

/// `workspace/didChangeConfiguration`
pub const DID_CHANGE_CONFIGURATION_METHOD: &str = "workspace/didChangeConfiguration";

/// A server->client or client->server notification relevant to the overlay.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayNotification {
    /// The evaluation notification (configured method); carries the raw payload.
    EvaluationReport(Value),
    /// `textDocument/didClose`
    DocumentClosed(DocumentUri),
    /// `workspace/didChangeConfiguration`; carries the raw params.
    ConfigurationChanged(Value),
}

impl OverlayNotification {
    /// Parse a notification by method name and `params` payload.
    ///
    /// `evaluation_method` is the method name carrying evaluation reports.
    pub fn from_method_and_params(
        method: &str,
        params: &Value,
        evaluation_method: &str,
    ) -> Option<Self> {
        if method == evaluation_method {
            return Some(Self::EvaluationReport(params.clone()));
        }

        match method {
            DID_CLOSE_METHOD => {
                let uri = params.get("textDocument")?.get("uri")?.as_str()?;
                Some(Self::DocumentClosed(DocumentUri::new(uri)))
            }
            DID_CHANGE_CONFIGURATION_METHOD => Some(Self::ConfigurationChanged(params.clone())),
            _ => None,
        }
    }

    /// Parse a raw JSON-RPC notification message (`{ "method", "params" }`).
    ///
    /// Requests (messages carrying an `id`) are not notifications and yield `None`.
    pub fn from_message(msg: &Value, evaluation_method: &str) -> Option<Self> {
        if msg.get("id").is_some() {
            return None;
        }
        let method = msg.get("method")?.as_str()?;
        let params = msg.get("params").unwrap_or(&Value::Null);
        Self::from_method_and_params(method, params, evaluation_method)
    }
}
