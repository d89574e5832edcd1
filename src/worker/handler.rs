//! Worker-side message processing.
//!
//! [`PreferenceWorker`] owns the preference store and turns each
//! [`WorkerMessage`] into a [`WorkerResponse`]. It holds no Zellij handles; the
//! plugin binary delivers payloads to it and posts the replies.

use crate::domain::error::{Result, RosterError};
use crate::infrastructure::paths;
use crate::storage::{JsonPreferenceStore, PreferenceStore};
use crate::worker::{WorkerMessage, WorkerResponse};

/// Preference worker state.
///
/// The store is opened lazily on the first message so a missing or unwritable
/// data directory surfaces as a [`WorkerResponse::Error`] instead of a failed
/// worker start.
#[derive(Default)]
pub struct PreferenceWorker {
    store: Option<Box<dyn PreferenceStore>>,
}

impl PreferenceWorker {
    /// Creates a worker over an already-open store.
    #[must_use]
    pub fn with_store(store: Box<dyn PreferenceStore>) -> Self {
        Self { store: Some(store) }
    }

    fn store(&mut self) -> Result<&mut Box<dyn PreferenceStore>> {
        if self.store.is_none() {
            let store = JsonPreferenceStore::new(paths::preferences_file())?;
            self.store = Some(Box::new(store));
        }
        self.store
            .as_mut()
            .ok_or_else(|| RosterError::Worker("preference store not initialized".to_string()))
    }

    /// Logs the outcome of a store operation and maps failures to
    /// [`WorkerResponse::Error`].
    fn handle_store_result<T, F>(operation: &str, result: Result<T>, on_success: F) -> WorkerResponse
    where
        F: FnOnce(T) -> WorkerResponse,
    {
        match result {
            Ok(value) => {
                tracing::debug!(operation, "preference operation successful");
                on_success(value)
            }
            Err(e) => {
                tracing::warn!(operation, error = %e, "preference operation failed");
                WorkerResponse::Error {
                    message: format!("{operation}: {e}"),
                }
            }
        }
    }

    /// Re-attaches the plugin's trace context so worker spans share its trace.
    fn attach_parent_trace_context(message: &WorkerMessage) -> Option<opentelemetry::ContextGuard> {
        use opentelemetry::trace::{SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState};

        let trace_context = message.trace_context()?;
        let trace_id = TraceId::from_hex(&trace_context.trace_id).ok()?;
        let span_id = SpanId::from_hex(&trace_context.parent_span_id).ok()?;

        let span_context = SpanContext::new(trace_id, span_id, TraceFlags::SAMPLED, true, TraceState::default());
        Some(
            opentelemetry::Context::current()
                .with_remote_span_context(span_context)
                .attach(),
        )
    }

    /// Processes one message and returns the reply.
    pub fn handle_message(&mut self, message: WorkerMessage) -> WorkerResponse {
        let _context_guard = Self::attach_parent_trace_context(&message);
        let _span = tracing::debug_span!("worker_handle_message", message_type = ?message).entered();

        match message {
            WorkerMessage::LoadPreference { key, .. } => Self::handle_store_result(
                "load preference",
                self.store().and_then(|store| store.get(&key)),
                |value| WorkerResponse::PreferenceLoaded { key, value },
            ),
            WorkerMessage::SavePreference { key, value, .. } => Self::handle_store_result(
                "save preference",
                self.store().and_then(|store| store.set(&key, &value)),
                |()| WorkerResponse::PreferenceSaved { key },
            ),
        }
    }

    /// Decodes a JSON payload, handles it and encodes the reply.
    ///
    /// Returns `None` when the payload is not a [`WorkerMessage`] or the reply
    /// cannot be serialized; both cases are logged.
    pub fn handle_payload(&mut self, payload: &str) -> Option<String> {
        let message: WorkerMessage = match serde_json::from_str(payload) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!(error = %e, "failed to deserialize worker message");
                return None;
            }
        };

        let response = self.handle_message(message);

        serde_json::to_string(&response)
            .map_err(|e| tracing::warn!(error = %e, "failed to serialize worker response"))
            .ok()
    }
}
