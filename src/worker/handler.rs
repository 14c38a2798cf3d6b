//! Lookup worker thread.
//!
//! Lookups run off the event loop so typing never blocks on the service. The event
//! loop posts JSON-serialized [`WorkerMessage`]s through a [`WorkerHandle`] and drains
//! JSON-serialized [`WorkerResponse`]s from it; the worker answers requests strictly
//! in arrival order. Ordering between overlapping lookups is not the worker's concern:
//! the search controller discards stale answers by sequence number.

use crate::domain::error::{JobseekError, Result};
use crate::lookup::{JsonCatalog, LookupService};
use crate::worker::{WorkerMessage, WorkerResponse};
use std::path::Path;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

/// Worker state: the lookup service requests are answered from.
pub struct LookupWorker {
    service: Box<dyn LookupService>,
}

impl LookupWorker {
    #[must_use]
    pub fn new(service: Box<dyn LookupService>) -> Self {
        Self { service }
    }

    fn handle_lookup(&self, seq: u64, query: &str) -> WorkerResponse {
        match self.service.lookup(query) {
            Ok(items) => {
                tracing::debug!(seq, matches = items.len(), "lookup answered");
                WorkerResponse::LookupCompleted { seq, items }
            }
            Err(e) => {
                tracing::debug!(seq, error = %e, "lookup service failed");
                WorkerResponse::LookupFailed {
                    seq,
                    message: e.to_string(),
                }
            }
        }
    }

    fn handle_reload_catalog(&mut self, path: &str) -> WorkerResponse {
        match JsonCatalog::from_file(Path::new(path)) {
            Ok(catalog) => {
                let records = catalog.len();
                self.service = Box::new(catalog);
                tracing::debug!(path = %path, records, "catalog reloaded");
                WorkerResponse::CatalogReloaded { records }
            }
            Err(e) => {
                tracing::debug!(path = %path, error = %e, "catalog reload failed");
                WorkerResponse::Error {
                    message: format!("reload catalog: {e}"),
                }
            }
        }
    }

    /// Reconstructs the issuing thread's OpenTelemetry context for the current scope.
    ///
    /// The returned guard must be held while the message is handled.
    fn attach_parent_trace_context(message: &WorkerMessage) -> Option<opentelemetry::ContextGuard> {
        use opentelemetry::trace::{SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState};

        let trace_context = message.trace_context()?;
        let trace_id = TraceId::from_hex(&trace_context.trace_id).ok()?;
        let span_id = SpanId::from_hex(&trace_context.parent_span_id).ok()?;

        let span_context = SpanContext::new(trace_id, span_id, TraceFlags::SAMPLED, true, TraceState::default());
        let otel_context = opentelemetry::Context::current().with_remote_span_context(span_context);

        Some(otel_context.attach())
    }

    /// Processes one message and returns the response to send back.
    pub fn handle_message(&mut self, message: WorkerMessage) -> WorkerResponse {
        let _context_guard = Self::attach_parent_trace_context(&message);

        let span = tracing::debug_span!("worker_handle_message", message_type = ?message);
        let _guard = span.entered();

        match message {
            WorkerMessage::Lookup { seq, query, .. } => self.handle_lookup(seq, &query),
            WorkerMessage::ReloadCatalog { path, .. } => self.handle_reload_catalog(&path),
        }
    }

    /// Handles one JSON payload and returns the JSON response, if one can be produced.
    fn on_message(&mut self, payload: &str) -> Option<String> {
        let message: WorkerMessage = match serde_json::from_str(payload) {
            Ok(message) => message,
            Err(e) => {
                tracing::debug!(error = %e, "failed to deserialize worker message");
                return None;
            }
        };

        let response = self.handle_message(message);

        serde_json::to_string(&response)
            .map_err(|e| tracing::debug!(error = %e, "failed to serialize worker response"))
            .ok()
    }

    /// Moves the worker onto its own thread.
    ///
    /// The thread exits once the returned handle is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`JobseekError::Worker`] if the thread cannot be spawned.
    pub fn spawn(mut self) -> Result<WorkerHandle> {
        let (request_tx, request_rx) = mpsc::channel::<String>();
        let (response_tx, response_rx) = mpsc::channel::<String>();

        let thread = std::thread::Builder::new()
            .name("jobseek-lookup".to_string())
            .spawn(move || {
                tracing::debug!("lookup worker started");
                for payload in request_rx {
                    let Some(response) = self.on_message(&payload) else {
                        continue;
                    };
                    if response_tx.send(response).is_err() {
                        break;
                    }
                }
                tracing::debug!("lookup worker stopped");
            })
            .map_err(|e| JobseekError::Worker(format!("failed to spawn lookup worker: {e}")))?;

        Ok(WorkerHandle {
            requests: Some(request_tx),
            responses: response_rx,
            thread: Some(thread),
        })
    }
}

/// Event-loop side of a running [`LookupWorker`].
pub struct WorkerHandle {
    requests: Option<Sender<String>>,
    responses: Receiver<String>,
    thread: Option<JoinHandle<()>>,
}

impl WorkerHandle {
    /// Posts a message to the worker.
    ///
    /// # Errors
    ///
    /// Returns [`JobseekError::Worker`] if the message cannot be serialized or the
    /// worker has stopped.
    pub fn post(&self, message: &WorkerMessage) -> Result<()> {
        let payload = serde_json::to_string(message)
            .map_err(|e| JobseekError::Worker(format!("failed to serialize message: {e}")))?;
        self.requests
            .as_ref()
            .ok_or_else(|| JobseekError::Worker("worker is shut down".to_string()))?
            .send(payload)
            .map_err(|_| JobseekError::Worker("worker thread has exited".to_string()))
    }

    /// Waits up to `timeout` for the next response.
    ///
    /// # Errors
    ///
    /// Returns [`JobseekError::Worker`] if the worker has exited.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<WorkerResponse>> {
        match self.responses.recv_timeout(timeout) {
            Ok(payload) => Self::decode(&payload).map(Some),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(JobseekError::Worker("worker thread has exited".to_string())),
        }
    }

    /// Stops accepting requests and waits for the worker thread to finish.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.requests = None;
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::warn!("lookup worker thread panicked");
            }
        }
    }

    fn decode(payload: &str) -> Result<WorkerResponse> {
        serde_json::from_str(payload).map_err(|e| JobseekError::Worker(format!("failed to deserialize response: {e}")))
    }
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
