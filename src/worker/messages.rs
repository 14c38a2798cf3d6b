//! Lookup worker message types for cross-thread communication.
//!
//! Requests and responses travel between the event loop and the lookup worker as JSON
//! payloads. Requests carry the tracing context of the span that issued them so the
//! worker's spans join the same trace.

use crate::domain::SuggestionItem;
use serde::{Deserialize, Serialize};

/// Distributed tracing context for cross-thread span propagation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Span ID of the issuing span.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Captures the OpenTelemetry context of the current `tracing` span.
    ///
    /// Returns `None` when no OpenTelemetry layer is installed or the span is not
    /// recorded.
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let otel_context = tracing::Span::current().context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if !span_context.is_valid() {
            tracing::trace!("no valid span context to propagate");
            return None;
        }

        Some(Self {
            trace_id: format!("{:032x}", span_context.trace_id()),
            parent_span_id: format!("{:016x}", span_context.span_id()),
        })
    }
}

/// Generates constructors that attach the current trace context to a message.
macro_rules! worker_message_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl WorkerMessage {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " message with current trace context")]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

worker_message_builders! {
    lookup(Lookup { seq: u64, query: String }),
    reload_catalog(ReloadCatalog { path: String }),
}

/// Requests sent to the lookup worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerMessage {
    /// Run a lookup for `query`; the answer echoes `seq`.
    Lookup {
        seq: u64,
        query: String,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Replace the worker's catalog with the file at `path`.
    ReloadCatalog {
        path: String,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
}

impl WorkerMessage {
    #[must_use]
    pub fn trace_context(&self) -> Option<&TraceContext> {
        match self {
            Self::Lookup { trace_context, .. } | Self::ReloadCatalog { trace_context, .. } => {
                trace_context.as_ref()
            }
        }
    }
}

/// Responses sent from the lookup worker back to the event loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerResponse {
    /// Matches for request `seq`, best first and untruncated.
    LookupCompleted { seq: u64, items: Vec<SuggestionItem> },

    /// Request `seq` could not be answered.
    LookupFailed { seq: u64, message: String },

    CatalogReloaded { records: usize },

    /// A request other than a lookup failed.
    Error { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builder_without_otel_layer_has_no_trace_context() {
        let message = WorkerMessage::lookup(3, "rust".to_string());

        assert_eq!(
            message,
            WorkerMessage::Lookup {
                seq: 3,
                query: "rust".to_string(),
                trace_context: None,
            }
        );
        assert_eq!(message.trace_context(), None);
    }

    #[test]
    fn absent_trace_context_is_omitted_from_payload() {
        let payload = serde_json::to_string(&WorkerMessage::lookup(1, "qa".to_string())).unwrap();

        assert_eq!(payload, r#"{"Lookup":{"seq":1,"query":"qa"}}"#);
        let back: WorkerMessage = serde_json::from_str(&payload).unwrap();
        assert_eq!(back, WorkerMessage::lookup(1, "qa".to_string()));
    }
}
