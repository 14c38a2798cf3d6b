//! Background worker thread for lookups.
//!
//! Lookups run on a dedicated thread so the event loop never blocks on the lookup
//! service. Messages carry tracing context across the thread boundary.
//!
//! # Architecture
//!
//! - `messages`: Request/response protocol types with trace context propagation
//! - `handler`: Worker implementation, thread spawning and the event-loop handle

pub mod handler;
pub mod messages;

pub use handler::{LookupWorker, WorkerHandle};
pub use messages::{TraceContext, WorkerMessage, WorkerResponse};
