//! Structured logging and span export.
//!
//! ```text
//! tracing macros → EnvFilter ─┬→ fmt layer → stderr
//!                             └→ tracing-opentelemetry → FileSpanExporter → JSON Lines file
//! ```
//!
//! The level comes from `RUST_LOG`, then the `trace_level` config option, then
//! `"info"`. Span export is only enabled when a trace level or trace file is
//! configured; the file rotates at 10 MB and keeps three numbered backups.
//!
//! # Modules
//!
//! - `init`: Subscriber setup
//! - `exporter`: OpenTelemetry span exporter producing JSON Lines
//! - `rotating`: Size-capped file with numbered backups

mod exporter;
mod init;
mod rotating;

pub use init::init_tracing;
