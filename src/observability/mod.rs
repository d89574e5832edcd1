//! OpenTelemetry tracing exported to a local OTLP-JSON file.
//!
//! ```text
//! tracing macros → tracing-opentelemetry → SDK (simple processor) → FileSpanExporter → /data/otlp.json
//! ```
//!
//! Each export call appends one line holding a complete OTLP `resourceSpans`
//! document, so the file can be replayed into any OTLP-JSON consumer. The file
//! is rotated by size and a few numbered backups are kept.
//!
//! Plugin and worker run in separate WASM instances, so each installs its own
//! subscriber: [`init_tracing`] from `load`, [`init_worker_tracing`] on the
//! first worker message.
//!
//! # Modules
//!
//! - [`init`]: Subscriber setup
//! - `exporter`: The `SpanExporter` and tracer provider
//! - `otlp`: Span to OTLP-JSON conversion
//! - `rotation`: Size-rotated append-only file

mod exporter;
pub mod init;
mod otlp;
mod rotation;

pub use init::{init_tracing, init_worker_tracing};
