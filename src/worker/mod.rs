//! Background worker for preference storage.
//!
//! Preference file I/O runs on a Zellij worker thread so the plugin never
//! blocks on the filesystem. Requests and responses cross threads as JSON.
//!
//! # Architecture
//!
//! - `messages`: Request/response protocol types with trace context propagation
//! - `handler`: Message processing against a [`PreferenceStore`](crate::storage::PreferenceStore)
//!
//! The `ZellijWorker` registration itself lives in the plugin binary, which
//! forwards each payload to [`PreferenceWorker::handle_payload`].

pub mod handler;
pub mod messages;

pub use handler::PreferenceWorker;
pub use messages::{TraceContext, WorkerMessage, WorkerResponse};

/// Name the worker is registered under and that routes its responses.
pub const WORKER_NAME: &str = "rosterview";
