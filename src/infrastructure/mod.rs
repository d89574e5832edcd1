//! Infrastructure layer for filesystem interactions inside the Zellij sandbox.
//!
//! Plugins see their own persistent data directory at `/data` and the host
//! filesystem (rooted at the directory Zellij was started from) under `/host`.

pub mod paths;

pub use paths::{expand_tilde, get_data_dir, preferences_file, trace_file};
