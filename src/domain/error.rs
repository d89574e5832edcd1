//! Error types for the rosterview plugin.
//!
//! This module defines the centralized error type [`RosterError`] and a type alias
//! [`Result`] used throughout the plugin. Variants are derived with `thiserror`.
//!
//! Not every unhappy path is an error: an empty result set after filtering is a
//! valid state rendered as "no matches", and a record with a missing or
//! mistyped field degrades that field to an empty string instead of failing
//! the whole load.

use thiserror::Error;

/// The main error type for rosterview operations.
///
/// # Examples
///
/// ```
/// use rosterview::RosterError;
///
/// let err = RosterError::Network("HTTP 503".to_string());
/// assert_eq!(err.to_string(), "Network error: HTTP 503");
/// ```
#[derive(Debug, Error)]
pub enum RosterError {
    /// The collection request failed at the transport level, returned a
    /// non-success status, or timed out.
    ///
    /// Terminal for that load attempt. Any previously loaded collection is kept.
    #[error("Network error: {0}")]
    Network(String),

    /// The response body was not shaped like a people collection.
    ///
    /// Raised only when the body as a whole is unusable (not JSON, or neither
    /// a bare array nor a `results` envelope). Individual bad fields never
    /// produce this error.
    #[error("Malformed data: {0}")]
    MalformedData(String),

    /// Preference storage read or write failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Theme parsing or loading failed.
    #[error("Theme error: {0}")]
    Theme(String),

    /// Communication with the background worker failed.
    #[error("Worker communication error: {0}")]
    Worker(String),
}

impl RosterError {
    /// Short, user-facing description shown in the error banner.
    ///
    /// Drops the category prefix for network failures, which read better as
    /// "Failed to load people: HTTP 500" than with a doubled label.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(reason) | Self::MalformedData(reason) => reason.clone(),
            other => other.to_string(),
        }
    }
}

/// A specialized `Result` type for rosterview operations.
pub type Result<T> = std::result::Result<T, RosterError>;
