//! Side effects requested by the event handler.
//!
//! [`handle_event`](crate::app::handle_event) never talks to Zellij itself. It
//! returns a list of [`Action`]s and the plugin shim performs them in order.
//!
//! # Example
//!
//! ```rust
//! use rosterview::app::Action;
//! use rosterview::worker::WorkerMessage;
//!
//! let actions = vec![
//!     Action::PostToWorker(WorkerMessage::load_preference("theme".to_string())),
//!     Action::ScheduleTimeout { seconds: 10.0 },
//! ];
//! assert_eq!(actions.len(), 2);
//! ```

use crate::pipeline::RequestId;
use crate::worker::WorkerMessage;

/// Commands executed by the plugin runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Hides the plugin pane.
    CloseFocus,

    /// Posts a message to the preference worker.
    PostToWorker(WorkerMessage),

    /// Issues a GET for the collection.
    ///
    /// `request_id` must be echoed back in the response context under
    /// [`REQUEST_ID_CONTEXT_KEY`](crate::pipeline::loader::REQUEST_ID_CONTEXT_KEY).
    Fetch {
        url: String,
        request_id: RequestId,
    },

    /// Asks for a timer event after `seconds`, used to expire slow requests.
    ScheduleTimeout { seconds: f64 },
}
