//! Error types for event envelope validation and routing.

use thiserror::Error;

/// Errors raised while reading an incoming code host event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    /// The payload is missing a required part or is malformed.
    #[error("invalid event payload: {0}")]
    InvalidPayload(String),

    /// The event and action combination has no handler.
    #[error("invalid event/action: {event}/{action}")]
    InvalidEventOrAction {
        /// Event name as delivered by the code host.
        event: String,
        /// Payload action, empty when absent.
        action: String,
    },
}
