//! Hook error types.

use thiserror::Error;

use crate::types::HookKind;

/// Errors that can occur while registering, dispatching, or serving hooks.
#[derive(Debug, Error)]
pub enum HookError {
    /// A hook body reported a failure.
    #[error("Hook handler error in {kind}: {message}")]
    Handler {
        /// Lifecycle point the failing hook was attached to.
        kind: HookKind,
        /// Message from the handler.
        message: String,
    },

    /// Hook registration error (e.g., selector missing on a named hook).
    #[error("Registration error: {0}")]
    Registration(String),

    /// A wire message was malformed or carried the wrong payload shape.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// A wire message named an event this handler does not know.
    #[error("Unknown hook event: {0}")]
    UnknownEvent(String),

    /// Socket or stream failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Payload could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl HookError {
    /// Shorthand for a [`HookError::Handler`].
    pub fn handler(kind: HookKind, message: impl Into<String>) -> Self {
        Self::Handler {
            kind,
            message: message.into(),
        }
    }
}

/// Result type for hook operations.
pub type Result<T> = std::result::Result<T, HookError>;
