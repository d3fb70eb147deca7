//! Error types used by the bus and by listener callbacks.
//!
//! This module defines two enums:
//!
//! - [`ListenerError`] — errors returned by individual listener callbacks.
//! - [`DispatchError`] — errors surfaced to the emitter when a dispatch pass fails.
//!
//! Both types provide `as_label` for logs. Everything else the bus does favors
//! silent no-ops over errors (absent event names, repeated removals, empty registry).

use std::sync::Arc;

use thiserror::Error;

/// # Errors produced by listener callbacks.
///
/// A listener returning one of these stops the current dispatch pass; listeners
/// after it in the resolved order do not run.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListenerError {
    /// The listener failed while handling the payload.
    #[error("listener failed: {reason}")]
    Failed {
        /// The underlying error message.
        reason: String,
    },

    /// The listener refused the payload (validation, guard, ...).
    #[error("listener rejected payload: {reason}")]
    Rejected {
        /// Why the payload was refused.
        reason: String,
    },
}

impl ListenerError {
    /// Shorthand for [`ListenerError::Failed`].
    pub fn failed(reason: impl Into<String>) -> Self {
        ListenerError::Failed {
            reason: reason.into(),
        }
    }

    /// Shorthand for [`ListenerError::Rejected`].
    pub fn rejected(reason: impl Into<String>) -> Self {
        ListenerError::Rejected {
            reason: reason.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use echobus::ListenerError;
    ///
    /// assert_eq!(ListenerError::failed("boom").as_label(), "listener_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ListenerError::Failed { .. } => "listener_failed",
            ListenerError::Rejected { .. } => "listener_rejected",
        }
    }
}

/// # Errors returned from an emission.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// A listener returned an error; the pass was aborted at that listener.
    #[error("listener '{listener}' on event '{event}' failed: {source}")]
    Listener {
        /// Event name being dispatched.
        event: Arc<str>,
        /// Name of the failing listener.
        listener: String,
        /// The listener's own error.
        #[source]
        source: ListenerError,
    },
}

impl DispatchError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            DispatchError::Listener { .. } => "dispatch_listener_error",
        }
    }

    /// Returns the listener error that aborted the pass.
    pub fn listener_error(&self) -> &ListenerError {
        match self {
            DispatchError::Listener { source, .. } => source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_stable() {
        assert_eq!(ListenerError::failed("x").as_label(), "listener_failed");
        assert_eq!(ListenerError::rejected("x").as_label(), "listener_rejected");

        let err = DispatchError::Listener {
            event: "e".into(),
            listener: "l".into(),
            source: ListenerError::failed("boom"),
        };
        assert_eq!(err.as_label(), "dispatch_listener_error");
        assert_eq!(err.listener_error(), &ListenerError::failed("boom"));
    }

    #[test]
    fn display_includes_event_and_reason() {
        let err = DispatchError::Listener {
            event: "saved".into(),
            listener: "audit".into(),
            source: ListenerError::rejected("read-only"),
        };
        let msg = err.to_string();
        assert!(msg.contains("saved"));
        assert!(msg.contains("audit"));
        assert!(msg.contains("read-only"));
    }
}
