//! # Dispatch metadata handed to every listener.
//!
//! A [`Meta`] is built once per dispatch pass and cloned per listener, with
//! `callback_options` replaced by that listener's own options. The snapshot is
//! also what the lingering buffer stores next to a payload, so replayed events
//! carry the metadata of their original emission.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use super::options::{CallbackOptions, EventOptions};

/// Opaque handle to a subscribing or emitting entity.
pub type OwnerRef = Arc<dyn Any + Send + Sync>;

/// Per-listener view of one emission.
#[derive(Clone)]
pub struct Meta {
    /// Name of the event being dispatched.
    pub event_name: Arc<str>,
    /// Copy of the emission options.
    pub event_options: EventOptions,
    /// Copy of the receiving listener's own options (default outside a listener).
    pub callback_options: CallbackOptions,
    /// The entity that emitted, if any.
    pub event_origin: Option<OwnerRef>,
    /// Number of listeners registered when the pass started (before stop/reverse).
    pub listeners_tally: usize,
}

impl Meta {
    pub(crate) fn new(
        event_name: Arc<str>,
        event_options: EventOptions,
        event_origin: Option<OwnerRef>,
        listeners_tally: usize,
    ) -> Self {
        Self {
            event_name,
            event_options,
            callback_options: CallbackOptions::default(),
            event_origin,
            listeners_tally,
        }
    }

    /// Returns a copy carrying the given listener options.
    #[inline]
    pub(crate) fn for_listener(&self, options: CallbackOptions) -> Self {
        let mut meta = self.clone();
        meta.callback_options = options;
        meta
    }

    /// Downcasts the emitting entity to a concrete type.
    pub fn origin<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.event_origin.as_deref()?.downcast_ref::<T>()
    }
}

impl fmt::Debug for Meta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Meta")
            .field("event_name", &self.event_name)
            .field("event_options", &self.event_options)
            .field("callback_options", &self.callback_options)
            .field("has_origin", &self.event_origin.is_some())
            .field("listeners_tally", &self.listeners_tally)
            .finish()
    }
}
