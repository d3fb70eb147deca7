//! # Lingering buffer - recent emissions kept for late subscribers.
//!
//! An emission with a non-zero `linger` is stashed here under its event name.
//! Whenever a new listener registers for that name, every stashed entry is
//! replayed into it, in stash order. Replay does not consume entries: each late
//! subscriber sees the same backlog.
//!
//! Entries leave the buffer only through their own timer, scheduled by the bus
//! and addressed by entry id (positions shift as older entries expire).
//!
//! ## Growth
//! The buffer holds roughly `emission rate × linger` entries per event name.
//! That is fine for short linger windows on component-scale traffic; nothing
//! caps it beyond the timers.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::identity::new_id;
use crate::events::Meta;
use crate::listeners::Payload;

/// One buffered emission.
#[derive(Clone)]
pub(crate) struct LingeringEntry<P: Payload> {
    pub id: String,
    pub payload: P,
    pub meta: Meta,
}

/// Event name to buffered emissions.
pub(crate) struct LingeringBuffer<P: Payload> {
    entries: Mutex<HashMap<Arc<str>, Vec<LingeringEntry<P>>>>,
}

impl<P: Payload> LingeringBuffer<P> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Appends an entry and returns its id.
    pub fn stash(&self, event: &Arc<str>, payload: P, meta: Meta) -> String {
        let id = new_id();
        let entry = LingeringEntry {
            id: id.clone(),
            payload,
            meta,
        };
        self.entries
            .lock()
            .entry(Arc::clone(event))
            .or_default()
            .push(entry);
        id
    }

    /// Returns the backlog of `event` in stash order, leaving it in place.
    pub fn replay(&self, event: &str) -> Vec<LingeringEntry<P>> {
        self.entries.lock().get(event).cloned().unwrap_or_default()
    }

    /// Removes entry `id` from `event`. Idempotent.
    pub fn remove(&self, event: &str, id: &str) -> bool {
        let mut entries = self.entries.lock();
        let Some(seq) = entries.get_mut(event) else {
            return false;
        };
        let before = seq.len();
        seq.retain(|e| e.id != id);
        let removed = seq.len() != before;
        if seq.is_empty() {
            entries.remove(event);
        }
        removed
    }

    /// Number of entries buffered for `event`.
    pub fn len(&self, event: &str) -> usize {
        self.entries.lock().get(event).map_or(0, Vec::len)
    }

    /// True if nothing is buffered.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
