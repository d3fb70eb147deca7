//! # Listener registry - event name to ordered listener records.
//!
//! The registry owns every [`ListenerRecord`]. Dispatch never iterates the stored
//! sequence directly: it takes a [`snapshot`](Registry::snapshot) and releases the
//! lock before any listener runs, so listeners may freely register or remove
//! listeners (including themselves) while a pass is in flight.
//!
//! ## Architecture
//! ```text
//! Registry
//!   └─► RwLock<HashMap<event, Vec<ListenerRecord>>>
//!         ├─► add(event, record)                   append, no dedup
//!         ├─► remove_by_subscriber(event, sub)     all matches, one pass
//!         ├─► remove_callback(event, sub, l)       first match only
//!         ├─► remove_all(event)                    drop the sequence
//!         └─► remove_key(event, key)               expiry / once cleanup
//! ```
//!
//! ## Rules
//! - Insertion order is registration order; nothing reorders it.
//! - Duplicate (subscriber, listener) pairs are stored and both fire.
//! - A sequence emptied by any removal is dropped, so `is_empty()` means
//!   "no event name has listeners".
//! - Every removal is idempotent; absent names are no-ops.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::core::identity::SubscriberId;
use crate::events::CallbackOptions;
use crate::listeners::{ListenerRef, Payload, same_listener};

/// One registered listener.
#[derive(Clone)]
pub(crate) struct ListenerRecord<P: Payload> {
    /// Bus-unique key of this registration.
    pub key: u64,
    /// Subscribing entity.
    pub subscriber: SubscriberId,
    /// The callback.
    pub listener: ListenerRef<P>,
    /// Options captured at registration.
    pub options: CallbackOptions,
}

/// Event name to listener records.
pub(crate) struct Registry<P: Payload> {
    events: RwLock<HashMap<Arc<str>, Vec<ListenerRecord<P>>>>,
}

impl<P: Payload> Registry<P> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            events: RwLock::new(HashMap::new()),
        }
    }

    /// Appends a record to the sequence of `event`, creating it if needed.
    pub fn add(&self, event: &str, record: ListenerRecord<P>) {
        let mut events = self.events.write();
        match events.get_mut(event) {
            Some(seq) => seq.push(record),
            None => {
                events.insert(Arc::from(event), vec![record]);
            }
        }
    }

    /// Clones the current sequence of `event` (empty if absent).
    pub fn snapshot(&self, event: &str) -> Vec<ListenerRecord<P>> {
        self.events.read().get(event).cloned().unwrap_or_default()
    }

    /// Removes every record of `subscriber` under `event`. Returns how many went.
    pub fn remove_by_subscriber(&self, event: &str, subscriber: &SubscriberId) -> usize {
        self.mutate(event, |seq| {
            let before = seq.len();
            seq.retain(|r| &r.subscriber != subscriber);
            before - seq.len()
        })
        .unwrap_or(0)
    }

    /// Removes the first record of `subscriber` under `event` holding `listener`.
    pub fn remove_callback(
        &self,
        event: &str,
        subscriber: &SubscriberId,
        listener: &ListenerRef<P>,
    ) -> bool {
        self.mutate(event, |seq| {
            match seq
                .iter()
                .position(|r| &r.subscriber == subscriber && same_listener(&r.listener, listener))
            {
                Some(idx) => {
                    seq.remove(idx);
                    true
                }
                None => false,
            }
        })
        .unwrap_or(false)
    }

    /// Drops the whole sequence of `event`. Returns how many records it held.
    pub fn remove_all(&self, event: &str) -> usize {
        self.events.write().remove(event).map_or(0, |seq| seq.len())
    }

    /// Removes the record registered under `key`, if it is still there.
    pub fn remove_key(&self, event: &str, key: u64) -> bool {
        self.mutate(event, |seq| match seq.iter().position(|r| r.key == key) {
            Some(idx) => {
                seq.remove(idx);
                true
            }
            None => false,
        })
        .unwrap_or(false)
    }

    /// Removes every record of `subscriber` across all event names.
    pub fn remove_subscriber_everywhere(&self, subscriber: &SubscriberId) -> usize {
        let mut events = self.events.write();
        let mut removed = 0;
        events.retain(|_, seq| {
            let before = seq.len();
            seq.retain(|r| &r.subscriber != subscriber);
            removed += before - seq.len();
            !seq.is_empty()
        });
        removed
    }

    /// True if no event name currently has listeners.
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Number of listeners registered for `event`.
    pub fn len(&self, event: &str) -> usize {
        self.events.read().get(event).map_or(0, Vec::len)
    }

    /// Returns sorted list of event names with listeners.
    pub fn event_names(&self) -> Vec<String> {
        let events = self.events.read();
        let mut names: Vec<String> = events.keys().map(|k| k.to_string()).collect();
        names.sort_unstable();
        names
    }

    /// Applies `f` to the sequence of `event` and drops the sequence if it ends up empty.
    fn mutate<R>(&self, event: &str, f: impl FnOnce(&mut Vec<ListenerRecord<P>>) -> R) -> Option<R> {
        let mut events = self.events.write();
        let seq = events.get_mut(event)?;
        let out = f(seq);
        if seq.is_empty() {
            events.remove(event);
        }
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Meta;
    use crate::listeners::ListenerFn;

    fn noop(name: &'static str) -> ListenerRef<u32> {
        ListenerFn::arc(name, |p: u32, _m: Meta| async move { Ok(p) })
    }

    fn record(key: u64, sub: &SubscriberId, l: &ListenerRef<u32>) -> ListenerRecord<u32> {
        ListenerRecord {
            key,
            subscriber: sub.clone(),
            listener: Arc::clone(l),
            options: CallbackOptions::default(),
        }
    }

    fn keys(reg: &Registry<u32>, event: &str) -> Vec<u64> {
        reg.snapshot(event).iter().map(|r| r.key).collect()
    }

    #[test]
    fn add_keeps_registration_order_and_duplicates() {
        let reg = Registry::new();
        let a = SubscriberId::from("a");
        let l = noop("l");

        reg.add("e", record(1, &a, &l));
        reg.add("e", record(2, &a, &l));
        reg.add("e", record(3, &a, &noop("m")));

        assert_eq!(keys(&reg, "e"), vec![1, 2, 3]);
        assert_eq!(reg.len("e"), 3);
        assert!(!reg.is_empty());
    }

    #[test]
    fn remove_by_subscriber_removes_adjacent_matches() {
        let reg = Registry::new();
        let (a, b) = (SubscriberId::from("a"), SubscriberId::from("b"));
        let l = noop("l");

        reg.add("e", record(1, &a, &l));
        reg.add("e", record(2, &a, &l));
        reg.add("e", record(3, &b, &l));
        reg.add("e", record(4, &a, &l));

        assert_eq!(reg.remove_by_subscriber("e", &a), 3);
        assert_eq!(keys(&reg, "e"), vec![3]);
        assert_eq!(reg.remove_by_subscriber("e", &a), 0);
        assert_eq!(reg.remove_by_subscriber("missing", &a), 0);
    }

    #[test]
    fn remove_callback_only_takes_the_first_match() {
        let reg = Registry::new();
        let a = SubscriberId::from("a");
        let (l, m) = (noop("l"), noop("m"));

        reg.add("e", record(1, &a, &m));
        reg.add("e", record(2, &a, &l));
        reg.add("e", record(3, &a, &l));

        assert!(reg.remove_callback("e", &a, &l));
        assert_eq!(keys(&reg, "e"), vec![1, 3]);
        assert!(!reg.remove_callback("e", &SubscriberId::from("b"), &l));
    }

    #[test]
    fn remove_all_drops_the_name() {
        let reg = Registry::new();
        let a = SubscriberId::from("a");
        reg.add("e", record(1, &a, &noop("l")));
        reg.add("f", record(2, &a, &noop("l")));

        assert_eq!(reg.remove_all("e"), 1);
        assert_eq!(reg.remove_all("e"), 0);
        assert_eq!(reg.event_names(), vec!["f".to_string()]);
    }

    #[test]
    fn emptied_sequences_are_pruned() {
        let reg = Registry::new();
        let a = SubscriberId::from("a");
        reg.add("e", record(7, &a, &noop("l")));

        assert!(reg.remove_key("e", 7));
        assert!(!reg.remove_key("e", 7));
        assert!(reg.is_empty());
    }

    #[test]
    fn remove_subscriber_everywhere_spares_others() {
        let reg = Registry::new();
        let (a, b) = (SubscriberId::from("a"), SubscriberId::from("b"));
        let l = noop("l");

        reg.add("e", record(1, &a, &l));
        reg.add("e", record(2, &b, &l));
        reg.add("f", record(3, &a, &l));

        assert_eq!(reg.remove_subscriber_everywhere(&a), 2);
        assert_eq!(reg.event_names(), vec!["e".to_string()]);
        assert_eq!(keys(&reg, "e"), vec![2]);
    }
}
