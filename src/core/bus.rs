//! # Bus: owns the registry, the lingering buffer, and their timers.
//!
//! A [`Bus`] is an explicitly constructed, cheaply cloneable handle. Independent
//! buses share nothing, so tests and unrelated component trees never see each
//! other's listeners.
//!
//! ## Architecture
//! ```text
//! Bus ──► Arc<Inner>
//!           ├─► Config               labels + default options
//!           ├─► Registry             event → [ListenerRecord]
//!           ├─► LingeringBuffer      event → [LingeringEntry]
//!           └─► CancellationToken    parent of every expiry / linger timer
//!
//! Subscriber::listen ──► Inner::register ──► replay backlog ──► Registry::add
//!                                                          └─► schedule_expiry
//! Subscriber::emit   ──► Inner::dispatch ──► Registry::snapshot
//!                                       ├─► LingeringBuffer::stash ──► schedule_linger_removal
//!                                       └─► Listener::on_event (sequential)
//! ```
//!
//! ## Timers
//! Expiry and linger removals are fire-and-forget tasks holding a `Weak` to the
//! bus internals. They race only with explicit removal of the same record/entry,
//! and both removals are idempotent. [`Bus::shutdown`] (or dropping the last
//! handle) cancels all of them.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::core::config::{Config, Operation};
use crate::core::identity::SubscriberId;
use crate::core::lingering::LingeringBuffer;
use crate::core::registry::{ListenerRecord, Registry};
use crate::error::DispatchError;
use crate::events::{CallbackOptions, EventOptions, OwnerRef};
use crate::listeners::{ListenerRef, Payload};
use crate::subscribers::{EventNames, Subscriber};

/// Shared state behind every [`Bus`] and [`Subscriber`] handle.
pub(crate) struct Inner<P: Payload> {
    pub config: Config,
    pub registry: Registry<P>,
    pub lingering: LingeringBuffer<P>,
    next_key: AtomicU64,
    timers: CancellationToken,
}

impl<P: Payload> Inner<P> {
    fn new(config: Config) -> Self {
        Self {
            config,
            registry: Registry::new(),
            lingering: LingeringBuffer::new(),
            next_key: AtomicU64::new(1),
            timers: CancellationToken::new(),
        }
    }

    /// Registers one listener under one event name.
    ///
    /// The lingering backlog of `event` is replayed into the listener first; a
    /// replay failure aborts the registration. A `once` listener that received a
    /// replayed emission is considered spent and is not stored.
    pub(crate) async fn register(
        self: &Arc<Self>,
        event: &Arc<str>,
        subscriber: &SubscriberId,
        listener: ListenerRef<P>,
        options: CallbackOptions,
    ) -> Result<(), DispatchError> {
        let backlog = self.lingering.replay(event);
        let mut replayed = 0usize;
        for entry in backlog {
            let meta = entry.meta.for_listener(options);
            listener
                .on_event(entry.payload, meta)
                .await
                .map_err(|source| DispatchError::Listener {
                    event: Arc::clone(event),
                    listener: listener.name().to_string(),
                    source,
                })?;
            replayed += 1;
            if options.once {
                break;
            }
        }

        if options.once && replayed > 0 {
            debug!(
                op = self.config.label(Operation::ListenOnce),
                event = %event,
                subscriber = %subscriber,
                "once listener consumed by lingering replay"
            );
            return Ok(());
        }

        let key = self.next_key.fetch_add(1, Ordering::Relaxed);
        self.registry.add(
            event,
            ListenerRecord {
                key,
                subscriber: subscriber.clone(),
                listener,
                options,
            },
        );
        trace!(event = %event, subscriber = %subscriber, key, replayed, "listener registered");

        if let Some(expire) = options.expiry() {
            self.schedule_expiry(Arc::clone(event), key, expire);
        }
        Ok(())
    }

    /// Removes record `key` of `event` after `after`.
    fn schedule_expiry(self: &Arc<Self>, event: Arc<str>, key: u64, after: Duration) {
        let weak = Arc::downgrade(self);
        let token = self.timers.child_token();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(after) => {
                    if let Some(inner) = weak.upgrade() {
                        let removed = inner.registry.remove_key(&event, key);
                        trace!(event = %event, key, removed, "listener expired");
                    }
                }
            }
        });
    }

    /// Removes lingering entry `id` of `event` after `after`.
    pub(crate) fn schedule_linger_removal(self: &Arc<Self>, event: Arc<str>, id: String, after: Duration) {
        let weak = Arc::downgrade(self);
        let token = self.timers.child_token();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(after) => {
                    if let Some(inner) = weak.upgrade() {
                        let removed = inner.lingering.remove(&event, &id);
                        trace!(event = %event, id = %id, removed, "lingering entry dropped");
                    }
                }
            }
        });
    }

    /// True once the timers were cancelled.
    #[inline]
    pub(crate) fn is_shut_down(&self) -> bool {
        self.timers.is_cancelled()
    }

    /// Drops every listener of each name. No-op on an empty registry.
    pub(crate) fn erase(&self, events: EventNames) -> usize {
        if self.registry.is_empty() {
            return 0;
        }
        let removed = events
            .into_iter()
            .map(|event| self.registry.remove_all(&event))
            .sum();
        debug!(op = self.config.label(Operation::Erase), removed, "events erased");
        removed
    }
}

impl<P: Payload> Drop for Inner<P> {
    fn drop(&mut self) {
        self.timers.cancel();
    }
}

/// In-process event bus carrying payloads of type `P`.
///
/// Cloning is cheap; all clones share the same listeners and buffer.
///
/// # Example
/// ```rust
/// use echobus::{Bus, Config, ListenerFn, ListenerRef, Meta};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let bus: Bus<String> = Bus::new(Config::default());
///     let sidebar = bus.subscriber();
///
///     let greet: ListenerRef<String> = ListenerFn::arc("greet", |name: String, _meta: Meta| async move {
///         Ok(format!("hello, {name}"))
///     });
///     sidebar.listen("login", greet, None).await?;
///
///     let out = bus.emit("login", "ada".to_string(), None).await?;
///     assert_eq!(out, "ada");
///     Ok(())
/// }
/// ```
pub struct Bus<P: Payload> {
    inner: Arc<Inner<P>>,
}

impl<P: Payload> Clone for Bus<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P: Payload> Default for Bus<P> {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl<P: Payload> Bus<P> {
    /// Creates a bus with the given configuration.
    pub fn new(config: Config) -> Self {
        Self {
            inner: Arc::new(Inner::new(config)),
        }
    }

    /// Returns the configuration the bus was built with.
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Creates a subscriber with a fresh identity and no owner handle.
    pub fn subscriber(&self) -> Subscriber<P> {
        Subscriber::new(Arc::clone(&self.inner), SubscriberId::generate(), None)
    }

    /// Creates a subscriber with a fresh identity owned by `owner`.
    ///
    /// `owner` is reported as `event_origin` of everything this subscriber emits.
    pub fn subscriber_for(&self, owner: OwnerRef) -> Subscriber<P> {
        Subscriber::new(Arc::clone(&self.inner), SubscriberId::generate(), Some(owner))
    }

    /// Emits without an originating entity.
    ///
    /// See [`Subscriber::emit`] for the dispatch rules.
    pub async fn emit(
        &self,
        event: &str,
        payload: P,
        options: Option<EventOptions>,
    ) -> Result<P, DispatchError> {
        let options = options.unwrap_or(self.inner.config.event_defaults);
        self.inner
            .dispatch(Arc::from(event), payload, options, None)
            .await
    }

    /// Drops every listener (of any subscriber) for each of `events`.
    ///
    /// Returns how many listeners were removed.
    pub fn erase(&self, events: impl Into<EventNames>) -> usize {
        self.inner.erase(events.into())
    }

    /// Removes every listener registered under `subscriber`, across all event names.
    ///
    /// This is what a destroy hook runs for an entity that falls silent.
    pub fn fall_silent_for(&self, subscriber: &SubscriberId) -> usize {
        if self.inner.registry.is_empty() {
            return 0;
        }
        self.inner.registry.remove_subscriber_everywhere(subscriber)
    }

    /// Number of listeners currently registered for `event`.
    pub fn listener_count(&self, event: &str) -> usize {
        self.inner.registry.len(event)
    }

    /// Sorted names of events with at least one listener.
    pub fn event_names(&self) -> Vec<String> {
        self.inner.registry.event_names()
    }

    /// Number of emissions currently lingering for `event`.
    pub fn lingering_count(&self, event: &str) -> usize {
        self.inner.lingering.len(event)
    }

    /// Cancels every pending expiry and linger timer.
    ///
    /// Listeners and lingering entries stay where they are; they simply stop expiring.
    /// Later emissions are still dispatched but no longer linger.
    pub fn shutdown(&self) {
        self.inner.timers.cancel();
    }

    /// True once [`shutdown`](Self::shutdown) was called.
    pub fn is_shut_down(&self) -> bool {
        self.inner.is_shut_down()
    }
}
