//! # Subscriber: the per-entity facade over a bus.
//!
//! Every subscribing entity gets one [`Subscriber`]: a bus handle plus the
//! entity's [`SubscriberId`] and optional owner handle. All five operations
//! go through it:
//!
//! | Operation      | Effect                                                        |
//! |----------------|---------------------------------------------------------------|
//! | `listen`       | register every (name, listener) pair, replaying lingering events first |
//! | `listen_once`  | same, with `once` forced on                                   |
//! | `emit`         | dispatch with this entity as `event_origin`                   |
//! | `erase`        | drop every listener (any subscriber) of the given names      |
//! | `fall_silent`  | drop this subscriber's own listeners, scoped by [`Silence`]   |
//!
//! ## Example
//! ```rust
//! use echobus::{Bus, CallbackOptions, ListenerFn, ListenerRef, Meta, Silence};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bus: Bus<u32> = Bus::default();
//!     let panel = bus.subscriber();
//!
//!     let log: ListenerRef<u32> = ListenerFn::arc("log", |n: u32, _m: Meta| async move { Ok(n) });
//!     panel.listen(["opened", "closed"], &log, None).await?;
//!     assert_eq!(bus.event_names(), vec!["closed", "opened"]);
//!
//!     panel.fall_silent(Silence::events("closed"));
//!     assert_eq!(bus.event_names(), vec!["opened"]);
//!
//!     panel.fall_silent(Silence::All);
//!     assert!(bus.event_names().is_empty());
//!     Ok(())
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::core::{Inner, Operation, SubscriberId};
use crate::error::DispatchError;
use crate::events::{CallbackOptions, EventOptions, OwnerRef};
use crate::listeners::Payload;
use crate::subscribers::targets::{EventNames, Listeners};

/// Scope of a [`Subscriber::fall_silent`] call.
///
/// Every variant only ever touches the calling subscriber's own listeners.
pub enum Silence<P: Payload> {
    /// Every listener of this subscriber, across all event names.
    All,
    /// This subscriber's listeners under each of the given names.
    Events(EventNames),
    /// The first registration of each given listener under `event`.
    Listeners {
        /// Event name to search.
        event: String,
        /// Listener handles, compared by address.
        listeners: Listeners<P>,
    },
}

impl<P: Payload> Silence<P> {
    /// Scope covering the given event names.
    pub fn events(events: impl Into<EventNames>) -> Self {
        Silence::Events(events.into())
    }

    /// Scope covering specific listeners under one event name.
    pub fn listeners(event: impl Into<String>, listeners: impl Into<Listeners<P>>) -> Self {
        Silence::Listeners {
            event: event.into(),
            listeners: listeners.into(),
        }
    }
}

/// Per-entity handle to a bus.
///
/// Clones share the identity: a listener registered through one clone can be
/// removed through another.
pub struct Subscriber<P: Payload> {
    inner: Arc<Inner<P>>,
    id: SubscriberId,
    owner: Option<OwnerRef>,
    auto_unsubscribe: bool,
}

impl<P: Payload> Clone for Subscriber<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            id: self.id.clone(),
            owner: self.owner.clone(),
            auto_unsubscribe: self.auto_unsubscribe,
        }
    }
}

impl<P: Payload> fmt::Debug for Subscriber<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriber")
            .field("id", &self.id)
            .field("has_owner", &self.owner.is_some())
            .field("auto_unsubscribe", &self.auto_unsubscribe)
            .finish()
    }
}

impl<P: Payload> Subscriber<P> {
    pub(crate) fn new(inner: Arc<Inner<P>>, id: SubscriberId, owner: Option<OwnerRef>) -> Self {
        let auto_unsubscribe = inner.config.auto_unsubscribe;
        Self {
            inner,
            id,
            owner,
            auto_unsubscribe,
        }
    }

    /// Identity of this subscriber.
    #[inline]
    pub fn id(&self) -> &SubscriberId {
        &self.id
    }

    /// Owner handle, if one was supplied.
    #[inline]
    pub fn owner(&self) -> Option<&OwnerRef> {
        self.owner.as_ref()
    }

    /// Whether this subscriber falls silent when its entity is destroyed.
    #[inline]
    pub fn auto_unsubscribe(&self) -> bool {
        self.auto_unsubscribe
    }

    /// Overrides the auto-unsubscribe flag for this handle.
    pub fn set_auto_unsubscribe(&mut self, enabled: bool) {
        self.auto_unsubscribe = enabled;
    }

    /// Registers every listener for every event name.
    ///
    /// For each (name, listener) pair, any emissions still lingering under the
    /// name are replayed into the listener before it is stored. A replay error
    /// stops the registration at that pair and is returned; pairs already
    /// processed stay registered.
    ///
    /// `options = None` uses the bus defaults.
    pub async fn listen(
        &self,
        events: impl Into<EventNames>,
        listeners: impl Into<Listeners<P>>,
        options: Option<CallbackOptions>,
    ) -> Result<(), DispatchError> {
        let options = options.unwrap_or(self.inner.config.callback_defaults);
        let events = events.into();
        let listeners = listeners.into().into_vec();

        debug!(
            op = self.inner.config.label(if options.once {
                Operation::ListenOnce
            } else {
                Operation::Listen
            }),
            subscriber = %self.id,
            events = events.len(),
            listeners = listeners.len(),
            "listen"
        );

        for event in events {
            let event: Arc<str> = Arc::from(event);
            for listener in &listeners {
                self.inner
                    .register(&event, &self.id, Arc::clone(listener), options)
                    .await?;
            }
        }
        Ok(())
    }

    /// Like [`listen`](Self::listen) with `once` forced on.
    pub async fn listen_once(
        &self,
        events: impl Into<EventNames>,
        listeners: impl Into<Listeners<P>>,
        options: Option<CallbackOptions>,
    ) -> Result<(), DispatchError> {
        let options = options
            .unwrap_or(self.inner.config.callback_defaults)
            .with_once(true);
        self.listen(events, listeners, Some(options)).await
    }

    /// Emits `event` with this subscriber's owner as origin.
    ///
    /// Always awaitable: with `is_async` off the future completes as soon as every
    /// listener in the pass has run, and yields the original payload.
    ///
    /// `options = None` uses the bus defaults.
    pub async fn emit(
        &self,
        event: &str,
        payload: P,
        options: Option<EventOptions>,
    ) -> Result<P, DispatchError> {
        let options = options.unwrap_or(self.inner.config.event_defaults);
        self.inner
            .dispatch(Arc::from(event), payload, options, self.owner.clone())
            .await
    }

    /// Drops every listener (of any subscriber) for each of `events`.
    pub fn erase(&self, events: impl Into<EventNames>) -> usize {
        self.inner.erase(events.into())
    }

    /// Removes this subscriber's listeners within `scope`.
    ///
    /// Returns how many registrations were removed. Removing something that is
    /// not registered is a no-op.
    pub fn fall_silent(&self, scope: Silence<P>) -> usize {
        let registry = &self.inner.registry;
        if registry.is_empty() {
            return 0;
        }

        let removed = match scope {
            Silence::All => registry.remove_subscriber_everywhere(&self.id),
            Silence::Events(events) => events
                .into_iter()
                .map(|event| registry.remove_by_subscriber(&event, &self.id))
                .sum(),
            Silence::Listeners { event, listeners } => listeners
                .into_iter()
                .filter(|listener| registry.remove_callback(&event, &self.id, listener))
                .count(),
        };

        debug!(
            op = self.inner.config.label(Operation::FallSilent),
            subscriber = %self.id,
            removed,
            "fall silent"
        );
        removed
    }
}
