//! # Host lifecycle integration.
//!
//! The bus knows nothing about the component framework it lives in. A host
//! integration only has to forward two lifecycle moments:
//!
//! ```text
//! host framework                    echobus
//! ─────────────                     ───────
//! entity created        ──► Host::on_entity_created(owner)   → Subscriber (fresh id)
//! entity will destroy   ──► Host::on_entity_will_destroy(&e) → fall_silent(All) if
//!                                                               e.should_auto_unsubscribe()
//! ```
//!
//! The two capabilities the core relies on are [`Identifiable`] and
//! [`AutoUnsubscribe`]; [`Subscriber`] implements both, and host-side component
//! types can implement them too. [`Attached`] ties the destroy hook to `Drop`.

use std::ops::Deref;

use tracing::debug;

use crate::core::{Bus, Operation, SubscriberId};
use crate::events::OwnerRef;
use crate::listeners::Payload;
use crate::subscribers::{Silence, Subscriber};

/// Something with a stable subscriber identity.
pub trait Identifiable {
    /// The identity listeners are registered under.
    fn id(&self) -> &SubscriberId;
}

/// Something that decides whether it falls silent on destroy.
pub trait AutoUnsubscribe {
    /// `true` → every listener of this entity is removed on destroy.
    fn should_auto_unsubscribe(&self) -> bool;
}

impl<P: Payload> Identifiable for Subscriber<P> {
    fn id(&self) -> &SubscriberId {
        Subscriber::id(self)
    }
}

impl<P: Payload> AutoUnsubscribe for Subscriber<P> {
    fn should_auto_unsubscribe(&self) -> bool {
        self.auto_unsubscribe()
    }
}

/// Adapter the host framework calls from its lifecycle hooks.
pub struct Host<P: Payload> {
    bus: Bus<P>,
}

impl<P: Payload> Host<P> {
    /// Creates an adapter over `bus`.
    pub fn new(bus: Bus<P>) -> Self {
        Self { bus }
    }

    /// The bus behind this adapter.
    pub fn bus(&self) -> &Bus<P> {
        &self.bus
    }

    /// Creation hook: assigns a fresh identity to a new entity.
    pub fn on_entity_created(&self, owner: OwnerRef) -> Subscriber<P> {
        let sub = self.bus.subscriber_for(owner);
        debug!(subscriber = %sub.id(), "entity created");
        sub
    }

    /// Creation hook returning a handle that runs the destroy hook on drop.
    pub fn attach(&self, owner: OwnerRef) -> Attached<P> {
        Attached {
            subscriber: self.on_entity_created(owner),
        }
    }

    /// Destroy hook: falls silent for `entity` if its flag allows it.
    ///
    /// Returns how many listeners were removed.
    pub fn on_entity_will_destroy<E>(&self, entity: &E) -> usize
    where
        E: Identifiable + AutoUnsubscribe,
    {
        if !entity.should_auto_unsubscribe() {
            debug!(subscriber = %entity.id(), "entity destroyed; auto-unsubscribe disabled");
            return 0;
        }
        let removed = self.bus.fall_silent_for(entity.id());
        debug!(
            op = self.bus.config().label(Operation::FallSilent),
            subscriber = %entity.id(),
            removed,
            "entity destroyed"
        );
        removed
    }
}

/// A [`Subscriber`] whose entity falls silent when this handle is dropped.
///
/// Dereferences to the subscriber, so all five operations are available.
pub struct Attached<P: Payload> {
    subscriber: Subscriber<P>,
}

impl<P: Payload> Attached<P> {
    /// Overrides the auto-unsubscribe flag for this entity.
    pub fn set_auto_unsubscribe(&mut self, enabled: bool) {
        self.subscriber.set_auto_unsubscribe(enabled);
    }
}

impl<P: Payload> Deref for Attached<P> {
    type Target = Subscriber<P>;

    fn deref(&self) -> &Self::Target {
        &self.subscriber
    }
}

impl<P: Payload> Drop for Attached<P> {
    fn drop(&mut self) {
        if self.subscriber.should_auto_unsubscribe() {
            self.subscriber.fall_silent(Silence::All);
        }
    }
}
