//! # Listener abstraction.
//!
//! A [`Listener`] receives a payload and the per-listener [`Meta`] and returns a
//! payload. In async emissions the returned value becomes the next listener's input;
//! in plain emissions it is ignored. The common handle type is
//! [`ListenerRef`], an `Arc<dyn Listener<P>>`; its address is the listener's
//! identity for [`fall_silent`](crate::Subscriber::fall_silent).
//!
//! # Example
//! ```
//! use async_trait::async_trait;
//! use echobus::{Listener, ListenerError, Meta};
//!
//! struct Upper;
//!
//! #[async_trait]
//! impl Listener<String> for Upper {
//!     async fn on_event(&self, payload: String, _meta: Meta) -> Result<String, ListenerError> {
//!         Ok(payload.to_uppercase())
//!     }
//!
//!     fn name(&self) -> &str { "upper" }
//! }
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ListenerError;
use crate::events::Meta;

/// Values that can travel through a bus.
pub trait Payload: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> Payload for T {}

/// Shared handle to a listener.
pub type ListenerRef<P> = Arc<dyn Listener<P>>;

/// Contract for event listeners.
///
/// Invocations for one emission are strictly sequential; a listener never runs
/// concurrently with another listener of the same pass.
#[async_trait]
pub trait Listener<P: Payload>: Send + Sync + 'static {
    /// Handles one payload.
    ///
    /// Returning `Err` aborts the pass and surfaces the error to the emitter.
    async fn on_event(&self, payload: P, meta: Meta) -> Result<P, ListenerError>;

    /// Human-readable name (for logs).
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Compares two listener handles by address.
#[inline]
pub(crate) fn same_listener<P: Payload>(a: &ListenerRef<P>, b: &ListenerRef<P>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
