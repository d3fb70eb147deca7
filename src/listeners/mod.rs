//! # Listener abstractions.
//!
//! - [`Listener`] - trait for async payload handlers
//! - [`ListenerFn`] - closure-based listener implementation
//! - [`ListenerRef`] - shared reference to a listener (`Arc<dyn Listener<P>>`)
//! - [`Payload`] - bound satisfied by every value a bus can carry

mod listener;
mod listener_fn;
#[cfg(feature = "logging")]
mod log;

pub(crate) use listener::same_listener;
pub use listener::{Listener, ListenerRef, Payload};
pub use listener_fn::ListenerFn;
#[cfg(feature = "logging")]
pub use log::LogWriter;
