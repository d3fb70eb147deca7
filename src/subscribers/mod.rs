//! # Subscriber facade.
//!
//! A [`Subscriber`] is what a subscribing entity holds: its identity plus the
//! five bus operations (`listen`, `listen_once`, `emit`, `erase`, `fall_silent`).
//!
//! ## Architecture
//! ```text
//! Subscriber ──► listen(names, listeners)     ──► Registry (+ lingering replay)
//!            ├─► emit(name, payload, options) ──► Dispatch ──► Listener::on_event
//!            ├─► erase(names)                 ──► Registry::remove_all
//!            └─► fall_silent(Silence)         ──► Registry (own records only)
//! ```
//!
//! Batch arguments are explicit: [`OneOrMany`] for names and listeners,
//! [`Silence`] for the unsubscribe scope.

mod subscriber;
mod targets;

pub use subscriber::{Silence, Subscriber};
pub use targets::{EventNames, Listeners, OneOrMany};
