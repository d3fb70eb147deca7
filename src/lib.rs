//! # echobus
//!
//! **Echobus** is an in-process publish/subscribe event bus for component trees.
//!
//! Components (or any other entity with a lifetime) subscribe listeners to named
//! events, emit payloads to them, and fall silent when they are destroyed. The bus
//! adds a few knobs on top of plain fan-out: ordered and reversible dispatch,
//! stop-propagation, one-shot and expiring listeners, an async pipeline mode in
//! which each listener transforms the payload for the next, and "lingering"
//! emissions that are replayed to listeners registered shortly after.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  Subscriber  │   │  Subscriber  │   │  Subscriber  │
//!     │ (entity #1)  │   │ (entity #2)  │   │ (entity #3)  │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            │ listen / emit / erase / fall_silent │
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Bus (shared Arc<Inner>)                                          │
//! │  - Config           (operation labels, default options)           │
//! │  - Registry         (event name → ordered listener records)       │
//! │  - LingeringBuffer  (event name → recent emissions)               │
//! │  - timers           (expiry / linger removal, cancellable)        │
//! └──────────────────────────────┬────────────────────────────────────┘
//!                                ▼
//!                     dispatch (one ordered pass)
//!                   ┌────────────┼────────────┐
//!                   ▼            ▼            ▼
//!              listener1    listener2    listenerN
//!              .on_event()  .on_event()  .on_event()
//! ```
//!
//! ### Dispatch
//! ```text
//! emit(name, payload, options)
//!   ├─► snapshot listeners of `name` (reversed if options.reverse)
//!   ├─► tally = snapshot length
//!   ├─► linger > 0 ─► stash payload, schedule its removal
//!   └─► for each listener (only the first if options.stop):
//!         ├─ once  ─► remove from registry (skip if already gone)
//!         ├─ on_event(current, meta)
//!         │     ├─ Err ─► abort, return DispatchError
//!         │     └─ Ok(next) ─► is_async ? current = next : ignore
//!         └─ listener stop ─► break
//! ```
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits                         |
//! |-------------------|---------------------------------------------------------------|--------------------------------------------|
//! | **Bus**           | Independent bus instances, cheap to clone.                    | [`Bus`]                                    |
//! | **Subscribers**   | Per-entity facade with the five operations.                   | [`Subscriber`], [`Silence`]                |
//! | **Listeners**     | Async callbacks, as closures or trait objects.                | [`Listener`], [`ListenerFn`], [`ListenerRef`] |
//! | **Options**       | Per-listener and per-emission dispatch knobs.                 | [`CallbackOptions`], [`EventOptions`], [`Meta`] |
//! | **Host**          | Lifecycle hooks for the surrounding component framework.      | [`Host`], [`Attached`]                     |
//! | **Errors**        | Typed errors for listeners and dispatch.                      | [`ListenerError`], [`DispatchError`]       |
//! | **Configuration** | Operation labels and default options.                         | [`Config`], [`OperationNames`]             |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] listener _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use echobus::{Bus, Config, EventOptions, ListenerFn, ListenerRef, Meta};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bus: Bus<String> = Bus::new(Config::default());
//!
//!     // Two entities: an editor that emits and a toolbar that listens.
//!     let editor = bus.subscriber_for(Arc::new("editor"));
//!     let toolbar = bus.subscriber_for(Arc::new("toolbar"));
//!
//!     let upper: ListenerRef<String> = ListenerFn::arc("upper", |text: String, _m: Meta| async move {
//!         Ok(text.to_uppercase())
//!     });
//!     toolbar.listen("title", upper, None).await?;
//!
//!     // Pipeline mode returns whatever the last listener produced.
//!     let opts = EventOptions::default().with_async(true);
//!     let out = editor.emit("title", "draft".to_string(), Some(opts)).await?;
//!     assert_eq!(out, "DRAFT");
//!
//!     toolbar.fall_silent(echobus::Silence::All);
//!     assert_eq!(bus.listener_count("title"), 0);
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod host;
mod listeners;
mod subscribers;

// ---- Public re-exports ----

pub use core::{Bus, Config, Operation, OperationNames, RESERVED_NAMES, SubscriberId, new_id};
pub use error::{DispatchError, ListenerError};
pub use events::{CallbackOptions, EventOptions, Meta, OwnerRef};
pub use host::{Attached, AutoUnsubscribe, Host, Identifiable};
pub use listeners::{Listener, ListenerFn, ListenerRef, Payload};
pub use subscribers::{EventNames, Listeners, OneOrMany, Silence, Subscriber};

// Optional: expose a simple built-in logger listener (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use listeners::LogWriter;
