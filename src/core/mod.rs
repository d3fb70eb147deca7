//! Bus core: registry, lingering buffer, dispatch and configuration.
//!
//! The public API from this module is [`Bus`], [`Config`] and the identity and
//! label types. Internal modules:
//! - `registry`: event name to ordered listener records;
//! - `lingering`: recent emissions replayed to late listeners;
//! - `dispatch`: one ordered pass over the listeners of an emission;
//! - `bus`: owns the above plus expiry/linger timers;
//! - `identity`: short random identifiers;
//! - `config`: operation labels and default options.

mod bus;
mod config;
mod dispatch;
mod identity;
mod lingering;
mod registry;

pub(crate) use bus::Inner;
pub use bus::Bus;
pub use config::{Config, Operation, OperationNames, RESERVED_NAMES};
pub use identity::{SubscriberId, new_id};
