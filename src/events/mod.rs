//! Emission data model: options and metadata.
//!
//! ## Contents
//! - [`CallbackOptions`] per-listener flags (`stop`, `expire`, `once`)
//! - [`EventOptions`] per-emission flags (`reverse`, `stop`, `linger`, `is_async`)
//! - [`Meta`] snapshot handed to every listener invocation

mod meta;
mod options;

pub use meta::{Meta, OwnerRef};
pub use options::{CallbackOptions, EventOptions};
