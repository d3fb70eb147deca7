//! # Bus configuration.
//!
//! Provides [`Config`], the settings a [`Bus`](crate::Bus) is built with:
//! 1. **Operation labels** ([`OperationNames`]): the names the five subscriber
//!    operations are exposed under by a host integration, also used as the `op`
//!    field in logs.
//! 2. **Default options**: the [`CallbackOptions`] / [`EventOptions`] used when a
//!    call passes `None`.
//! 3. **Auto-unsubscribe default**: whether entities fall silent on destroy unless
//!    they say otherwise.
//!
//! ## Label validation
//! A custom label is rejected (warning logged, default kept) when it is empty,
//! collides with [`RESERVED_NAMES`], or is already used by another operation.

use std::fmt;

use crate::events::{CallbackOptions, EventOptions};

/// Host-framework property names a custom label must never shadow.
pub const RESERVED_NAMES: &[&str] = &[
    "$data",
    "$props",
    "$el",
    "$options",
    "$parent",
    "$root",
    "$children",
    "$slots",
    "$scopedSlots",
    "$refs",
    "$isServer",
    "$attrs",
    "$listeners",
    "$watch",
    "$set",
    "$delete",
    "$on",
    "$once",
    "$off",
    "$emit",
    "$mount",
    "$forceUpdate",
    "$nextTick",
    "$destroy",
];

/// The five operations a subscriber exposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Register listeners.
    Listen,
    /// Register listeners that fire at most once.
    ListenOnce,
    /// Emit an event.
    Emit,
    /// Remove every listener of an event name.
    Erase,
    /// Unsubscribe the calling entity.
    FallSilent,
}

impl Operation {
    /// All operations, in declaration order.
    pub const ALL: [Operation; 5] = [
        Operation::Listen,
        Operation::ListenOnce,
        Operation::Emit,
        Operation::Erase,
        Operation::FallSilent,
    ];

    /// Built-in label of this operation.
    pub fn default_label(&self) -> &'static str {
        match self {
            Operation::Listen => "$listen",
            Operation::ListenOnce => "$listenOnce",
            Operation::Emit => "$emitEvent",
            Operation::Erase => "$eraseEvent",
            Operation::FallSilent => "$fallSilent",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.default_label())
    }
}

/// Labels under which the operations are exposed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperationNames {
    labels: [String; 5],
}

impl Default for OperationNames {
    fn default() -> Self {
        Self {
            labels: Operation::ALL.map(|op| op.default_label().to_string()),
        }
    }
}

impl OperationNames {
    /// Returns the label of `op`.
    #[inline]
    pub fn label(&self, op: Operation) -> &str {
        &self.labels[op.index()]
    }

    /// Resolves a label back to its operation.
    pub fn operation(&self, label: &str) -> Option<Operation> {
        Operation::ALL
            .into_iter()
            .find(|op| self.label(*op) == label)
    }

    /// Renames `op`, keeping its current label if `label` is unusable.
    ///
    /// Unusable means empty, reserved, or taken by another operation; a warning is
    /// logged in each case. Labels stay pairwise distinct.
    pub fn with_label(mut self, op: Operation, label: impl Into<String>) -> Self {
        let label = label.into();
        let rejected = if label.is_empty() {
            Some("empty")
        } else if RESERVED_NAMES.contains(&label.as_str()) {
            Some("reserved")
        } else if self.operation(&label).is_some_and(|other| other != op) {
            Some("duplicate")
        } else {
            None
        };

        match rejected {
            Some(reason) => {
                tracing::warn!(
                    op = op.default_label(),
                    requested = %label,
                    reason,
                    current = %self.labels[op.index()],
                    "custom operation name rejected; keeping current label"
                );
            }
            None => self.labels[op.index()] = label,
        }
        self
    }
}

/// Bus configuration.
///
/// ## Field semantics
/// - `names`: labels of the five operations (see [`OperationNames`])
/// - `callback_defaults`: options for `listen` calls passing `None`
/// - `event_defaults`: options for `emit` calls passing `None`
/// - `auto_unsubscribe`: default for entities created through the host adapter
#[derive(Clone, Debug)]
pub struct Config {
    /// Operation labels.
    pub names: OperationNames,
    /// Default listener options.
    pub callback_defaults: CallbackOptions,
    /// Default emission options.
    pub event_defaults: EventOptions,
    /// Whether entities fall silent on destroy by default.
    pub auto_unsubscribe: bool,
}

impl Config {
    /// Label of `op` (shorthand for `self.names.label(op)`).
    #[inline]
    pub fn label(&self, op: Operation) -> &str {
        self.names.label(op)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - built-in labels (`$listen`, `$listenOnce`, `$emitEvent`, `$eraseEvent`, `$fallSilent`)
    /// - all options off (no stop, no expiry, no linger, not async)
    /// - `auto_unsubscribe = true`
    fn default() -> Self {
        Self {
            names: OperationNames::default(),
            callback_defaults: CallbackOptions::default(),
            event_defaults: EventOptions::default(),
            auto_unsubscribe: true,
        }
    }
}
