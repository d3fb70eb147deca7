//! # Single-or-batch arguments.
//!
//! `listen`, `erase` and `fall_silent` accept either one event name / listener or
//! a batch of them. [`OneOrMany`] makes that explicit instead of inspecting
//! values at runtime; `From` impls keep call sites short:
//!
//! ```rust
//! use echobus::EventNames;
//!
//! let one: EventNames = "saved".into();
//! let many: EventNames = ["saved", "deleted"].into();
//! assert_eq!(one.len(), 1);
//! assert_eq!(many.len(), 2);
//! ```

use std::sync::Arc;

use crate::listeners::{ListenerRef, Payload};

/// Either one value or a batch of values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OneOrMany<T> {
    /// A single value.
    One(T),
    /// A batch, processed in order.
    Many(Vec<T>),
}

/// One or more event names.
pub type EventNames = OneOrMany<String>;

/// One or more listeners.
pub type Listeners<P> = OneOrMany<ListenerRef<P>>;

impl<T> OneOrMany<T> {
    /// Number of values.
    pub fn len(&self) -> usize {
        match self {
            OneOrMany::One(_) => 1,
            OneOrMany::Many(v) => v.len(),
        }
    }

    /// True for an empty batch.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flattens into a vector.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(v) => vec![v],
            OneOrMany::Many(v) => v,
        }
    }
}

impl<T> IntoIterator for OneOrMany<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}

impl From<&str> for EventNames {
    fn from(value: &str) -> Self {
        OneOrMany::One(value.to_string())
    }
}

impl From<String> for EventNames {
    fn from(value: String) -> Self {
        OneOrMany::One(value)
    }
}

impl From<&String> for EventNames {
    fn from(value: &String) -> Self {
        OneOrMany::One(value.clone())
    }
}

impl From<Vec<String>> for EventNames {
    fn from(value: Vec<String>) -> Self {
        OneOrMany::Many(value)
    }
}

impl From<Vec<&str>> for EventNames {
    fn from(value: Vec<&str>) -> Self {
        OneOrMany::Many(value.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for EventNames {
    fn from(value: &[&str]) -> Self {
        OneOrMany::Many(value.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for EventNames {
    fn from(value: [&str; N]) -> Self {
        OneOrMany::Many(value.iter().map(|s| s.to_string()).collect())
    }
}

impl<P: Payload> From<ListenerRef<P>> for Listeners<P> {
    fn from(value: ListenerRef<P>) -> Self {
        OneOrMany::One(value)
    }
}

impl<P: Payload> From<&ListenerRef<P>> for Listeners<P> {
    fn from(value: &ListenerRef<P>) -> Self {
        OneOrMany::One(Arc::clone(value))
    }
}

impl<P: Payload> From<Vec<ListenerRef<P>>> for Listeners<P> {
    fn from(value: Vec<ListenerRef<P>>) -> Self {
        OneOrMany::Many(value)
    }
}

impl<P: Payload> From<&[ListenerRef<P>]> for Listeners<P> {
    fn from(value: &[ListenerRef<P>]) -> Self {
        OneOrMany::Many(value.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_convert_from_common_shapes() {
        assert_eq!(EventNames::from("a"), OneOrMany::One("a".to_string()));
        assert_eq!(
            EventNames::from(vec!["a", "b"]).into_vec(),
            vec!["a".to_string(), "b".to_string()]
        );
        assert_eq!(EventNames::from(["a", "b", "c"]).len(), 3);
        assert!(EventNames::from(Vec::<String>::new()).is_empty());
    }

    #[test]
    fn iteration_preserves_order() {
        let names: Vec<String> = EventNames::from(["x", "y"]).into_iter().collect();
        assert_eq!(names, vec!["x", "y"]);
    }
}
