//! # Function-backed listener (`ListenerFn`)
//!
//! [`ListenerFn`] wraps a closure `F: Fn(P, Meta) -> Fut`, producing a fresh future
//! per invocation. Shared state goes into an `Arc<...>` captured by the closure.
//!
//! ## Example
//! ```rust
//! use echobus::{Listener, ListenerFn, ListenerRef, Meta};
//!
//! let l: ListenerRef<u32> = ListenerFn::arc("double", |n: u32, _meta: Meta| async move {
//!     Ok(n * 2)
//! });
//!
//! assert_eq!(l.name(), "double");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ListenerError;
use crate::events::Meta;
use crate::listeners::listener::{Listener, Payload};

/// Function-backed listener implementation.
#[derive(Debug)]
pub struct ListenerFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> ListenerFn<F> {
    /// Creates a new function-backed listener.
    ///
    /// Prefer [`ListenerFn::arc`] when you immediately need a [`ListenerRef`](crate::ListenerRef).
    pub fn new<P, Fut>(name: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        P: Payload,
        F: Fn(P, Meta) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<P, ListenerError>> + Send + 'static,
    {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the listener and returns it as a shared handle.
    pub fn arc<P, Fut>(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self>
    where
        P: Payload,
        F: Fn(P, Meta) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<P, ListenerError>> + Send + 'static,
    {
        Arc::new(Self::new::<P, Fut>(name, f))
    }
}

#[async_trait]
impl<P, F, Fut> Listener<P> for ListenerFn<F>
where
    P: Payload,
    F: Fn(P, Meta) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<P, ListenerError>> + Send + 'static,
{
    async fn on_event(&self, payload: P, meta: Meta) -> Result<P, ListenerError> {
        (self.f)(payload, meta).await
    }

    fn name(&self) -> &str {
        &self.name
    }
}
