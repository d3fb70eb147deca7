//! # LogWriter — pass-through payload logger
//!
//! A minimal listener that logs every payload it receives through `tracing` and
//! hands it back unchanged, so it can sit anywhere in an async pipeline.
//!
//! ## Example output
//! ```text
//! INFO echobus::listeners::log: event="saved" tally=3 reverse=false pipeline=true payload=Doc { id: 7 }
//! ```

use std::fmt::Debug;

use async_trait::async_trait;

use crate::error::ListenerError;
use crate::events::Meta;
use crate::listeners::listener::{Listener, Payload};

/// Payload logger listener.
#[derive(Default, Debug)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl<P: Payload + Debug> Listener<P> for LogWriter {
    async fn on_event(&self, payload: P, meta: Meta) -> Result<P, ListenerError> {
        tracing::info!(
            event = %meta.event_name,
            tally = meta.listeners_tally,
            reverse = meta.event_options.reverse,
            pipeline = meta.event_options.is_async,
            payload = ?payload,
        );
        Ok(payload)
    }

    fn name(&self) -> &str {
        "LogWriter"
    }
}
