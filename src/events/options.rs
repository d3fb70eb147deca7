//! # Per-listener and per-emission options.
//!
//! [`CallbackOptions`] travel with a listener record; [`EventOptions`] travel with
//! one emission. Both are plain `Copy` values, so every dispatch pass and every
//! listener works on its own copy and can never mutate the caller's options.
//!
//! ## Sentinel values
//! - `expire = 0s` → the listener never expires
//! - `linger = 0s` → the emission is not buffered for late subscribers

use std::time::Duration;

/// Options attached to a single listener registration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CallbackOptions {
    /// Halt the dispatch pass after this listener has run.
    pub stop: bool,
    /// Remove the listener once this duration has elapsed since registration.
    pub expire: Duration,
    /// Remove the listener after its first invocation.
    pub once: bool,
}

impl CallbackOptions {
    /// Sets the listener-level stop flag.
    #[inline]
    pub fn with_stop(mut self, stop: bool) -> Self {
        self.stop = stop;
        self
    }

    /// Sets the expiry duration (`Duration::ZERO` disables expiry).
    #[inline]
    pub fn with_expire(mut self, expire: Duration) -> Self {
        self.expire = expire;
        self
    }

    /// Sets the once flag.
    #[inline]
    pub fn with_once(mut self, once: bool) -> Self {
        self.once = once;
        self
    }

    /// Returns the expiry as an `Option`.
    ///
    /// - `None` → never expires
    /// - `Some(d)` → removed `d` after registration
    #[inline]
    pub fn expiry(&self) -> Option<Duration> {
        if self.expire == Duration::ZERO {
            None
        } else {
            Some(self.expire)
        }
    }
}

/// Options attached to a single emission.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EventOptions {
    /// Invoke listeners in reverse registration order (this emission only).
    pub reverse: bool,
    /// Invoke only the first listener in the resolved order.
    pub stop: bool,
    /// Keep the emission around this long for listeners registering later.
    pub linger: Duration,
    /// Chain the payload through listeners, feeding each return value to the next.
    pub is_async: bool,
}

impl EventOptions {
    /// Sets the reverse flag.
    #[inline]
    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    /// Sets the emission-level stop flag.
    #[inline]
    pub fn with_stop(mut self, stop: bool) -> Self {
        self.stop = stop;
        self
    }

    /// Sets the linger duration (`Duration::ZERO` disables lingering).
    #[inline]
    pub fn with_linger(mut self, linger: Duration) -> Self {
        self.linger = linger;
        self
    }

    /// Sets the async pipeline flag.
    #[inline]
    pub fn with_async(mut self, is_async: bool) -> Self {
        self.is_async = is_async;
        self
    }

    /// Returns the linger duration as an `Option`.
    #[inline]
    pub fn lingering(&self) -> Option<Duration> {
        if self.linger == Duration::ZERO {
            None
        } else {
            Some(self.linger)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_disable_everything() {
        let cb = CallbackOptions::default();
        assert!(!cb.stop && !cb.once);
        assert_eq!(cb.expiry(), None);

        let ev = EventOptions::default();
        assert!(!ev.reverse && !ev.stop && !ev.is_async);
        assert_eq!(ev.lingering(), None);
    }

    #[test]
    fn builders_set_sentinels() {
        let cb = CallbackOptions::default().with_expire(Duration::from_millis(100));
        assert_eq!(cb.expiry(), Some(Duration::from_millis(100)));

        let ev = EventOptions::default().with_linger(Duration::from_secs(5));
        assert_eq!(ev.lingering(), Some(Duration::from_secs(5)));
    }
}
