//! # Dispatch engine: one emission, one ordered pass over the listeners.
//!
//! ## Pass
//! ```text
//! dispatch(event, payload, options, origin)
//!   ├─► listeners = registry.snapshot(event); tally = len
//!   ├─► meta = Meta { options (copy), origin, tally }
//!   ├─► linger > 0 && !shut down ? stash(payload, meta) + schedule removal
//!   ├─► tally == 0 ? return payload
//!   ├─► order = reverse ? snapshot reversed : snapshot
//!   ├─► bound = stop ? 1 : tally
//!   └─► for listener in order (up to bound):
//!         ├─ once ? take it out of the registry first
//!         ├─ meta' = meta with the listener's own options
//!         ├─ async ? result = on_event(result, meta')
//!         │        : on_event(payload, meta')       (return value ignored)
//!         └─ listener.stop || options.stop ? break
//! ```
//!
//! ## Rules
//! - The registry lock is never held while a listener runs.
//! - Reversal applies to the snapshot only; stored order is never touched.
//! - `listeners_tally` is counted before reversal or truncation.
//! - A listener error aborts the pass and is returned to the emitter in both modes.
//! - Changes to expiry or lingering made by a listener mid-pass do not affect the
//!   pass in flight.

use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::core::bus::Inner;
use crate::core::config::Operation;
use crate::core::registry::ListenerRecord;
use crate::error::{DispatchError, ListenerError};
use crate::events::{EventOptions, Meta, OwnerRef};
use crate::listeners::Payload;

impl<P: Payload> Inner<P> {
    /// Runs one emission of `event` and returns the resulting payload.
    ///
    /// The result is the original payload unless `options.is_async` is set and at
    /// least one listener ran, in which case it is the last listener's return value.
    pub(crate) async fn dispatch(
        self: &Arc<Self>,
        event: Arc<str>,
        payload: P,
        options: EventOptions,
        origin: Option<OwnerRef>,
    ) -> Result<P, DispatchError> {
        let mut listeners = self.registry.snapshot(&event);
        let tally = listeners.len();
        let meta = Meta::new(Arc::clone(&event), options, origin, tally);

        debug!(
            op = self.config.label(Operation::Emit),
            event = %event,
            tally,
            reverse = options.reverse,
            stop = options.stop,
            pipeline = options.is_async,
            "dispatch"
        );

        if let Some(linger) = options.lingering() {
            // Without a live timer the entry could never be dropped.
            if self.is_shut_down() {
                trace!(event = %event, "bus shut down; emission not lingered");
            } else {
                let id = self.lingering.stash(&event, payload.clone(), meta.clone());
                self.schedule_linger_removal(Arc::clone(&event), id, linger);
            }
        }

        if tally == 0 {
            return Ok(payload);
        }

        if options.reverse {
            listeners.reverse();
        }
        let bound = if options.stop { 1 } else { tally };

        let mut result = payload;
        let mut invoked = 0usize;
        for record in listeners {
            if invoked == bound {
                break;
            }
            // A once listener already taken by a concurrent pass must not fire again.
            if record.options.once && !self.registry.remove_key(&event, record.key) {
                continue;
            }
            invoked += 1;

            let own = meta.for_listener(record.options);
            if options.is_async {
                result = record
                    .listener
                    .on_event(result, own)
                    .await
                    .map_err(|source| failure(&event, &record, source))?;
            } else {
                record
                    .listener
                    .on_event(result.clone(), own)
                    .await
                    .map_err(|source| failure(&event, &record, source))?;
            }

            if record.options.stop || options.stop {
                break;
            }
        }

        Ok(result)
    }
}

fn failure<P: Payload>(
    event: &Arc<str>,
    record: &ListenerRecord<P>,
    source: ListenerError,
) -> DispatchError {
    warn!(
        event = %event,
        listener = record.listener.name(),
        subscriber = %record.subscriber,
        error = %source,
        label = source.as_label(),
        "listener failed; dispatch aborted"
    );
    DispatchError::Listener {
        event: Arc::clone(event),
        listener: record.listener.name().to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use parking_lot::Mutex;

    use crate::error::{DispatchError, ListenerError};
    use crate::events::{CallbackOptions, EventOptions, Meta};
    use crate::listeners::{ListenerFn, ListenerRef};
    use crate::{Bus, Config};

    type Log = Arc<Mutex<Vec<String>>>;

    /// Records `tag:payload` and returns the payload with `tag` appended.
    fn tagger(tag: &'static str, log: &Log) -> ListenerRef<String> {
        let log = Arc::clone(log);
        ListenerFn::arc(tag, move |p: String, _m: Meta| {
            let log = Arc::clone(&log);
            async move {
                log.lock().push(format!("{tag}:{p}"));
                Ok(format!("{p}+{tag}"))
            }
        })
    }

    fn seen(log: &Log) -> Vec<String> {
        log.lock().clone()
    }

    #[tokio::test]
    async fn single_listener_gets_payload_once() {
        let bus: Bus<String> = Bus::default();
        let log = Log::default();
        bus.subscriber()
            .listen("e", tagger("a", &log), None)
            .await
            .unwrap();

        let out = bus.emit("e", "p".into(), None).await.unwrap();

        assert_eq!(seen(&log), vec!["a:p"]);
        assert_eq!(out, "p");
    }

    #[tokio::test]
    async fn no_listeners_returns_payload_unchanged() {
        let bus: Bus<String> = Bus::default();
        let opts = EventOptions::default().with_async(true);
        assert_eq!(bus.emit("nobody", "p".into(), Some(opts)).await.unwrap(), "p");
    }

    #[tokio::test]
    async fn non_async_passes_the_original_payload_to_everyone() {
        let bus: Bus<String> = Bus::default();
        let log = Log::default();
        let sub = bus.subscriber();
        sub.listen("e", vec![tagger("a", &log), tagger("b", &log), tagger("c", &log)], None)
            .await
            .unwrap();

        let out = bus.emit("e", "p".into(), None).await.unwrap();

        assert_eq!(seen(&log), vec!["a:p", "b:p", "c:p"]);
        assert_eq!(out, "p");
    }

    #[tokio::test]
    async fn async_chains_each_result_into_the_next_listener() {
        let bus: Bus<String> = Bus::default();
        let log = Log::default();
        bus.subscriber()
            .listen("e", vec![tagger("a", &log), tagger("b", &log)], None)
            .await
            .unwrap();

        let opts = EventOptions::default().with_async(true);
        let out = bus.emit("e", "p".into(), Some(opts)).await.unwrap();

        assert_eq!(seen(&log), vec!["a:p", "b:p+a"]);
        assert_eq!(out, "p+a+b");
    }

    #[tokio::test]
    async fn reverse_inverts_order_without_touching_the_registry() {
        let bus: Bus<String> = Bus::default();
        let log = Log::default();
        bus.subscriber()
            .listen("e", vec![tagger("a", &log), tagger("b", &log), tagger("c", &log)], None)
            .await
            .unwrap();

        let reversed = EventOptions::default().with_reverse(true);
        bus.emit("e", "1".into(), Some(reversed)).await.unwrap();
        bus.emit("e", "2".into(), None).await.unwrap();

        assert_eq!(
            seen(&log),
            vec!["c:1", "b:1", "a:1", "a:2", "b:2", "c:2"]
        );
    }

    #[tokio::test]
    async fn emission_stop_runs_only_the_first_in_resolved_order() {
        let bus: Bus<String> = Bus::default();
        let log = Log::default();
        bus.subscriber()
            .listen("e", vec![tagger("a", &log), tagger("b", &log), tagger("c", &log)], None)
            .await
            .unwrap();

        bus.emit("e", "1".into(), Some(EventOptions::default().with_stop(true)))
            .await
            .unwrap();
        bus.emit(
            "e",
            "2".into(),
            Some(EventOptions::default().with_stop(true).with_reverse(true)),
        )
        .await
        .unwrap();

        assert_eq!(seen(&log), vec!["a:1", "c:2"]);
    }

    #[tokio::test]
    async fn listener_stop_halts_at_any_position() {
        for stopper in 0..3 {
            let bus: Bus<String> = Bus::default();
            let log = Log::default();
            let sub = bus.subscriber();
            for (i, tag) in ["a", "b", "c"].into_iter().enumerate() {
                let opts = CallbackOptions::default().with_stop(i == stopper);
                sub.listen("e", tagger(tag, &log), Some(opts)).await.unwrap();
            }

            bus.emit("e", "p".into(), None).await.unwrap();

            assert_eq!(seen(&log).len(), stopper + 1, "stopper at {stopper}");
        }
    }

    #[tokio::test]
    async fn tally_is_counted_before_truncation() {
        let bus: Bus<String> = Bus::default();
        let tallies = Arc::new(Mutex::new(Vec::new()));
        let sub = bus.subscriber();
        for _ in 0..4 {
            let tallies = Arc::clone(&tallies);
            let l: ListenerRef<String> = ListenerFn::arc("tally", move |p: String, m: Meta| {
                let tallies = Arc::clone(&tallies);
                async move {
                    tallies.lock().push(m.listeners_tally);
                    Ok(p)
                }
            });
            sub.listen("e", l, None).await.unwrap();
        }

        let opts = EventOptions::default().with_stop(true).with_reverse(true);
        bus.emit("e", "p".into(), Some(opts)).await.unwrap();
        bus.emit("e", "p".into(), None).await.unwrap();

        assert_eq!(*tallies.lock(), vec![4, 4, 4, 4, 4]);
    }

    #[tokio::test]
    async fn each_listener_sees_its_own_options() {
        let bus: Bus<String> = Bus::default();
        let seen_opts = Arc::new(Mutex::new(Vec::new()));
        let sub = bus.subscriber();
        for expire in [0u64, 5_000] {
            let seen_opts = Arc::clone(&seen_opts);
            let l: ListenerRef<String> = ListenerFn::arc("opts", move |p: String, m: Meta| {
                let seen_opts = Arc::clone(&seen_opts);
                async move {
                    seen_opts.lock().push(m.callback_options.expire);
                    Ok(p)
                }
            });
            let opts = CallbackOptions::default().with_expire(Duration::from_millis(expire));
            sub.listen("e", l, Some(opts)).await.unwrap();
        }

        bus.emit("e", "p".into(), None).await.unwrap();

        assert_eq!(
            *seen_opts.lock(),
            vec![Duration::ZERO, Duration::from_millis(5_000)]
        );
    }

    #[tokio::test]
    async fn async_error_aborts_the_pass() {
        let bus: Bus<String> = Bus::default();
        let log = Log::default();
        let boom: ListenerRef<String> = ListenerFn::arc("boom", |_p: String, _m: Meta| async move {
            Err(ListenerError::failed("boom"))
        });
        bus.subscriber()
            .listen("e", vec![tagger("a", &log), boom, tagger("c", &log)], None)
            .await
            .unwrap();

        let opts = EventOptions::default().with_async(true);
        let err = bus.emit("e", "p".into(), Some(opts)).await.unwrap_err();

        assert_eq!(seen(&log), vec!["a:p"]);
        match err {
            DispatchError::Listener { event, listener, source } => {
                assert_eq!(&*event, "e");
                assert_eq!(listener, "boom");
                assert_eq!(source, ListenerError::failed("boom"));
            }
        }
    }

    #[tokio::test]
    async fn non_async_error_reaches_the_emitter() {
        let bus: Bus<String> = Bus::default();
        let bad: ListenerRef<String> = ListenerFn::arc("bad", |_p: String, _m: Meta| async move {
            Err(ListenerError::rejected("nope"))
        });
        bus.subscriber().listen("e", bad, None).await.unwrap();

        let err = bus.emit("e", "p".into(), None).await.unwrap_err();
        assert_eq!(err.listener_error(), &ListenerError::rejected("nope"));
    }

    #[tokio::test]
    async fn once_listener_fires_a_single_time() {
        let bus: Bus<String> = Bus::default();
        let log = Log::default();
        let sub = bus.subscriber();
        sub.listen_once("e", tagger("a", &log), None).await.unwrap();
        sub.listen("e", tagger("b", &log), None).await.unwrap();

        bus.emit("e", "1".into(), None).await.unwrap();
        bus.emit("e", "2".into(), None).await.unwrap();

        assert_eq!(seen(&log), vec!["a:1", "b:1", "b:2"]);
        assert_eq!(bus.listener_count("e"), 1);
    }

    #[tokio::test]
    async fn reentrant_emit_does_not_refire_a_once_listener() {
        let bus: Bus<String> = Bus::default();
        let hits = Arc::new(Mutex::new(0usize));
        let inner_bus = bus.clone();
        let counter = Arc::clone(&hits);
        let l: ListenerRef<String> = ListenerFn::arc("reenter", move |p: String, _m: Meta| {
            let bus = inner_bus.clone();
            let counter = Arc::clone(&counter);
            async move {
                *counter.lock() += 1;
                if p == "outer" {
                    if let Err(e) = bus.emit("e", "inner".into(), None).await {
                        return Err(ListenerError::failed(e.to_string()));
                    }
                }
                Ok(p)
            }
        });
        bus.subscriber().listen_once("e", l, None).await.unwrap();

        bus.emit("e", "outer".into(), None).await.unwrap();

        assert_eq!(*hits.lock(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn lingering_emission_reaches_late_listener_within_window() {
        let bus: Bus<String> = Bus::default();
        let log = Log::default();
        let opts = EventOptions::default().with_linger(Duration::from_millis(5_000));

        bus.emit("e", "early".into(), Some(opts)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(4_000)).await;
        bus.subscriber().listen("e", tagger("late", &log), None).await.unwrap();

        assert_eq!(seen(&log), vec!["late:early"]);
    }

    #[tokio::test(start_paused = true)]
    async fn lingering_emission_is_gone_after_window() {
        let bus: Bus<String> = Bus::default();
        let log = Log::default();
        let opts = EventOptions::default().with_linger(Duration::from_millis(5_000));

        bus.emit("e", "early".into(), Some(opts)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5_001)).await;
        bus.subscriber().listen("e", tagger("late", &log), None).await.unwrap();

        assert!(seen(&log).is_empty());
        assert_eq!(bus.lingering_count("e"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn every_late_listener_replays_the_same_backlog() {
        let bus: Bus<String> = Bus::default();
        let log = Log::default();
        let opts = EventOptions::default().with_linger(Duration::from_secs(1));

        bus.emit("e", "1".into(), Some(opts)).await.unwrap();
        bus.emit("e", "2".into(), Some(opts)).await.unwrap();
        bus.subscriber().listen("e", tagger("x", &log), None).await.unwrap();
        bus.subscriber().listen("e", tagger("y", &log), None).await.unwrap();

        assert_eq!(seen(&log), vec!["x:1", "x:2", "y:1", "y:2"]);
        assert_eq!(bus.lingering_count("e"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn replay_carries_original_meta() {
        let bus: Bus<String> = Bus::new(Config::default());
        let origins = Arc::new(Mutex::new(Vec::new()));
        let owner = bus.subscriber_for(Arc::new("header".to_string()));
        let opts = EventOptions::default().with_linger(Duration::from_secs(1));
        owner.emit("e", "p".into(), Some(opts)).await.unwrap();

        let sink = Arc::clone(&origins);
        let l: ListenerRef<String> = ListenerFn::arc("origin", move |p: String, m: Meta| {
            let sink = Arc::clone(&sink);
            async move {
                sink.lock().push((m.origin::<String>().cloned(), m.event_options.linger));
                Ok(p)
            }
        });
        bus.subscriber().listen("e", l, None).await.unwrap();

        assert_eq!(
            *origins.lock(),
            vec![(Some("header".to_string()), Duration::from_secs(1))]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn expired_listener_is_not_invoked() {
        let bus: Bus<String> = Bus::default();
        let log = Log::default();
        let opts = CallbackOptions::default().with_expire(Duration::from_millis(100));
        bus.subscriber()
            .listen("e", tagger("a", &log), Some(opts))
            .await
            .unwrap();

        bus.emit("e", "before".into(), None).await.unwrap();
        tokio::time::sleep(Duration::from_millis(150)).await;
        bus.emit("e", "after".into(), None).await.unwrap();

        assert_eq!(seen(&log), vec!["a:before"]);
        assert_eq!(bus.listener_count("e"), 0);
    }
}
