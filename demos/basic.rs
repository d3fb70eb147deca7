//! # Basic Bus Example
//!
//! Shows the core dispatch knobs on a single bus:
//! - plain fan-out (payload untouched, listeners run in order)
//! - async pipeline (each listener transforms the payload)
//! - reverse order and stop-propagation
//! - once listeners and lingering emissions
//!
//! ## Run
//! ```bash
//! cargo run --example basic
//! ```

use std::{sync::Arc, time::Duration};

use echobus::{Bus, CallbackOptions, Config, EventOptions, ListenerError, ListenerFn, ListenerRef, Meta};

fn tagger(tag: &'static str) -> ListenerRef<String> {
    ListenerFn::arc(tag, move |text: String, meta: Meta| async move {
        println!(" ├─► {tag:<8} got {text:?} (tally={})", meta.listeners_tally);
        Ok(format!("{text}+{tag}"))
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let bus: Bus<String> = Bus::new(Config::default());
    let editor = bus.subscriber_for(Arc::new("editor"));
    let panel = bus.subscriber_for(Arc::new("panel"));

    panel
        .listen("save", vec![tagger("first"), tagger("second"), tagger("third")], None)
        .await?;

    println!("plain:");
    let out = editor.emit("save", "doc".to_string(), None).await?;
    println!(" └─► result {out:?}");

    println!("pipeline:");
    let out = editor
        .emit("save", "doc".to_string(), Some(EventOptions::default().with_async(true)))
        .await?;
    println!(" └─► result {out:?}");

    println!("reverse + stop:");
    let opts = EventOptions::default().with_reverse(true).with_stop(true);
    editor.emit("save", "doc".to_string(), Some(opts)).await?;

    println!("validation:");
    let guard: ListenerRef<String> = ListenerFn::arc("guard", |text: String, _m: Meta| async move {
        if text.is_empty() {
            return Err(ListenerError::rejected("empty document"));
        }
        Ok(text)
    });
    panel.listen("publish", guard, None).await?;
    if let Err(e) = editor.emit("publish", String::new(), None).await {
        println!(" └─► {e} [{}]", e.as_label());
    }

    println!("once:");
    panel
        .listen_once("close", tagger("closer"), Some(CallbackOptions::default()))
        .await?;
    editor.emit("close", "doc".to_string(), None).await?;
    editor.emit("close", "doc".to_string(), None).await?;
    println!(" └─► listeners left on 'close': {}", bus.listener_count("close"));

    println!("lingering:");
    let opts = EventOptions::default().with_linger(Duration::from_millis(200));
    editor.emit("ready", "boot".to_string(), Some(opts)).await?;
    panel.listen("ready", tagger("late"), None).await?;
    tokio::time::sleep(Duration::from_millis(300)).await;
    println!(" └─► lingering after window: {}", bus.lingering_count("ready"));

    Ok(())
}
