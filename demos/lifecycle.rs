//! # Lifecycle Example
//!
//! Wires the bus into a toy component tree through [`echobus::Host`]:
//! - components are created through the creation hook and get fresh identities
//! - the built-in [`echobus::LogWriter`] traces every payload
//! - dropping an attached component makes it fall silent automatically
//!
//! ## Run
//! ```bash
//! RUST_LOG=debug cargo run --example lifecycle --features logging
//! ```

use std::sync::Arc;

use echobus::{Bus, Host, ListenerRef, LogWriter, Silence};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug)]
enum Ui {
    Click { x: i32, y: i32 },
    Resize(u32, u32),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let host: Host<Ui> = Host::new(Bus::default());
    let log: ListenerRef<Ui> = Arc::new(LogWriter::new());

    let window = host.attach(Arc::new("window"));
    {
        let button = host.attach(Arc::new("button"));
        button.listen(["click", "resize"], Arc::clone(&log), None).await?;
        window.listen("resize", Arc::clone(&log), None).await?;

        window.emit("click", Ui::Click { x: 3, y: 4 }, None).await?;
        window.emit("resize", Ui::Resize(800, 600), None).await?;
        println!("events with listeners: {:?}", host.bus().event_names());
    }
    // button dropped: its listeners are gone, the window's stay.
    println!("after button drop: {:?}", host.bus().event_names());

    window.fall_silent(Silence::events("resize"));
    println!("after window silence: {:?}", host.bus().event_names());
    Ok(())
}
