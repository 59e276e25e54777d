//! Watch for spots and directed messages.
//!
//! Demonstrates notification handlers. The client has no background
//! reader -- notifications are observed while a request is waiting for
//! its reply -- so this example polls with a cheap query to give the
//! dispatcher a steady stream of read opportunities.
//!
//! # Usage
//!
//! ```sh
//! cargo run -p js8link --example watch_spots
//! ```

use std::time::Duration;

use js8link::{Js8CallBuilder, NotificationKind};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut client = Js8CallBuilder::new().connect().await?;
    println!("Connected. Watching for 60 seconds...\n");

    client.on_notification(NotificationKind::Spot, |envelope| {
        println!(
            "SPOT     {:<12} {:>10} Hz  SNR {}",
            envelope.param_str("CALL"),
            envelope.param_u64("FREQ"),
            envelope.param_i64("SNR"),
        );
    });

    client.on_notification(NotificationKind::Directed, |envelope| {
        println!(
            "DIRECTED {} -> {}: {}",
            envelope.param_str("FROM"),
            envelope.param_str("TO"),
            envelope.param_str("TEXT"),
        );
    });

    let deadline = tokio::time::Instant::now() + Duration::from_secs(60);
    while tokio::time::Instant::now() < deadline {
        // Each poll reads the stream; pending notifications are
        // dispatched before the reply is returned.
        let _ = client.station_status().await?;

        if client.is_closed() {
            println!("JS8Call is shutting down.");
            break;
        }
        tokio::time::sleep(Duration::from_secs(2)).await;
    }

    client.close().await?;
    Ok(())
}
