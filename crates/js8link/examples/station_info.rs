//! Query the local JS8Call station's identity and state.
//!
//! Demonstrates the basic query operations: callsign, grid, frequency,
//! speed, and the current activity tables.
//!
//! # Requirements
//!
//! - JS8Call running with its TCP API enabled
//!   (File -> Settings -> Reporting, default port 2442)
//!
//! # Usage
//!
//! ```sh
//! cargo run -p js8link --example station_info
//! ```

use js8link::Js8CallBuilder;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("Connecting to JS8Call on 127.0.0.1:2442...");
    let mut client = Js8CallBuilder::new().connect().await?;

    let callsign = client.callsign().await?;
    let grid = client.grid().await?;
    let freq = client.frequency().await?;
    let speed = client.speed().await?;

    println!("\nStation:   {} ({})", callsign, grid);
    println!("Frequency: {}", freq);
    println!("Speed:     {}", speed);

    let activity = client.call_activity().await?;
    if activity.is_empty() {
        println!("\nNo stations heard recently.");
    } else {
        println!("\n{:<12} {:>5}  {:<8} Heard", "Callsign", "SNR", "Grid");
        println!("{:-<12} {:->5}  {:-<8} {:-<13}", "", "", "", "");
        for (callsign, entry) in &activity {
            println!(
                "{:<12} {:>5}  {:<8} {}",
                callsign, entry.snr, entry.grid, entry.utc
            );
        }
    }

    client.close().await?;
    Ok(())
}
