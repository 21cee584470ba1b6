//! Writing output fragments to stdout as their source values arrive.
//!
//! Run with: cargo run --example stream_to_stdout

use async_json::{fragment_stream, json, JsonValue};
use futures::{pin_mut, StreamExt};
use std::error::Error;
use std::io::Write;
use std::time::Duration;

/// Simulates rows arriving from a slow backend, one every 200ms.
fn slow_rows() -> JsonValue {
    JsonValue::stream(async_stream::stream! {
        for id in 1..=5 {
            tokio::time::sleep(Duration::from_millis(200)).await;
            yield json!({
                "id": id,
                "status": "ready"
            });
        }
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let document = json!({
        "generated": JsonValue::deferred(async { json!("on demand") }),
        "rows": slow_rows()
    });

    let stream = fragment_stream(document);
    pin_mut!(stream);

    let mut stdout = std::io::stdout();
    while let Some(fragment) = stream.next().await {
        // Each piece is printed the moment it exists; watch the rows
        // appear one at a time.
        stdout.write_all(fragment?.as_bytes())?;
        stdout.flush()?;
    }
    println!();

    Ok(())
}
