//! Customizing JSON output with JsonOptions.
//!
//! Run with: cargo run --example custom_options

use async_json::{json, to_string, to_string_with_options, Error, JsonOptions, JsonValue};
use std::time::Duration;

fn sample() -> JsonValue {
    json!({
        "name": "MyApp",
        "version": "1.0.0",
        "debug": true,
        "limits": [10, 20.5, null]
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Default format (pretty, 1-space indent)
    println!("Default (pretty):");
    println!("{}\n", to_string(sample()).await?);

    // Compact single-line output
    println!("Compact:");
    let compact = to_string_with_options(sample(), JsonOptions::compact()).await?;
    println!("{}\n", compact);

    // Wider indentation and terse separators
    println!("Indent 4, terse separators:");
    let wide = JsonOptions::new().with_indent(4).with_separators(",", ": ");
    println!("{}\n", to_string_with_options(sample(), wide).await?);

    // Sorted keys
    println!("Sorted keys:");
    let sorted = JsonOptions::compact().sort_keys(true);
    println!("{}\n", to_string_with_options(sample(), sorted).await?);

    // Raw unicode instead of \u escapes
    println!("ensure_ascii off:");
    let unicode = JsonOptions::compact().ensure_ascii(false);
    let text = to_string_with_options(json!(["caf\u{e9} 😀"]), unicode).await?;
    println!("{}\n", text);

    // A fallback encoder teaches the encoder about foreign types
    println!("Fallback encoder for Duration:");
    let options = JsonOptions::compact().with_fallback_encoder(|opaque| {
        match opaque.downcast_ref::<Duration>() {
            Some(d) => Ok(JsonValue::from(d.as_secs_f64())),
            None => Err(Error::UnencodableType(opaque.type_name().to_string())),
        }
    });
    let value = json!({ "timeout": JsonValue::opaque(Duration::from_millis(2500)) });
    println!("{}", to_string_with_options(value, options).await?);

    Ok(())
}
