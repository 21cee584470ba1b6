//! # async_json
//!
//! A streaming JSON encoder for values whose parts arrive asynchronously.
//!
//! ## Why streaming?
//!
//! Conventional JSON encoders require the entire value up front and hand the
//! entire document back at once. `async_json` encodes a [`JsonValue`] into a
//! lazy stream of text [`Fragment`]s instead, so a document can be produced
//! while its parts are still being computed or fetched:
//!
//! - **Asynchronous sources**: arrays backed by a `Stream` of elements and
//!   objects backed by a `Stream` of entries are pulled one item at a time
//! - **Deferred values**: any position may hold a future that resolves to
//!   its value only when the encoder reaches it
//! - **Bounded nesting**: traversal runs on an explicit stack, so depth is
//!   limited by memory, not the call stack
//! - **Serde compatible**: any `T: Serialize` converts to a materialized
//!   [`JsonValue`] via [`to_value`]
//!
//! ## Quick Start
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! async_json = "0.1"
//! futures = "0.3"
//! ```
//!
//! ### Encoding a value
//!
//! ```rust
//! use async_json::{json, to_string};
//! use futures::executor::block_on;
//!
//! let value = json!({
//!     "id": 123,
//!     "name": "Alice",
//!     "active": true
//! });
//!
//! let text = block_on(to_string(value)).unwrap();
//! assert_eq!(text, "{\n \"id\": 123, \n \"name\": \"Alice\", \n \"active\": true\n}");
//! ```
//!
//! ### Encoding asynchronous sources
//!
//! ```rust
//! use async_json::{to_string_with_options, JsonOptions, JsonValue};
//! use futures::{executor::block_on, stream};
//!
//! let rows = JsonValue::stream(stream::iter(vec![
//!     JsonValue::from(1),
//!     JsonValue::from(2),
//! ]));
//!
//! let text = block_on(to_string_with_options(rows, JsonOptions::compact())).unwrap();
//! assert_eq!(text, "[1, 2]");
//! ```
//!
//! ### Consuming fragments incrementally
//!
//! ```rust
//! use async_json::{fragment_stream, json};
//! use futures::{executor::block_on, pin_mut, StreamExt};
//!
//! block_on(async {
//!     let stream = fragment_stream(json!([true, null]));
//!     pin_mut!(stream);
//!     while let Some(fragment) = stream.next().await {
//!         let fragment = fragment.unwrap();
//!         // ship each piece as it becomes available
//!         let _ = fragment.len();
//!     }
//! });
//! ```
//!
//! ## Examples
//!
//! See the `demos/` directory for runnable programs:
//!
//! - **`stream_to_stdout.rs`** - Writing fragments to stdout as they arrive
//! - **`custom_options.rs`** - Formatting controls and encoding hooks
//!
//! Run any of them with: `cargo run --example <name>`

pub mod encode;
pub mod error;
pub mod fmt;
pub mod macros;
pub mod map;
pub mod options;
pub mod ser;
pub mod value;

pub use encode::{default_key_resolver, fragment_stream, fragment_stream_with_options, Fragment};
pub use error::{Error, Result};
pub use map::JsonMap;
pub use options::{
    FallbackEncoder, FloatEncoder, IntEncoder, JsonOptions, KeyResolver, StringEncoder,
};
pub use ser::JsonValueSerializer;
pub use value::{EntryStream, JsonValue, Number, OpaqueValue, ValueFuture, ValueStream};

use futures::{pin_mut, StreamExt};
use serde::Serialize;
use std::io;

/// Encode a [`JsonValue`] to a complete string using default options.
///
/// This drives the fragment stream to exhaustion and concatenates the
/// result. Use [`fragment_stream`] directly when output should be consumed
/// incrementally.
///
/// # Examples
///
/// ```rust
/// use async_json::{json, to_string};
/// use futures::executor::block_on;
///
/// let text = block_on(to_string(json!([1, 2]))).unwrap();
/// assert_eq!(text, "[\n 1, \n 2\n]");
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be encoded (e.g., unrecognized
/// types, non-finite floats when disallowed) or if a deferred computation
/// or asynchronous source fails.
pub async fn to_string(value: JsonValue) -> Result<String> {
    to_string_with_options(value, JsonOptions::default()).await
}

/// Encode a [`JsonValue`] to a complete string with custom options.
///
/// # Examples
///
/// ```rust
/// use async_json::{json, to_string_with_options, JsonOptions};
/// use futures::executor::block_on;
///
/// let options = JsonOptions::compact().sort_keys(true);
/// let value = json!({"b": 2, "a": 1});
/// let text = block_on(to_string_with_options(value, options)).unwrap();
/// assert_eq!(text, "{\"a\": 1, \"b\": 2}");
/// ```
///
/// # Errors
///
/// Returns an error under the same conditions as [`to_string`], plus sorting
/// failures when `sort_keys` is enabled.
pub async fn to_string_with_options(value: JsonValue, options: JsonOptions) -> Result<String> {
    let stream = fragment_stream_with_options(value, options);
    pin_mut!(stream);
    let mut out = String::new();
    while let Some(fragment) = stream.next().await {
        out.push_str(&fragment?);
    }
    Ok(out)
}

/// Convert any `T: Serialize` to a materialized [`JsonValue`].
///
/// Useful for encoding ordinary Rust data, or for splicing static structures
/// into a document whose other parts are asynchronous.
///
/// # Examples
///
/// ```rust
/// use async_json::{to_value, JsonValue};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let value: JsonValue = to_value(&Point { x: 1, y: 2 }).unwrap();
/// assert!(value.is_object());
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be represented (e.g., a map with a
/// container-typed key).
pub fn to_value<T>(value: &T) -> Result<JsonValue>
where
    T: ?Sized + Serialize,
{
    value.serialize(JsonValueSerializer)
}

/// Encode a [`JsonValue`] to a writer using default options.
///
/// Fragments are written as they are produced, so output appears
/// incrementally even for partially-computed documents. On failure the
/// writer may have received a prefix of the document.
///
/// # Examples
///
/// ```rust
/// use async_json::{json, to_writer};
/// use futures::executor::block_on;
///
/// let mut buffer = Vec::new();
/// block_on(to_writer(&mut buffer, json!({"x": 1}))).unwrap();
/// ```
///
/// # Errors
///
/// Returns an error if encoding fails or writing to the writer fails.
pub async fn to_writer<W>(writer: W, value: JsonValue) -> Result<()>
where
    W: io::Write,
{
    to_writer_with_options(writer, value, JsonOptions::default()).await
}

/// Encode a [`JsonValue`] to a writer with custom options.
///
/// # Errors
///
/// Returns an error if encoding fails or writing to the writer fails.
pub async fn to_writer_with_options<W>(
    mut writer: W,
    value: JsonValue,
    options: JsonOptions,
) -> Result<()>
where
    W: io::Write,
{
    let stream = fragment_stream_with_options(value, options);
    pin_mut!(stream);
    while let Some(fragment) = stream.next().await {
        writer
            .write_all(fragment?.as_bytes())
            .map_err(|e| Error::io(&e.to_string()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn scalar_roots_encode_bare() {
        assert_eq!(block_on(to_string(JsonValue::Null)).unwrap(), "null");
        assert_eq!(block_on(to_string(json!(42))).unwrap(), "42");
        assert_eq!(block_on(to_string(json!("hi"))).unwrap(), "\"hi\"");
    }

    #[test]
    fn writer_receives_full_document() {
        let mut buffer = Vec::new();
        block_on(to_writer(&mut buffer, json!([1]))).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "[\n 1\n]");
    }

    #[test]
    fn to_value_then_encode() {
        use serde::Serialize;

        #[derive(Serialize)]
        struct Pair {
            a: u8,
            b: u8,
        }

        let value = to_value(&Pair { a: 1, b: 2 }).unwrap();
        let text = block_on(to_string_with_options(value, JsonOptions::compact())).unwrap();
        assert_eq!(text, "{\"a\": 1, \"b\": 2}");
    }
}
