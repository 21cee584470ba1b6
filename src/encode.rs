//! The encoding engine: value classification, key resolution and the
//! stack-driven traversal that emits output fragments.
//!
//! ## How encoding works
//!
//! Every value is first *classified*: resolved if deferred, then sorted into
//! one of four outcomes: a ready scalar fragment, an object, a sequence, or
//! an asynchronous sequence. Scalars are emitted immediately. Containers
//! open a [`Frame`] on an explicit stack; the engine then loops on the
//! innermost frame, pulling one element at a time (suspending when the
//! source is asynchronous), classifying it, and either emitting it or
//! pushing a deeper frame. A frame closes when its source is exhausted,
//! emitting the closing bracket and resuming its parent.
//!
//! The stack replaces recursion entirely, so nesting depth is bounded by
//! memory rather than the call stack, and the traversal can suspend between
//! any two steps.
//!
//! Output is a lazy stream of [`Fragment`]s. Fragments appear in exactly the
//! order a depth-first, left-to-right walk of the structure visits them;
//! awaiting never reorders siblings. Once emitted, a fragment is final.
//! Dropping the stream mid-way drops every open frame, and with it every
//! open source, innermost first.
//!
//! ## Examples
//!
//! ```rust
//! use async_json::{fragment_stream, json};
//! use futures::{executor::block_on, pin_mut, StreamExt};
//!
//! let stream = fragment_stream(json!([1, "two"]));
//! pin_mut!(stream);
//!
//! let mut fragments = Vec::new();
//! block_on(async {
//!     while let Some(fragment) = stream.next().await {
//!         fragments.push(fragment.unwrap().into_owned());
//!     }
//! });
//! assert_eq!(fragments.concat(), "[\n 1, \n \"two\"\n]");
//! ```

use crate::error::{Error, Result};
use crate::fmt;
use crate::options::JsonOptions;
use crate::value::{EntryStream, JsonValue, Number, ValueStream};
use async_stream::try_stream;
use futures::{Stream, StreamExt};
use std::borrow::Cow;
use std::cmp::Ordering;

/// One immutable piece of emitted output text.
///
/// Structural punctuation is borrowed from static storage; literals and
/// separators are owned. The concatenation of all fragments, in emission
/// order, is the complete encoded document.
pub type Fragment = Cow<'static, str>;

/// Classification outcome: either a ready literal or a live container.
enum Classified {
    Scalar(Fragment),
    Container(Container),
}

enum Container {
    Sequence(std::vec::IntoIter<JsonValue>),
    AsyncSequence(ValueStream),
    Object(EntrySource),
}

enum EntrySource {
    Materialized(std::vec::IntoIter<(JsonValue, JsonValue)>),
    Streamed(EntryStream),
}

/// One open container on the traversal stack.
struct Frame {
    source: Source,
    /// Whether this frame has emitted at least one entry. Decides both the
    /// item separator and whether closing emits a newline.
    begun: bool,
}

enum Source {
    Sequence(std::vec::IntoIter<JsonValue>),
    AsyncSequence(ValueStream),
    Entries(std::vec::IntoIter<(JsonValue, JsonValue)>),
    EntryStream(EntryStream),
}

/// One item pulled from a frame.
enum Step {
    Element(JsonValue),
    Entry(JsonValue, JsonValue),
}

impl Container {
    /// Turns a classified container into its opening fragment and a frame.
    fn open(self) -> (Fragment, Frame) {
        let (opener, source) = match self {
            Container::Sequence(iter) => (Cow::Borrowed("["), Source::Sequence(iter)),
            Container::AsyncSequence(stream) => (Cow::Borrowed("["), Source::AsyncSequence(stream)),
            Container::Object(EntrySource::Materialized(iter)) => {
                (Cow::Borrowed("{"), Source::Entries(iter))
            }
            Container::Object(EntrySource::Streamed(stream)) => {
                (Cow::Borrowed("{"), Source::EntryStream(stream))
            }
        };
        (
            opener,
            Frame {
                source,
                begun: false,
            },
        )
    }
}

impl Frame {
    /// Pulls the next item, suspending when the source is asynchronous.
    /// `None` means the source is exhausted and the frame should close.
    async fn next(&mut self) -> Option<Result<Step>> {
        match &mut self.source {
            Source::Sequence(iter) => iter.next().map(|value| Ok(Step::Element(value))),
            Source::AsyncSequence(stream) => stream
                .next()
                .await
                .map(|item| item.map(Step::Element)),
            Source::Entries(iter) => iter.next().map(|(k, v)| Ok(Step::Entry(k, v))),
            Source::EntryStream(stream) => stream
                .next()
                .await
                .map(|item| item.map(|(k, v)| Step::Entry(k, v))),
        }
    }

    fn closer(&self) -> Fragment {
        match self.source {
            Source::Sequence(_) | Source::AsyncSequence(_) => Cow::Borrowed("]"),
            Source::Entries(_) | Source::EntryStream(_) => Cow::Borrowed("}"),
        }
    }
}

/// Classifies one value, resolving deferred computations first.
///
/// Deferred values are resolved transitively: a computation that resolves to
/// another deferred computation keeps resolving until a concrete value
/// appears. The fallback encoder runs at most once per value; if its result
/// is itself unrecognized, classification fails rather than looping.
async fn classify(value: JsonValue, options: &JsonOptions) -> Result<Classified> {
    let mut value = value;
    let mut fallback_used = false;
    loop {
        value = match value {
            JsonValue::String(s) => {
                return Ok(Classified::Scalar(Cow::Owned(encode_string(&s, options))));
            }
            JsonValue::Null => return Ok(Classified::Scalar(Cow::Borrowed("null"))),
            JsonValue::Bool(true) => return Ok(Classified::Scalar(Cow::Borrowed("true"))),
            JsonValue::Bool(false) => return Ok(Classified::Scalar(Cow::Borrowed("false"))),
            JsonValue::Number(Number::Float(f)) => {
                let text = match &options.float_encoder {
                    Some(hook) => hook(f)?,
                    None => fmt::format_float(f, options.allow_non_finite)?,
                };
                return Ok(Classified::Scalar(Cow::Owned(text)));
            }
            JsonValue::Number(n) => {
                let text = match &options.int_encoder {
                    Some(hook) => hook(&n),
                    None => n.to_string(),
                };
                return Ok(Classified::Scalar(Cow::Owned(text)));
            }
            JsonValue::Array(items) => {
                return Ok(Classified::Container(Container::Sequence(
                    items.into_iter(),
                )));
            }
            JsonValue::Object(mut entries) => {
                if options.sort_keys {
                    sort_entries(&mut entries)?;
                }
                return Ok(Classified::Container(Container::Object(
                    EntrySource::Materialized(entries.into_iter()),
                )));
            }
            JsonValue::Stream(stream) => {
                return Ok(Classified::Container(Container::AsyncSequence(stream)));
            }
            JsonValue::Entries(stream) => {
                if options.sort_keys {
                    return Err(Error::SortRequiresMaterialized);
                }
                return Ok(Classified::Container(Container::Object(
                    EntrySource::Streamed(stream),
                )));
            }
            JsonValue::Deferred(future) => future.await?,
            JsonValue::Opaque(opaque) => {
                if fallback_used {
                    return Err(Error::UnencodableType(opaque.type_name().to_string()));
                }
                match &options.fallback_encoder {
                    Some(hook) => {
                        fallback_used = true;
                        hook(&opaque)?
                    }
                    None => {
                        return Err(Error::UnencodableType(opaque.type_name().to_string()));
                    }
                }
            }
        };
    }
}

fn encode_string(s: &str, options: &JsonOptions) -> String {
    match &options.string_encoder {
        Some(hook) => hook(s),
        None if options.ensure_ascii => fmt::escape_str_ascii(s),
        None => fmt::escape_str(s),
    }
}

/// The default key resolver: concatenates the textual rendering of every
/// element of a collection-valued key, in iteration order, suspending per
/// element when the source is asynchronous.
///
/// Text elements contribute their raw content; numbers, booleans and null
/// contribute their literal rendering. Any other element fails with
/// [`Error::KeyNotEncodable`], as does a key that is not a collection.
///
/// The caller escapes the result as a string scalar; this function returns
/// the unescaped concatenation.
pub async fn default_key_resolver(key: JsonValue) -> Result<String> {
    let mut out = String::new();
    match key {
        JsonValue::Array(items) => {
            for item in items {
                push_key_part(&mut out, item)?;
            }
        }
        JsonValue::Stream(mut stream) => {
            while let Some(item) = stream.next().await {
                push_key_part(&mut out, item?)?;
            }
        }
        other => return Err(Error::KeyNotEncodable(other.type_name().to_string())),
    }
    Ok(out)
}

fn push_key_part(out: &mut String, part: JsonValue) -> Result<()> {
    match part {
        JsonValue::String(s) => out.push_str(&s),
        JsonValue::Number(n) => out.push_str(&n.to_string()),
        JsonValue::Bool(true) => out.push_str("true"),
        JsonValue::Bool(false) => out.push_str("false"),
        JsonValue::Null => out.push_str("null"),
        other => return Err(Error::KeyNotEncodable(other.type_name().to_string())),
    }
    Ok(())
}

async fn resolve_collection_key(key: JsonValue, options: &JsonOptions) -> Result<String> {
    match &options.key_resolver {
        Some(hook) => hook(key).await,
        None => default_key_resolver(key).await,
    }
}

/// Renders an object key to its output fragment. Scalar keys emit their
/// literal rendering directly; collection keys go through the key resolver
/// and are then escaped like a string scalar. Object-shaped keys fail.
async fn render_key(key: JsonValue, options: &JsonOptions) -> Result<Fragment> {
    match classify(key, options).await? {
        Classified::Scalar(text) => Ok(text),
        Classified::Container(Container::Sequence(iter)) => {
            let raw = resolve_collection_key(JsonValue::Array(iter.collect()), options).await?;
            Ok(Cow::Owned(encode_string(&raw, options)))
        }
        Classified::Container(Container::AsyncSequence(stream)) => {
            let raw = resolve_collection_key(JsonValue::Stream(stream), options).await?;
            Ok(Cow::Owned(encode_string(&raw, options)))
        }
        Classified::Container(Container::Object(_)) => {
            Err(Error::KeyNotEncodable("object".to_string()))
        }
    }
}

/// Sorts object entries by raw key value. Keys must be mutually ordered.
fn sort_entries(entries: &mut [(JsonValue, JsonValue)]) -> Result<()> {
    let mut failure = None;
    entries.sort_by(|a, b| match compare_keys(&a.0, &b.0) {
        Ok(ordering) => ordering,
        Err(error) => {
            failure.get_or_insert(error);
            Ordering::Equal
        }
    });
    match failure {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

fn compare_keys(a: &JsonValue, b: &JsonValue) -> Result<Ordering> {
    match (a, b) {
        (JsonValue::String(x), JsonValue::String(y)) => Ok(x.cmp(y)),
        (JsonValue::Bool(x), JsonValue::Bool(y)) => Ok(x.cmp(y)),
        (JsonValue::Null, JsonValue::Null) => Ok(Ordering::Equal),
        (JsonValue::Number(x), JsonValue::Number(y)) => compare_numbers(x, y),
        _ => Err(Error::KeysNotComparable(
            a.type_name().to_string(),
            b.type_name().to_string(),
        )),
    }
}

fn compare_numbers(a: &Number, b: &Number) -> Result<Ordering> {
    let ordering = match (a, b) {
        (Number::Int(x), Number::Int(y)) => Some(x.cmp(y)),
        (Number::BigInt(x), Number::BigInt(y)) => Some(x.cmp(y)),
        (Number::Int(x), Number::BigInt(y)) => Some(num_bigint::BigInt::from(*x).cmp(y)),
        (Number::BigInt(x), Number::Int(y)) => Some(x.cmp(&num_bigint::BigInt::from(*y))),
        (x, y) => approximate(x).partial_cmp(&approximate(y)),
    };
    // A NaN key has no place in a sorted order.
    ordering.ok_or_else(|| Error::KeysNotComparable("number".to_string(), "number".to_string()))
}

fn approximate(n: &Number) -> f64 {
    match n {
        Number::Int(i) => *i as f64,
        Number::Float(f) => *f,
        // Decimal parsing of a BigInt cannot fail; magnitudes beyond f64
        // range saturate to infinity, which still orders correctly.
        Number::BigInt(b) => b.to_string().parse().unwrap_or(f64::INFINITY),
    }
}

fn pretty_break(unit: &str, depth: usize) -> Fragment {
    let mut text = String::with_capacity(1 + unit.len() * depth);
    text.push('\n');
    for _ in 0..depth {
        text.push_str(unit);
    }
    Cow::Owned(text)
}

/// Encodes a value into a lazy stream of fragments using default options.
///
/// See [`fragment_stream_with_options`].
pub fn fragment_stream(value: JsonValue) -> impl Stream<Item = Result<Fragment>> + Send {
    fragment_stream_with_options(value, JsonOptions::default())
}

/// Encodes a value into a lazy stream of output fragments.
///
/// The stream suspends only while resolving a deferred value or pulling the
/// next element from an asynchronous source; everything else is synchronous.
/// An `Err` item ends the stream; nothing more is emitted after a failure,
/// and fragments already emitted are not retracted.
///
/// Dropping the stream before exhaustion releases every open source.
pub fn fragment_stream_with_options(
    value: JsonValue,
    options: JsonOptions,
) -> impl Stream<Item = Result<Fragment>> + Send {
    try_stream! {
        match classify(value, &options).await? {
            Classified::Scalar(text) => {
                yield text;
            }
            Classified::Container(container) => {
                let indent_unit = " ".repeat(options.indent);
                let mut stack: Vec<Frame> = Vec::new();

                let (opener, mut frame) = container.open();
                yield opener;

                loop {
                    match frame.next().await {
                        None => {
                            if options.pretty && frame.begun {
                                yield pretty_break(&indent_unit, stack.len());
                            }
                            yield frame.closer();
                            match stack.pop() {
                                Some(parent) => frame = parent,
                                None => break,
                            }
                        }
                        Some(step) => {
                            let step = step?;
                            if frame.begun {
                                yield Cow::Owned(options.item_separator.clone());
                            }
                            if options.pretty {
                                yield pretty_break(&indent_unit, stack.len() + 1);
                            }
                            frame.begun = true;

                            let value = match step {
                                Step::Element(value) => value,
                                Step::Entry(key, value) => {
                                    yield render_key(key, &options).await?;
                                    yield Cow::Owned(options.key_separator.clone());
                                    value
                                }
                            };

                            match classify(value, &options).await? {
                                Classified::Scalar(text) => yield text,
                                Classified::Container(container) => {
                                    let (opener, child) = container.open();
                                    yield opener;
                                    stack.push(std::mem::replace(&mut frame, child));
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn string_keys_sort_lexicographically() {
        let mut entries = vec![
            (JsonValue::from("m"), JsonValue::Null),
            (JsonValue::from("a"), JsonValue::Null),
            (JsonValue::from("z"), JsonValue::Null),
        ];
        sort_entries(&mut entries).unwrap();
        let keys: Vec<_> = entries.iter().map(|(k, _)| k.as_str().unwrap()).collect();
        assert_eq!(keys, vec!["a", "m", "z"]);
    }

    #[test]
    fn numeric_keys_sort_numerically_across_representations() {
        use num_bigint::BigInt;
        let mut entries = vec![
            (JsonValue::from(2.5f64), JsonValue::Null),
            (JsonValue::from(BigInt::from(10)), JsonValue::Null),
            (JsonValue::from(1), JsonValue::Null),
        ];
        sort_entries(&mut entries).unwrap();
        let first = &entries[0].0;
        assert_eq!(first.as_i64(), Some(1));
        assert_eq!(entries[2].0.as_i64(), Some(10));
    }

    #[test]
    fn mixed_type_keys_refuse_to_sort() {
        let mut entries = vec![
            (JsonValue::from("a"), JsonValue::Null),
            (JsonValue::from(1), JsonValue::Null),
        ];
        let error = sort_entries(&mut entries).unwrap_err();
        assert!(matches!(error, Error::KeysNotComparable(_, _)));
    }

    #[test]
    fn nan_keys_refuse_to_sort() {
        let mut entries = vec![
            (JsonValue::from(f64::NAN), JsonValue::Null),
            (JsonValue::from(1.0), JsonValue::Null),
        ];
        assert!(sort_entries(&mut entries).is_err());
    }

    #[test]
    fn key_joins_mixed_scalars() {
        let key = JsonValue::Array(vec![
            JsonValue::from("user-"),
            JsonValue::from(42),
            JsonValue::from(true),
        ]);
        let joined = block_on(default_key_resolver(key)).unwrap();
        assert_eq!(joined, "user-42true");
    }

    #[test]
    fn nested_container_in_key_is_rejected() {
        let key = JsonValue::Array(vec![JsonValue::Array(vec![])]);
        let error = block_on(default_key_resolver(key)).unwrap_err();
        assert!(matches!(error, Error::KeyNotEncodable(_)));
    }
}
