//! Dynamic value representation for encodable JSON data.
//!
//! This module provides the [`JsonValue`] enum, which represents any value
//! the encoder accepts, including values whose parts do not exist yet.
//! Beyond the usual JSON shapes it can hold:
//!
//! - A **deferred** leaf ([`JsonValue::deferred`]): a computation whose
//!   result is awaited once, then encoded in place
//! - An **asynchronous sequence** ([`JsonValue::stream`]): an array whose
//!   elements become available incrementally
//! - **Asynchronous entries** ([`JsonValue::entries`]): an object whose
//!   key/value pairs arrive incrementally
//! - An **opaque** value ([`JsonValue::opaque`]): an arbitrary Rust value
//!   routed to the configured fallback encoder
//!
//! Objects are ordered lists of `(key, value)` pairs. Keys are themselves
//! values: text keys encode directly, and collection keys are reduced to a
//! single string by the key resolver. Duplicate keys are passed through as
//! given; no deduplication is performed.
//!
//! ## Creating Values
//!
//! ```rust
//! use async_json::{json, JsonValue, Number};
//!
//! let null = JsonValue::Null;
//! let number = JsonValue::from(42);
//! let text = JsonValue::from("hello");
//!
//! let obj = json!({
//!     "name": "Alice",
//!     "age": 30
//! });
//! assert!(obj.is_object());
//!
//! let lazy = JsonValue::deferred(async { JsonValue::from(1) });
//! assert_eq!(lazy.type_name(), "deferred");
//! ```

use crate::error::Result;
use crate::map::JsonMap;
use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use futures::stream::BoxStream;
use futures::{Future, FutureExt, Stream, StreamExt};
use num_bigint::BigInt;
use std::any::Any;
use std::fmt;

/// An asynchronous source of array elements.
pub type ValueStream = BoxStream<'static, Result<JsonValue>>;

/// An asynchronous source of object entries.
pub type EntryStream = BoxStream<'static, Result<(JsonValue, JsonValue)>>;

/// A pending computation that resolves to a value.
pub type ValueFuture = BoxFuture<'static, Result<JsonValue>>;

/// A dynamically-typed representation of any encodable value.
///
/// The materialized variants (`Null` through `Object`) behave much like any
/// JSON value type. The remaining variants carry live sources (boxed
/// futures and streams) and are consumed exactly once by an encode call.
///
/// # Examples
///
/// ```rust
/// use async_json::{JsonValue, Number};
///
/// let num = JsonValue::Number(Number::Int(42));
/// let text = JsonValue::String("hello".to_string());
///
/// assert!(num.is_number());
/// assert!(text.is_string());
/// assert_eq!(num.as_i64(), Some(42));
/// ```
#[derive(Default)]
pub enum JsonValue {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<JsonValue>),
    /// Ordered `(key, value)` entries. Keys may be any value; see the module
    /// docs for how non-text keys are handled.
    Object(Vec<(JsonValue, JsonValue)>),
    /// Array whose elements are pulled asynchronously, in production order.
    Stream(ValueStream),
    /// Object whose entries are pulled asynchronously, in production order.
    Entries(EntryStream),
    /// A computation resolved (awaited) before classification.
    Deferred(ValueFuture),
    /// A value no built-in rule recognizes; handled by the fallback encoder.
    Opaque(OpaqueValue),
}

/// A numeric value: machine integer, arbitrary-precision integer, or float.
///
/// Integers beyond the `i64` range are carried losslessly as
/// [`num_bigint::BigInt`] and render in canonical decimal form like any
/// other integer.
///
/// # Examples
///
/// ```rust
/// use async_json::Number;
///
/// let int = Number::Int(42);
/// let float = Number::Float(3.5);
///
/// assert!(int.is_integer());
/// assert_eq!(int.as_i64(), Some(42));
/// assert_eq!(float.as_f64(), Some(3.5));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Number {
    Int(i64),
    BigInt(BigInt),
    Float(f64),
}

impl Number {
    /// Returns `true` for `Int` and `BigInt` values.
    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Number::Int(_) | Number::BigInt(_))
    }

    /// Returns `true` for `Float` values.
    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Number::Float(_))
    }

    /// Converts to `i64` if the value is an integer in range.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Int(i) => Some(*i),
            Number::BigInt(b) => i64::try_from(b.clone()).ok(),
            Number::Float(_) => None,
        }
    }

    /// Converts to `f64`. `BigInt` values return `None`; they may not be
    /// representable and the loss would be silent.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Number::Int(i) => Some(*i as f64),
            Number::Float(f) => Some(*f),
            Number::BigInt(_) => None,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{}", i),
            Number::BigInt(b) => write!(f, "{}", b),
            Number::Float(v) if v.is_nan() => write!(f, "NaN"),
            Number::Float(v) if *v == f64::INFINITY => write!(f, "Infinity"),
            Number::Float(v) if *v == f64::NEG_INFINITY => write!(f, "-Infinity"),
            Number::Float(v) => write!(f, "{:?}", v),
        }
    }
}

macro_rules! number_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Number {
                fn from(value: $ty) -> Self {
                    Number::Int(value as i64)
                }
            }
        )*
    };
}

number_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Number {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(i) => Number::Int(i),
            Err(_) => Number::BigInt(BigInt::from(value)),
        }
    }
}

impl From<BigInt> for Number {
    fn from(value: BigInt) -> Self {
        Number::BigInt(value)
    }
}

impl From<f32> for Number {
    fn from(value: f32) -> Self {
        Number::Float(value as f64)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

/// A value outside the built-in encoding rules, together with the name of
/// its runtime type for error reporting.
///
/// Built via [`JsonValue::opaque`]; handed to the configured fallback
/// encoder, which typically downcasts it and returns an encodable value.
pub struct OpaqueValue {
    type_name: &'static str,
    value: Box<dyn Any + Send>,
}

impl OpaqueValue {
    pub fn new<T: Any + Send>(value: T) -> Self {
        OpaqueValue {
            type_name: std::any::type_name::<T>(),
            value: Box::new(value),
        }
    }

    /// The name of the wrapped value's type, as captured at construction.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Attempts to borrow the wrapped value as a `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref()
    }
}

impl fmt::Debug for OpaqueValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpaqueValue")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

impl JsonValue {
    /// Wraps an asynchronous sequence of values.
    ///
    /// The encoder renders it as an array, pulling one element at a time and
    /// suspending between pulls until the source produces the next one.
    pub fn stream<S>(stream: S) -> Self
    where
        S: Stream<Item = JsonValue> + Send + 'static,
    {
        JsonValue::Stream(Box::pin(stream.map(Ok)))
    }

    /// Wraps an asynchronous sequence whose items may fail.
    ///
    /// An `Err` item aborts the encode; it is propagated unchanged.
    pub fn try_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<JsonValue>> + Send + 'static,
    {
        JsonValue::Stream(Box::pin(stream))
    }

    /// Wraps an asynchronous sequence of object entries.
    pub fn entries<S>(stream: S) -> Self
    where
        S: Stream<Item = (JsonValue, JsonValue)> + Send + 'static,
    {
        JsonValue::Entries(Box::pin(stream.map(Ok)))
    }

    /// Wraps an asynchronous sequence of object entries whose items may fail.
    pub fn try_entries<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<(JsonValue, JsonValue)>> + Send + 'static,
    {
        JsonValue::Entries(Box::pin(stream))
    }

    /// Wraps a computation that resolves to a value.
    ///
    /// The encoder awaits it exactly where it appears in the structure and
    /// encodes the result in place.
    pub fn deferred<F>(future: F) -> Self
    where
        F: Future<Output = JsonValue> + Send + 'static,
    {
        JsonValue::Deferred(Box::pin(future.map(Ok)))
    }

    /// Wraps a computation that may fail. A failure aborts the encode.
    pub fn try_deferred<F>(future: F) -> Self
    where
        F: Future<Output = Result<JsonValue>> + Send + 'static,
    {
        JsonValue::Deferred(Box::pin(future))
    }

    /// Wraps an arbitrary Rust value for the fallback encoder.
    ///
    /// Without a configured fallback, encoding it fails with
    /// [`Error::UnencodableType`](crate::error::Error::UnencodableType) naming `T`.
    pub fn opaque<T: Any + Send>(value: T) -> Self {
        JsonValue::Opaque(OpaqueValue::new(value))
    }

    /// Returns `true` if the value is null.
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, JsonValue::Null)
    }

    /// Returns `true` if the value is a boolean.
    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, JsonValue::Bool(_))
    }

    /// Returns `true` if the value is a number.
    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, JsonValue::Number(_))
    }

    /// Returns `true` if the value is a string.
    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, JsonValue::String(_))
    }

    /// Returns `true` if the value is a materialized array.
    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, JsonValue::Array(_))
    }

    /// Returns `true` if the value is a materialized object.
    #[inline]
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, JsonValue::Object(_))
    }

    /// Returns `true` if any part of this value must be awaited: the value
    /// itself is deferred or stream-backed. Nested parts are not inspected.
    #[inline]
    #[must_use]
    pub const fn is_async(&self) -> bool {
        matches!(
            self,
            JsonValue::Stream(_) | JsonValue::Entries(_) | JsonValue::Deferred(_)
        )
    }

    /// If the value is a boolean, returns it.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            JsonValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// If the value is a string, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsonValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// If the value is an integer in `i64` range, returns it.
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            JsonValue::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    /// If the value is a number representable as `f64`, returns it.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            JsonValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// If the value is a materialized array, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<JsonValue>> {
        match self {
            JsonValue::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// If the value is a materialized object, returns its entries.
    #[inline]
    #[must_use]
    pub fn as_entries(&self) -> Option<&Vec<(JsonValue, JsonValue)>> {
        match self {
            JsonValue::Object(entries) => Some(entries),
            _ => None,
        }
    }

    /// A short name for the value's shape, used in error messages.
    ///
    /// For opaque values this is the wrapped Rust type's name.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            JsonValue::Null => "null",
            JsonValue::Bool(_) => "boolean",
            JsonValue::Number(_) => "number",
            JsonValue::String(_) => "string",
            JsonValue::Array(_) => "array",
            JsonValue::Object(_) => "object",
            JsonValue::Stream(_) => "async sequence",
            JsonValue::Entries(_) => "async entries",
            JsonValue::Deferred(_) => "deferred",
            JsonValue::Opaque(opaque) => opaque.type_name(),
        }
    }
}

impl fmt::Debug for JsonValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonValue::Null => f.write_str("Null"),
            JsonValue::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            JsonValue::Number(n) => f.debug_tuple("Number").field(n).finish(),
            JsonValue::String(s) => f.debug_tuple("String").field(s).finish(),
            JsonValue::Array(items) => f.debug_tuple("Array").field(items).finish(),
            JsonValue::Object(entries) => f.debug_tuple("Object").field(entries).finish(),
            JsonValue::Stream(_) => f.write_str("Stream(..)"),
            JsonValue::Entries(_) => f.write_str("Entries(..)"),
            JsonValue::Deferred(_) => f.write_str("Deferred(..)"),
            JsonValue::Opaque(opaque) => f.debug_tuple("Opaque").field(opaque).finish(),
        }
    }
}

/// Structural equality over materialized values. Any comparison involving a
/// stream, a deferred computation or an opaque value is `false`: live
/// sources have no meaningful equality.
impl PartialEq for JsonValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (JsonValue::Null, JsonValue::Null) => true,
            (JsonValue::Bool(a), JsonValue::Bool(b)) => a == b,
            (JsonValue::Number(a), JsonValue::Number(b)) => a == b,
            (JsonValue::String(a), JsonValue::String(b)) => a == b,
            (JsonValue::Array(a), JsonValue::Array(b)) => a == b,
            (JsonValue::Object(a), JsonValue::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for JsonValue {
    fn from(value: bool) -> Self {
        JsonValue::Bool(value)
    }
}

impl From<String> for JsonValue {
    fn from(value: String) -> Self {
        JsonValue::String(value)
    }
}

impl From<&str> for JsonValue {
    fn from(value: &str) -> Self {
        JsonValue::String(value.to_string())
    }
}

impl From<Number> for JsonValue {
    fn from(value: Number) -> Self {
        JsonValue::Number(value)
    }
}

macro_rules! json_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for JsonValue {
                fn from(value: $ty) -> Self {
                    JsonValue::Number(Number::from(value))
                }
            }
        )*
    };
}

json_from_number!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64, BigInt);

impl From<Vec<JsonValue>> for JsonValue {
    fn from(value: Vec<JsonValue>) -> Self {
        JsonValue::Array(value)
    }
}

impl From<JsonMap> for JsonValue {
    fn from(value: JsonMap) -> Self {
        JsonValue::Object(
            value
                .into_iter()
                .map(|(k, v)| (JsonValue::String(k), v))
                .collect(),
        )
    }
}

impl<T: Into<JsonValue>> From<Option<T>> for JsonValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(inner) => inner.into(),
            None => JsonValue::Null,
        }
    }
}

/// Timestamps encode as their RFC 3339 rendering, as a string scalar.
impl From<DateTime<Utc>> for JsonValue {
    fn from(value: DateTime<Utc>) -> Self {
        JsonValue::String(value.to_rfc3339())
    }
}
