//! Configuration options for JSON encoding.
//!
//! [`JsonOptions`] is fixed for the lifetime of one encode call; every
//! nesting level reads the same options. Besides formatting flags it carries
//! the replaceable hooks: per-scalar encoders, the fallback encoder for
//! unrecognized values, and the key resolver for collection-valued keys.
//!
//! ## Examples
//!
//! ```rust
//! use async_json::{json, to_string_with_options, JsonOptions};
//!
//! let value = json!({"b": 2, "a": 1});
//!
//! let options = JsonOptions::compact().sort_keys(true);
//! let text = futures::executor::block_on(to_string_with_options(value, options)).unwrap();
//! assert_eq!(text, "{\"a\": 1, \"b\": 2}");
//! ```

use crate::error::Result;
use crate::value::{JsonValue, Number, OpaqueValue};
use futures::future::BoxFuture;
use std::fmt;
use std::sync::Arc;

/// Renders a string value as a complete, quoted JSON string literal.
pub type StringEncoder = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Renders an integer. Only called with [`Number::Int`] or
/// [`Number::BigInt`].
pub type IntEncoder = Arc<dyn Fn(&Number) -> String + Send + Sync>;

/// Renders a float, deciding itself how to treat non-finite values.
pub type FloatEncoder = Arc<dyn Fn(f64) -> Result<String> + Send + Sync>;

/// Last-resort encoder for values no built-in rule recognizes. The returned
/// value is classified again; returning another opaque value fails the
/// encode.
pub type FallbackEncoder = Arc<dyn Fn(&OpaqueValue) -> Result<JsonValue> + Send + Sync>;

/// Reduces a collection-valued object key to a single string. Receives the
/// key as a [`JsonValue::Array`] or [`JsonValue::Stream`] and may suspend
/// while pulling async elements. The returned text is escaped by the engine
/// exactly as a string scalar would be.
pub type KeyResolver = Arc<dyn Fn(JsonValue) -> BoxFuture<'static, Result<String>> + Send + Sync>;

/// Configuration for one encode call.
///
/// The defaults produce pretty-printed, ASCII-safe output with one space of
/// indentation per level, matching [`JsonOptions::default`]:
///
/// ```rust
/// use async_json::JsonOptions;
///
/// let options = JsonOptions::new();
/// assert!(options.pretty);
/// assert!(options.ensure_ascii);
/// assert!(options.allow_non_finite);
/// assert!(!options.sort_keys);
/// assert_eq!(options.indent, 1);
/// assert_eq!(options.item_separator, ", ");
/// assert_eq!(options.key_separator, ": ");
/// ```
#[derive(Clone)]
pub struct JsonOptions {
    /// Emit a newline and indentation before every container entry.
    pub pretty: bool,
    /// Sort object entries by raw key value before iterating. Requires
    /// materialized mappings and mutually ordered keys.
    pub sort_keys: bool,
    /// Escape everything outside printable ASCII; when `false`, only the
    /// control range, backslash and quote are escaped.
    pub ensure_ascii: bool,
    /// Permit `NaN`, `Infinity` and `-Infinity` literals.
    pub allow_non_finite: bool,
    /// Spaces per nesting level when `pretty` is set.
    pub indent: usize,
    /// Text between sibling entries.
    pub item_separator: String,
    /// Text between an object key and its value.
    pub key_separator: String,
    pub(crate) string_encoder: Option<StringEncoder>,
    pub(crate) int_encoder: Option<IntEncoder>,
    pub(crate) float_encoder: Option<FloatEncoder>,
    pub(crate) fallback_encoder: Option<FallbackEncoder>,
    pub(crate) key_resolver: Option<KeyResolver>,
}

impl Default for JsonOptions {
    fn default() -> Self {
        JsonOptions {
            pretty: true,
            sort_keys: false,
            ensure_ascii: true,
            allow_non_finite: true,
            indent: 1,
            item_separator: ", ".to_string(),
            key_separator: ": ".to_string(),
            string_encoder: None,
            int_encoder: None,
            float_encoder: None,
            fallback_encoder: None,
            key_resolver: None,
        }
    }
}

impl JsonOptions {
    /// Creates the default options (pretty, ASCII-safe, 1-space indent).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options for compact single-line output.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use async_json::JsonOptions;
    ///
    /// let options = JsonOptions::compact();
    /// assert!(!options.pretty);
    /// ```
    #[must_use]
    pub fn compact() -> Self {
        JsonOptions {
            pretty: false,
            ..Default::default()
        }
    }

    /// Enables or disables pretty-printing.
    #[must_use]
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Enables or disables key sorting.
    #[must_use]
    pub fn sort_keys(mut self, sort_keys: bool) -> Self {
        self.sort_keys = sort_keys;
        self
    }

    /// Selects ASCII-only escaping (`true`) or full-Unicode output (`false`).
    #[must_use]
    pub fn ensure_ascii(mut self, ensure_ascii: bool) -> Self {
        self.ensure_ascii = ensure_ascii;
        self
    }

    /// Permits or rejects non-finite float literals.
    #[must_use]
    pub fn allow_non_finite(mut self, allow: bool) -> Self {
        self.allow_non_finite = allow;
        self
    }

    /// Sets the indentation width (spaces per level; pretty output only).
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Sets the separators between sibling entries and between key and value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use async_json::{json, to_string_with_options, JsonOptions};
    ///
    /// let options = JsonOptions::compact().with_separators(",", ":");
    /// let text = futures::executor::block_on(
    ///     to_string_with_options(json!({"a": [1, 2]}), options),
    /// ).unwrap();
    /// assert_eq!(text, "{\"a\":[1,2]}");
    /// ```
    #[must_use]
    pub fn with_separators(mut self, item: &str, key: &str) -> Self {
        self.item_separator = item.to_string();
        self.key_separator = key.to_string();
        self
    }

    /// Replaces the string encoder. The hook must return a complete quoted
    /// literal; it is also used to escape resolved collection keys.
    #[must_use]
    pub fn with_string_encoder<F>(mut self, encoder: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.string_encoder = Some(Arc::new(encoder));
        self
    }

    /// Replaces the integer encoder.
    #[must_use]
    pub fn with_int_encoder<F>(mut self, encoder: F) -> Self
    where
        F: Fn(&Number) -> String + Send + Sync + 'static,
    {
        self.int_encoder = Some(Arc::new(encoder));
        self
    }

    /// Replaces the float encoder. A custom encoder takes over non-finite
    /// handling entirely; `allow_non_finite` no longer applies.
    #[must_use]
    pub fn with_float_encoder<F>(mut self, encoder: F) -> Self
    where
        F: Fn(f64) -> Result<String> + Send + Sync + 'static,
    {
        self.float_encoder = Some(Arc::new(encoder));
        self
    }

    /// Sets the fallback encoder for values no built-in rule recognizes.
    #[must_use]
    pub fn with_fallback_encoder<F>(mut self, encoder: F) -> Self
    where
        F: Fn(&OpaqueValue) -> Result<JsonValue> + Send + Sync + 'static,
    {
        self.fallback_encoder = Some(Arc::new(encoder));
        self
    }

    /// Replaces the key resolver for collection-valued object keys.
    ///
    /// The replacement is subject to the same suspension contract as the
    /// default: it may await elements of an asynchronous key source.
    #[must_use]
    pub fn with_key_resolver<F>(mut self, resolver: F) -> Self
    where
        F: Fn(JsonValue) -> BoxFuture<'static, Result<String>> + Send + Sync + 'static,
    {
        self.key_resolver = Some(Arc::new(resolver));
        self
    }
}

impl fmt::Debug for JsonOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonOptions")
            .field("pretty", &self.pretty)
            .field("sort_keys", &self.sort_keys)
            .field("ensure_ascii", &self.ensure_ascii)
            .field("allow_non_finite", &self.allow_non_finite)
            .field("indent", &self.indent)
            .field("item_separator", &self.item_separator)
            .field("key_separator", &self.key_separator)
            .field("string_encoder", &self.string_encoder.is_some())
            .field("int_encoder", &self.int_encoder.is_some())
            .field("float_encoder", &self.float_encoder.is_some())
            .field("fallback_encoder", &self.fallback_encoder.is_some())
            .field("key_resolver", &self.key_resolver.is_some())
            .finish()
    }
}
