//! Error types for JSON encoding.
//!
//! Every failure is fatal to the encode call that raised it: the fragment
//! stream ends immediately after the error item and no recovery is attempted.
//! Fragments emitted before the failure are final and are never retracted, so
//! a streaming consumer may have observed a syntactically incomplete prefix.
//!
//! ## Error Categories
//!
//! - **Unencodable values**: a value matched no encoding rule and no fallback
//!   encoder was configured (or the fallback itself could not produce one)
//! - **Non-compliant numbers**: `NaN` or an infinity encountered while
//!   [`allow_non_finite`](crate::JsonOptions::allow_non_finite) is disabled
//! - **Key failures**: object keys that cannot be reduced to text, or keys of
//!   mixed types while key sorting is requested
//! - **Upstream passthrough**: failures raised by a deferred computation or
//!   an asynchronous source are propagated unchanged, typically as
//!   [`Error::Custom`]
//!
//! ## Examples
//!
//! ```rust
//! use async_json::{to_string, Error, JsonValue};
//!
//! let value = JsonValue::opaque(std::time::Duration::ZERO);
//! let result = futures::executor::block_on(to_string(value));
//! assert!(matches!(result, Err(Error::UnencodableType(_))));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors that can occur while encoding a value.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// IO error while writing encoded output
    #[error("IO error: {0}")]
    Io(String),

    /// A value matched no encoding rule and no fallback encoder could handle it
    #[error("no encoder for value of type `{0}`; set a fallback encoder to handle it")]
    UnencodableType(String),

    /// A non-finite float was encountered while non-finite values are disallowed
    #[error("out of range float value {0} is not JSON compliant")]
    NonFiniteFloat(f64),

    /// An object key could not be reduced to text
    #[error("cannot encode object key of type `{0}`; keys must be text or an ordered collection of text parts")]
    KeyNotEncodable(String),

    /// Key sorting was requested but two keys have no mutual ordering
    #[error("cannot sort object keys of types `{0}` and `{1}`")]
    KeysNotComparable(String, String),

    /// Key sorting was requested for a mapping whose entries arrive asynchronously
    #[error("sorting keys requires a fully materialized mapping; this object produces its entries asynchronously")]
    SortRequiresMaterialized,

    /// Custom error, including failures propagated from caller-supplied sources
    #[error("{0}")]
    Custom(String),
}

impl Error {
    /// Creates a custom error with a display message.
    ///
    /// This is also the constructor asynchronous sources should use to fail
    /// an in-progress encode; the engine propagates it unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use async_json::Error;
    ///
    /// let err = Error::custom("upstream connection lost");
    /// assert!(err.to_string().contains("connection lost"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
