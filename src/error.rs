//! Error types for S-expression reading, writing, encoding and scanning.
//!
//! Every fallible operation in this crate returns [`Result`], whose error type
//! is the single [`Error`] enum below.
//!
//! ## Error Categories
//!
//! - **Parse errors**: unknown tokens, premature end of input, malformed string
//!   or binary payloads, nesting beyond the configured limit. These carry the
//!   line and column where the reader stopped.
//! - **Type mismatches**: a scan asked for a destination shape the expression
//!   variant cannot provide.
//! - **Unsupported types**: the encoder met a value with no representation in
//!   the format (infinite or NaN floats).
//! - **I/O errors**: the underlying reader or writer failed.
//!
//! ## Examples
//!
//! ```rust
//! use serde_sexpr::{from_str, Error};
//!
//! let result: Result<Vec<u32>, Error> = from_str("(1 2 3");
//! assert!(matches!(result, Err(Error::UnexpectedEof { .. })));
//!
//! if let Err(err) = result {
//!     eprintln!("Parse error: {}", err);
//! }
//! ```

use std::fmt;
use std::io;
use thiserror::Error;

/// Represents all possible errors raised while reading, writing, encoding or
/// scanning expressions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Input ended in the middle of a token, string, binary payload or list
    #[error("Unexpected end of input at line {line}, column {col}: expected {expected}")]
    UnexpectedEof {
        line: usize,
        col: usize,
        expected: String,
    },

    /// A character that cannot start any expression
    #[error("Unknown token {token:?} at line {line}, column {col}")]
    UnknownToken { line: usize, col: usize, token: char },

    /// A string literal whose decoded bytes are not UTF-8
    #[error("Invalid UTF-8 in string literal ending at line {line}, column {col}")]
    InvalidUtf8 { line: usize, col: usize },

    /// A binary literal whose payload is not valid base64
    #[error("Invalid binary literal at line {line}, column {col}: {msg}")]
    InvalidBinary { line: usize, col: usize, msg: String },

    /// Lists nested deeper than the configured limit
    #[error("List nesting exceeds the limit of {limit} at line {line}, column {col}")]
    DepthLimitExceeded {
        line: usize,
        col: usize,
        limit: usize,
    },

    /// Input continues after the single expected expression
    #[error("Trailing characters after expression at line {line}, column {col}")]
    TrailingCharacters { line: usize, col: usize },

    /// Host value with no representation in the format
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Expression variant cannot be scanned into the requested shape
    #[error("Type mismatch: cannot convert {found} into {expected}")]
    TypeMismatch { expected: String, found: String },

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates an unexpected end-of-input error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_sexpr::Error;
    ///
    /// let err = Error::unexpected_eof(3, 7, "')'");
    /// assert!(err.to_string().contains("line 3"));
    /// ```
    pub fn unexpected_eof(line: usize, col: usize, expected: &str) -> Self {
        Error::UnexpectedEof {
            line,
            col,
            expected: expected.to_string(),
        }
    }

    /// Creates an unknown-token error for a character that starts no expression.
    pub fn unknown_token(line: usize, col: usize, token: char) -> Self {
        Error::UnknownToken { line, col, token }
    }

    /// Creates an invalid UTF-8 error for a string literal.
    pub fn invalid_utf8(line: usize, col: usize) -> Self {
        Error::InvalidUtf8 { line, col }
    }

    /// Creates an invalid binary error for a rejected base64 payload.
    pub fn invalid_binary(line: usize, col: usize, msg: &str) -> Self {
        Error::InvalidBinary {
            line,
            col,
            msg: msg.to_string(),
        }
    }

    /// Creates a nesting limit error.
    pub fn depth_limit(line: usize, col: usize, limit: usize) -> Self {
        Error::DepthLimitExceeded { line, col, limit }
    }

    /// Creates a trailing characters error.
    pub fn trailing_characters(line: usize, col: usize) -> Self {
        Error::TrailingCharacters { line, col }
    }

    /// Creates a type mismatch error naming the requested shape and the
    /// expression variant that was found.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_sexpr::Error;
    ///
    /// let err = Error::type_mismatch("bool", "number");
    /// assert_eq!(err.to_string(), "Type mismatch: cannot convert number into bool");
    /// ```
    pub fn type_mismatch(expected: &str, found: &str) -> Self {
        Error::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Creates an unsupported type error for values the format cannot represent.
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_sexpr::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reader or writer failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::io(&err.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
