//! # serde_sexpr
//!
//! A Serde-compatible codec for a compact S-expression text format.
//!
//! ## The format
//!
//! ```text
//! (config "server" 8080 #t (tags web api) #bAAEC)
//! ```
//!
//! Seven kinds of expression exist: lists in parentheses, quoted strings,
//! numbers, bare identifiers, `#t` and `#f`, and `#b` followed by base64 binary
//! data. See [`grammar`] for the exact syntax.
//!
//! ## Key Features
//!
//! - **Streaming reader**: [`Reader`] tokenizes any `BufRead` one expression
//!   at a time, with bounded nesting depth and token lengths
//! - **Serde compatible**: encode any `Serialize` type with [`to_string`],
//!   decode any `Deserialize` type with [`from_str`]
//! - **Lenient scanning**: [`Scan`] converts numbers to narrower integers by
//!   saturating instead of failing
//! - **Custom encodings**: types can supply their own [`Expression`] through
//!   [`ToExpression`]
//!
//! ## Quick Start
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_sexpr::{from_str, to_string};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct User {
//!     id: u32,
//!     name: String,
//!     active: bool,
//! }
//!
//! let user = User {
//!     id: 123,
//!     name: "Alice".to_string(),
//!     active: true,
//! };
//!
//! let text = to_string(&user).unwrap();
//! assert_eq!(text, r#"(123 "Alice" #t)"#);
//!
//! let back: User = from_str(&text).unwrap();
//! assert_eq!(user, back);
//! ```
//!
//! Field names are not written: structs encode positionally, so both sides
//! must agree on field order.
//!
//! ### Working with expressions directly
//!
//! ```rust
//! use serde_sexpr::{Expression, Reader};
//!
//! let mut reader = Reader::new("(add 1 2) (mul 3 4)".as_bytes());
//! while let Some(expr) = reader.read_expression().unwrap() {
//!     let op = expr.head().and_then(Expression::as_identifier).unwrap();
//!     let args: Vec<i64> = expr
//!         .tail()
//!         .unwrap()
//!         .iter()
//!         .map(|arg| arg.scan::<i64>().unwrap())
//!         .collect();
//!     println!("{} {:?}", op, args);
//! }
//! ```
//!
//! ## Logging
//!
//! The reader and encoder emit `tracing` events (`trace` per token, `debug`
//! when a limit truncates or rejects input). Install a subscriber to see them.

pub mod de;
pub mod error;
pub mod grammar;
pub mod macros;
pub mod options;
pub mod read;
pub mod scan;
pub mod ser;
pub mod span;
pub mod value;
pub mod write;

pub use de::{from_expression, Deserializer};
pub use error::{Error, Result};
pub use options::SexprOptions;
pub use read::Reader;
pub use scan::{scan, Dynamic, Scan};
pub use ser::{serialize_custom, to_expression, ExpressionSerializer, ToExpression};
pub use value::{Expression, Number};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;

/// Reads one expression from `reader`.
///
/// Returns `Ok(None)` if only whitespace remains. To read several expressions
/// from one stream, keep a [`Reader`] instead: a lookahead character that
/// straddles two buffer fills is not returned to `reader`.
///
/// # Errors
///
/// Returns an error for malformed input or if the reader fails.
pub fn read<R: io::BufRead + ?Sized>(reader: &mut R) -> Result<Option<Expression>> {
    Reader::new(reader).read_expression()
}

/// Writes `expression` to `writer` in canonical text form.
///
/// # Examples
///
/// ```rust
/// use serde_sexpr::{write, Expression};
///
/// let mut out = Vec::new();
/// write(&mut out, &Expression::binary(b"abcd".to_vec())).unwrap();
/// assert_eq!(out, b"#bYWJjZA==");
/// ```
///
/// # Errors
///
/// Returns an error if the writer fails. Bytes written before the failure
/// stay written.
pub fn write<W: io::Write + ?Sized>(writer: &mut W, expression: &Expression) -> Result<()> {
    write::write_expression(writer, expression)
}

/// Serialize any `T: Serialize` to an S-expression string.
///
/// # Examples
///
/// ```rust
/// use serde_sexpr::to_string;
///
/// assert_eq!(to_string(&(25, 34)).unwrap(), "(25 34)");
/// assert_eq!(to_string(&-1.1).unwrap(), "-1.1");
/// ```
///
/// # Errors
///
/// Returns [`Error::UnsupportedType`] for infinite or NaN floats.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    let bytes = to_vec(value)?;
    String::from_utf8(bytes).map_err(Error::custom)
}

/// Serialize any `T: Serialize` to S-expression bytes.
///
/// # Errors
///
/// Returns [`Error::UnsupportedType`] for infinite or NaN floats.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_vec<T>(value: &T) -> Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    let mut buffer = Vec::with_capacity(128);
    to_writer(&mut buffer, value)?;
    Ok(buffer)
}

/// Serialize any `T: Serialize` to a writer.
///
/// The value is encoded completely before anything is written, so an encoding
/// error leaves the writer untouched.
///
/// # Errors
///
/// Returns an error if encoding fails or the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(mut writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let expression = to_expression(value)?;
    write::write_expression(&mut writer, &expression)
}

/// Deserialize a `T` from a string holding exactly one expression.
///
/// # Examples
///
/// ```rust
/// use serde_sexpr::from_str;
///
/// let values: Vec<u8> = from_str("(1 2 300)").unwrap();
/// assert_eq!(values, vec![1, 2, 255]);
/// ```
///
/// # Errors
///
/// Returns an error if the input is malformed, empty, holds more than one
/// expression, or does not match `T`.
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    from_slice(s.as_bytes())
}

/// Like [`from_str`], with custom reader limits.
///
/// # Errors
///
/// As [`from_str`], plus [`Error::DepthLimitExceeded`] for nesting beyond
/// `options.max_depth`.
pub fn from_str_with_options<T>(s: &str, options: SexprOptions) -> Result<T>
where
    T: DeserializeOwned,
{
    from_buf_read(Reader::with_options(s.as_bytes(), options))
}

/// Deserialize a `T` from bytes holding exactly one expression.
///
/// # Errors
///
/// As [`from_str`].
pub fn from_slice<T>(v: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    from_buf_read(Reader::new(v))
}

/// Deserialize a `T` from a reader holding exactly one expression.
///
/// # Errors
///
/// As [`from_str`], plus any error of the reader.
pub fn from_reader<R, T>(reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    from_buf_read(Reader::from_read(reader))
}

fn from_buf_read<R: io::BufRead, T: DeserializeOwned>(mut reader: Reader<R>) -> Result<T> {
    let expression = match reader.read_expression()? {
        Some(expression) => expression,
        None => {
            let (line, col) = reader.position();
            return Err(Error::unexpected_eof(line, col, "an expression"));
        }
    };
    if reader.has_more()? {
        let (line, col) = reader.position();
        return Err(Error::trailing_characters(line, col));
    }
    from_expression(expression)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Simple {
        x: i32,
        y: String,
    }

    #[test]
    fn test_simple_roundtrip() {
        let value = Simple {
            x: 42,
            y: "hello".to_string(),
        };
        let text = to_string(&value).unwrap();
        assert_eq!(text, r#"(42 "hello")"#);
        let back: Simple = from_str(&text).unwrap();
        assert_eq!(value, back);
    }

    #[test]
    fn test_trailing_whitespace_is_allowed() {
        let value: u8 = from_str(" 7 \n").unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn test_trailing_expression_is_rejected() {
        let result: Result<u8> = from_str("7 8");
        assert_eq!(result.unwrap_err(), Error::trailing_characters(1, 3));
    }

    #[test]
    fn test_empty_input_is_an_error() {
        let result: Result<u8> = from_str("  ");
        assert!(matches!(result, Err(Error::UnexpectedEof { .. })));
    }

    #[test]
    fn test_read_and_write_helpers() {
        let mut input = "(#t #f \"a\") rest".as_bytes();
        let expr = read(&mut input).unwrap().unwrap();
        let mut out = Vec::new();
        write(&mut out, &expr).unwrap();
        assert_eq!(out, br#"(#t #f "a")"#);
    }

    #[test]
    fn test_to_writer_leaves_writer_untouched_on_encode_error() {
        let mut out = Vec::new();
        let result = to_writer(&mut out, &vec![1.0, f64::NAN]);
        assert!(matches!(result, Err(Error::UnsupportedType(_))));
        assert!(out.is_empty());
    }

    #[test]
    fn test_from_reader() {
        let value: Vec<String> = from_reader(&b"(\"a\" b)"[..]).unwrap();
        assert_eq!(value, vec!["a".to_string(), "b".to_string()]);
    }
}
