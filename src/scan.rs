//! Converting expressions into typed values.
//!
//! [`Scan`] is implemented for each scalar destination. Numbers are read
//! leniently: the integer part (text before any `.`) gives the integer
//! readings, the whole literal gives the float reading, unparsable text reads as
//! zero, and out-of-range values saturate.
//!
//! ```rust
//! use serde_sexpr::{Expression, Number};
//!
//! let big = Expression::Number(Number::from_literal("99999999999"));
//! assert_eq!(big.scan::<u8>().unwrap(), 255);
//! assert_eq!(big.scan::<u32>().unwrap(), 4294967295);
//!
//! let pi = Expression::Number(Number::from_literal("3.14"));
//! assert_eq!(pi.scan::<u8>().unwrap(), 3);
//! assert_eq!(pi.scan::<f32>().unwrap(), 3.14f32);
//! ```

use crate::value::{Expression, Number};
use crate::{Error, Result};
use std::io::Write;

/// A destination shape that can be read from an [`Expression`].
pub trait Scan: Sized {
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] when the expression variant has no
    /// conversion to `Self`.
    fn scan(expression: &Expression) -> Result<Self>;
}

/// A scanned value whose shape is chosen by the expression.
///
/// Numbers without a decimal point become [`Dynamic::Integer`], numbers with
/// one become [`Dynamic::Float`].
#[derive(Clone, Debug, PartialEq)]
pub enum Dynamic {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
}

fn mismatch(expected: &str, expression: &Expression) -> Error {
    Error::type_mismatch(expected, expression.kind())
}

fn number<'e>(expected: &str, expression: &'e Expression) -> Result<&'e Number> {
    expression
        .as_number()
        .ok_or_else(|| mismatch(expected, expression))
}

impl Scan for bool {
    fn scan(expression: &Expression) -> Result<Self> {
        expression
            .as_bool()
            .ok_or_else(|| mismatch("bool", expression))
    }
}

macro_rules! scan_signed {
    ($($ty:ident),*) => {
        $(
            impl Scan for $ty {
                fn scan(expression: &Expression) -> Result<Self> {
                    let wide = number(stringify!($ty), expression)?.as_i64();
                    Ok(wide.clamp($ty::MIN as i64, $ty::MAX as i64) as $ty)
                }
            }
        )*
    };
}

macro_rules! scan_unsigned {
    ($($ty:ident),*) => {
        $(
            impl Scan for $ty {
                fn scan(expression: &Expression) -> Result<Self> {
                    let wide = number(stringify!($ty), expression)?.as_u64();
                    Ok(wide.min($ty::MAX as u64) as $ty)
                }
            }
        )*
    };
}

scan_signed!(i8, i16, i32, i64, isize);
scan_unsigned!(u8, u16, u32, u64, usize);

impl Scan for f64 {
    fn scan(expression: &Expression) -> Result<Self> {
        Ok(number("f64", expression)?.as_f64())
    }
}

impl Scan for f32 {
    fn scan(expression: &Expression) -> Result<Self> {
        Ok(number("f32", expression)?.as_f64() as f32)
    }
}

impl Scan for String {
    fn scan(expression: &Expression) -> Result<Self> {
        match expression {
            Expression::String(text) | Expression::Identifier(text) => Ok(text.clone()),
            other => Err(mismatch("string", other)),
        }
    }
}

impl Scan for Vec<u8> {
    fn scan(expression: &Expression) -> Result<Self> {
        match expression {
            Expression::String(text) | Expression::Identifier(text) => {
                Ok(text.as_bytes().to_vec())
            }
            Expression::Binary(bytes) => Ok(bytes.clone()),
            other => Err(mismatch("bytes", other)),
        }
    }
}

impl Scan for Dynamic {
    fn scan(expression: &Expression) -> Result<Self> {
        match expression {
            Expression::True => Ok(Dynamic::Bool(true)),
            Expression::False => Ok(Dynamic::Bool(false)),
            Expression::Number(n) if n.has_fraction() => Ok(Dynamic::Float(n.as_f64())),
            Expression::Number(n) => Ok(Dynamic::Integer(n.as_i64())),
            Expression::String(text) | Expression::Identifier(text) => {
                Ok(Dynamic::Text(text.clone()))
            }
            Expression::Binary(bytes) => Ok(Dynamic::Bytes(bytes.clone())),
            other => Err(mismatch("dynamic value", other)),
        }
    }
}

impl Expression {
    /// Scans this expression into `T`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_sexpr::{Error, Expression};
    ///
    /// assert_eq!(Expression::True.scan::<bool>().unwrap(), true);
    /// assert!(matches!(
    ///     Expression::True.scan::<String>(),
    ///     Err(Error::TypeMismatch { .. })
    /// ));
    /// ```
    pub fn scan<T: Scan>(&self) -> Result<T> {
        T::scan(self)
    }

    /// Writes the payload of a string or binary expression to `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] for every other variant, and
    /// [`Error::Io`] if the sink fails.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_sexpr::Expression;
    ///
    /// let mut sink = Vec::new();
    /// Expression::binary(b"\x00\x01".to_vec()).scan_into(&mut sink).unwrap();
    /// Expression::from("ok").scan_into(&mut sink).unwrap();
    /// assert_eq!(sink, b"\x00\x01ok");
    /// ```
    pub fn scan_into<W: Write + ?Sized>(&self, sink: &mut W) -> Result<()> {
        match self {
            Expression::String(text) => sink.write_all(text.as_bytes())?,
            Expression::Binary(bytes) => sink.write_all(bytes)?,
            other => return Err(mismatch("writer", other)),
        }
        Ok(())
    }
}

/// Scans `expression` into `T`.
pub fn scan<T: Scan>(expression: &Expression) -> Result<T> {
    T::scan(expression)
}

/// Owned text of a string or identifier, without copying.
pub(crate) fn into_string(expression: Expression) -> Result<String> {
    match expression {
        Expression::String(text) | Expression::Identifier(text) => Ok(text),
        other => Err(mismatch("string", &other)),
    }
}

/// Owned bytes of a binary, string or identifier, without copying.
pub(crate) fn into_bytes(expression: Expression) -> Result<Vec<u8>> {
    match expression {
        Expression::Binary(bytes) => Ok(bytes),
        Expression::String(text) | Expression::Identifier(text) => Ok(text.into_bytes()),
        other => Err(mismatch("bytes", &other)),
    }
}
