//! The expression tree.
//!
//! This module provides the [`Expression`] enum, the single value type every
//! reader produces and every writer consumes, and [`Number`], the textual
//! numeric literal it carries.
//!
//! ## Core Types
//!
//! - [`Expression`]: list, binary, string, number, identifier, true or false
//! - [`Number`]: a decimal literal kept as text and read lazily when scanned
//!
//! ## Usage Patterns
//!
//! ### Creating Values
//!
//! ```rust
//! use serde_sexpr::{Expression, Number};
//!
//! let flag = Expression::from(true);
//! let count = Expression::from(42u8);
//! let name = Expression::from("hello");
//! let symbol = Expression::identifier("define");
//! let list = Expression::from(vec![symbol, name, count, flag]);
//!
//! assert_eq!(list.to_string(), r#"(define "hello" 42 #t)"#);
//! ```
//!
//! ### Inspecting Values
//!
//! ```rust
//! use serde_sexpr::Expression;
//!
//! let list = Expression::from(vec![Expression::from(1u8), Expression::from(2u8)]);
//! assert!(list.is_list());
//! assert_eq!(list.head(), Some(&Expression::from(1u8)));
//! assert_eq!(list.tail().map(|rest| rest.len()), Some(1));
//! ```

use crate::de::EXPRESSION_TOKEN;
use crate::options::MAX_NUMBER_LENGTH;
use crate::ser::{IDENTIFIER_TOKEN, NUMBER_TOKEN};
use crate::{Error, Result};
use serde::de::{self, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::num::IntErrorKind;

/// One node of the S-expression grammar.
///
/// Expressions are plain owned values: a list owns its children and nothing is
/// shared. The reader hands every expression over fully built.
///
/// # Examples
///
/// ```rust
/// use serde_sexpr::Expression;
///
/// let empty = Expression::default();
/// assert_eq!(empty, Expression::List(vec![]));
/// assert_eq!(empty.kind(), "list");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Expression {
    List(Vec<Expression>),
    Binary(Vec<u8>),
    String(String),
    Number(Number),
    Identifier(String),
    True,
    False,
}

/// A numeric literal, stored exactly as written.
///
/// The literal is interpreted only when scanned, because the same text may be
/// read as a signed integer, an unsigned integer or a float depending on the
/// destination. All three readings are lenient: text that does not parse reads
/// as zero, and integers beyond the 64-bit range saturate to the bound.
///
/// # Examples
///
/// ```rust
/// use serde_sexpr::Number;
///
/// let n = Number::from_literal("3.14");
/// assert!(n.has_fraction());
/// assert_eq!(n.as_i64(), 3);
/// assert_eq!(n.as_u64(), 3);
/// assert_eq!(n.as_f64(), 3.14);
///
/// let negative = Number::from(-7i32);
/// assert_eq!(negative.as_str(), "-7");
/// assert_eq!(negative.as_u64(), 0);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Number(String);

impl Number {
    /// Wraps literal text without validating it.
    #[must_use]
    pub fn from_literal(text: impl Into<String>) -> Self {
        Number(text.into())
    }

    /// Returns the literal text.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the literal contains a decimal point.
    #[inline]
    #[must_use]
    pub fn has_fraction(&self) -> bool {
        self.0.contains('.')
    }

    /// Text before the decimal point, the part both integer readings use.
    fn integer_part(&self) -> &str {
        match self.0.find('.') {
            Some(dot) => &self.0[..dot],
            None => &self.0,
        }
    }

    /// Signed 64-bit reading of the integer part.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        match self.integer_part().parse::<i64>() {
            Ok(value) => value,
            Err(err) => match err.kind() {
                IntErrorKind::PosOverflow => i64::MAX,
                IntErrorKind::NegOverflow => i64::MIN,
                _ => 0,
            },
        }
    }

    /// Unsigned 64-bit reading of the integer part.
    #[must_use]
    pub fn as_u64(&self) -> u64 {
        match self.integer_part().parse::<u64>() {
            Ok(value) => value,
            Err(err) if *err.kind() == IntErrorKind::PosOverflow => u64::MAX,
            Err(_) => 0,
        }
    }

    /// 64-bit float reading of the whole literal.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        self.0.parse::<f64>().unwrap_or(0.0)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

macro_rules! number_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Number {
                fn from(value: $ty) -> Self {
                    Number(value.to_string())
                }
            }

            impl From<$ty> for Expression {
                fn from(value: $ty) -> Self {
                    Expression::Number(Number::from(value))
                }
            }
        )*
    };
}

number_from_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

/// Checks a formatted float against what the reader can take back.
///
/// The grammar has no exponent, so tiny and huge magnitudes expand to long
/// digit runs that the reader would cut at [`MAX_NUMBER_LENGTH`].
fn float_literal(text: String) -> Result<Number> {
    if text.len() > MAX_NUMBER_LENGTH {
        return Err(Error::unsupported_type(&format!(
            "float literal of {} bytes exceeds the {}-byte number limit",
            text.len(),
            MAX_NUMBER_LENGTH
        )));
    }
    Ok(Number(text))
}

impl TryFrom<f64> for Number {
    type Error = Error;

    /// Formats a finite float in shortest round-trip decimal form.
    ///
    /// Fails for NaN, infinities, and magnitudes whose decimal form is longer
    /// than a number literal may be.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_sexpr::Number;
    ///
    /// assert_eq!(Number::try_from(-1.1f64).unwrap().as_str(), "-1.1");
    /// assert_eq!(Number::try_from(4.0f64).unwrap().as_str(), "4");
    /// assert!(Number::try_from(f64::NAN).is_err());
    /// assert!(Number::try_from(1e-70f64).is_err());
    /// ```
    fn try_from(value: f64) -> Result<Self> {
        if value.is_nan() {
            Err(Error::unsupported_type("NaN is not supported"))
        } else if value.is_infinite() {
            Err(Error::unsupported_type("Infinity is not supported"))
        } else {
            float_literal(value.to_string())
        }
    }
}

impl TryFrom<f32> for Number {
    type Error = Error;

    fn try_from(value: f32) -> Result<Self> {
        if value.is_nan() {
            Err(Error::unsupported_type("NaN is not supported"))
        } else if value.is_infinite() {
            Err(Error::unsupported_type("Infinity is not supported"))
        } else {
            float_literal(value.to_string())
        }
    }
}

impl Default for Expression {
    /// The empty list `()`.
    fn default() -> Self {
        Expression::List(Vec::new())
    }
}

impl Expression {
    /// Creates an identifier expression from bare-word text.
    #[must_use]
    pub fn identifier(name: impl Into<String>) -> Self {
        Expression::Identifier(name.into())
    }

    /// Creates a binary expression from raw bytes.
    #[must_use]
    pub fn binary(bytes: impl Into<Vec<u8>>) -> Self {
        Expression::Binary(bytes.into())
    }

    /// Name of this expression's variant, as used in type mismatch errors.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Expression::List(_) => "list",
            Expression::Binary(_) => "binary",
            Expression::String(_) => "string",
            Expression::Number(_) => "number",
            Expression::Identifier(_) => "identifier",
            Expression::True => "true",
            Expression::False => "false",
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self, Expression::List(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_binary(&self) -> bool {
        matches!(self, Expression::Binary(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Expression::String(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Expression::Number(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_identifier(&self) -> bool {
        matches!(self, Expression::Identifier(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Expression::True | Expression::False)
    }

    /// Returns `true` for the empty list `()`, the encoding of absent values.
    #[inline]
    #[must_use]
    pub fn is_empty_list(&self) -> bool {
        matches!(self, Expression::List(items) if items.is_empty())
    }

    /// If the value is `True` or `False`, returns it as a `bool`.
    #[inline]
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Expression::True => Some(true),
            Expression::False => Some(false),
            _ => None,
        }
    }

    /// If the value is a string, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Expression::String(s) => Some(s),
            _ => None,
        }
    }

    /// If the value is an identifier, returns its text.
    #[inline]
    #[must_use]
    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            Expression::Identifier(name) => Some(name),
            _ => None,
        }
    }

    /// If the value is binary, returns its bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Expression::Binary(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// If the value is a number, returns it.
    #[inline]
    #[must_use]
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Expression::Number(n) => Some(n),
            _ => None,
        }
    }

    /// If the value is a list, returns its elements.
    #[inline]
    #[must_use]
    pub fn as_list(&self) -> Option<&[Expression]> {
        match self {
            Expression::List(items) => Some(items),
            _ => None,
        }
    }

    /// First element of a non-empty list.
    ///
    /// Returns `None` for the empty list and for every other variant.
    #[must_use]
    pub fn head(&self) -> Option<&Expression> {
        self.as_list().and_then(|items| items.first())
    }

    /// Every element after the first, for a non-empty list.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_sexpr::Expression;
    ///
    /// let list = Expression::from(vec![Expression::from(1u8)]);
    /// assert_eq!(list.tail(), Some(&[][..]));
    /// assert_eq!(Expression::default().tail(), None);
    /// ```
    #[must_use]
    pub fn tail(&self) -> Option<&[Expression]> {
        match self {
            Expression::List(items) if !items.is_empty() => Some(&items[1..]),
            _ => None,
        }
    }
}

impl fmt::Display for Expression {
    /// Renders the canonical text form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buffer = Vec::new();
        crate::write::write_expression(&mut buffer, self).map_err(|_| fmt::Error)?;
        f.write_str(std::str::from_utf8(&buffer).map_err(|_| fmt::Error)?)
    }
}

impl From<bool> for Expression {
    fn from(value: bool) -> Self {
        if value {
            Expression::True
        } else {
            Expression::False
        }
    }
}

impl From<String> for Expression {
    fn from(value: String) -> Self {
        Expression::String(value)
    }
}

impl From<&str> for Expression {
    fn from(value: &str) -> Self {
        Expression::String(value.to_string())
    }
}

impl From<Number> for Expression {
    fn from(value: Number) -> Self {
        Expression::Number(value)
    }
}

impl From<Vec<Expression>> for Expression {
    fn from(value: Vec<Expression>) -> Self {
        Expression::List(value)
    }
}

impl FromIterator<Expression> for Expression {
    fn from_iter<T: IntoIterator<Item = Expression>>(iter: T) -> Self {
        Expression::List(iter.into_iter().collect())
    }
}

impl Serialize for Expression {
    /// Numbers and identifiers travel as marked newtype structs so that this
    /// crate's serializer reproduces them verbatim. Other serializers see a
    /// plain string for both.
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Expression::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Expression::Binary(bytes) => serializer.serialize_bytes(bytes),
            Expression::String(s) => serializer.serialize_str(s),
            Expression::Number(n) => serializer.serialize_newtype_struct(NUMBER_TOKEN, n.as_str()),
            Expression::Identifier(name) => {
                serializer.serialize_newtype_struct(IDENTIFIER_TOKEN, name.as_str())
            }
            Expression::True => serializer.serialize_bool(true),
            Expression::False => serializer.serialize_bool(false),
        }
    }
}

impl<'de> Deserialize<'de> for Expression {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_newtype_struct(EXPRESSION_TOKEN, ExpressionVisitor)
    }
}

struct ExpressionVisitor;

impl<'de> Visitor<'de> for ExpressionVisitor {
    type Value = Expression;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("any value representable as an S-expression")
    }

    fn visit_bool<E>(self, value: bool) -> std::result::Result<Expression, E> {
        Ok(Expression::from(value))
    }

    fn visit_i64<E>(self, value: i64) -> std::result::Result<Expression, E> {
        Ok(Expression::from(value))
    }

    fn visit_u64<E>(self, value: u64) -> std::result::Result<Expression, E> {
        Ok(Expression::from(value))
    }

    fn visit_i128<E>(self, value: i128) -> std::result::Result<Expression, E> {
        Ok(Expression::from(value))
    }

    fn visit_u128<E>(self, value: u128) -> std::result::Result<Expression, E> {
        Ok(Expression::from(value))
    }

    fn visit_f64<E>(self, value: f64) -> std::result::Result<Expression, E>
    where
        E: de::Error,
    {
        Number::try_from(value)
            .map(Expression::Number)
            .map_err(E::custom)
    }

    fn visit_char<E>(self, value: char) -> std::result::Result<Expression, E> {
        Ok(Expression::String(value.to_string()))
    }

    fn visit_str<E>(self, value: &str) -> std::result::Result<Expression, E> {
        Ok(Expression::String(value.to_string()))
    }

    fn visit_string<E>(self, value: String) -> std::result::Result<Expression, E> {
        Ok(Expression::String(value))
    }

    fn visit_bytes<E>(self, value: &[u8]) -> std::result::Result<Expression, E> {
        Ok(Expression::Binary(value.to_vec()))
    }

    fn visit_byte_buf<E>(self, value: Vec<u8>) -> std::result::Result<Expression, E> {
        Ok(Expression::Binary(value))
    }

    fn visit_unit<E>(self) -> std::result::Result<Expression, E> {
        Ok(Expression::default())
    }

    fn visit_none<E>(self) -> std::result::Result<Expression, E> {
        Ok(Expression::default())
    }

    fn visit_some<D>(self, deserializer: D) -> std::result::Result<Expression, D::Error>
    where
        D: Deserializer<'de>,
    {
        Deserialize::deserialize(deserializer)
    }

    fn visit_newtype_struct<D>(self, deserializer: D) -> std::result::Result<Expression, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Expression, A::Error>
    where
        A: de::SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Expression::List(items))
    }

    /// Maps become lists of `(key value)` pairs, except for the single-entry
    /// marker maps this crate's deserializer uses to carry numbers and
    /// identifiers verbatim.
    fn visit_map<A>(self, mut map: A) -> std::result::Result<Expression, A::Error>
    where
        A: de::MapAccess<'de>,
    {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some(key) = map.next_key::<Expression>()? {
            if entries.is_empty() {
                match key.as_str() {
                    Some(NUMBER_TOKEN) => {
                        let text: String = map.next_value()?;
                        return Ok(Expression::Number(Number::from_literal(text)));
                    }
                    Some(IDENTIFIER_TOKEN) => {
                        let text: String = map.next_value()?;
                        return Ok(Expression::Identifier(text));
                    }
                    _ => {}
                }
            }
            let value: Expression = map.next_value()?;
            entries.push(Expression::List(vec![key, value]));
        }
        Ok(Expression::List(entries))
    }
}
