//! Decoding Rust values from expressions.
//!
//! [`Deserializer`] walks an owned [`Expression`] and feeds it to a `serde`
//! visitor. Because the text form carries no field names, decoding is
//! positional: the n-th element of a list fills the n-th field of a struct or
//! tuple, and elements beyond the last field are ignored.
//!
//! Scalars follow the [`Scan`](crate::Scan) rules, so a number decoded into a
//! narrow integer saturates exactly as it does when scanned.
//!
//! ## Examples
//!
//! ```rust
//! use serde::Deserialize;
//! use serde_sexpr::from_str;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Span {
//!     start: u32,
//!     end: u32,
//!     label: Option<String>,
//! }
//!
//! let span: Span = from_str(r#"(3 9 "word")"#).unwrap();
//! assert_eq!(span, Span { start: 3, end: 9, label: Some("word".into()) });
//!
//! let unlabeled: Span = from_str("(3 9 ())").unwrap();
//! assert_eq!(unlabeled.label, None);
//! ```
//!
//! Enums are written as an identifier for unit variants and as a list headed by
//! the variant name otherwise:
//!
//! ```rust
//! use serde::Deserialize;
//! use serde_sexpr::from_str;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! enum Op {
//!     Nop,
//!     Push(i64),
//!     Jump { target: u16, cond: bool },
//! }
//!
//! let ops: Vec<Op> = from_str("(Nop (Push -4) (Jump 12 #t))").unwrap();
//! assert_eq!(ops, vec![Op::Nop, Op::Push(-4), Op::Jump { target: 12, cond: true }]);
//! ```

use crate::scan::{into_bytes, into_string, Scan};
use crate::ser::{IDENTIFIER_TOKEN, NUMBER_TOKEN};
use crate::value::Expression;
use crate::{Error, Result};
use serde::de::{self, IntoDeserializer};
use serde::forward_to_deserialize_any;

/// Newtype struct name under which [`Expression`] asks for itself verbatim.
pub(crate) const EXPRESSION_TOKEN: &str = "$serde_sexpr::private::Expression";

/// Deserializes Rust values from an owned [`Expression`].
pub struct Deserializer {
    expression: Expression,
}

impl Deserializer {
    pub fn new(expression: Expression) -> Self {
        Deserializer { expression }
    }

    fn mismatch(&self, expected: &str) -> Error {
        Error::type_mismatch(expected, self.expression.kind())
    }

    fn into_seq(self, expected: &str) -> Result<SeqDeserializer> {
        match self.expression {
            Expression::List(items) => Ok(SeqDeserializer::new(items)),
            Expression::Binary(bytes) => Ok(SeqDeserializer::new(
                bytes.into_iter().map(Expression::from).collect(),
            )),
            _ => Err(self.mismatch(expected)),
        }
    }
}

macro_rules! deserialize_scanned {
    ($($method:ident => $visit:ident : $ty:ty),* $(,)?) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: de::Visitor<'de>,
            {
                visitor.$visit(<$ty>::scan(&self.expression)?)
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for Deserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.expression {
            Expression::True => visitor.visit_bool(true),
            Expression::False => visitor.visit_bool(false),
            Expression::Number(n) if n.has_fraction() => visitor.visit_f64(n.as_f64()),
            Expression::Number(n) => visitor.visit_i64(n.as_i64()),
            Expression::String(text) | Expression::Identifier(text) => visitor.visit_string(text),
            Expression::Binary(bytes) => visitor.visit_byte_buf(bytes),
            Expression::List(items) => visitor.visit_seq(SeqDeserializer::new(items)),
        }
    }

    deserialize_scanned! {
        deserialize_bool => visit_bool: bool,
        deserialize_i8 => visit_i8: i8,
        deserialize_i16 => visit_i16: i16,
        deserialize_i32 => visit_i32: i32,
        deserialize_i64 => visit_i64: i64,
        deserialize_i128 => visit_i64: i64,
        deserialize_u8 => visit_u8: u8,
        deserialize_u16 => visit_u16: u16,
        deserialize_u32 => visit_u32: u32,
        deserialize_u64 => visit_u64: u64,
        deserialize_u128 => visit_u64: u64,
        deserialize_f32 => visit_f32: f32,
        deserialize_f64 => visit_f64: f64,
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if let Some(text) = self.expression.as_str() {
            let mut chars = text.chars();
            if let (Some(c), None) = (chars.next(), chars.next()) {
                return visitor.visit_char(c);
            }
        }
        Err(self.mismatch("char"))
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_string(visitor)
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_string(into_string(self.expression)?)
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_byte_buf(visitor)
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_byte_buf(into_bytes(self.expression)?)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if self.expression.is_empty_list() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if self.expression.is_empty_list() {
            visitor.visit_unit()
        } else {
            Err(self.mismatch("unit"))
        }
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(self, name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if name == EXPRESSION_TOKEN {
            visitor.visit_newtype_struct(RawDeserializer(self.expression))
        } else {
            visitor.visit_newtype_struct(self)
        }
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_seq(self.into_seq("list")?)
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_seq(self.into_seq("tuple")?)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_seq(self.into_seq("tuple struct")?)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let items = match self.expression {
            Expression::List(items) => items,
            other => return Err(Error::type_mismatch("map", other.kind())),
        };
        let mut entries = Vec::with_capacity(items.len());
        for item in items {
            match item {
                Expression::List(pair) if pair.len() == 2 => {
                    let mut pair = pair.into_iter();
                    if let (Some(key), Some(value)) = (pair.next(), pair.next()) {
                        entries.push((key, value));
                    }
                }
                other => return Err(Error::type_mismatch("(key value) pair", other.kind())),
            }
        }
        visitor.visit_map(MapDeserializer::new(entries))
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_seq(self.into_seq("struct")?)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.expression {
            Expression::Identifier(variant) | Expression::String(variant) => {
                visitor.visit_enum(EnumDeserializer {
                    variant,
                    payload: Vec::new(),
                })
            }
            Expression::List(items) => {
                let mut items = items.into_iter();
                match items.next() {
                    Some(Expression::Identifier(variant) | Expression::String(variant)) => {
                        visitor.visit_enum(EnumDeserializer {
                            variant,
                            payload: items.collect(),
                        })
                    }
                    Some(other) => Err(Error::type_mismatch("variant name", other.kind())),
                    None => Err(Error::type_mismatch("enum", "empty list")),
                }
            }
            other => Err(Error::type_mismatch("enum", other.kind())),
        }
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_string(visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }
}

struct SeqDeserializer {
    iter: std::vec::IntoIter<Expression>,
}

impl SeqDeserializer {
    fn new(items: Vec<Expression>) -> Self {
        SeqDeserializer {
            iter: items.into_iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(item) => seed.deserialize(Deserializer::new(item)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct MapDeserializer {
    iter: std::vec::IntoIter<(Expression, Expression)>,
    value: Option<Expression>,
}

impl MapDeserializer {
    fn new(entries: Vec<(Expression, Expression)>) -> Self {
        MapDeserializer {
            iter: entries.into_iter(),
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(Deserializer::new(key)).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(Deserializer::new(value)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct EnumDeserializer {
    variant: String,
    payload: Vec<Expression>,
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = VariantDeserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let name: de::value::StringDeserializer<Error> = self.variant.into_deserializer();
        let variant = seed.deserialize(name)?;
        Ok((
            variant,
            VariantDeserializer {
                payload: self.payload,
            },
        ))
    }
}

struct VariantDeserializer {
    payload: Vec<Expression>,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        Ok(())
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.payload.into_iter().next() {
            Some(value) => seed.deserialize(Deserializer::new(value)),
            None => Err(Error::type_mismatch("newtype variant", "bare variant name")),
        }
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_seq(SeqDeserializer::new(self.payload))
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_seq(SeqDeserializer::new(self.payload))
    }
}

/// Presents an expression to [`Expression`]'s own `Deserialize` impl without
/// loss: numbers and identifiers arrive as single-entry marker maps.
struct RawDeserializer(Expression);

impl<'de> de::Deserializer<'de> for RawDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.0 {
            Expression::Number(n) => visitor.visit_map(MarkerMap {
                marker: Some(NUMBER_TOKEN),
                text: Some(n.as_str().to_string()),
            }),
            Expression::Identifier(name) => visitor.visit_map(MarkerMap {
                marker: Some(IDENTIFIER_TOKEN),
                text: Some(name),
            }),
            Expression::List(items) => visitor.visit_seq(RawSeq(items.into_iter())),
            other => de::Deserializer::deserialize_any(Deserializer::new(other), visitor),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct newtype_struct seq tuple
        tuple_struct map struct enum identifier ignored_any
    }
}

struct RawSeq(std::vec::IntoIter<Expression>);

impl<'de> de::SeqAccess<'de> for RawSeq {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.0.next() {
            Some(item) => seed.deserialize(RawDeserializer(item)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.0.len())
    }
}

struct MarkerMap {
    marker: Option<&'static str>,
    text: Option<String>,
}

impl<'de> de::MapAccess<'de> for MarkerMap {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.marker.take() {
            Some(marker) => seed
                .deserialize(RawDeserializer(Expression::from(marker)))
                .map(Some),
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.text.take() {
            Some(text) => seed.deserialize(RawDeserializer(Expression::String(text))),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }
}

/// Decodes a `T` from an owned expression.
///
/// # Examples
///
/// ```rust
/// use serde_sexpr::{from_expression, Expression};
///
/// let expr = Expression::from(vec![Expression::from(1u8), Expression::from("one")]);
/// let pair: (u8, String) = from_expression(expr).unwrap();
/// assert_eq!(pair, (1, "one".to_string()));
/// ```
pub fn from_expression<T: de::DeserializeOwned>(expression: Expression) -> Result<T> {
    T::deserialize(Deserializer::new(expression))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ser::to_expression;
    use crate::value::Number;
    use serde::Deserialize;
    use std::collections::{BTreeMap, HashMap};

    fn num(text: &str) -> Expression {
        Expression::Number(Number::from_literal(text))
    }

    fn list(items: Vec<Expression>) -> Expression {
        Expression::List(items)
    }

    #[derive(Deserialize, Debug, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[derive(Deserialize, Debug, PartialEq)]
    enum Message {
        Quit,
        Write(String),
        Move(i32, i32),
        Color { r: u8, g: u8, b: u8 },
    }

    #[test]
    fn test_struct_is_positional() {
        let point: Point = from_expression(list(vec![num("25"), num("34")])).unwrap();
        assert_eq!(point, Point { x: 25, y: 34 });
    }

    #[test]
    fn test_surplus_elements_are_ignored() {
        let point: Point =
            from_expression(list(vec![num("1"), num("2"), Expression::True])).unwrap();
        assert_eq!(point, Point { x: 1, y: 2 });
    }

    #[test]
    fn test_missing_fields_fail() {
        let result: Result<Point> = from_expression(list(vec![num("1")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_scalars_saturate() {
        let value: u8 = from_expression(num("99999999999")).unwrap();
        assert_eq!(value, 255);
        let value: i16 = from_expression(num("-999999999999")).unwrap();
        assert_eq!(value, -32768);
        let value: u8 = from_expression(num("3.14")).unwrap();
        assert_eq!(value, 3);
    }

    #[test]
    fn test_type_mismatch_names_both_sides() {
        let err = from_expression::<bool>(num("1")).unwrap_err();
        assert_eq!(err, Error::type_mismatch("bool", "number"));
        let err = from_expression::<Vec<u8>>(Expression::True).unwrap_err();
        assert_eq!(err, Error::type_mismatch("list", "true"));
    }

    #[test]
    fn test_wide_integers_decode_through_64_bit_readings() {
        let text = to_expression(&i128::MAX).unwrap();
        assert_eq!(text, num("170141183460469231731687303715884105727"));
        assert_eq!(from_expression::<i128>(text).unwrap(), i64::MAX as i128);

        let low: i128 = from_expression(num("-170141183460469231731687303715884105728")).unwrap();
        assert_eq!(low, i64::MIN as i128);

        let high: u128 = from_expression(to_expression(&u128::MAX).unwrap()).unwrap();
        assert_eq!(high, u64::MAX as u128);

        let small: i128 = from_expression(num("-42")).unwrap();
        assert_eq!(small, -42);
    }

    #[test]
    fn test_options() {
        let value: Option<u8> = from_expression(Expression::default()).unwrap();
        assert_eq!(value, None);
        let value: Option<u8> = from_expression(num("4")).unwrap();
        assert_eq!(value, Some(4));
    }

    #[test]
    fn test_maps() {
        let expr = list(vec![
            list(vec![Expression::from("a"), num("1")]),
            list(vec![Expression::identifier("b"), num("2")]),
        ]);
        let map: BTreeMap<String, u32> = from_expression(expr).unwrap();
        assert_eq!(map.get("a"), Some(&1));
        assert_eq!(map.get("b"), Some(&2));

        let empty: HashMap<String, u32> = from_expression(Expression::default()).unwrap();
        assert!(empty.is_empty());

        let bad = list(vec![list(vec![num("1")])]);
        assert!(from_expression::<BTreeMap<u8, u8>>(bad).is_err());
    }

    #[test]
    fn test_enums() {
        let quit: Message = from_expression(Expression::identifier("Quit")).unwrap();
        assert_eq!(quit, Message::Quit);

        let write: Message = from_expression(list(vec![
            Expression::identifier("Write"),
            Expression::from("hi"),
        ]))
        .unwrap();
        assert_eq!(write, Message::Write("hi".into()));

        let mv: Message = from_expression(list(vec![
            Expression::identifier("Move"),
            num("-1"),
            num("2"),
        ]))
        .unwrap();
        assert_eq!(mv, Message::Move(-1, 2));

        let color: Message = from_expression(list(vec![
            Expression::identifier("Color"),
            num("1"),
            num("2"),
            num("3"),
        ]))
        .unwrap();
        assert_eq!(color, Message::Color { r: 1, g: 2, b: 3 });

        assert!(from_expression::<Message>(Expression::identifier("Jump")).is_err());
    }

    #[test]
    fn test_binary_into_byte_vec() {
        let bytes: Vec<u8> = from_expression(Expression::binary(b"hi".to_vec())).unwrap();
        assert_eq!(bytes, b"hi");
    }

    #[test]
    fn test_char() {
        let c: char = from_expression(Expression::from("x")).unwrap();
        assert_eq!(c, 'x');
        assert!(from_expression::<char>(Expression::from("xy")).is_err());
    }

    #[test]
    fn test_expression_field_is_verbatim() {
        #[derive(Deserialize)]
        struct Form {
            name: String,
            body: Expression,
        }

        let body = list(vec![Expression::identifier("+"), num("1.50"), num("007")]);
        let form: Form =
            from_expression(list(vec![Expression::from("f"), body.clone()])).unwrap();
        assert_eq!(form.name, "f");
        assert_eq!(form.body, body);
    }

    #[test]
    fn test_dynamic_json_value() {
        let expr = list(vec![num("1"), num("2.5"), Expression::from("s"), Expression::False]);
        let json: serde_json::Value = from_expression(expr).unwrap();
        assert_eq!(json, serde_json::json!([1, 2.5, "s", false]));
    }
}
