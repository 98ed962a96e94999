//! Encoding Rust values as expressions.
//!
//! This module provides [`ExpressionSerializer`], a `serde` serializer whose
//! output is an [`Expression`] tree rather than text. The representation is
//! structural: values and their order survive, names do not.
//!
//! | Rust value | Expression |
//! |------------|------------|
//! | `bool` | `#t` / `#f` |
//! | integers, floats | number |
//! | `char`, `&str`, `String` | string |
//! | `serialize_bytes` payloads | binary |
//! | struct, tuple, sequence | list of element encodings |
//! | map | list of `(key value)` lists |
//! | `None`, `()`, unit struct | `()` |
//! | unit enum variant | identifier |
//! | other enum variants | `(variant field...)` |
//!
//! ## Examples
//!
//! ```rust
//! use serde::Serialize;
//! use serde_sexpr::to_string;
//!
//! #[derive(Serialize)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! assert_eq!(to_string(&Point { x: 25, y: 34 }).unwrap(), "(25 34)");
//! assert_eq!(to_string(&vec![1, 2, 3, 4]).unwrap(), "(1 2 3 4)");
//! assert_eq!(to_string(&None::<Vec<u8>>).unwrap(), "()");
//! ```
//!
//! ## Custom encodings
//!
//! A type that knows its own expression implements [`ToExpression`] and routes
//! its `Serialize` impl through [`serialize_custom`]; the expression it returns
//! is used verbatim.
//!
//! ```rust
//! use serde::{Serialize, Serializer};
//! use serde_sexpr::{serialize_custom, to_string, Expression, ToExpression};
//!
//! struct Keyword(&'static str);
//!
//! impl ToExpression for Keyword {
//!     fn to_expression(&self) -> serde_sexpr::Result<Expression> {
//!         Ok(Expression::identifier(format!(":{}", self.0)))
//!     }
//! }
//!
//! impl Serialize for Keyword {
//!     fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
//!         serialize_custom(self, serializer)
//!     }
//! }
//!
//! assert_eq!(to_string(&vec![Keyword("key"), Keyword("value")]).unwrap(), "(:key :value)");
//! ```

use crate::value::{Expression, Number};
use crate::{Error, Result};
use serde::ser::{self, Serialize};
use tracing::trace;

/// Newtype struct name that marks a verbatim number literal.
pub(crate) const NUMBER_TOKEN: &str = "$serde_sexpr::private::Number";

/// Newtype struct name that marks a verbatim identifier.
pub(crate) const IDENTIFIER_TOKEN: &str = "$serde_sexpr::private::Identifier";

/// A type that supplies its own expression encoding.
pub trait ToExpression {
    fn to_expression(&self) -> Result<Expression>;
}

impl ToExpression for Expression {
    fn to_expression(&self) -> Result<Expression> {
        Ok(self.clone())
    }
}

/// Serializes `value` through its [`ToExpression`] encoding.
///
/// Intended for `Serialize` impls and `#[serde(serialize_with = ...)]`
/// attributes. With this crate's serializer the expression passes through
/// unchanged; other serializers see the expression's own `Serialize` form.
pub fn serialize_custom<T, S>(value: &T, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    T: ToExpression + ?Sized,
    S: ser::Serializer,
{
    let expression = value
        .to_expression()
        .map_err(<S::Error as ser::Error>::custom)?;
    trace!(kind = expression.kind(), "custom expression");
    expression.serialize(serializer)
}

/// Serializer producing an [`Expression`].
///
/// # Examples
///
/// ```rust
/// use serde::Serialize;
/// use serde_sexpr::{Expression, ExpressionSerializer};
///
/// let expr = (true, "x").serialize(ExpressionSerializer).unwrap();
/// assert_eq!(expr, Expression::from(vec![Expression::True, Expression::from("x")]));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct ExpressionSerializer;

/// Collects list elements for sequences, tuples, structs and enum variants.
pub struct SerializeVec {
    items: Vec<Expression>,
}

/// Collects `(key value)` pairs for maps.
pub struct SerializeMap {
    entries: Vec<Expression>,
    pending_key: Option<Expression>,
}

impl SerializeVec {
    fn new(capacity: usize) -> Self {
        SerializeVec {
            items: Vec::with_capacity(capacity),
        }
    }

    fn tagged(variant: &'static str, len: usize) -> Self {
        let mut vec = SerializeVec::new(len + 1);
        vec.items.push(Expression::identifier(variant));
        vec
    }

    fn push<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.items.push(to_expression(value)?);
        Ok(())
    }

    fn finish(self) -> Expression {
        Expression::List(self.items)
    }
}

fn number<N: Into<Number>>(n: N) -> Result<Expression> {
    Ok(Expression::Number(n.into()))
}

impl ser::Serializer for ExpressionSerializer {
    type Ok = Expression;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeVec;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeVec;
    type SerializeStructVariant = SerializeVec;

    fn serialize_bool(self, v: bool) -> Result<Expression> {
        Ok(Expression::from(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Expression> {
        number(v)
    }

    fn serialize_i16(self, v: i16) -> Result<Expression> {
        number(v)
    }

    fn serialize_i32(self, v: i32) -> Result<Expression> {
        number(v)
    }

    fn serialize_i64(self, v: i64) -> Result<Expression> {
        number(v)
    }

    fn serialize_i128(self, v: i128) -> Result<Expression> {
        number(v)
    }

    fn serialize_u8(self, v: u8) -> Result<Expression> {
        number(v)
    }

    fn serialize_u16(self, v: u16) -> Result<Expression> {
        number(v)
    }

    fn serialize_u32(self, v: u32) -> Result<Expression> {
        number(v)
    }

    fn serialize_u64(self, v: u64) -> Result<Expression> {
        number(v)
    }

    fn serialize_u128(self, v: u128) -> Result<Expression> {
        number(v)
    }

    fn serialize_f32(self, v: f32) -> Result<Expression> {
        Number::try_from(v).map(Expression::Number)
    }

    fn serialize_f64(self, v: f64) -> Result<Expression> {
        Number::try_from(v).map(Expression::Number)
    }

    fn serialize_char(self, v: char) -> Result<Expression> {
        Ok(Expression::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Expression> {
        Ok(Expression::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Expression> {
        Ok(Expression::Binary(v.to_vec()))
    }

    fn serialize_none(self) -> Result<Expression> {
        Ok(Expression::default())
    }

    fn serialize_some<T>(self, value: &T) -> Result<Expression>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Expression> {
        Ok(Expression::default())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Expression> {
        Ok(Expression::default())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Expression> {
        Ok(Expression::identifier(variant))
    }

    fn serialize_newtype_struct<T>(self, name: &'static str, value: &T) -> Result<Expression>
    where
        T: ?Sized + Serialize,
    {
        let inner = value.serialize(self)?;
        match (name, inner) {
            (NUMBER_TOKEN, Expression::String(text)) => {
                Ok(Expression::Number(Number::from_literal(text)))
            }
            (IDENTIFIER_TOKEN, Expression::String(text)) => Ok(Expression::Identifier(text)),
            (_, inner) => Ok(inner),
        }
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Expression>
    where
        T: ?Sized + Serialize,
    {
        let mut vec = SerializeVec::tagged(variant, 1);
        vec.push(value)?;
        Ok(vec.finish())
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len.unwrap_or(0)))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeVec> {
        Ok(SerializeVec::tagged(variant, len))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap {
            entries: Vec::with_capacity(len.unwrap_or(0)),
            pending_key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeVec> {
        Ok(SerializeVec::tagged(variant, len))
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Expression;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Expression> {
        Ok(self.finish())
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Expression;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Expression> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Expression;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Expression> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleVariant for SerializeVec {
    type Ok = Expression;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Expression> {
        Ok(self.finish())
    }
}

impl ser::SerializeStruct for SerializeVec {
    type Ok = Expression;
    type Error = Error;

    fn serialize_field<T>(&mut self, _key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Expression> {
        Ok(self.finish())
    }
}

impl ser::SerializeStructVariant for SerializeVec {
    type Ok = Expression;
    type Error = Error;

    fn serialize_field<T>(&mut self, _key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Expression> {
        Ok(self.finish())
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Expression;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.pending_key = Some(to_expression(key)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .pending_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.entries
            .push(Expression::List(vec![key, to_expression(value)?]));
        Ok(())
    }

    fn end(self) -> Result<Expression> {
        Ok(Expression::List(self.entries))
    }
}

/// Encodes any serializable value as an [`Expression`].
///
/// # Errors
///
/// Fails with [`Error::UnsupportedType`] for infinite or NaN floats, and with
/// any error a `Serialize` impl raises.
pub fn to_expression<T: Serialize + ?Sized>(value: &T) -> Result<Expression> {
    value.serialize(ExpressionSerializer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use std::collections::BTreeMap;

    fn text<T: Serialize + ?Sized>(value: &T) -> String {
        to_expression(value).unwrap().to_string()
    }

    #[derive(Serialize)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[derive(Serialize)]
    struct Wrapper(u8);

    #[derive(Serialize)]
    struct Marker;

    #[derive(Serialize)]
    enum Shape {
        Empty,
        Circle(f64),
        Rect(u32, u32),
        Labeled { name: String, sides: u8 },
    }

    #[test]
    fn test_primitives() {
        assert_eq!(text(&true), "#t");
        assert_eq!(text(&false), "#f");
        assert_eq!(text(&-1.1f64), "-1.1");
        assert_eq!(text(&0i32), "0");
        assert_eq!(text(&i128::MIN), "-170141183460469231731687303715884105728");
        assert_eq!(text(&u64::MAX), "18446744073709551615");
        assert_eq!(text(&'c'), "\"c\"");
        assert_eq!(text("test\""), r#""test\"""#);
    }

    #[test]
    fn test_non_finite_floats_fail() {
        for value in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            assert!(matches!(
                to_expression(&value),
                Err(Error::UnsupportedType(_))
            ));
        }
        assert!(matches!(
            to_expression(&vec![1.0f32, f32::NAN]),
            Err(Error::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_structs_drop_names() {
        assert_eq!(text(&Point { x: 25, y: 34 }), "(25 34)");
        assert_eq!(text(&Wrapper(7)), "7");
        assert_eq!(text(&Marker), "()");
        assert_eq!(text(&(1, "two", 3.5)), r#"(1 "two" 3.5)"#);
    }

    #[test]
    fn test_absent_and_empty() {
        assert_eq!(text(&None::<Vec<i32>>), "()");
        assert_eq!(text(&Vec::<i32>::new()), "()");
        assert_eq!(text(&None::<BTreeMap<String, i32>>), "()");
        assert_eq!(text(&BTreeMap::<String, i32>::new()), "()");
        assert_eq!(text(&()), "()");
        assert_eq!(text(&Some(Some(5u8))), "5");
    }

    #[test]
    fn test_pointers_are_transparent() {
        let value = Box::new(Box::new(0i32));
        assert_eq!(text(&value), "0");
        assert_eq!(text(&&&"x"), "\"x\"");
    }

    #[test]
    fn test_maps_become_pairs() {
        let mut map = BTreeMap::new();
        map.insert("a", 1);
        map.insert("b", 2);
        assert_eq!(text(&map), r#"(("a" 1) ("b" 2))"#);
    }

    #[test]
    fn test_enum_variants() {
        assert_eq!(text(&Shape::Empty), "Empty");
        assert_eq!(text(&Shape::Circle(1.5)), "(Circle 1.5)");
        assert_eq!(text(&Shape::Rect(2, 3)), "(Rect 2 3)");
        assert_eq!(
            text(&Shape::Labeled {
                name: "tri".to_string(),
                sides: 3
            }),
            r#"(Labeled "tri" 3)"#
        );
    }

    #[test]
    fn test_bytes_with_serialize_bytes() {
        struct Raw<'a>(&'a [u8]);

        impl Serialize for Raw<'_> {
            fn serialize<S: ser::Serializer>(
                &self,
                serializer: S,
            ) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_bytes(self.0)
            }
        }

        assert_eq!(text(&Raw(b"abcd")), "#bYWJjZA==");
        assert_eq!(text(&b"ab".to_vec()), "(97 98)");
    }

    #[test]
    fn test_expression_passes_through_verbatim() {
        let expr = Expression::from(vec![
            Expression::identifier("define"),
            Expression::Number(Number::from_literal("007")),
            Expression::binary(vec![0xFF]),
        ]);
        assert_eq!(to_expression(&expr).unwrap(), expr);
    }

    #[test]
    fn test_custom_hook() {
        struct Pair(i32, i32);

        impl ToExpression for Pair {
            fn to_expression(&self) -> Result<Expression> {
                Ok(Expression::from(vec![
                    Expression::identifier("cons"),
                    Expression::from(self.0),
                    Expression::from(self.1),
                ]))
            }
        }

        impl Serialize for Pair {
            fn serialize<S: ser::Serializer>(
                &self,
                serializer: S,
            ) -> std::result::Result<S::Ok, S::Error> {
                serialize_custom(self, serializer)
            }
        }

        assert_eq!(text(&vec![Pair(1, 2)]), "((cons 1 2))");
    }

    #[test]
    fn test_custom_hook_error_propagates() {
        struct Broken;

        impl ToExpression for Broken {
            fn to_expression(&self) -> Result<Expression> {
                Err(Error::custom("cannot encode"))
            }
        }

        impl Serialize for Broken {
            fn serialize<S: ser::Serializer>(
                &self,
                serializer: S,
            ) -> std::result::Result<S::Ok, S::Error> {
                serialize_custom(self, serializer)
            }
        }

        let err = to_expression(&Broken).unwrap_err();
        assert!(err.to_string().contains("cannot encode"));
    }
}
