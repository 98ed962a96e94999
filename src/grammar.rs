//! The S-expression text format
//!
//! This module documents the format read by [`Reader`](crate::Reader) and
//! produced by [`write()`](crate::write()).
//!
//! # Grammar
//!
//! ```text
//! expr       := number | identifier | list | string | binary | "#t" | "#f"
//! list       := "(" (ws* expr)* ws* ")"
//! string     := '"' ( [^"\\] | "\\" any )* '"'
//! binary     := "#b" base64-char*
//! number     := "-"? (digit | ".")*        ; one "." at most, 64 bytes at most
//! identifier := (letter | extended) (letter | digit | extended)*   ; 256 bytes at most
//! extended   := ! $ % & * + - . / : < = > ? @ ^ _ ~
//! ws         := space | tab | "\n" | "\r"
//! ```
//!
//! Tokens need no separator unless they would merge: `(1"a"#t)` is a list of
//! three elements.
//!
//! ## Numbers
//!
//! A number starts with an ASCII digit or `-` and continues with digits and at
//! most one `.`. The literal is stored as written. A second `-` or `.` ends the
//! token, so `1-2` reads as the two numbers `1` and `-2`.
//!
//! A literal longer than the cap is cut at the cap and the remainder starts the
//! next token.
//!
//! ## Identifiers
//!
//! Letters and digits are ASCII only. Any other non-ASCII character outside a
//! string is an unknown token.
//! Because `-` always starts a number, an identifier can contain `-` but never
//! begin with it.
//!
//! ```rust
//! use serde_sexpr::{Expression, Reader};
//!
//! let words: Vec<Expression> = Reader::new("set-car! <=> x2".as_bytes())
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(words, vec![
//!     Expression::identifier("set-car!"),
//!     Expression::identifier("<=>"),
//!     Expression::identifier("x2"),
//! ]);
//! ```
//!
//! ## Strings
//!
//! Inside quotes, a backslash escapes the next byte. `\n` and `\r` decode to
//! newline and carriage return; any other escaped byte stands for itself, so
//! `\"` is a quote and `\\` a backslash. The decoded bytes must be UTF-8.
//!
//! On output, quotes, backslashes, newlines and carriage returns are escaped
//! with a backslash and the remaining control bytes as `\u00XX`. The reader
//! has no `\u` escape, so such a string reads back differently:
//!
//! ```rust
//! use serde_sexpr::{from_str, to_string};
//!
//! let written = to_string("\u{1}").unwrap();
//! assert_eq!(written, r#""\u0001""#);
//! let read: String = from_str(&written).unwrap();
//! assert_eq!(read, "u0001");
//! ```
//!
//! ## Binary
//!
//! `#b` is followed by standard, padded base64. The payload ends at the first
//! byte outside the base64 alphabet, which is left for the next token.
//!
//! ```rust
//! use serde_sexpr::{read, Expression};
//!
//! let mut input = "#baGVsbG8gd29ybGQ=".as_bytes();
//! assert_eq!(
//!     read(&mut input).unwrap(),
//!     Some(Expression::binary(b"hello world".to_vec()))
//! );
//! ```
//!
//! ## Booleans
//!
//! `#t` and `#f`. Any other character after `#` is an error.
//!
//! # Mapping Rust data
//!
//! The format has no field names or map syntax. Structs and tuples are lists of
//! their fields in declaration order, maps are lists of `(key value)` lists,
//! and absent values (`None`, `()`) are the empty list. An `Option` whose
//! payload also encodes as `()` therefore reads back as `None`.
