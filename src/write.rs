//! Canonical text output.
//!
//! ```rust
//! use serde_sexpr::{write, Expression};
//!
//! let expr = Expression::from(vec![Expression::True, Expression::False, Expression::from("a")]);
//! let mut out = Vec::new();
//! write(&mut out, &expr).unwrap();
//! assert_eq!(out, br#"(#t #f "a")"#);
//! ```

use crate::value::Expression;
use crate::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::io::Write;

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Writes `expression` to `sink` in canonical form.
///
/// Output is not buffered or transactional: if the sink fails midway, bytes
/// already written stay written.
pub fn write_expression<W: Write + ?Sized>(sink: &mut W, expression: &Expression) -> Result<()> {
    match expression {
        Expression::List(items) => {
            sink.write_all(b"(")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    sink.write_all(b" ")?;
                }
                write_expression(sink, item)?;
            }
            sink.write_all(b")")?;
        }
        Expression::Binary(bytes) => {
            sink.write_all(b"#b")?;
            sink.write_all(STANDARD.encode(bytes).as_bytes())?;
        }
        Expression::String(text) => write_string(sink, text)?,
        Expression::Number(number) => sink.write_all(number.as_str().as_bytes())?,
        Expression::Identifier(name) => sink.write_all(name.as_bytes())?,
        Expression::True => sink.write_all(b"#t")?,
        Expression::False => sink.write_all(b"#f")?,
    }
    Ok(())
}

/// Writes a quoted string, escaping quotes, backslashes and control bytes.
///
/// Runs of bytes that need no escaping are written in one call.
fn write_string<W: Write + ?Sized>(sink: &mut W, text: &str) -> Result<()> {
    let bytes = text.as_bytes();
    sink.write_all(b"\"")?;
    let mut start = 0;
    for (i, &byte) in bytes.iter().enumerate() {
        let escape: &[u8] = match byte {
            b'"' => b"\\\"",
            b'\\' => b"\\\\",
            b'\n' => b"\\n",
            b'\r' => b"\\r",
            0x00..=0x1F => {
                sink.write_all(&bytes[start..i])?;
                let hex = [
                    b'\\',
                    b'u',
                    b'0',
                    b'0',
                    HEX[(byte >> 4) as usize],
                    HEX[(byte & 0x0F) as usize],
                ];
                sink.write_all(&hex)?;
                start = i + 1;
                continue;
            }
            _ => continue,
        };
        sink.write_all(&bytes[start..i])?;
        sink.write_all(escape)?;
        start = i + 1;
    }
    sink.write_all(&bytes[start..])?;
    sink.write_all(b"\"")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Number;
    use crate::Error;
    use std::io;

    fn render(expr: &Expression) -> String {
        let mut out = Vec::new();
        write_expression(&mut out, expr).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_atoms() {
        assert_eq!(render(&Expression::binary(b"abcd".to_vec())), "#bYWJjZA==");
        assert_eq!(render(&Expression::Number(Number::from_literal("1.23"))), "1.23");
        assert_eq!(render(&Expression::identifier("car")), "car");
        assert_eq!(render(&Expression::True), "#t");
        assert_eq!(render(&Expression::False), "#f");
    }

    #[test]
    fn test_lists() {
        assert_eq!(render(&Expression::default()), "()");
        let expr = Expression::from(vec![
            Expression::True,
            Expression::False,
            Expression::from("a"),
        ]);
        assert_eq!(render(&expr), r#"(#t #f "a")"#);
        let nested = Expression::from(vec![Expression::default(), Expression::default()]);
        assert_eq!(render(&nested), "(() ())");
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(render(&Expression::from("\"a\"")), r#""\"a\"""#);
        assert_eq!(render(&Expression::from("\n")), r#""\n""#);
        assert_eq!(render(&Expression::from("a\\b\r")), r#""a\\b\r""#);
        assert_eq!(render(&Expression::from("\u{1}\t\u{1f}")), r#""\u0001\u0009\u001f""#);
        assert_eq!(render(&Expression::from("<é>")), "\"<é>\"");
    }

    #[test]
    fn test_empty_binary() {
        assert_eq!(render(&Expression::binary(Vec::new())), "#b");
    }

    struct FailingSink {
        budget: usize,
        written: Vec<u8>,
    }

    impl Write for FailingSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.budget == 0 {
                return Err(io::Error::new(io::ErrorKind::Other, "sink full"));
            }
            self.budget -= 1;
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_sink_errors_propagate_and_keep_partial_output() {
        let mut sink = FailingSink {
            budget: 2,
            written: Vec::new(),
        };
        let expr = Expression::from(vec![Expression::True, Expression::False]);
        let err = write_expression(&mut sink, &expr).unwrap_err();
        assert!(matches!(err, Error::Io(msg) if msg.contains("sink full")));
        assert_eq!(sink.written, b"(#t");
    }
}
