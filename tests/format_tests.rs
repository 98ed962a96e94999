//! Reference cases for the text format: reading scalars into each destination
//! type, encoding Rust values, and writing expressions.

use serde::Serialize;
use serde_sexpr::{read, scan, to_string, write, Dynamic, Expression, Number, Reader, Scan};
use std::fmt::Debug;

fn parse(input: &str) -> Expression {
    let mut bytes = input.as_bytes();
    read(&mut bytes).unwrap().unwrap()
}

fn check_scan<T: Scan + PartialEq + Debug>(input: &str, kind: &str, expected: T) {
    let expr = parse(input);
    assert_eq!(expr.kind(), kind, "kind of {}", input);
    assert_eq!(scan::<T>(&expr).unwrap(), expected, "scan of {}", input);
}

#[test]
fn test_decode_positive_numbers() {
    check_scan("1", "number", 1u8);
    check_scan("99999999999", "number", 255u8);
    check_scan("99999999999", "number", 65535u16);
    check_scan("99999999999", "number", 4294967295u32);
}

#[test]
fn test_decode_negative_numbers() {
    check_scan("-1", "number", 0u8);
    check_scan("-1", "number", -1i8);
    check_scan("-999999999999", "number", -128i8);
    check_scan("-999999999999", "number", -32768i16);
    check_scan("-999999999999", "number", -2147483648i32);
    check_scan("-999999999999", "number", -999999999999i64);
}

#[test]
fn test_decode_floating() {
    check_scan("3.14", "number", 3u8);
    check_scan("3.14", "number", 3.14f32);
    check_scan("-3.14", "number", -3.14f64);
    check_scan("-3.14", "number", Dynamic::Float(-3.14));
}

#[test]
fn test_decode_booleans() {
    check_scan("#t", "true", true);
    check_scan("#f", "false", false);
}

#[test]
fn test_decode_identifiers() {
    check_scan("abcd", "identifier", "abcd".to_string());
    check_scan(
        "!$%&*+-./:<=>?@^_~",
        "identifier",
        b"!$%&*+-./:<=>?@^_~".to_vec(),
    );
}

#[test]
fn test_decode_binary() {
    check_scan("#baGVsbG8gd29ybGQ=", "binary", b"hello world".to_vec());
}

#[test]
fn test_decode_string() {
    check_scan(r#""test\"""#, "string", "test\"".to_string());
}

#[test]
fn test_decode_stream_of_mixed_tokens() {
    let input = "1 99999999999 -1 3.14 #t #f abcd #baGVsbG8gd29ybGQ= \"test\\\"\"";
    let kinds: Vec<&str> = Reader::new(input.as_bytes())
        .map(|expr| expr.unwrap().kind())
        .collect();
    assert_eq!(
        kinds,
        [
            "number",
            "number",
            "number",
            "number",
            "true",
            "false",
            "identifier",
            "binary",
            "string"
        ]
    );
}

fn check_encode<T: Serialize + ?Sized>(value: &T, expected: &str) {
    assert_eq!(to_string(value).unwrap(), expected);
}

#[test]
fn test_encode_table() {
    #[derive(Serialize)]
    struct Point {
        x: i32,
        y: i32,
    }

    check_encode(&true, "#t");
    check_encode(&false, "#f");
    check_encode(&1u8, "1");
    check_encode(&1u16, "1");
    check_encode(&1u32, "1");
    check_encode(&1u64, "1");
    check_encode(&-1i8, "-1");
    check_encode(&-1i16, "-1");
    check_encode(&-1i32, "-1");
    check_encode(&-1i64, "-1");
    check_encode(&-1.1f64, "-1.1");
    check_encode(&[1, 2, 3, 4], "(1 2 3 4)");
    check_encode(&vec![1.0f64, 2.0, 3.0, 4.0], "(1 2 3 4)");
    check_encode("test", r#""test""#);
    check_encode(&Point { x: 25, y: 34 }, "(25 34)");
    check_encode(&Box::new(0i32), "0");
}

fn check_write(expr: &Expression, expected: &str) {
    let mut out = Vec::new();
    write(&mut out, expr).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), expected);
}

#[test]
fn test_write_table() {
    check_write(&Expression::binary(b"abcd".to_vec()), "#bYWJjZA==");
    check_write(
        &Expression::from(vec![
            Expression::True,
            Expression::False,
            Expression::from("a"),
        ]),
        r#"(#t #f "a")"#,
    );
    check_write(&Expression::from("\"a\""), r#""\"a\"""#);
    check_write(&Expression::from("\n"), r#""\n""#);
    check_write(&Expression::Number(Number::from_literal("1.23")), "1.23");
}

#[test]
fn test_written_text_reads_back() {
    let exprs = vec![
        Expression::binary(b"abcd".to_vec()),
        Expression::from("line\r\nbreak \\ \"quoted\""),
        Expression::Number(Number::from_literal("-0.5")),
        Expression::from(vec![
            Expression::identifier("nested"),
            Expression::from(vec![Expression::default(), Expression::True]),
        ]),
    ];
    for expr in exprs {
        let mut out = Vec::new();
        write(&mut out, &expr).unwrap();
        let back = read(&mut out.as_slice()).unwrap();
        assert_eq!(back, Some(expr));
    }
}
