//! The tokenizer: bytes in, one [`Expression`] per call out.
//!
//! [`Reader`] dispatches on the first character of each token:
//!
//! | Lead | Token |
//! |------|-------|
//! | digit or `-` | number |
//! | ASCII letter or extended symbol | identifier |
//! | `(` | list |
//! | `"` | string |
//! | `#t` / `#f` | true / false |
//! | `#b` | base64 binary |
//!
//! Strings, lists and binary payloads are read through [`Span`]s, so a nested
//! token can never run past the end of its parent.

use crate::options::SexprOptions;
use crate::span::{
    is_extended, Base64Alphabet, CloseParen, EscapedString, Source, Span, SpanPolicy,
};
use crate::value::{Expression, Number};
use crate::{Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::read::DecoderReader;
use std::io::{self, BufRead, BufReader, Read};
use tracing::{debug, trace};

/// Reads successive expressions from a byte stream.
///
/// # Examples
///
/// ```rust
/// use serde_sexpr::{Expression, Reader};
///
/// let mut reader = Reader::new(r#"(greet "world") #t"#.as_bytes());
/// let first = reader.read_expression().unwrap().unwrap();
/// assert_eq!(first.head(), Some(&Expression::identifier("greet")));
/// assert_eq!(reader.read_expression().unwrap(), Some(Expression::True));
/// assert_eq!(reader.read_expression().unwrap(), None);
/// ```
///
/// As an iterator, the reader yields top-level expressions until the input
/// ends or the first error:
///
/// ```rust
/// use serde_sexpr::Reader;
///
/// let kinds: Vec<_> = Reader::new("1 foo () ?".as_bytes())
///     .map(|expr| expr.map(|e| e.kind()))
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(kinds, ["number", "identifier", "list", "identifier"]);
/// ```
pub struct Reader<R> {
    source: Source<R>,
    options: SexprOptions,
    failed: bool,
}

impl<R: BufRead> Reader<R> {
    /// Creates a reader with the default limits.
    pub fn new(inner: R) -> Self {
        Self::with_options(inner, SexprOptions::default())
    }

    /// Creates a reader with custom limits.
    pub fn with_options(inner: R, options: SexprOptions) -> Self {
        Reader {
            source: Source::new(inner),
            options,
            failed: false,
        }
    }

    /// Current line and column of the reader.
    #[must_use]
    pub fn position(&self) -> (usize, usize) {
        self.source.position()
    }

    /// Returns the underlying reader.
    pub fn into_inner(self) -> R {
        self.source.into_inner()
    }

    /// Reads the next top-level expression.
    ///
    /// Returns `Ok(None)` when only whitespace remains.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed input. The stream position after an
    /// error is unspecified.
    pub fn read_expression(&mut self) -> Result<Option<Expression>> {
        read_token(&mut self.source, &self.options, 0)
    }

    /// Skips whitespace and returns `true` if input remains.
    pub(crate) fn has_more(&mut self) -> Result<bool> {
        self.source.skip_whitespace()?;
        Ok(self.source.peek_byte()?.is_some())
    }
}

impl<R: Read> Reader<BufReader<R>> {
    /// Creates a reader over an unbuffered [`Read`].
    pub fn from_read(inner: R) -> Self {
        Reader::new(BufReader::new(inner))
    }
}

impl<R: BufRead> Iterator for Reader<R> {
    type Item = Result<Expression>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.read_expression() {
            Ok(Some(expression)) => Some(Ok(expression)),
            Ok(None) => None,
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

/// Maps an I/O error raised inside a span to a parse error at `source`'s
/// current position.
fn span_error<R: BufRead>(err: io::Error, source: &Source<R>, expected: &str) -> Error {
    let (line, col) = source.position();
    match err.kind() {
        io::ErrorKind::UnexpectedEof => Error::unexpected_eof(line, col, expected),
        io::ErrorKind::InvalidData => Error::invalid_binary(line, col, &err.to_string()),
        _ => Error::from(err),
    }
}

/// Reads one expression. `depth` is the number of lists already open.
fn read_token<R: BufRead>(
    source: &mut Source<R>,
    options: &SexprOptions,
    depth: usize,
) -> Result<Option<Expression>> {
    source.skip_whitespace()?;
    let (line, col) = source.position();
    let lead = match source.next_char()? {
        Some(c) => c,
        None => return Ok(None),
    };
    trace!(line, col, lead = %lead, "dispatch token");

    let expression = match lead {
        '0'..='9' | '-' => Expression::Number(read_number(source, options, lead)?),
        '(' => read_list(source, options, depth + 1, line, col)?,
        '"' => read_string(source)?,
        '#' => read_hash(source)?,
        c if c.is_ascii_alphabetic() || (c.is_ascii() && is_extended(c as u8)) => {
            Expression::Identifier(read_identifier(source, options, lead)?)
        }
        other => return Err(Error::unknown_token(line, col, other)),
    };
    Ok(Some(expression))
}

fn read_number<R: BufRead>(
    source: &mut Source<R>,
    options: &SexprOptions,
    lead: char,
) -> Result<Number> {
    let mut text = String::with_capacity(8);
    text.push(lead);
    let mut seen_dot = false;
    while let Some(byte) = source.peek_byte()? {
        let accept = byte.is_ascii_digit() || (byte == b'.' && !seen_dot);
        if !accept {
            break;
        }
        if text.len() >= options.max_number_len {
            debug!(limit = options.max_number_len, "number literal truncated");
            break;
        }
        seen_dot |= byte == b'.';
        text.push(byte as char);
        source.next_byte()?;
    }
    Ok(Number::from_literal(text))
}

fn read_identifier<R: BufRead>(
    source: &mut Source<R>,
    options: &SexprOptions,
    lead: char,
) -> Result<String> {
    let mut text = String::with_capacity(16);
    text.push(lead);
    while let Some(byte) = source.peek_byte()? {
        if !(byte.is_ascii_alphanumeric() || is_extended(byte)) {
            break;
        }
        if text.len() >= options.max_identifier_len {
            debug!(limit = options.max_identifier_len, "identifier truncated");
            break;
        }
        text.push(byte as char);
        source.next_byte()?;
    }
    Ok(text)
}

fn read_list<R: BufRead>(
    source: &mut Source<R>,
    options: &SexprOptions,
    depth: usize,
    line: usize,
    col: usize,
) -> Result<Expression> {
    if depth > options.max_depth {
        debug!(depth, limit = options.max_depth, "list nesting rejected");
        return Err(Error::depth_limit(line, col, options.max_depth));
    }

    let mut span = Span::new(source, CloseParen, SpanPolicy::LIST);
    let mut items = Vec::new();
    loop {
        span.source().skip_whitespace()?;
        match span.at_terminator() {
            Ok(true) => break,
            Ok(false) => {}
            Err(err) => return Err(span_error(err, span.source(), "')'")),
        }
        match read_token(span.source(), options, depth)? {
            Some(item) => items.push(item),
            None => {
                let (line, col) = span.source().position();
                return Err(Error::unexpected_eof(line, col, "')'"));
            }
        }
    }
    Ok(Expression::List(items))
}

fn read_string<R: BufRead>(source: &mut Source<R>) -> Result<Expression> {
    let mut bytes = Vec::new();
    let result = Span::new(&mut *source, EscapedString::default(), SpanPolicy::STRING)
        .read_to_end(&mut bytes);
    if let Err(err) = result {
        return Err(span_error(err, source, "'\"'"));
    }
    match String::from_utf8(bytes) {
        Ok(text) => Ok(Expression::String(text)),
        Err(_) => {
            let (line, col) = source.position();
            Err(Error::invalid_utf8(line, col))
        }
    }
}

fn read_hash<R: BufRead>(source: &mut Source<R>) -> Result<Expression> {
    let (line, col) = source.position();
    match source.next_char()? {
        Some('t') => Ok(Expression::True),
        Some('f') => Ok(Expression::False),
        Some('b') => read_binary(source),
        Some(other) => Err(Error::unknown_token(line, col, other)),
        None => Err(Error::unexpected_eof(line, col, "'t', 'f' or 'b' after '#'")),
    }
}

fn read_binary<R: BufRead>(source: &mut Source<R>) -> Result<Expression> {
    let mut bytes = Vec::new();
    let span = Span::new(&mut *source, Base64Alphabet, SpanPolicy::BINARY);
    let result = DecoderReader::new(span, &STANDARD).read_to_end(&mut bytes);
    match result {
        Ok(_) => Ok(Expression::Binary(bytes)),
        Err(err) => Err(span_error(err, source, "base64 data")),
    }
}
