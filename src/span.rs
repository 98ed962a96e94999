//! Bounded sub-readers over a peekable byte source.
//!
//! A [`Source`] wraps any [`BufRead`] and lets the tokenizer look at the next
//! byte or character before deciding whether to take it. A [`Span`] borrows the
//! source and exposes the bytes up to a terminator as an ordinary [`Read`],
//! with a [`Delimiter`] deciding, byte by byte, what is emitted, skipped, or
//! ends the span.
//!
//! Three delimiters cover the grammar:
//!
//! - [`EscapedString`]: body of a quoted string, backslash escapes decoded
//! - [`CloseParen`]: body of a list, ended by `)`
//! - [`Base64Alphabet`]: payload of a binary literal, ended by any non-base64 byte
//!
//! ```rust
//! use serde_sexpr::span::{EscapedString, Source, Span, SpanPolicy};
//! use std::io::Read;
//!
//! let mut source = Source::new(&br#"a\"b" rest"#[..]);
//! let mut body = String::new();
//! Span::new(&mut source, EscapedString::default(), SpanPolicy::STRING)
//!     .read_to_string(&mut body)
//!     .unwrap();
//! assert_eq!(body, "a\"b");
//! assert_eq!(source.peek_byte().unwrap(), Some(b' '));
//! ```

use std::collections::VecDeque;
use std::io::{self, BufRead, Read};

/// Symbols that may appear in identifiers besides letters and digits.
pub const EXTENDED: &[u8] = b"!$%&*+-./:<=>?@^_~";

/// Returns `true` if `byte` is one of the [`EXTENDED`] identifier symbols.
#[inline]
#[must_use]
pub fn is_extended(byte: u8) -> bool {
    EXTENDED.contains(&byte)
}

/// Returns `true` for the whitespace bytes that separate tokens.
#[inline]
#[must_use]
pub const fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r')
}

/// Returns `true` for bytes of the standard base64 alphabet, padding included.
#[inline]
#[must_use]
pub const fn is_base64(byte: u8) -> bool {
    matches!(byte, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'+' | b'/' | b'=')
}

/// Expected length of the UTF-8 sequence introduced by `lead`.
///
/// Continuation bytes and invalid leads report 1 so that a malformed byte is
/// consumed on its own.
#[inline]
#[must_use]
pub const fn utf8_width(lead: u8) -> usize {
    match lead {
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 1,
    }
}

/// Decodes the first character of `bytes`, returning it with its width.
///
/// Malformed input decodes as U+FFFD with a width of one byte.
#[must_use]
pub fn decode_char(bytes: &[u8]) -> (char, usize) {
    std::str::from_utf8(bytes)
        .ok()
        .and_then(|s| s.chars().next())
        .map_or((char::REPLACEMENT_CHARACTER, 1), |c| (c, c.len_utf8()))
}

/// A byte source with one-character lookahead and position tracking.
///
/// Lookahead is served from the inner reader's buffer. Only a character split
/// across two buffer fills is copied into a small pending queue, which is
/// always a prefix of the unread stream.
pub struct Source<R> {
    inner: R,
    pending: VecDeque<u8>,
    line: usize,
    col: usize,
}

impl<R: BufRead> Source<R> {
    /// Wraps `inner`, starting at line 1, column 1.
    pub fn new(inner: R) -> Self {
        Source {
            inner,
            pending: VecDeque::with_capacity(4),
            line: 1,
            col: 1,
        }
    }

    /// Line and column (both 1-based, columns counted in characters) of the
    /// next unread byte.
    #[inline]
    #[must_use]
    pub fn position(&self) -> (usize, usize) {
        (self.line, self.col)
    }

    /// Returns the inner reader.
    ///
    /// Bytes held for a partially peeked character are lost.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn inner_byte(&mut self) -> io::Result<Option<u8>> {
        loop {
            match self.inner.fill_buf() {
                Ok(buf) => return Ok(buf.first().copied()),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        }
    }

    /// Looks at the next byte without consuming it. `None` at end of input.
    pub fn peek_byte(&mut self) -> io::Result<Option<u8>> {
        match self.pending.front() {
            Some(&byte) => Ok(Some(byte)),
            None => self.inner_byte(),
        }
    }

    /// Consumes and returns the next byte.
    pub fn next_byte(&mut self) -> io::Result<Option<u8>> {
        let byte = match self.pending.pop_front() {
            Some(byte) => byte,
            None => match self.inner_byte()? {
                Some(byte) => {
                    self.inner.consume(1);
                    byte
                }
                None => return Ok(None),
            },
        };
        self.advance(byte);
        Ok(Some(byte))
    }

    fn advance(&mut self, byte: u8) {
        if byte == b'\n' {
            self.line += 1;
            self.col = 1;
        } else if byte & 0xC0 != 0x80 {
            self.col += 1;
        }
    }

    /// Looks at the next character without consuming it, returning it with its
    /// encoded width in bytes.
    pub fn peek_char(&mut self) -> io::Result<Option<(char, usize)>> {
        let lead = match self.peek_byte()? {
            Some(byte) => byte,
            None => return Ok(None),
        };
        let width = utf8_width(lead);
        if width == 1 {
            return Ok(Some(decode_char(&[lead])));
        }

        if self.pending.is_empty() {
            let buf = self.inner.fill_buf()?;
            if buf.len() >= width {
                return Ok(Some(decode_char(&buf[..width])));
            }
        }

        while self.pending.len() < width {
            match self.inner_byte()? {
                Some(byte) => {
                    self.inner.consume(1);
                    self.pending.push_back(byte);
                }
                None => break,
            }
        }
        let bytes = self.pending.make_contiguous();
        Ok(Some(decode_char(&bytes[..width.min(bytes.len())])))
    }

    /// Consumes and returns the next character.
    pub fn next_char(&mut self) -> io::Result<Option<char>> {
        match self.peek_char()? {
            Some((c, width)) => {
                for _ in 0..width {
                    self.next_byte()?;
                }
                Ok(Some(c))
            }
            None => Ok(None),
        }
    }

    /// Consumes spaces, tabs, newlines and carriage returns.
    pub fn skip_whitespace(&mut self) -> io::Result<()> {
        while let Some(byte) = self.peek_byte()? {
            if !is_whitespace(byte) {
                break;
            }
            self.next_byte()?;
        }
        Ok(())
    }
}

/// What a [`Delimiter`] decides for one byte of a span.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Consume the byte and emit this byte in its place.
    Emit(u8),
    /// Consume the byte and emit nothing.
    Skip,
    /// The byte is the terminator.
    End,
}

/// Decides where a span ends and how its bytes are translated.
pub trait Delimiter {
    /// Processes the next byte of the span.
    fn step(&mut self, byte: u8) -> Step;

    /// Returns `true` if `byte` would end the span in the current state,
    /// without changing that state.
    fn ends_at(&self, byte: u8) -> bool;
}

/// Terminator handling for a [`Span`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpanPolicy {
    /// Consume the terminator, or leave it as the next byte of the source.
    pub consume_terminator: bool,
    /// Copy the terminator into the span's output.
    pub include_terminator: bool,
    /// Treat end of input before the terminator as an error.
    pub require_terminator: bool,
}

impl SpanPolicy {
    /// Quoted string bodies: closing quote consumed and required.
    pub const STRING: SpanPolicy = SpanPolicy {
        consume_terminator: true,
        include_terminator: false,
        require_terminator: true,
    };

    /// List bodies: closing parenthesis consumed and required.
    pub const LIST: SpanPolicy = SpanPolicy {
        consume_terminator: true,
        include_terminator: false,
        require_terminator: true,
    };

    /// Binary payloads: the first non-base64 byte stays in the source, and end
    /// of input ends the payload.
    pub const BINARY: SpanPolicy = SpanPolicy {
        consume_terminator: false,
        include_terminator: false,
        require_terminator: false,
    };
}

/// Reads the body of a quoted string.
///
/// `\n` and `\r` decode to newline and carriage return; a backslash before any
/// other byte yields that byte. An unescaped `"` ends the span.
#[derive(Clone, Copy, Debug, Default)]
pub struct EscapedString {
    escaped: bool,
}

impl Delimiter for EscapedString {
    fn step(&mut self, byte: u8) -> Step {
        if self.escaped {
            self.escaped = false;
            return Step::Emit(match byte {
                b'n' => b'\n',
                b'r' => b'\r',
                other => other,
            });
        }
        match byte {
            b'\\' => {
                self.escaped = true;
                Step::Skip
            }
            b'"' => Step::End,
            other => Step::Emit(other),
        }
    }

    fn ends_at(&self, byte: u8) -> bool {
        !self.escaped && byte == b'"'
    }
}

/// Ends a list body at `)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct CloseParen;

impl Delimiter for CloseParen {
    fn step(&mut self, byte: u8) -> Step {
        if byte == b')' {
            Step::End
        } else {
            Step::Emit(byte)
        }
    }

    fn ends_at(&self, byte: u8) -> bool {
        byte == b')'
    }
}

/// Passes base64 alphabet bytes through and ends at anything else.
#[derive(Clone, Copy, Debug, Default)]
pub struct Base64Alphabet;

impl Delimiter for Base64Alphabet {
    fn step(&mut self, byte: u8) -> Step {
        if is_base64(byte) {
            Step::Emit(byte)
        } else {
            Step::End
        }
    }

    fn ends_at(&self, byte: u8) -> bool {
        !is_base64(byte)
    }
}

/// A [`Read`] over the bytes of `source` up to a terminator.
///
/// The span never consumes past its terminator. Because it holds the source
/// mutably, nothing else can advance the stream while it is alive; the
/// tokenizer reaches the source through [`Span::source`] to read nested
/// content.
pub struct Span<'s, R, D> {
    source: &'s mut Source<R>,
    delimiter: D,
    policy: SpanPolicy,
    finished: bool,
}

impl<'s, R: BufRead, D: Delimiter> Span<'s, R, D> {
    pub fn new(source: &'s mut Source<R>, delimiter: D, policy: SpanPolicy) -> Self {
        Span {
            source,
            delimiter,
            policy,
            finished: false,
        }
    }

    /// The underlying source, for reading nested content inside the span.
    pub fn source(&mut self) -> &mut Source<R> {
        self.source
    }

    /// Returns `true` once the terminator (or a permitted end of input) has
    /// been reached.
    #[inline]
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn missing_terminator() -> io::Error {
        io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "end of input before span terminator",
        )
    }

    /// Checks whether the next byte ends the span, applying the terminator
    /// policy if it does.
    ///
    /// Non-terminator bytes are left untouched for the caller to tokenize.
    pub fn at_terminator(&mut self) -> io::Result<bool> {
        if self.finished {
            return Ok(true);
        }
        match self.source.peek_byte()? {
            None if self.policy.require_terminator => Err(Self::missing_terminator()),
            None => {
                self.finished = true;
                Ok(true)
            }
            Some(byte) if self.delimiter.ends_at(byte) => {
                if self.policy.consume_terminator {
                    self.source.next_byte()?;
                }
                self.finished = true;
                Ok(true)
            }
            Some(_) => Ok(false),
        }
    }
}

impl<R: BufRead, D: Delimiter> Read for Span<'_, R, D> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() && !self.finished {
            let byte = match self.source.peek_byte()? {
                Some(byte) => byte,
                None if filled > 0 => break,
                None if self.policy.require_terminator => return Err(Self::missing_terminator()),
                None => {
                    self.finished = true;
                    break;
                }
            };
            match self.delimiter.step(byte) {
                Step::Emit(out) => {
                    self.source.next_byte()?;
                    buf[filled] = out;
                    filled += 1;
                }
                Step::Skip => {
                    self.source.next_byte()?;
                }
                Step::End => {
                    if self.policy.consume_terminator {
                        self.source.next_byte()?;
                    }
                    if self.policy.include_terminator {
                        buf[filled] = byte;
                        filled += 1;
                    }
                    self.finished = true;
                }
            }
        }
        Ok(filled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufReader;

    fn read_span<D: Delimiter>(
        input: &[u8],
        delimiter: D,
        policy: SpanPolicy,
    ) -> (io::Result<Vec<u8>>, Option<u8>) {
        let mut source = Source::new(input);
        let mut out = Vec::new();
        let result = Span::new(&mut source, delimiter, policy)
            .read_to_end(&mut out)
            .map(|_| out);
        let next = source.peek_byte().unwrap();
        (result, next)
    }

    #[test]
    fn test_string_span_decodes_escapes() {
        let (body, next) = read_span(
            br#"a\nb\rc\\d\"e\qf"x"#,
            EscapedString::default(),
            SpanPolicy::STRING,
        );
        assert_eq!(body.unwrap(), b"a\nb\rc\\d\"eqf");
        assert_eq!(next, Some(b'x'));
    }

    #[test]
    fn test_string_span_requires_quote() {
        let (body, _) = read_span(
            b"unterminated",
            EscapedString::default(),
            SpanPolicy::STRING,
        );
        assert_eq!(body.unwrap_err().kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_escaped_quote_at_buffer_boundary() {
        // capacity 1 forces a fill per byte
        let reader = BufReader::with_capacity(1, &br#"a\"b""#[..]);
        let mut source = Source::new(reader);
        let mut out = String::new();
        Span::new(&mut source, EscapedString::default(), SpanPolicy::STRING)
            .read_to_string(&mut out)
            .unwrap();
        assert_eq!(out, "a\"b");
    }

    #[test]
    fn test_binary_span_leaves_terminator() {
        let (body, next) = read_span(b"YWJj)", Base64Alphabet, SpanPolicy::BINARY);
        assert_eq!(body.unwrap(), b"YWJj");
        assert_eq!(next, Some(b')'));
    }

    #[test]
    fn test_binary_span_ends_cleanly_at_eof() {
        let (body, next) = read_span(b"YWJj", Base64Alphabet, SpanPolicy::BINARY);
        assert_eq!(body.unwrap(), b"YWJj");
        assert_eq!(next, None);
    }

    #[test]
    fn test_include_terminator() {
        let policy = SpanPolicy {
            consume_terminator: true,
            include_terminator: true,
            require_terminator: true,
        };
        let (body, next) = read_span(b"ab)c", CloseParen, policy);
        assert_eq!(body.unwrap(), b"ab)");
        assert_eq!(next, Some(b'c'));
    }

    #[test]
    fn test_at_terminator_consumes_close_paren() {
        let mut source = Source::new(&b"x)y"[..]);
        let mut span = Span::new(&mut source, CloseParen, SpanPolicy::LIST);
        assert!(!span.at_terminator().unwrap());
        assert_eq!(span.source().next_byte().unwrap(), Some(b'x'));
        assert!(span.at_terminator().unwrap());
        assert!(span.is_finished());
        assert_eq!(source.next_byte().unwrap(), Some(b'y'));
    }

    #[test]
    fn test_at_terminator_requires_close_paren() {
        let mut source = Source::new(&b""[..]);
        let mut span = Span::new(&mut source, CloseParen, SpanPolicy::LIST);
        assert_eq!(
            span.at_terminator().unwrap_err().kind(),
            io::ErrorKind::UnexpectedEof
        );
    }

    #[test]
    fn test_peek_char_across_buffer_boundary() {
        let reader = BufReader::with_capacity(2, "aλ€😀".as_bytes());
        let mut source = Source::new(reader);
        assert_eq!(source.next_char().unwrap(), Some('a'));
        assert_eq!(source.peek_char().unwrap(), Some(('λ', 2)));
        assert_eq!(source.next_char().unwrap(), Some('λ'));
        assert_eq!(source.peek_char().unwrap(), Some(('€', 3)));
        assert_eq!(source.next_char().unwrap(), Some('€'));
        assert_eq!(source.next_char().unwrap(), Some('😀'));
        assert_eq!(source.next_char().unwrap(), None);
        assert_eq!(source.position(), (1, 5));
    }

    #[test]
    fn test_invalid_utf8_decodes_as_replacement() {
        let mut source = Source::new(&[0xFFu8, b'a'][..]);
        assert_eq!(source.next_char().unwrap(), Some(char::REPLACEMENT_CHARACTER));
        assert_eq!(source.next_char().unwrap(), Some('a'));
    }

    #[test]
    fn test_position_tracks_lines() {
        let mut source = Source::new(&b" \n\t x"[..]);
        source.skip_whitespace().unwrap();
        assert_eq!(source.position(), (2, 3));
        assert_eq!(source.peek_byte().unwrap(), Some(b'x'));
    }

    #[test]
    fn test_extended_table() {
        for byte in b"!$%&*+-./:<=>?@^_~" {
            assert!(is_extended(*byte));
        }
        assert!(!is_extended(b'#'));
        assert!(!is_extended(b'('));
        assert!(!is_extended(b'"'));
    }
}
