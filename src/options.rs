//! Configuration options for reading S-expressions.
//!
//! [`SexprOptions`] bounds the work a single parse may do:
//!
//! - `max_depth`: how deeply lists may nest before the reader gives up
//! - `max_number_len`: the longest numeric literal kept, in bytes
//! - `max_identifier_len`: the longest identifier kept, in bytes
//!
//! Literals longer than their cap are truncated, not rejected: the reader stops
//! at the cap and the remaining characters start the next token.
//!
//! ## Examples
//!
//! ```rust
//! use serde_sexpr::{from_str_with_options, SexprOptions};
//!
//! let options = SexprOptions::new().with_max_depth(2);
//! let nested: Result<Vec<Vec<u8>>, _> = from_str_with_options("((1) (2))", options.clone());
//! assert!(nested.is_ok());
//!
//! let too_deep: Result<Vec<Vec<Vec<u8>>>, _> = from_str_with_options("(((1)))", options);
//! assert!(too_deep.is_err());
//! ```

/// Default nesting limit for lists.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Default cap on numeric literal length, in bytes.
pub const MAX_NUMBER_LENGTH: usize = 64;

/// Default cap on identifier length, in bytes.
pub const MAX_IDENTIFIER_LENGTH: usize = 256;

/// Limits applied by the [`Reader`](crate::Reader).
///
/// # Examples
///
/// ```rust
/// use serde_sexpr::SexprOptions;
///
/// let options = SexprOptions::new()
///     .with_max_depth(64)
///     .with_max_identifier_len(32);
/// assert_eq!(options.max_depth, 64);
/// assert_eq!(options.max_number_len, 64);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SexprOptions {
    pub max_depth: usize,
    pub max_number_len: usize,
    pub max_identifier_len: usize,
}

impl Default for SexprOptions {
    fn default() -> Self {
        SexprOptions {
            max_depth: DEFAULT_MAX_DEPTH,
            max_number_len: MAX_NUMBER_LENGTH,
            max_identifier_len: MAX_IDENTIFIER_LENGTH,
        }
    }
}

impl SexprOptions {
    /// Creates the default limits (depth 512, numbers 64 bytes, identifiers 256 bytes).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how many lists may be open at once.
    ///
    /// A depth of 0 rejects every list; 1 allows a flat list.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the numeric literal cap. Values below 1 are raised to 1.
    #[must_use]
    pub fn with_max_number_len(mut self, len: usize) -> Self {
        self.max_number_len = len.max(1);
        self
    }

    /// Sets the identifier cap. Values below 1 are raised to 1.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_sexpr::{Expression, Reader, SexprOptions};
    ///
    /// let options = SexprOptions::new().with_max_identifier_len(3);
    /// let mut reader = Reader::with_options("abcdef".as_bytes(), options);
    /// assert_eq!(
    ///     reader.read_expression().unwrap(),
    ///     Some(Expression::Identifier("abc".to_string()))
    /// );
    /// ```
    #[must_use]
    pub fn with_max_identifier_len(mut self, len: usize) -> Self {
        self.max_identifier_len = len.max(1);
        self
    }
}
