/// Builds an [`Expression`](crate::Expression) from S-expression-like Rust
/// tokens.
///
/// - `(a b c)` builds a list; `()` the empty list
/// - `true` / `false` build `#t` / `#f`
/// - bare words and punctuation (`define`, `+`) build identifiers
/// - literals (`1`, `2.5`, `"text"`) are encoded like any serializable value
/// - `{expr}` splices in the encoding of a Rust expression, which is how
///   negative numbers are written
///
/// ```rust
/// use serde_sexpr::sexpr;
///
/// let offset = -3;
/// let form = sexpr!((define (shift x) (+ x {offset})));
/// assert_eq!(form.to_string(), "(define (shift x) (+ x -3))");
/// ```
///
/// # Panics
///
/// Panics if a literal or spliced value cannot be encoded, such as a NaN
/// float. Use [`try_sexpr!`](crate::try_sexpr!) to get the error instead.
#[macro_export]
macro_rules! sexpr {
    ($($tt:tt)+) => {
        $crate::__sexpr!(strict; $($tt)+)
    };
}

/// Like [`sexpr!`], but returns a [`Result`](crate::Result) carrying the first
/// encoding error instead of panicking.
///
/// ```rust
/// use serde_sexpr::{try_sexpr, Error};
///
/// let ratio = 0.5;
/// let form = try_sexpr!((scale {ratio})).unwrap();
/// assert_eq!(form.to_string(), "(scale 0.5)");
///
/// let bad = try_sexpr!((scale {f64::NAN}));
/// assert!(matches!(bad, Err(Error::UnsupportedType(_))));
/// ```
#[macro_export]
macro_rules! try_sexpr {
    ($($tt:tt)+) => {
        (|| -> $crate::Result<$crate::Expression> {
            ::std::result::Result::Ok($crate::__sexpr!(fallible; $($tt)+))
        })()
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __sexpr {
    // Handle empty list
    ($mode:ident; ()) => {
        $crate::Expression::List(::std::vec::Vec::new())
    };

    // Handle non-empty list
    ($mode:ident; ( $($elem:tt)* )) => {
        $crate::Expression::List(::std::vec![$($crate::__sexpr!($mode; $elem)),*])
    };

    ($mode:ident; true) => {
        $crate::Expression::True
    };

    ($mode:ident; false) => {
        $crate::Expression::False
    };

    // Rust expression, encoded at runtime
    ($mode:ident; { $value:expr }) => {
        $crate::__sexpr_encode!($mode; $value)
    };

    ($mode:ident; $name:ident) => {
        $crate::Expression::identifier(::std::stringify!($name))
    };

    ($mode:ident; $value:literal) => {
        $crate::__sexpr_encode!($mode; $value)
    };

    // Punctuation such as `+` or `<=` reads as an identifier
    ($mode:ident; $symbol:tt) => {
        $crate::Expression::identifier(::std::stringify!($symbol))
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __sexpr_encode {
    (strict; $value:expr) => {
        match $crate::to_expression(&$value) {
            ::std::result::Result::Ok(expression) => expression,
            ::std::result::Result::Err(err) => ::std::panic!(
                "sexpr!: cannot encode `{}`: {}",
                ::std::stringify!($value),
                err
            ),
        }
    };

    (fallible; $value:expr) => {
        $crate::to_expression(&$value)?
    };
}
