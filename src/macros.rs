//! Utility macros for the lexer.
//!
//! - `MK_TOKEN!` - Creates a Token instance
//! - `MK_DEFAULT_HANDLER!` - Creates a lexer handler for fixed punctuation

/// Creates a Token instance.
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::Number, "42".to_string(), location);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $value:expr, $location:expr) => {
        Token {
            kind: $kind,
            value: $value,
            location: $location,
        }
    };
}

/// Creates a lexer handler that emits the matched text as a token of `$kind`.
///
/// ```ignore
/// RegexPattern {
///     regex: Regex::new("^\\(").unwrap(),
///     handler: MK_DEFAULT_HANDLER!(TokenKind::OpenParen),
/// }
/// ```
#[macro_export]
macro_rules! MK_DEFAULT_HANDLER {
    ($kind:expr) => {
        |lexer: &mut Lexer, matched: &str| -> Result<Option<Token>, Error> {
            let location = lexer.location();
            lexer.advance_str(matched);
            Ok(Some(MK_TOKEN!($kind, String::from(matched), location)))
        }
    };
}
