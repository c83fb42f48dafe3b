#![allow(clippy::module_inception)]

use std::fmt::Display;

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod session;
pub mod type_checker;

extern crate regex;

/// A 1-based line and column pair attached to every token and AST node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    pub fn new(line: u32, column: u32) -> Self {
        SourceLocation { line, column }
    }

    pub fn null() -> Self {
        SourceLocation { line: 0, column: 0 }
    }
}

impl Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Returns the text of the given 1-based line, without its line terminator.
pub fn get_line_at_location(source: &str, location: SourceLocation) -> Option<&str> {
    if location.line == 0 {
        return None;
    }

    source
        .split('\n')
        .nth(location.line as usize - 1)
        .map(|line| line.trim_end_matches('\r'))
}

#[cfg(test)]
mod tests {
    use super::{get_line_at_location, SourceLocation};

    #[test]
    fn test_get_line_at_location() {
        let source = "Hello, world!\nsecond\r\n\nTesting { }\n";

        assert_eq!(get_line_at_location(source, SourceLocation::new(1, 10)), Some("Hello, world!"));
        assert_eq!(get_line_at_location(source, SourceLocation::new(2, 1)), Some("second"));
        assert_eq!(get_line_at_location(source, SourceLocation::new(4, 8)), Some("Testing { }"));
        assert_eq!(get_line_at_location(source, SourceLocation::null()), None);
        assert_eq!(get_line_at_location(source, SourceLocation::new(9, 1)), None);
    }

    #[test]
    fn test_location_display() {
        assert_eq!(SourceLocation::new(3, 14).to_string(), "3:14");
    }
}
