use std::borrow::Cow;

use crate::CategoryID;

use super::Position;

/// A token produced by the lexer.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Token {
    /// The matched bytes.
    pub data: Vec<u8>,
    /// The category that matched.
    pub category: CategoryID,
    /// The line of the first byte.
    pub line: usize,
    /// The column of the first byte.
    pub column: usize,
}

impl Token {
    /// Create a new token starting at the given position.
    pub fn new(data: Vec<u8>, category: CategoryID, start: Position) -> Self {
        Self {
            data,
            category,
            line: start.line,
            column: start.column,
        }
    }

    /// The matched bytes as text. Invalid UTF-8 is replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.data)
    }

    /// The position of the first byte.
    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    /// The number of matched bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the token has no bytes. Tokens from the lexer are never empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
