//! The pattern scanner splits a pattern string into literal symbols and operator codes.
//!
//! The pattern dialect accepts printable ASCII (32..=126) only. The characters `(`, `)`, `*`,
//! `|` and `_` are operators; they and the backslash itself become literals when preceded by a
//! backslash.

use crate::{RegexSyntaxError, Result};

/// The characters that may follow a backslash.
pub(crate) const ESCAPABLE: &[u8] = b"\\()*|_";

/// A symbol produced by the pattern scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternSymbol {
    /// A literal byte.
    Literal(u8),
    /// The lambda operator `_` that matches the empty string.
    Lambda,
    /// The group opening operator `(`.
    GroupStart,
    /// The group closing operator `)`.
    GroupEnd,
    /// The Kleene closure operator `*`.
    Kleene,
    /// The alternation operator `|`.
    Alternation,
}

/// A lazy iterator over the [`PatternSymbol`]s of a pattern string.
///
/// The iterator stops after the first error. Symbols that were already produced stay valid.
#[derive(Debug, Clone)]
pub struct PatternScanner<'a> {
    pattern: &'a [u8],
    position: usize,
    failed: bool,
}

impl<'a> PatternScanner<'a> {
    /// Creates a new scanner over the given pattern.
    pub fn new(pattern: &'a str) -> Self {
        Self {
            pattern: pattern.as_bytes(),
            position: 0,
            failed: false,
        }
    }

    /// The byte offset of the next symbol to be scanned.
    pub fn position(&self) -> usize {
        self.position
    }

    fn is_printable(byte: u8) -> bool {
        (32..=126).contains(&byte)
    }

    fn scan(&mut self) -> Option<Result<PatternSymbol>> {
        let start = self.position;
        let byte = *self.pattern.get(start)?;
        if !Self::is_printable(byte) {
            return Some(Err(RegexSyntaxError::InvalidCharacter {
                character: byte,
                position: start,
            }
            .into()));
        }
        self.position += 1;
        let symbol = match byte {
            b'\\' => {
                let escaped = match self.pattern.get(self.position) {
                    Some(escaped) => *escaped,
                    // A trailing backslash escapes nothing
                    None => {
                        return Some(Err(RegexSyntaxError::InvalidEscapeSequence {
                            character: b'\\',
                            position: start,
                        }
                        .into()))
                    }
                };
                if !Self::is_printable(escaped) {
                    return Some(Err(RegexSyntaxError::InvalidCharacter {
                        character: escaped,
                        position: self.position,
                    }
                    .into()));
                }
                if !ESCAPABLE.contains(&escaped) {
                    return Some(Err(RegexSyntaxError::InvalidEscapeSequence {
                        character: escaped,
                        position: start,
                    }
                    .into()));
                }
                self.position += 1;
                PatternSymbol::Literal(escaped)
            }
            b'_' => PatternSymbol::Lambda,
            b'(' => PatternSymbol::GroupStart,
            b')' => PatternSymbol::GroupEnd,
            b'*' => PatternSymbol::Kleene,
            b'|' => PatternSymbol::Alternation,
            _ => PatternSymbol::Literal(byte),
        };
        Some(Ok(symbol))
    }
}

impl Iterator for PatternScanner<'_> {
    type Item = Result<PatternSymbol>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let result = self.scan();
        if matches!(result, Some(Err(_))) {
            self.failed = true;
        }
        result
    }
}

impl std::iter::FusedIterator for PatternScanner<'_> {}
