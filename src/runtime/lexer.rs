use std::io::Read;

use crate::{CategoryID, Result, ScanLexError};

use super::{LexerBuilder, TokenCategory, Tokens};

/// How the lexer resolves a tie between categories that match equally long prefixes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TieBreak {
    /// A tie is a syntax error.
    #[default]
    Error,
    /// The category declared first wins.
    FirstDeclared,
}

/// The input iterator of [`Lexer::tokens`].
pub type ByteInput<I> = std::iter::Map<I, fn(u8) -> Result<u8>>;

/// The input iterator of [`Lexer::tokens_from_read`].
pub type ReadInput<R> = std::iter::Map<std::io::Bytes<R>, fn(std::io::Result<u8>) -> Result<u8>>;

/// A longest-match lexer over a set of token categories.
///
/// Every category is matched by its own DFA. For each token all DFAs are advanced in parallel
/// by one byte at a time until none of them can continue. The category with the longest match
/// wins and the bytes consumed beyond that match are scanned again for the next token.
#[derive(Debug, Clone)]
pub struct Lexer {
    /// The token categories in declaration order.
    pub(crate) categories: Vec<TokenCategory>,
    /// How a tie between equally long matches is resolved.
    pub(crate) tie_break: TieBreak,
}

impl Lexer {
    /// Creates a new lexer builder.
    pub fn builder() -> LexerBuilder {
        LexerBuilder::new()
    }

    /// The token categories in declaration order.
    pub fn categories(&self) -> &[TokenCategory] {
        &self.categories
    }

    /// The category with the given id.
    pub fn category(&self, id: CategoryID) -> Option<&TokenCategory> {
        self.categories.get(id.as_usize())
    }

    /// The policy for equally long matches.
    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// Returns an iterator over the tokens of an infallible byte sequence.
    pub fn tokens<I>(&self, input: I) -> Tokens<'_, ByteInput<I::IntoIter>>
    where
        I: IntoIterator<Item = u8>,
    {
        let to_result: fn(u8) -> Result<u8> = Ok;
        Tokens::new(self, input.into_iter().map(to_result))
    }

    /// Returns an iterator over the tokens read from `reader`.
    /// I/O errors end the token stream.
    pub fn tokens_from_read<R: Read>(&self, reader: R) -> Tokens<'_, ReadInput<R>> {
        let to_result: fn(std::io::Result<u8>) -> Result<u8> =
            |byte| byte.map_err(ScanLexError::from);
        Tokens::new(self, reader.bytes().map(to_result))
    }

    /// Returns an iterator over the tokens of a fallible byte sequence.
    /// The first input error ends the token stream.
    pub fn try_tokens<I>(&self, input: I) -> Tokens<'_, I::IntoIter>
    where
        I: IntoIterator<Item = Result<u8>>,
    {
        Tokens::new(self, input.into_iter())
    }
}
