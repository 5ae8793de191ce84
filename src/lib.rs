#![forbid(missing_docs)]
//! The `scanlex` crate provides a small regular expression engine and a longest-match lexer
//! built on top of it.
//!
//! Patterns are compiled with Thompson's construction into an NFA, which is turned into a DFA
//! by subset construction. A [`Lexer`] runs one DFA per token category in parallel and always
//! emits the longest match.

/// Module with error definitions
mod errors;
pub use errors::{RegexSyntaxError, Result, ScanLexError, ScanLexErrorKind};

/// Module that provides types for integer ids that can also be used to index into slices.
mod ids;
pub use ids::{CategoryID, DfaStateID, StateID};

/// Module with the symbol abstraction the automata are generic over.
mod symbol;
pub use symbol::{Symbol, SymbolSet};

/// The scanner module splits a pattern into pattern symbols.
mod scanner;
pub use scanner::{PatternScanner, PatternSymbol};

/// The nfa module contains the NFA implementation.
mod nfa;
pub use nfa::{Label, Nfa, NfaNode, NfaTransition, NodeFlags};

/// The compiler module translates patterns into NFAs.
mod compiler;
pub use compiler::compile_pattern;

/// The dfa module contains the subset construction and the DFA minimization.
mod dfa;
pub use dfa::{Dfa, DfaState};

/// Module with types shared by the lexer and its users.
mod common;
pub use common::{Position, Token};

/// Module that provides the lexer.
mod runtime;
pub use runtime::{ByteInput, Lexer, LexerBuilder, ReadInput, TieBreak, TokenCategory, Tokens};

/// Module with conversion to graphviz dot format
#[cfg(feature = "dot")]
mod dot;
#[cfg(feature = "dot")]
pub use dot::{dfa_render_to, nfa_render_to};
