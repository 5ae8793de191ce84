//! Alphabet symbols and sets of them.
//!
//! Every automaton in this crate is generic over its alphabet. The only requirement on a symbol
//! type is that it can be compared, ordered and hashed, which the [`Symbol`] trait bundles.

use std::collections::BTreeSet;
use std::fmt::Debug;
use std::hash::Hash;

/// A symbol of an automaton alphabet.
pub trait Symbol: Clone + Eq + Ord + Hash + Debug {
    /// A human readable label of the symbol, used when rendering automata.
    fn label(&self) -> String {
        format!("{:?}", self)
    }
}

impl Symbol for u8 {
    fn label(&self) -> String {
        std::ascii::escape_default(*self).to_string()
    }
}

impl Symbol for char {
    fn label(&self) -> String {
        self.escape_default().to_string()
    }
}

impl Symbol for u16 {}

impl Symbol for u32 {}

/// An ordered set of symbols.
///
/// Used as the alphabet of a DFA and as the label of an edge that is taken on more than one
/// symbol.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolSet<S: Symbol> {
    symbols: BTreeSet<S>,
}

impl<S: Symbol> SymbolSet<S> {
    /// Create an empty set.
    pub fn new() -> Self {
        Self {
            symbols: BTreeSet::new(),
        }
    }

    /// Insert a symbol. Returns false if it was already present.
    pub fn insert(&mut self, symbol: S) -> bool {
        self.symbols.insert(symbol)
    }

    /// Returns true if the set contains the symbol.
    pub fn contains(&self, symbol: &S) -> bool {
        self.symbols.contains(symbol)
    }

    /// The number of symbols in the set.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns true if the set has no symbols.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Iterate over the symbols in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &S> {
        self.symbols.iter()
    }

    /// A rendering label listing all symbols of the set.
    pub fn label(&self) -> String {
        if self.symbols.len() == 1 {
            return self.symbols.iter().map(Symbol::label).collect();
        }
        let inner: Vec<String> = self.symbols.iter().map(Symbol::label).collect();
        format!("[{}]", inner.join(","))
    }
}

impl<S: Symbol> Default for SymbolSet<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Symbol> FromIterator<S> for SymbolSet<S> {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            symbols: iter.into_iter().collect(),
        }
    }
}

impl<S: Symbol> Extend<S> for SymbolSet<S> {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.symbols.extend(iter)
    }
}

impl<'a, S: Symbol> IntoIterator for &'a SymbolSet<S> {
    type Item = &'a S;
    type IntoIter = std::collections::btree_set::Iter<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.symbols.iter()
    }
}
