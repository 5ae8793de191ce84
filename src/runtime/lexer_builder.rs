use log::debug;

use crate::{compile_pattern, CategoryID, Dfa, Nfa, Result};

use super::{Lexer, TieBreak, TokenCategory};

/// A lexer builder is used to build a lexer.
#[derive(Debug, Default)]
pub struct LexerBuilder {
    /// The token categories in declaration order.
    pub(crate) categories: Vec<TokenCategory>,
    /// How a tie between equally long matches is resolved.
    pub(crate) tie_break: TieBreak,
}

impl LexerBuilder {
    /// Creates a new lexer builder.
    pub fn new() -> Self {
        Self {
            categories: Vec::new(),
            tie_break: TieBreak::default(),
        }
    }

    /// Adds a token category.
    ///
    /// The pattern is compiled, determinized and minimized right away, so syntax errors in the
    /// pattern are reported here. Returns the id of the new category.
    pub fn add_category<N, P>(&mut self, name: N, pattern: P) -> Result<CategoryID>
    where
        N: Into<String>,
        P: AsRef<str>,
    {
        let pattern = pattern.as_ref();
        let nfa = compile_pattern(pattern)?;
        Ok(self.push_category(name.into(), Some(pattern.to_string()), &nfa))
    }

    /// Adds a token category recognized by a prebuilt NFA.
    ///
    /// Patterns are limited to printable ASCII. An NFA built with [`Nfa::append_transition`]
    /// and the other primitives can match any byte, e.g. a newline.
    pub fn add_nfa_category<N: Into<String>>(&mut self, name: N, nfa: Nfa<u8>) -> CategoryID {
        self.push_category(name.into(), None, &nfa)
    }

    fn push_category(
        &mut self,
        name: String,
        pattern: Option<String>,
        nfa: &Nfa<u8>,
    ) -> CategoryID {
        let dfa = Dfa::from(nfa).minimize();
        let id = CategoryID::new(self.categories.len());
        debug!(
            "Category {} '{}': pattern {:?}, {} NFA nodes, {} DFA states",
            id,
            name,
            pattern,
            nfa.len(),
            dfa.states().len()
        );
        self.categories.push(TokenCategory {
            id,
            name,
            pattern,
            dfa,
        });
        id
    }

    /// Adds multiple token categories given as (name, pattern) pairs.
    pub fn add_categories<I, N, P>(&mut self, categories: I) -> Result<Vec<CategoryID>>
    where
        I: IntoIterator<Item = (N, P)>,
        N: Into<String>,
        P: AsRef<str>,
    {
        categories
            .into_iter()
            .map(|(name, pattern)| self.add_category(name, pattern))
            .collect()
    }

    /// Sets how a tie between equally long matches of different categories is resolved.
    pub fn tie_break(&mut self, tie_break: TieBreak) -> &mut Self {
        self.tie_break = tie_break;
        self
    }

    /// Builds the lexer from the lexer builder.
    pub fn build(self) -> Lexer {
        Lexer {
            categories: self.categories,
            tie_break: self.tie_break,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Label, RegexSyntaxError, ScanLexErrorKind};

    use super::*;

    #[test]
    fn test_add_categories_assigns_ids_in_order() {
        let mut builder = LexerBuilder::new();
        let ids = builder
            .add_categories([("A", "a"), ("B", "b"), ("A", "aa")])
            .unwrap();
        assert_eq!(
            ids,
            vec![CategoryID::new(0), CategoryID::new(1), CategoryID::new(2)]
        );
        let lexer = builder.build();
        assert_eq!(lexer.categories().len(), 3);
        assert_eq!(lexer.category(CategoryID::new(2)).unwrap().pattern(), Some("aa"));
        assert_eq!(lexer.category(CategoryID::new(2)).unwrap().name(), "A");
    }

    #[test]
    fn test_bad_pattern_is_reported() {
        let mut builder = LexerBuilder::new();
        let error = builder.add_category("BAD", "(a").unwrap_err();
        assert!(matches!(
            error.kind(),
            ScanLexErrorKind::RegexSyntaxError(RegexSyntaxError::InbalancedParens { .. })
        ));
        assert!(builder.categories.is_empty());
    }

    #[test]
    fn test_add_nfa_category() {
        let mut nfa = Nfa::new();
        nfa.append_transition(Label::Symbol(b'\n'));
        let mut builder = LexerBuilder::new();
        builder.add_category("A", "a").unwrap();
        let id = builder.add_nfa_category("NL", nfa);
        assert_eq!(id, CategoryID::new(1));
        let lexer = builder.build();
        let category = lexer.category(id).unwrap();
        assert_eq!(category.name(), "NL");
        assert_eq!(category.pattern(), None);
        assert!(category.dfa().accepts([b'\n']));
        assert!(!category.dfa().accepts([b'a']));
    }

    #[test]
    fn test_tie_break_setting() {
        let mut builder = LexerBuilder::new();
        builder.tie_break(TieBreak::FirstDeclared);
        assert_eq!(builder.build().tie_break(), TieBreak::FirstDeclared);
        assert_eq!(LexerBuilder::new().build().tie_break(), TieBreak::Error);
    }
}
