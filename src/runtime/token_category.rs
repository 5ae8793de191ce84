use crate::{CategoryID, Dfa, DfaStateID};

/// A named token category with the DFA that recognizes it.
#[derive(Debug, Clone)]
pub struct TokenCategory {
    /// The id of the category. Lower ids are declared first.
    pub(crate) id: CategoryID,
    /// The name of the category.
    pub(crate) name: String,
    /// The pattern the DFA was compiled from. None if the category was built from an NFA.
    pub(crate) pattern: Option<String>,
    /// The DFA that recognizes the tokens of this category.
    pub(crate) dfa: Dfa<u8>,
}

impl TokenCategory {
    /// The id of the category.
    pub fn id(&self) -> CategoryID {
        self.id
    }

    /// The name of the category.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The pattern of the category, if it was added from a pattern.
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    /// The compiled DFA of the category.
    pub fn dfa(&self) -> &Dfa<u8> {
        &self.dfa
    }
}

/// The state of a category while a token is scanned.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MatchingState {
    /// The consumed input is a proper prefix of a token of the category.
    #[default]
    PossibleMatch,
    /// The consumed input is a token of the category.
    Matched,
    /// The DFA has no transition for the last symbol.
    NoMatch,
}

/// Per-token bookkeeping of one category.
#[derive(Debug, Default, Clone)]
pub(crate) struct CategoryMatcher {
    // The current state of the DFA during matching
    current_state: DfaStateID,
    matching_state: MatchingState,
    // Number of symbols consumed since the token start
    consumed: usize,
    // The length of the longest match seen so far
    last_match: Option<usize>,
}

impl CategoryMatcher {
    #[inline]
    pub(crate) fn reset(&mut self) {
        *self = CategoryMatcher::default();
    }

    /// Advances the DFA by one symbol. Returns true if the category can still consume input.
    #[inline]
    pub(crate) fn advance(&mut self, dfa: &Dfa<u8>, symbol: u8) -> bool {
        if self.matching_state == MatchingState::NoMatch {
            return false;
        }
        match dfa.transition(self.current_state, &symbol) {
            Some(next_state) => {
                self.current_state = next_state;
                self.consumed += 1;
                if dfa.is_accepting(next_state) {
                    self.matching_state = MatchingState::Matched;
                    self.last_match = Some(self.consumed);
                } else {
                    self.matching_state = MatchingState::PossibleMatch;
                }
                true
            }
            None => {
                self.matching_state = MatchingState::NoMatch;
                false
            }
        }
    }

    #[inline]
    pub(crate) fn matching_state(&self) -> MatchingState {
        self.matching_state
    }

    /// The length of the longest match of the current token.
    #[inline]
    pub(crate) fn last_match(&self) -> Option<usize> {
        self.last_match
    }
}
