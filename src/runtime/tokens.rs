use std::collections::VecDeque;

use log::trace;

use crate::{common::Position, CategoryID, Result, ScanLexError, Token};

use super::{token_category::CategoryMatcher, Lexer, TieBreak};

const NO_MATCH: &str = "no expression matched";
const UNEXPECTED_END: &str = "end of stream reached without completing last token";

/// An iterator over the tokens of an input.
///
/// The iterator yields `Ok(Token)` until the input is exhausted. The first error is yielded
/// once and ends the iteration; tokens yielded before it stay valid.
///
/// The lifetime parameter `'l` represents the lifetime of the `Lexer` that produced this
/// iterator.
///
/// This iterator can be created with the [`Lexer::tokens`] method and its siblings.
#[derive(Debug)]
pub struct Tokens<'l, I> {
    lexer: &'l Lexer,
    input: I,
    // Bytes that were consumed beyond the last token, replayed before new input.
    pending: VecDeque<u8>,
    matchers: Vec<CategoryMatcher>,
    position: Position,
    finished: bool,
}

impl<'l, I> Tokens<'l, I>
where
    I: Iterator<Item = Result<u8>>,
{
    /// Creates a new `Tokens` iterator.
    pub fn new(lexer: &'l Lexer, input: I) -> Self {
        Tokens {
            lexer,
            input,
            pending: VecDeque::new(),
            matchers: vec![CategoryMatcher::default(); lexer.categories.len()],
            position: Position::default(),
            finished: false,
        }
    }

    /// The position of the next byte to be tokenized.
    pub fn position(&self) -> Position {
        self.position
    }

    #[inline]
    fn next_symbol(&mut self) -> Option<Result<u8>> {
        match self.pending.pop_front() {
            Some(symbol) => Some(Ok(symbol)),
            None => self.input.next(),
        }
    }

    /// Feeds one symbol to all categories that are still alive.
    /// Returns true if at least one of them can consume more input.
    fn advance(&mut self, symbol: u8) -> bool {
        let mut alive = false;
        for (matcher, category) in self.matchers.iter_mut().zip(&self.lexer.categories) {
            alive |= matcher.advance(&category.dfa, symbol);
        }
        alive
    }

    /// Selects the category with the longest match and returns it with the match length.
    fn select_longest_match(&self) -> Result<Option<(CategoryID, usize)>> {
        let mut best: Option<(CategoryID, usize)> = None;
        let mut tied: Option<CategoryID> = None;
        for (matcher, category) in self.matchers.iter().zip(&self.lexer.categories) {
            let Some(length) = matcher.last_match() else {
                continue;
            };
            match best {
                Some((_, best_length)) if length < best_length => {}
                Some((_, best_length)) if length == best_length => {
                    tied.get_or_insert(category.id);
                }
                _ => {
                    best = Some((category.id, length));
                    tied = None;
                }
            }
        }
        match (best, tied) {
            (Some((winner, _)), Some(other)) if self.lexer.tie_break == TieBreak::Error => {
                let name = |id: CategoryID| self.lexer.categories[id].name.as_str();
                Err(ScanLexError::syntax(
                    format!(
                        "ambiguous match between '{}' and '{}'",
                        name(winner),
                        name(other)
                    ),
                    self.position.line,
                    self.position.column,
                ))
            }
            _ => Ok(best),
        }
    }

    /// Scans the next token. Returns `Ok(None)` at the end of the input.
    fn next_token(&mut self) -> Result<Option<Token>> {
        self.matchers.iter_mut().for_each(CategoryMatcher::reset);

        let mut data: Vec<u8> = Vec::new();
        let mut alive = true;
        while alive {
            let symbol = match self.next_symbol() {
                Some(symbol) => symbol?,
                None => break,
            };
            data.push(symbol);
            alive = self.advance(symbol);
            trace!(
                "'{}' at {}+{}: alive {}",
                std::ascii::escape_default(symbol),
                self.position,
                data.len() - 1,
                alive
            );
        }

        if data.is_empty() {
            return Ok(None);
        }

        let Some((category, length)) = self.select_longest_match()? else {
            // Categories that are still alive ran out of input
            let message = if alive { UNEXPECTED_END } else { NO_MATCH };
            return Err(ScanLexError::syntax(
                message,
                self.position.line,
                self.position.column,
            ));
        };

        // Push back what was consumed beyond the match, keeping the original order.
        for symbol in data.drain(length..).rev() {
            self.pending.push_front(symbol);
        }

        let token = Token::new(data, category, self.position);
        for symbol in &token.data {
            self.position.advance(*symbol);
        }
        trace!(
            "Token {} '{}' at {}:{}",
            category,
            token.text().escape_default(),
            token.line,
            token.column
        );
        Ok(Some(token))
    }
}

impl<I> Iterator for Tokens<'_, I>
where
    I: Iterator<Item = Result<u8>>,
{
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_token() {
            Ok(Some(token)) => Some(Ok(token)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(error) => {
                self.finished = true;
                Some(Err(error))
            }
        }
    }
}

impl<I> std::iter::FusedIterator for Tokens<'_, I> where I: Iterator<Item = Result<u8>> {}

#[cfg(test)]
mod tests {
    use crate::{Label, Nfa, ScanLexErrorKind};

    use super::*;

    const DIGIT: &str = "(0|1|2|3|4|5|6|7|8|9)";
    const LETTER: &str = "(a|b|c|d|e|f|g|h|i|j|k|l|m|n|o|p|q|r|s|t|u|v|w|x|y|z)";

    // Initialize the logger for the tests
    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn lexer(categories: &[(&str, String)], tie_break: TieBreak) -> Lexer {
        init();
        let mut builder = Lexer::builder();
        for (name, pattern) in categories {
            builder.add_category(*name, pattern).unwrap();
        }
        builder.tie_break(tie_break);
        builder.build()
    }

    // Newlines are not printable, so their category is built from an NFA
    fn newline() -> Nfa<u8> {
        let mut nfa = Nfa::new();
        nfa.append_transition(Label::Symbol(b'\n'));
        nfa
    }

    fn num_id_lexer() -> Lexer {
        init();
        let mut builder = Lexer::builder();
        builder
            .add_categories([
                ("NUM", format!("{}{}*", DIGIT, DIGIT)),
                ("ID", format!("{}{}*", LETTER, LETTER)),
                ("WS", " ( )*".to_string()),
            ])
            .unwrap();
        builder.add_nfa_category("NL", newline());
        builder.build()
    }

    fn syntax_error(result: Result<Token>) -> (String, usize, usize) {
        match result.unwrap_err().kind() {
            ScanLexErrorKind::SyntaxError {
                message,
                line,
                column,
            } => (message.clone(), *line, *column),
            other => panic!("unexpected error kind {:?}", other),
        }
    }

    #[test]
    fn test_longest_match_with_push_back() {
        let lexer = num_id_lexer();
        let tokens: Vec<Token> = lexer
            .tokens(b"12ab".iter().copied())
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::new(b"12".to_vec(), CategoryID::new(0), Position::new(1, 1)),
                Token::new(b"ab".to_vec(), CategoryID::new(1), Position::new(1, 3)),
            ]
        );
    }

    #[test]
    fn test_line_and_column() {
        let lexer = num_id_lexer();
        let tokens: Vec<Token> = lexer
            .tokens(b"x 1\n  yz\n7".iter().copied())
            .collect::<Result<_>>()
            .unwrap();
        let positions: Vec<(String, usize, usize)> = tokens
            .iter()
            .map(|t| (t.text().into_owned(), t.line, t.column))
            .collect();
        assert_eq!(
            positions,
            vec![
                ("x".to_string(), 1, 1),
                (" ".to_string(), 1, 2),
                ("1".to_string(), 1, 3),
                ("\n".to_string(), 1, 4),
                ("  ".to_string(), 2, 1),
                ("yz".to_string(), 2, 3),
                ("\n".to_string(), 2, 5),
                ("7".to_string(), 3, 1),
            ]
        );
    }

    #[test]
    fn test_unmatched_byte_is_a_syntax_error() {
        let lexer = num_id_lexer();
        let mut tokens = lexer.tokens(b"12#ab".iter().copied());
        assert_eq!(tokens.next().unwrap().unwrap().data, b"12");
        let (message, line, column) = syntax_error(tokens.next().unwrap());
        assert_eq!(message, NO_MATCH);
        assert_eq!((line, column), (1, 3));
        assert!(tokens.next().is_none());
        assert!(tokens.next().is_none());
    }

    #[test]
    fn test_truncated_input_is_a_syntax_error() {
        let lexer = lexer(&[("KW", "begin".to_string())], TieBreak::Error);
        let mut tokens = lexer.tokens(b"beginbeg".iter().copied());
        assert_eq!(tokens.next().unwrap().unwrap().text(), "begin");
        let (message, line, column) = syntax_error(tokens.next().unwrap());
        assert_eq!(message, UNEXPECTED_END);
        assert_eq!((line, column), (1, 6));
        assert!(tokens.next().is_none());
    }

    #[test]
    fn test_shorter_match_is_emitted_at_end_of_input() {
        // At the end of input the longest match so far wins, even though "begin" could still
        // have continued. The remaining "eg" then matches nothing.
        let lexer = lexer(
            &[("A", "b".to_string()), ("KW", "begin".to_string())],
            TieBreak::Error,
        );
        let mut tokens = lexer.tokens(b"beg".iter().copied());
        let token = tokens.next().unwrap().unwrap();
        assert_eq!(token.data, b"b");
        assert_eq!(token.category, CategoryID::new(0));
        let (message, line, column) = syntax_error(tokens.next().unwrap());
        assert_eq!(message, NO_MATCH);
        assert_eq!((line, column), (1, 2));
        assert!(tokens.next().is_none());
    }

    #[test]
    fn test_backtracks_to_last_accepting_prefix() {
        // "ab" is a token, "abcd" is a token, "abc" is not
        let lexer = lexer(
            &[
                ("AB", "ab".to_string()),
                ("ABCD", "abcd".to_string()),
                ("C", "c".to_string()),
            ],
            TieBreak::Error,
        );
        let tokens: Vec<String> = lexer
            .tokens(b"abcab".iter().copied())
            .map(|t| t.unwrap().text().into_owned())
            .collect();
        assert_eq!(tokens, vec!["ab", "c", "ab"]);
    }

    #[test]
    fn test_tie_is_an_error_by_default() {
        let categories = [
            ("IF", "if".to_string()),
            ("ID", format!("{}{}*", LETTER, LETTER)),
        ];
        let lexer = lexer(&categories, TieBreak::Error);
        let mut tokens = lexer.tokens(b"iff".iter().copied());
        // The longer match is not a tie
        assert_eq!(tokens.next().unwrap().unwrap().category, CategoryID::new(1));

        let mut tokens = lexer.tokens(b"if".iter().copied());
        let (message, _, _) = syntax_error(tokens.next().unwrap());
        assert!(message.contains("ambiguous"), "{}", message);
        assert!(tokens.next().is_none());
    }

    #[test]
    fn test_tie_first_declared() {
        let categories = [
            ("IF", "if".to_string()),
            ("ID", format!("{}{}*", LETTER, LETTER)),
        ];
        let lexer = lexer(&categories, TieBreak::FirstDeclared);
        let tokens: Vec<CategoryID> = lexer
            .tokens(b"if".iter().copied())
            .map(|t| t.unwrap().category)
            .collect();
        assert_eq!(tokens, vec![CategoryID::new(0)]);
    }

    #[test]
    fn test_empty_input() {
        let lexer = num_id_lexer();
        assert!(lexer.tokens(std::iter::empty()).next().is_none());
    }

    #[test]
    fn test_category_accepting_empty_string_does_not_match_empty() {
        let lexer = lexer(&[("AS", "a*".to_string())], TieBreak::Error);
        let mut tokens = lexer.tokens(b"aab".iter().copied());
        assert_eq!(tokens.next().unwrap().unwrap().data, b"aa");
        let (message, _, column) = syntax_error(tokens.next().unwrap());
        assert_eq!(message, NO_MATCH);
        assert_eq!(column, 3);
    }

    #[test]
    fn test_input_error_ends_stream() {
        let lexer = num_id_lexer();
        let input: Vec<Result<u8>> = vec![
            Ok(b'1'),
            Ok(b'a'),
            Err(std::io::Error::new(std::io::ErrorKind::Other, "boom").into()),
            Ok(b'2'),
        ];
        let mut tokens = lexer.try_tokens(input);
        assert_eq!(tokens.next().unwrap().unwrap().data, b"1");
        let error = tokens.next().unwrap().unwrap_err();
        assert!(matches!(error.kind(), ScanLexErrorKind::IoError(_)));
        assert!(tokens.next().is_none());
    }

    #[test]
    fn test_tokens_from_read() {
        let lexer = num_id_lexer();
        let reader = std::io::Cursor::new(b"abc 42".to_vec());
        let tokens: Vec<String> = lexer
            .tokens_from_read(reader)
            .map(|t| t.unwrap().text().into_owned())
            .collect();
        assert_eq!(tokens, vec!["abc", " ", "42"]);
    }
}
