//! This module contains the recursive descent compiler that turns a pattern into an NFA.
//!
//! Operator precedence from strongest to weakest binding: postfix `*`, implicit concatenation,
//! alternation `|`. The `*` operator only applies to the unit directly in front of it, which is
//! either a single literal (or lambda) or a parenthesized group.

use log::debug;

use crate::{Label, Nfa, PatternScanner, PatternSymbol, RegexSyntaxError, Result};

/// The last atom of a sequence, held back so that a following `*` can still apply to it.
enum Unit {
    Literal(Label<u8>),
    Nfa(Nfa<u8>),
}

impl Unit {
    fn into_nfa(self) -> Nfa<u8> {
        match self {
            Unit::Literal(label) => {
                let mut nfa = Nfa::new();
                nfa.append_transition(label);
                nfa
            }
            Unit::Nfa(nfa) => nfa,
        }
    }
}

/// Why a (sub-)expression ended.
enum Terminator {
    End,
    GroupEnd(usize),
}

struct Compiler<'a> {
    scanner: PatternScanner<'a>,
}

impl<'a> Compiler<'a> {
    fn new(pattern: &'a str) -> Self {
        Self {
            scanner: PatternScanner::new(pattern),
        }
    }

    fn flush(nfa: &mut Nfa<u8>, unit: Option<Unit>) {
        match unit {
            None => {}
            Some(Unit::Literal(label)) => nfa.append_transition(label),
            Some(Unit::Nfa(other)) => nfa.append_nfa(other),
        }
    }

    /// Compiles symbols until the end of the pattern or a closing parenthesis. An alternation
    /// compiles its right-hand side recursively and ends the expression with it.
    fn compile_expression(&mut self) -> Result<(Nfa<u8>, Terminator)> {
        let mut nfa = Nfa::new();
        let mut unit: Option<Unit> = None;
        loop {
            let position = self.scanner.position();
            let symbol = match self.scanner.next() {
                Some(symbol) => symbol?,
                None => {
                    Self::flush(&mut nfa, unit);
                    return Ok((nfa, Terminator::End));
                }
            };
            match symbol {
                PatternSymbol::Literal(byte) => {
                    Self::flush(&mut nfa, unit.take());
                    unit = Some(Unit::Literal(Label::Symbol(byte)));
                }
                PatternSymbol::Lambda => {
                    Self::flush(&mut nfa, unit.take());
                    unit = Some(Unit::Literal(Label::Epsilon));
                }
                PatternSymbol::GroupStart => {
                    Self::flush(&mut nfa, unit.take());
                    match self.compile_expression()? {
                        (group, Terminator::GroupEnd(_)) => unit = Some(Unit::Nfa(group)),
                        (_, Terminator::End) => {
                            return Err(RegexSyntaxError::InbalancedParens { position }.into())
                        }
                    }
                }
                PatternSymbol::GroupEnd => {
                    Self::flush(&mut nfa, unit);
                    return Ok((nfa, Terminator::GroupEnd(position)));
                }
                PatternSymbol::Kleene => {
                    // A leading `*` has nothing to repeat
                    if let Some(repeated) = unit.take() {
                        let mut repeated = repeated.into_nfa();
                        repeated.apply_kleene();
                        unit = Some(Unit::Nfa(repeated));
                    }
                }
                PatternSymbol::Alternation => {
                    Self::flush(&mut nfa, unit);
                    let (branch, terminator) = self.compile_expression()?;
                    nfa.add_branch(branch);
                    return Ok((nfa, terminator));
                }
            }
        }
    }
}

/// Compiles a pattern into an NFA.
///
/// Fails with a [`RegexSyntaxError`] if the pattern contains invalid characters or escape
/// sequences or if its parentheses are not balanced.
pub fn compile_pattern(pattern: &str) -> Result<Nfa<u8>> {
    let mut compiler = Compiler::new(pattern);
    match compiler.compile_expression()? {
        (nfa, Terminator::End) => {
            debug!("Compiled pattern '{}' into {} NFA nodes", pattern, nfa.len());
            Ok(nfa)
        }
        (_, Terminator::GroupEnd(position)) => {
            Err(RegexSyntaxError::InbalancedParens { position }.into())
        }
    }
}

impl TryFrom<&str> for Nfa<u8> {
    type Error = crate::ScanLexError;

    fn try_from(pattern: &str) -> Result<Self> {
        compile_pattern(pattern)
    }
}

#[cfg(test)]
mod tests {
    use crate::{nfa::tests::assert_invariants, ScanLexErrorKind, StateID};

    use super::*;

    fn compile(pattern: &str) -> Nfa<u8> {
        let nfa = compile_pattern(pattern).unwrap();
        assert_invariants(&nfa);
        nfa
    }

    fn compile_error(pattern: &str) -> RegexSyntaxError {
        match compile_pattern(pattern) {
            Err(e) => match e.kind() {
                ScanLexErrorKind::RegexSyntaxError(e) => e.clone(),
                other => panic!("unexpected error kind {:?}", other),
            },
            Ok(nfa) => panic!("pattern {} compiled to {:?}", pattern, nfa),
        }
    }

    fn accepts(nfa: &Nfa<u8>, input: &str) -> bool {
        nfa.accepts(input.bytes())
    }

    #[test]
    fn test_literal_sequence_is_a_chain() {
        let nfa = compile("abc");
        assert_eq!(nfa.len(), 4);
        assert_eq!(nfa.end_state(), StateID::new(3));
        for (i, node) in nfa.nodes().iter().take(3).enumerate() {
            assert_eq!(node.transitions().len(), 1);
            assert_eq!(node.transitions()[0].label(), &Label::Symbol(b"abc"[i]));
            assert_eq!(node.transitions()[0].target_state(), StateID::new(i + 1));
        }
    }

    #[test]
    fn test_compiled_matches_manual_construction() {
        let mut manual = Nfa::new();
        manual.append_transition(Label::Symbol(b'a'));
        manual.apply_kleene();
        assert_eq!(compile("a*"), manual);

        let mut manual = Nfa::new();
        manual.append_transition(Label::Symbol(b'a'));
        let mut b = Nfa::new();
        b.append_transition(Label::Symbol(b'b'));
        manual.add_branch(b);
        assert_eq!(compile("a|b"), manual);
    }

    #[test]
    fn test_kleene_binds_to_last_literal() {
        let nfa = compile("ab*");
        assert_eq!(nfa.len(), 6);
        assert!(accepts(&nfa, "a"));
        assert!(accepts(&nfa, "ab"));
        assert!(accepts(&nfa, "abbb"));
        assert!(!accepts(&nfa, "abab"));
        assert!(!accepts(&nfa, ""));
    }

    #[test]
    fn test_kleene_binds_to_group() {
        let nfa = compile("(ab)*");
        assert!(accepts(&nfa, ""));
        assert!(accepts(&nfa, "ab"));
        assert!(accepts(&nfa, "abab"));
        assert!(!accepts(&nfa, "abb"));
        assert!(!accepts(&nfa, "a"));
    }

    #[test]
    fn test_repeated_kleene() {
        assert_eq!(compile("a**"), compile("a*"));
        assert_eq!(compile("(a*)*").len(), compile("a*").len());
    }

    #[test]
    fn test_leading_kleene_is_ignored() {
        assert_eq!(compile("*a"), compile("a"));
        let nfa = compile("a|*b");
        assert!(accepts(&nfa, "a"));
        assert!(accepts(&nfa, "b"));
    }

    #[test]
    fn test_alternation_has_lowest_precedence() {
        let nfa = compile("ab|c");
        assert!(accepts(&nfa, "ab"));
        assert!(accepts(&nfa, "c"));
        assert!(!accepts(&nfa, "ac"));
        assert!(!accepts(&nfa, "abc"));

        let nfa = compile("a|b|c");
        for input in ["a", "b", "c"] {
            assert!(accepts(&nfa, input));
        }
        assert!(!accepts(&nfa, "ab"));
    }

    #[test]
    fn test_alternation_inside_group() {
        let nfa = compile("x(a|bc)*y");
        assert!(accepts(&nfa, "xy"));
        assert!(accepts(&nfa, "xay"));
        assert!(accepts(&nfa, "xbcaay"));
        assert!(!accepts(&nfa, "xby"));
    }

    #[test]
    fn test_lambda() {
        let nfa = compile("a_b");
        assert!(accepts(&nfa, "ab"));
        let nfa = compile("a(b|_)");
        assert!(accepts(&nfa, "a"));
        assert!(accepts(&nfa, "ab"));
        assert!(!accepts(&nfa, "abb"));
    }

    #[test]
    fn test_escaped_literals() {
        let nfa = compile("\\(\\*\\)\\|\\_\\\\");
        assert!(accepts(&nfa, "(*)|_\\"));
        assert_eq!(nfa.len(), 7);
    }

    #[test]
    fn test_empty_pattern() {
        let nfa = compile("");
        assert!(nfa.is_empty());
        assert!(accepts(&nfa, ""));
        assert!(compile("()").has_no_transitions());
    }

    #[test]
    fn test_unterminated_group() {
        assert_eq!(
            compile_error("a(bc"),
            RegexSyntaxError::InbalancedParens { position: 1 }
        );
        assert_eq!(
            compile_error("((a)"),
            RegexSyntaxError::InbalancedParens { position: 0 }
        );
        assert_eq!(
            compile_error("(a|b"),
            RegexSyntaxError::InbalancedParens { position: 0 }
        );
    }

    #[test]
    fn test_unopened_group() {
        assert_eq!(
            compile_error("ab)"),
            RegexSyntaxError::InbalancedParens { position: 2 }
        );
        assert_eq!(
            compile_error("a|b)c"),
            RegexSyntaxError::InbalancedParens { position: 3 }
        );
    }

    #[test]
    fn test_scanner_errors_abort_compilation() {
        assert_eq!(
            compile_error("(a\\b)"),
            RegexSyntaxError::InvalidEscapeSequence {
                character: b'b',
                position: 2
            }
        );
        assert!(matches!(
            compile_error("a\nb"),
            RegexSyntaxError::InvalidCharacter {
                character: b'\n',
                position: 1
            }
        ));
    }

    #[test]
    fn test_try_from_str() {
        let nfa: Nfa = "a|b".try_into().unwrap();
        assert_eq!(nfa, compile("a|b"));
        assert!(Nfa::<u8>::try_from("(").is_err());
    }
}
