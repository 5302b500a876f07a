//! Lexical specification for Micro-Haskell
//!
//! Classes, highest priority first: comments and whitespace (trivia), the
//! keyword and punctuation tokens `if ( ) then ; else Bool Integer`, then
//! `BOOLEAN`, `SYM`, `VAR` and `NUM`. Keywords outrank `VAR` only on ties, so
//! `iffy` is still a variable.

use super::char_types::{is_digit, is_letter, is_newline, is_small, is_symbolic, is_whitespace};
use crate::lexical::{CharMatcher, LiteralAcceptor, SharedAcceptor, TableAcceptor};
use crate::tokens::TRIVIA_CLASS;

pub const VAR_CLASS: &str = "VAR";
pub const NUM_CLASS: &str = "NUM";
pub const BOOLEAN_CLASS: &str = "BOOLEAN";
pub const SYM_CLASS: &str = "SYM";

/// Tokens whose class is their own text, in priority order
pub const RESERVED_TOKENS: [&str; 8] = ["if", "(", ")", "then", ";", "else", "Bool", "Integer"];

/// Lowercase letter or `_`, then letters, digits and primes
pub fn var_acceptor() -> SharedAcceptor {
    TableAcceptor::new(VAR_CLASS, 3, 2)
        .edge(0, CharMatcher::Predicate(is_small), 1)
        .edge(
            1,
            CharMatcher::Predicate(|c| is_letter(c) || is_digit(c) || c == '\''),
            1,
        )
        .accept(1)
        .into_shared()
}

/// Decimal numerals; `0` alone, otherwise no leading zero
pub fn num_acceptor() -> SharedAcceptor {
    TableAcceptor::new(NUM_CLASS, 4, 3)
        .edge(0, CharMatcher::Exact('0'), 1)
        .edge(0, CharMatcher::Predicate(is_digit), 2)
        .edge(2, CharMatcher::Predicate(is_digit), 2)
        .accept(1)
        .accept(2)
        .into_shared()
}

/// `True` or `False`
pub fn boolean_acceptor() -> SharedAcceptor {
    TableAcceptor::new(BOOLEAN_CLASS, 9, 8)
        .edge(0, CharMatcher::Exact('T'), 1)
        .edge(0, CharMatcher::Exact('F'), 2)
        .edge(1, CharMatcher::Exact('r'), 7)
        .edge(7, CharMatcher::Exact('u'), 5)
        .edge(2, CharMatcher::Exact('a'), 3)
        .edge(3, CharMatcher::Exact('l'), 4)
        .edge(4, CharMatcher::Exact('s'), 5)
        .edge(5, CharMatcher::Exact('e'), 6)
        .accept(6)
        .into_shared()
}

/// Non-empty runs of symbolic characters
pub fn sym_acceptor() -> SharedAcceptor {
    TableAcceptor::new(SYM_CLASS, 3, 2)
        .edge(0, CharMatcher::Predicate(is_symbolic), 1)
        .edge(1, CharMatcher::Predicate(is_symbolic), 1)
        .accept(1)
        .into_shared()
}

pub fn whitespace_acceptor() -> SharedAcceptor {
    TableAcceptor::new(TRIVIA_CLASS, 3, 2)
        .edge(0, CharMatcher::Predicate(is_whitespace), 1)
        .edge(1, CharMatcher::Predicate(is_whitespace), 1)
        .accept(1)
        .into_shared()
}

/// Line comments: two or more dashes, then anything up to the line break
///
/// A symbolic character right after the dashes ends the comment, so `-->` is
/// left for `SYM`.
pub fn comment_acceptor() -> SharedAcceptor {
    TableAcceptor::new(TRIVIA_CLASS, 5, 4)
        .edge(0, CharMatcher::Exact('-'), 1)
        .edge(1, CharMatcher::Exact('-'), 2)
        .edge(2, CharMatcher::Exact('-'), 2)
        .edge(
            2,
            CharMatcher::Predicate(|c| !is_newline(c) && !is_symbolic(c)),
            3,
        )
        .edge(3, CharMatcher::Predicate(|c| !is_newline(c)), 3)
        .accept(2)
        .accept(3)
        .into_shared()
}

/// The full Micro-Haskell acceptor list in priority order
pub fn micro_haskell_acceptors() -> Vec<SharedAcceptor> {
    let mut acceptors = vec![comment_acceptor(), whitespace_acceptor()];
    acceptors.extend(RESERVED_TOKENS.iter().map(|tok| LiteralAcceptor::shared(tok)));
    acceptors.extend([
        boolean_acceptor(),
        sym_acceptor(),
        var_acceptor(),
        num_acceptor(),
    ]);
    acceptors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::{tokenize_all, LexerError};
    use crate::tokens::LexToken;
    use assert_matches::assert_matches;

    fn proper(text: &str) -> Vec<(String, String)> {
        tokenize_all(text, micro_haskell_acceptors())
            .unwrap()
            .into_iter()
            .filter(|t| !t.is_trivia())
            .map(|t: LexToken| (t.value().to_string(), t.lex_class().to_string()))
            .collect()
    }

    fn pairs(expected: &[(&str, &str)]) -> Vec<(String, String)> {
        expected
            .iter()
            .map(|(v, c)| (v.to_string(), c.to_string()))
            .collect()
    }

    #[test]
    fn test_priority_order() {
        let classes: Vec<String> = micro_haskell_acceptors()
            .iter()
            .map(|a| a.lex_class().to_string())
            .collect();
        assert_eq!(
            classes,
            vec![
                "", "", "if", "(", ")", "then", ";", "else", "Bool", "Integer", "BOOLEAN",
                "SYM", "VAR", "NUM"
            ]
        );
    }

    #[test]
    fn test_conditional_expression() {
        assert_eq!(
            proper("if x' then (f 10) else 0;"),
            pairs(&[
                ("if", "if"),
                ("x'", "VAR"),
                ("then", "then"),
                ("(", "("),
                ("f", "VAR"),
                ("10", "NUM"),
                (")", ")"),
                ("else", "else"),
                ("0", "NUM"),
                (";", ";"),
            ])
        );
    }

    #[test]
    fn test_keywords_lose_to_longer_variables() {
        assert_eq!(proper("iffy"), pairs(&[("iffy", "VAR")]));
        assert_eq!(proper("thenx"), pairs(&[("thenx", "VAR")]));
    }

    #[test]
    fn test_type_declaration() {
        assert_eq!(
            proper("fac :: Integer -> Integer ;"),
            pairs(&[
                ("fac", "VAR"),
                ("::", "SYM"),
                ("Integer", "Integer"),
                ("->", "SYM"),
                ("Integer", "Integer"),
                (";", ";"),
            ])
        );
    }

    #[test]
    fn test_booleans() {
        assert_eq!(
            proper("True False Bool"),
            pairs(&[
                ("True", "BOOLEAN"),
                ("False", "BOOLEAN"),
                ("Bool", "Bool"),
            ])
        );
    }

    #[test]
    fn test_leading_zero_splits_numerals() {
        assert_eq!(
            proper("007"),
            pairs(&[("0", "NUM"), ("0", "NUM"), ("7", "NUM")])
        );
        assert_eq!(proper("0"), pairs(&[("0", "NUM")]));
    }

    #[test]
    fn test_comments_are_trivia() {
        assert_eq!(
            proper("x -- trailing words\ny"),
            pairs(&[("x", "VAR"), ("y", "VAR")])
        );
        assert_eq!(proper("---\nz"), pairs(&[("z", "VAR")]));
    }

    #[test]
    fn test_dashes_followed_by_symbol_are_an_operator() {
        assert_eq!(proper("-->"), pairs(&[("-->", "SYM")]));
        assert_eq!(proper("a-b"), pairs(&[("a", "VAR"), ("-", "SYM"), ("b", "VAR")]));
    }

    #[test]
    fn test_capitalized_word_is_not_lexable() {
        let err = tokenize_all("Foo", micro_haskell_acceptors()).unwrap_err();
        assert_matches!(err, LexerError::UnrecognizedInput { ref text, .. } if text == "Fo");
    }
}
