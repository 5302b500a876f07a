//! Demonstration lexer and grammar
//!
//! Three acceptors (even-length letter runs, the `&&` token, single spaces and
//! line breaks as trivia) and the grammar `#S -> ε | EVEN #S && #S`. Reading
//! `EVEN` as an opening bracket and `&&` as a closing one, the grammar accepts
//! balanced bracket sequences.

use super::char_types::is_letter;
use crate::lexical::{Acceptor, SharedAcceptor, StateId};
use crate::syntax::Grammar;
use crate::tokens::TRIVIA_CLASS;
use std::sync::Arc;

pub const EVEN_CLASS: &str = "EVEN";
pub const AND_CLASS: &str = "&&";
pub const START_SYMBOL: &str = "#S";

/// Words made of an even, non-zero number of ASCII letters
#[derive(Debug, Clone, Copy, Default)]
pub struct EvenLetterAcceptor;

impl Acceptor for EvenLetterAcceptor {
    fn lex_class(&self) -> &str {
        EVEN_CLASS
    }

    fn number_of_states(&self) -> usize {
        3
    }

    fn transition(&self, state: StateId, ch: char) -> StateId {
        match state {
            0 if is_letter(ch) => 1,
            1 if is_letter(ch) => 0,
            _ => 2,
        }
    }

    // The initial state accepts too, but the tokenizer never accepts an
    // empty match.
    fn accepting(&self, state: StateId) -> bool {
        state == 0
    }

    fn dead_state(&self) -> StateId {
        2
    }
}

/// Exactly `&&`
#[derive(Debug, Clone, Copy, Default)]
pub struct AndAcceptor;

impl Acceptor for AndAcceptor {
    fn lex_class(&self) -> &str {
        AND_CLASS
    }

    fn number_of_states(&self) -> usize {
        4
    }

    fn transition(&self, state: StateId, ch: char) -> StateId {
        match (state, ch) {
            (0, '&') => 1,
            (1, '&') => 2,
            _ => 3,
        }
    }

    fn accepting(&self, state: StateId) -> bool {
        state == 2
    }

    fn dead_state(&self) -> StateId {
        3
    }
}

/// One space or line break, emitted as trivia
#[derive(Debug, Clone, Copy, Default)]
pub struct SpaceAcceptor;

impl Acceptor for SpaceAcceptor {
    fn lex_class(&self) -> &str {
        TRIVIA_CLASS
    }

    fn number_of_states(&self) -> usize {
        3
    }

    fn transition(&self, state: StateId, ch: char) -> StateId {
        match (state, ch) {
            (0, ' ' | '\n' | '\r') => 1,
            _ => 2,
        }
    }

    fn accepting(&self, state: StateId) -> bool {
        state == 1
    }

    fn dead_state(&self) -> StateId {
        2
    }
}

/// Demo acceptors in priority order
pub fn demo_acceptors() -> Vec<SharedAcceptor> {
    vec![
        Arc::new(EvenLetterAcceptor),
        Arc::new(AndAcceptor),
        Arc::new(SpaceAcceptor),
    ]
}

/// `#S -> ε | EVEN #S && #S`
#[derive(Debug, Clone, Copy, Default)]
pub struct EvenAndGrammar;

impl Grammar for EvenAndGrammar {
    fn start_symbol(&self) -> &str {
        START_SYMBOL
    }

    fn table_entry(&self, nonterminal: &str, lookahead: Option<&str>) -> Option<Vec<String>> {
        if nonterminal != START_SYMBOL {
            return None;
        }
        match lookahead {
            None | Some(AND_CLASS) => Some(Vec::new()),
            Some(EVEN_CLASS) => Some(
                [EVEN_CLASS, START_SYMBOL, AND_CLASS, START_SYMBOL]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            ),
            Some(_) => None,
        }
    }
}
