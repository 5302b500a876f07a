//! Deterministic acceptors for lexical classes
//!
//! An `Acceptor` is an immutable DFA description: states are
//! `0..number_of_states()`, state 0 is initial, and one state is dead (never
//! accepting again once entered). The tokenizer drives each acceptor through
//! an `Automaton`, which owns the current state for one session and checks
//! every transition against the declared state range.

use super::LexerError;
use std::fmt;
use std::sync::Arc;

/// DFA state index; signed so that out-of-range results can be reported
pub type StateId = i32;

/// Shared, immutable acceptor definition
pub type SharedAcceptor = Arc<dyn Acceptor>;

pub trait Acceptor: Send + Sync {
    /// Class tag for tokens this acceptor wins; empty marks trivia
    fn lex_class(&self) -> &str;

    fn number_of_states(&self) -> usize;

    /// Total transition function; may return any value, including illegal ones
    fn transition(&self, state: StateId, ch: char) -> StateId;

    fn accepting(&self, state: StateId) -> bool;

    fn dead_state(&self) -> StateId;
}

impl fmt::Debug for dyn Acceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Acceptor")
            .field("lex_class", &self.lex_class())
            .field("number_of_states", &self.number_of_states())
            .finish()
    }
}

/// Per-session run of an acceptor
#[derive(Debug, Clone)]
pub struct Automaton {
    acceptor: SharedAcceptor,
    state: StateId,
}

impl Automaton {
    pub fn new(acceptor: SharedAcceptor) -> Self {
        Self { acceptor, state: 0 }
    }

    pub fn reset(&mut self) {
        self.state = 0;
    }

    /// Feed one character, rejecting transitions outside the declared states
    pub fn step(&mut self, ch: char) -> Result<(), LexerError> {
        let next = self.acceptor.transition(self.state, ch);
        let in_range = usize::try_from(next)
            .map(|n| n < self.acceptor.number_of_states())
            .unwrap_or(false);

        if !in_range {
            return Err(LexerError::IllegalState {
                state: next,
                lex_class: self.acceptor.lex_class().to_string(),
            });
        }

        self.state = next;
        Ok(())
    }

    pub fn state(&self) -> StateId {
        self.state
    }

    pub fn is_accepting(&self) -> bool {
        self.acceptor.accepting(self.state)
    }

    pub fn is_dead(&self) -> bool {
        self.state == self.acceptor.dead_state()
    }

    pub fn lex_class(&self) -> &str {
        self.acceptor.lex_class()
    }
}

// ============================================================================
// GENERIC ACCEPTORS
// ============================================================================

/// Accepts exactly one fixed string; the class is the string itself
///
/// State `i` means the first `i` characters matched; state `len` accepts and
/// state `len + 1` is dead.
#[derive(Debug, Clone)]
pub struct LiteralAcceptor {
    literal: Vec<char>,
    lex_class: String,
}

impl LiteralAcceptor {
    pub fn new(literal: &str) -> Self {
        Self {
            literal: literal.chars().collect(),
            lex_class: literal.to_string(),
        }
    }

    pub fn shared(literal: &str) -> SharedAcceptor {
        Arc::new(Self::new(literal))
    }

    fn len(&self) -> StateId {
        self.literal.len() as StateId
    }
}

impl Acceptor for LiteralAcceptor {
    fn lex_class(&self) -> &str {
        &self.lex_class
    }

    fn number_of_states(&self) -> usize {
        self.literal.len() + 2
    }

    fn transition(&self, state: StateId, ch: char) -> StateId {
        if state < 0 || state >= self.len() {
            return self.dead_state();
        }
        if self.literal[state as usize] == ch {
            state + 1
        } else {
            self.dead_state()
        }
    }

    fn accepting(&self, state: StateId) -> bool {
        state == self.len()
    }

    fn dead_state(&self) -> StateId {
        self.len() + 1
    }
}

/// Character test on a table edge
#[derive(Clone)]
pub enum CharMatcher {
    Exact(char),
    Range(char, char),
    OneOf(&'static str),
    Predicate(fn(char) -> bool),
    Any,
}

impl CharMatcher {
    pub fn matches(&self, ch: char) -> bool {
        match self {
            CharMatcher::Exact(c) => *c == ch,
            CharMatcher::Range(lo, hi) => (*lo..=*hi).contains(&ch),
            CharMatcher::OneOf(set) => set.contains(ch),
            CharMatcher::Predicate(test) => test(ch),
            CharMatcher::Any => true,
        }
    }
}

impl fmt::Debug for CharMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CharMatcher::Exact(c) => write!(f, "{:?}", c),
            CharMatcher::Range(lo, hi) => write!(f, "{:?}..={:?}", lo, hi),
            CharMatcher::OneOf(set) => write!(f, "one of {:?}", set),
            CharMatcher::Predicate(_) => write!(f, "<predicate>"),
            CharMatcher::Any => write!(f, "any"),
        }
    }
}

/// Data-driven acceptor built from per-state edge lists
///
/// Edges are tried in insertion order; a character with no matching edge
/// leads to the dead state. Edge targets are not validated, so an edge to an
/// undeclared state surfaces as `LexerError::IllegalState` at run time.
#[derive(Debug, Clone)]
pub struct TableAcceptor {
    lex_class: String,
    dead_state: StateId,
    accepting: Vec<bool>,
    edges: Vec<Vec<(CharMatcher, StateId)>>,
}

impl TableAcceptor {
    pub fn new(lex_class: &str, number_of_states: usize, dead_state: StateId) -> Self {
        Self {
            lex_class: lex_class.to_string(),
            dead_state,
            accepting: vec![false; number_of_states],
            edges: vec![Vec::new(); number_of_states],
        }
    }

    /// Mark `state` as accepting; undeclared states are ignored
    pub fn accept(mut self, state: StateId) -> Self {
        if let Some(flag) = usize::try_from(state)
            .ok()
            .and_then(|s| self.accepting.get_mut(s))
        {
            *flag = true;
        }
        self
    }

    /// Add an edge `from --matcher--> to`; undeclared sources are ignored
    pub fn edge(mut self, from: StateId, matcher: CharMatcher, to: StateId) -> Self {
        if let Some(edges) = usize::try_from(from)
            .ok()
            .and_then(|s| self.edges.get_mut(s))
        {
            edges.push((matcher, to));
        }
        self
    }

    pub fn into_shared(self) -> SharedAcceptor {
        Arc::new(self)
    }
}

impl Acceptor for TableAcceptor {
    fn lex_class(&self) -> &str {
        &self.lex_class
    }

    fn number_of_states(&self) -> usize {
        self.accepting.len()
    }

    fn transition(&self, state: StateId, ch: char) -> StateId {
        usize::try_from(state)
            .ok()
            .and_then(|s| self.edges.get(s))
            .and_then(|edges| edges.iter().find(|(matcher, _)| matcher.matches(ch)))
            .map(|(_, to)| *to)
            .unwrap_or(self.dead_state)
    }

    fn accepting(&self, state: StateId) -> bool {
        usize::try_from(state)
            .ok()
            .and_then(|s| self.accepting.get(s))
            .copied()
            .unwrap_or(false)
    }

    fn dead_state(&self) -> StateId {
        self.dead_state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn run(acceptor: SharedAcceptor, input: &str) -> Automaton {
        let mut automaton = Automaton::new(acceptor);
        for ch in input.chars() {
            automaton.step(ch).unwrap();
        }
        automaton
    }

    #[test]
    fn test_literal_acceptor_states() {
        let literal = LiteralAcceptor::new("then");
        assert_eq!(literal.number_of_states(), 6);
        assert_eq!(literal.dead_state(), 5);
        assert_eq!(literal.lex_class(), "then");

        assert!(run(LiteralAcceptor::shared("then"), "then").is_accepting());
        assert!(!run(LiteralAcceptor::shared("then"), "the").is_accepting());
        assert!(run(LiteralAcceptor::shared("then"), "thenx").is_dead());
        assert!(run(LiteralAcceptor::shared("then"), "x").is_dead());
    }

    #[test]
    fn test_table_acceptor_first_matching_edge_wins() {
        let digits = TableAcceptor::new("NUM", 3, 2)
            .edge(0, CharMatcher::Range('0', '9'), 1)
            .edge(1, CharMatcher::Exact('0'), 1)
            .edge(1, CharMatcher::Range('0', '9'), 1)
            .accept(1)
            .into_shared();

        assert!(run(digits.clone(), "407").is_accepting());
        assert!(run(digits.clone(), "4a").is_dead());
        assert_eq!(run(digits, "").state(), 0);
    }

    #[test]
    fn test_reset_returns_to_initial_state() {
        let mut automaton = run(LiteralAcceptor::shared("&&"), "&&");
        assert!(automaton.is_accepting());
        automaton.reset();
        assert_eq!(automaton.state(), 0);
        assert!(!automaton.is_accepting());
    }

    #[test]
    fn test_out_of_range_transition_is_contract_violation() {
        let broken = TableAcceptor::new("BROKEN", 2, 1)
            .edge(0, CharMatcher::Any, 7)
            .into_shared();
        let mut automaton = Automaton::new(broken);

        let err = automaton.step('x').unwrap_err();
        assert_matches!(
            err,
            LexerError::IllegalState { state: 7, ref lex_class } if lex_class == "BROKEN"
        );
        assert_eq!(err.to_string(), "Illegal state 7 in acceptor for BROKEN");
    }

    #[test]
    fn test_negative_transition_is_contract_violation() {
        let negative = TableAcceptor::new("NEG", 2, 1)
            .edge(0, CharMatcher::Any, -1)
            .into_shared();
        let mut automaton = Automaton::new(negative);

        assert_matches!(
            automaton.step('x'),
            Err(LexerError::IllegalState { state: -1, .. })
        );
        // A rejected transition leaves the automaton where it was
        assert_eq!(automaton.state(), 0);
    }
}
