//! Lexical analysis: acceptors and the longest-match tokenizer

pub mod acceptor;
pub mod tokenizer;

pub use acceptor::{
    Acceptor, Automaton, CharMatcher, LiteralAcceptor, SharedAcceptor, StateId, TableAcceptor,
};
pub use tokenizer::{LexerError, LexicalMetrics, Tokenizer};

use crate::config::runtime::LexicalPreferences;
use crate::input::StrSource;
use crate::tokens::LexToken;

/// Tokenize a whole string, trivia included
pub fn tokenize_all(
    text: &str,
    acceptors: Vec<SharedAcceptor>,
) -> Result<Vec<LexToken>, LexerError> {
    Tokenizer::new(StrSource::new(text), acceptors).collect()
}

/// Tokenize a whole string with explicit preferences, returning tokens and metrics
pub fn tokenize_with_metrics(
    text: &str,
    acceptors: Vec<SharedAcceptor>,
    preferences: LexicalPreferences,
) -> Result<(Vec<LexToken>, LexicalMetrics), LexerError> {
    let mut tokenizer = Tokenizer::with_preferences(StrSource::new(text), acceptors, preferences);
    let mut tokens = Vec::new();
    while let Some(token) = tokenizer.next_token()? {
        tokens.push(token);
    }
    Ok((tokens, tokenizer.metrics().clone()))
}
