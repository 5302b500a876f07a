//! One-token lookahead over a token source
//!
//! Every stream yields `Ok(None)` at end of input, and keeps yielding it on
//! every later call. The proper-token operations discard trivia.

use super::token::LexToken;
use crate::input::CharSource;
use crate::lexical::{LexerError, LexicalMetrics, Tokenizer};
use std::collections::VecDeque;

/// Token supply consumed by the parser
pub trait TokenStream {
    /// Next token without consuming it
    fn peek(&mut self) -> Result<Option<LexToken>, LexerError>;

    /// Next token, consumed
    fn pull(&mut self) -> Result<Option<LexToken>, LexerError>;

    /// Next non-trivia token without consuming it; trivia before it is consumed
    fn peek_proper(&mut self) -> Result<Option<LexToken>, LexerError> {
        loop {
            match self.peek()? {
                Some(token) if token.is_trivia() => {
                    self.pull()?;
                }
                other => return Ok(other),
            }
        }
    }

    /// Next non-trivia token, consumed along with any trivia before it
    fn pull_proper(&mut self) -> Result<Option<LexToken>, LexerError> {
        self.peek_proper()?;
        self.pull()
    }
}

impl<T: TokenStream + ?Sized> TokenStream for &mut T {
    fn peek(&mut self) -> Result<Option<LexToken>, LexerError> {
        (**self).peek()
    }

    fn pull(&mut self) -> Result<Option<LexToken>, LexerError> {
        (**self).pull()
    }
}

/// Tokenizer-backed stream holding at most one token of lookahead
pub struct LookaheadStream<S: CharSource> {
    tokenizer: Tokenizer<S>,
    // `Some(None)` caches end of input
    buffer: Option<Option<LexToken>>,
}

impl<S: CharSource> LookaheadStream<S> {
    pub fn new(tokenizer: Tokenizer<S>) -> Self {
        Self {
            tokenizer,
            buffer: None,
        }
    }

    pub fn metrics(&self) -> &LexicalMetrics {
        self.tokenizer.metrics()
    }

    pub fn tokenizer(&self) -> &Tokenizer<S> {
        &self.tokenizer
    }

    pub fn into_tokenizer(self) -> Tokenizer<S> {
        self.tokenizer
    }
}

impl<S: CharSource> TokenStream for LookaheadStream<S> {
    fn peek(&mut self) -> Result<Option<LexToken>, LexerError> {
        if let Some(buffered) = &self.buffer {
            return Ok(buffered.clone());
        }
        let token = self.tokenizer.next_token()?;
        self.buffer = Some(token.clone());
        Ok(token)
    }

    fn pull(&mut self) -> Result<Option<LexToken>, LexerError> {
        let token = self.peek()?;
        // End of input stays buffered so the tokenizer is not asked again
        if token.is_some() {
            self.buffer = None;
        }
        Ok(token)
    }
}

/// Stream over tokens produced ahead of time
#[derive(Debug, Clone, Default)]
pub struct TokenQueue {
    tokens: VecDeque<LexToken>,
}

impl TokenQueue {
    pub fn new(tokens: impl IntoIterator<Item = LexToken>) -> Self {
        Self {
            tokens: tokens.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl TokenStream for TokenQueue {
    fn peek(&mut self) -> Result<Option<LexToken>, LexerError> {
        Ok(self.tokens.front().cloned())
    }

    fn pull(&mut self) -> Result<Option<LexToken>, LexerError> {
        Ok(self.tokens.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::demo::demo_acceptors;
    use crate::input::StrSource;
    use assert_matches::assert_matches;

    fn demo_stream(text: &str) -> LookaheadStream<StrSource> {
        LookaheadStream::new(Tokenizer::new(StrSource::new(text), demo_acceptors()))
    }

    fn pair(token: Option<LexToken>) -> Option<(String, String)> {
        token.map(|t| (t.value().to_string(), t.lex_class().to_string()))
    }

    fn some(value: &str, class: &str) -> Option<(String, String)> {
        Some((value.to_string(), class.to_string()))
    }

    #[test]
    fn test_peek_is_stable_until_pull() {
        let mut stream = demo_stream("ab&&");
        let first = stream.peek().unwrap();
        assert_eq!(stream.peek().unwrap(), first);
        assert_eq!(stream.pull().unwrap(), first);
        assert_eq!(pair(first), some("ab", "EVEN"));
        assert_eq!(pair(stream.pull().unwrap()), some("&&", "&&"));
    }

    #[test]
    fn test_end_of_input_is_idempotent() {
        let mut stream = demo_stream("&&");
        assert_eq!(pair(stream.pull().unwrap()), some("&&", "&&"));
        for _ in 0..3 {
            assert_eq!(stream.peek().unwrap(), None);
            assert_eq!(stream.pull().unwrap(), None);
            assert_eq!(stream.peek_proper().unwrap(), None);
            assert_eq!(stream.pull_proper().unwrap(), None);
        }
    }

    #[test]
    fn test_proper_operations_skip_trivia() {
        let mut stream = demo_stream("  ab \n&&  ");
        // Each space is its own trivia token
        assert_eq!(pair(stream.peek().unwrap()), some(" ", ""));
        assert_eq!(pair(stream.peek_proper().unwrap()), some("ab", "EVEN"));
        // Leading trivia is gone once a proper peek has happened
        assert_eq!(pair(stream.peek().unwrap()), some("ab", "EVEN"));
        assert_eq!(pair(stream.pull_proper().unwrap()), some("ab", "EVEN"));
        assert_eq!(pair(stream.pull_proper().unwrap()), some("&&", "&&"));
        assert_eq!(stream.pull_proper().unwrap(), None);
    }

    #[test]
    fn test_proper_peek_matches_proper_pull() {
        let mut stream = demo_stream(" abcd &&");
        let peeked = stream.peek_proper().unwrap();
        assert_eq!(stream.pull_proper().unwrap(), peeked);
    }

    #[test]
    fn test_lexical_error_surfaces_through_peek() {
        let mut stream = demo_stream("a");
        assert_matches!(
            stream.peek(),
            Err(LexerError::UnrecognizedInput { ref text, .. }) if text == "a"
        );
    }

    #[test]
    fn test_token_queue_filters_trivia() {
        let mut queue = TokenQueue::new(vec![
            LexToken::new(" ", ""),
            LexToken::new("5", "NUM"),
            LexToken::new(" ", ""),
        ]);
        assert_eq!(queue.len(), 3);
        assert_eq!(pair(queue.pull_proper().unwrap()), some("5", "NUM"));
        assert_eq!(queue.pull_proper().unwrap(), None);
        assert!(queue.is_empty());
        assert_eq!(queue.pull_proper().unwrap(), None);
    }
}
