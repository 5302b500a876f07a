//! Lexical tokens

use crate::utils::Span;
use serde::Serialize;
use std::fmt;

/// Lexical class reserved for trivia (whitespace, comments)
pub const TRIVIA_CLASS: &str = "";

/// A matched substring tagged with the class of the acceptor that won it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LexToken {
    value: String,
    lex_class: String,
    span: Span,
}

impl LexToken {
    /// Token without source location
    pub fn new(value: impl Into<String>, lex_class: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            lex_class: lex_class.into(),
            span: Span::dummy(),
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn lex_class(&self) -> &str {
        &self.lex_class
    }

    pub fn span(&self) -> Span {
        self.span
    }

    /// Trivia tokens are skipped by the proper-token operations
    pub fn is_trivia(&self) -> bool {
        self.lex_class == TRIVIA_CLASS
    }

    pub fn into_value(self) -> String {
        self.value
    }
}

impl fmt::Display for LexToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} \t{}", self.value, self.lex_class)
    }
}
