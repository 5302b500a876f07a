//! Syntax errors raised by the LL(1) parser
//!
//! Mismatches between the grammar and the token sequence are reported as
//! `Parse error: <found> encountered where <expected> expected.`, where
//! `<found>` is a lexical class or `end of input`. Tokenizer failures met while
//! fetching lookahead are carried through unchanged.

use crate::lexical::LexerError;
use crate::logging::{codes, Code};
use crate::utils::Span;

pub type SyntaxResult<T> = Result<T, SyntaxError>;

/// Text used for the end-of-input marker in messages
pub const END_OF_INPUT: &str = "end of input";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
    #[error("Parse error: {found} encountered where {expected} expected.")]
    UnexpectedInput {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("Parse error: end of input encountered where {expected} expected.")]
    UnexpectedEndOfInput { expected: String },

    #[error(transparent)]
    Lexical(#[from] LexerError),
}

impl SyntaxError {
    pub fn unexpected_input(expected: &str, found: &str, span: Span) -> Self {
        Self::UnexpectedInput {
            expected: expected.to_string(),
            found: found.to_string(),
            span,
        }
    }

    pub fn unexpected_end_of_input(expected: &str) -> Self {
        Self::UnexpectedEndOfInput {
            expected: expected.to_string(),
        }
    }

    /// Get error code for global logging system
    pub fn error_code(&self) -> Code {
        match self {
            Self::UnexpectedInput { .. } => codes::syntax::UNEXPECTED_INPUT,
            Self::UnexpectedEndOfInput { .. } => codes::syntax::UNEXPECTED_END_OF_INPUT,
            Self::Lexical(inner) => inner.error_code(),
        }
    }

    /// Grammar symbol the parser was looking for, if this is a mismatch
    pub fn expected(&self) -> Option<&str> {
        match self {
            Self::UnexpectedInput { expected, .. } | Self::UnexpectedEndOfInput { expected } => {
                Some(expected)
            }
            Self::Lexical(_) => None,
        }
    }

    /// Lexical class (or `end of input`) found instead, if this is a mismatch
    pub fn found(&self) -> Option<&str> {
        match self {
            Self::UnexpectedInput { found, .. } => Some(found),
            Self::UnexpectedEndOfInput { .. } => Some(END_OF_INPUT),
            Self::Lexical(_) => None,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::UnexpectedInput { span, .. } => Some(*span),
            Self::UnexpectedEndOfInput { .. } => None,
            Self::Lexical(inner) => inner.span(),
        }
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }

    pub fn severity(&self) -> &'static str {
        codes::get_severity(self.error_code().as_str()).as_str()
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.error_code().as_str())
    }

    pub fn recommended_action(&self) -> &'static str {
        codes::get_action(self.error_code().as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputError;
    use crate::utils::Position;

    #[test]
    fn test_mismatch_messages() {
        let span = Span::new(Position::start(), Position::new(3, 1, 4));
        let error = SyntaxError::unexpected_input("#X", "NUM", span);
        assert_eq!(
            error.to_string(),
            "Parse error: NUM encountered where #X expected."
        );
        assert_eq!(error.error_code(), codes::syntax::UNEXPECTED_INPUT);
        assert_eq!(error.span(), Some(span));

        let error = SyntaxError::unexpected_end_of_input("&&");
        assert_eq!(
            error.to_string(),
            "Parse error: end of input encountered where && expected."
        );
        assert_eq!(error.found(), Some(END_OF_INPUT));
        assert_eq!(error.expected(), Some("&&"));
        assert_eq!(error.error_code(), codes::syntax::UNEXPECTED_END_OF_INPUT);
    }

    #[test]
    fn test_lexical_errors_keep_their_codes() {
        let error: SyntaxError = LexerError::IllegalState {
            state: 9,
            lex_class: "EVEN".to_string(),
        }
        .into();
        assert_eq!(error.to_string(), "Illegal state 9 in acceptor for EVEN");
        assert_eq!(error.error_code(), codes::lexical::ILLEGAL_AUTOMATON_STATE);
        assert!(error.requires_halt());
        assert_eq!(error.expected(), None);

        let error: SyntaxError = LexerError::from(InputError::RewindWindowExceeded { window: 10 }).into();
        assert_eq!(error.error_code(), codes::input::REWIND_WINDOW_EXCEEDED);
    }

    #[test]
    fn test_mismatches_are_recoverable() {
        let error = SyntaxError::unexpected_end_of_input("#S");
        assert!(error.is_recoverable());
        assert!(!error.requires_halt());
        assert_eq!(error.category(), "Syntax");
        assert_eq!(error.severity(), "Medium");
    }
}
