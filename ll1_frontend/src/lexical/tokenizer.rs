//! Longest-match tokenizer over an ordered set of acceptors

use super::acceptor::{Automaton, SharedAcceptor, StateId};
use crate::config::runtime::LexicalPreferences;
use crate::input::{CharSource, InputError};
use crate::logging::codes;
use crate::tokens::LexToken;
use crate::utils::Span;
use crate::{log_debug, log_error};
use std::collections::BTreeMap;

/// Lexical analysis errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexerError {
    #[error("Can't make lexical token from input \"{text}\"")]
    UnrecognizedInput { text: String, span: Span },

    #[error("Illegal state {state} in acceptor for {lex_class}")]
    IllegalState { state: StateId, lex_class: String },

    #[error("Token exceeds maximum length of {max} characters")]
    TokenTooLong { max: usize, span: Span },

    #[error(transparent)]
    Input(#[from] InputError),
}

impl LexerError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LexerError::UnrecognizedInput { .. } => codes::lexical::UNRECOGNIZED_INPUT,
            LexerError::IllegalState { .. } => codes::lexical::ILLEGAL_AUTOMATON_STATE,
            LexerError::TokenTooLong { .. } => codes::lexical::TOKEN_TOO_LONG,
            LexerError::Input(inner) => inner.error_code(),
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            LexerError::UnrecognizedInput { span, .. } | LexerError::TokenTooLong { span, .. } => {
                Some(*span)
            }
            _ => None,
        }
    }

    /// Contract violations and input failures end the session
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
}

/// Counters collected while tokenizing
#[derive(Debug, Default, Clone)]
pub struct LexicalMetrics {
    pub total_tokens: usize,
    pub trivia_tokens: usize,
    pub chars_consumed: usize,
    pub longest_token: usize,
    pub errors: usize,
    pub tokens_by_class: BTreeMap<String, usize>,
}

impl LexicalMetrics {
    pub(crate) fn record_token(&mut self, token: &LexToken, preferences: &LexicalPreferences) {
        let length = token.value().chars().count();
        self.total_tokens += 1;
        self.chars_consumed += length;
        self.longest_token = self.longest_token.max(length);

        if token.is_trivia() {
            self.trivia_tokens += 1;
        } else if preferences.collect_class_metrics {
            *self
                .tokens_by_class
                .entry(token.lex_class().to_string())
                .or_insert(0) += 1;
        }
    }

    pub(crate) fn record_error(&mut self) {
        self.errors += 1;
    }

    pub fn proper_tokens(&self) -> usize {
        self.total_tokens - self.trivia_tokens
    }
}

/// Maximal-munch tokenizer
///
/// Every call to `next_token` runs all acceptors in lock-step from the current
/// input position and returns the longest prefix some acceptor accepts. When
/// several acceptors accept that prefix, the one listed first wins.
pub struct Tokenizer<S: CharSource> {
    source: S,
    automata: Vec<Automaton>,
    preferences: LexicalPreferences,
    metrics: LexicalMetrics,
}

impl<S: CharSource> Tokenizer<S> {
    /// Acceptors are given in priority order, highest first
    pub fn new(source: S, acceptors: Vec<SharedAcceptor>) -> Self {
        Self::with_preferences(source, acceptors, LexicalPreferences::default())
    }

    pub fn with_preferences(
        source: S,
        acceptors: Vec<SharedAcceptor>,
        preferences: LexicalPreferences,
    ) -> Self {
        Self {
            source,
            automata: acceptors.into_iter().map(Automaton::new).collect(),
            preferences,
            metrics: LexicalMetrics::default(),
        }
    }

    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    /// Next token, or `Ok(None)` once the input is exhausted
    ///
    /// After an `UnrecognizedInput` error the offending characters have been
    /// consumed; a further call resumes right after them.
    pub fn next_token(&mut self) -> Result<Option<LexToken>, LexerError> {
        let result = self.scan();

        match &result {
            Ok(Some(token)) => {
                self.metrics.record_token(token, &self.preferences);
                if self.preferences.log_each_token {
                    log_debug!("Token recognized",
                        "value" => token.value(),
                        "class" => token.lex_class(),
                        "span" => token.span()
                    );
                }
            }
            Ok(None) => {}
            Err(err) => {
                self.metrics.record_error();
                match err.span() {
                    Some(span) => log_error!(err.error_code(), &err.to_string(), span = span),
                    None => log_error!(err.error_code(), &err.to_string()),
                }
            }
        }

        result
    }

    /// One longest-match step; the source never keeps a mark once it returns
    fn scan(&mut self) -> Result<Option<LexToken>, LexerError> {
        let result = self.scan_marked();
        self.source.release_mark();
        result
    }

    fn scan_marked(&mut self) -> Result<Option<LexToken>, LexerError> {
        for automaton in &mut self.automata {
            automaton.reset();
        }

        let start = self.source.position();
        let mut definite = String::new();
        let mut maybe = String::new();
        let mut length = 0usize;
        let mut best: Option<usize> = None;

        loop {
            let Some(ch) = self.source.read()? else {
                break;
            };

            length += 1;
            if let Some(max) = self.preferences.max_token_length {
                if length > max {
                    return Err(LexerError::TokenTooLong {
                        max,
                        span: Span::new(start, self.source.position()),
                    });
                }
            }

            maybe.push(ch);
            let mut live = false;
            let mut accepted = false;

            for (index, automaton) in self.automata.iter_mut().enumerate() {
                automaton.step(ch)?;
                if !automaton.is_dead() {
                    live = true;
                }
                if !accepted && automaton.is_accepting() {
                    accepted = true;
                    best = Some(index);
                    definite.push_str(&maybe);
                    maybe.clear();
                    self.source.mark();
                }
            }

            if !live {
                break;
            }
        }

        match best {
            Some(index) => {
                self.source.rewind()?;
                let span = Span::new(start, self.source.position());
                let lex_class = self.automata[index].lex_class().to_string();
                Ok(Some(LexToken::new(definite, lex_class).with_span(span)))
            }
            None if maybe.is_empty() => Ok(None),
            None => Err(LexerError::UnrecognizedInput {
                text: maybe,
                span: Span::new(start, self.source.position()),
            }),
        }
    }
}

impl<S: CharSource> Iterator for Tokenizer<S> {
    type Item = Result<LexToken, LexerError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::demo::demo_acceptors;
    use crate::grammar::micro_haskell::micro_haskell_acceptors;
    use crate::input::{ReaderSource, StrSource};
    use crate::utils::Position;
    use std::cell::Cell;
    use std::rc::Rc;
    use crate::lexical::{CharMatcher, LiteralAcceptor, TableAcceptor};
    use assert_matches::assert_matches;
    use std::io::Cursor;

    fn lex_all(text: &str) -> Vec<(String, String)> {
        Tokenizer::new(StrSource::new(text), demo_acceptors())
            .map(|token| {
                let token = token.unwrap();
                (token.value().to_string(), token.lex_class().to_string())
            })
            .collect()
    }

    fn pairs(expected: &[(&str, &str)]) -> Vec<(String, String)> {
        expected
            .iter()
            .map(|(v, c)| (v.to_string(), c.to_string()))
            .collect()
    }

    #[test]
    fn test_single_and_token() {
        let mut tokenizer = Tokenizer::new(StrSource::new("&&"), demo_acceptors());
        let token = tokenizer.next_token().unwrap().unwrap();
        assert_eq!((token.value(), token.lex_class()), ("&&", "&&"));
        assert_eq!(tokenizer.next_token().unwrap(), None);
        assert_eq!(tokenizer.next_token().unwrap(), None);
    }

    #[test]
    fn test_maximal_munch_backtracks_to_last_acceptance() {
        assert_eq!(lex_all("ab&&"), pairs(&[("ab", "EVEN"), ("&&", "&&")]));
        // "abc" is not even; the tokenizer backs up to "ab" and then fails on "c"
        let mut tokenizer = Tokenizer::new(StrSource::new("abc "), demo_acceptors());
        assert_eq!(tokenizer.next_token().unwrap().unwrap().value(), "ab");
        assert_matches!(
            tokenizer.next_token(),
            Err(LexerError::UnrecognizedInput { ref text, .. }) if text == "c "
        );
    }

    #[test]
    fn test_longest_even_run_wins() {
        assert_eq!(
            lex_all("abcd &&"),
            pairs(&[("abcd", "EVEN"), (" ", ""), ("&&", "&&")])
        );
    }

    #[test]
    fn test_lone_letter_is_lexical_error() {
        let mut tokenizer = Tokenizer::new(StrSource::new("a"), demo_acceptors());
        let err = tokenizer.next_token().unwrap_err();
        assert_matches!(err, LexerError::UnrecognizedInput { ref text, .. } if text == "a");
        assert_eq!(err.to_string(), "Can't make lexical token from input \"a\"");
        assert_eq!(err.error_code(), codes::lexical::UNRECOGNIZED_INPUT);
        assert_eq!(tokenizer.metrics().errors, 1);
    }

    #[test]
    fn test_lexing_resumes_after_error() {
        let mut tokenizer = Tokenizer::new(StrSource::new("&x&& "), demo_acceptors());
        assert_matches!(
            tokenizer.next_token(),
            Err(LexerError::UnrecognizedInput { ref text, .. }) if text == "&x"
        );
        assert_eq!(tokenizer.next_token().unwrap().unwrap().value(), "&&");
    }

    #[test]
    fn test_priority_breaks_ties() {
        let keyword_first = vec![
            LiteralAcceptor::shared("if"),
            TableAcceptor::new("VAR", 3, 2)
                .edge(0, CharMatcher::Range('a', 'z'), 1)
                .edge(1, CharMatcher::Range('a', 'z'), 1)
                .accept(1)
                .into_shared(),
        ];
        let mut tokenizer = Tokenizer::new(StrSource::new("if iffy"), keyword_first.clone());
        let classes: Vec<String> = std::iter::from_fn(|| tokenizer.next_token().ok().flatten())
            .map(|t| format!("{}:{}", t.value(), t.lex_class()))
            .collect();
        // Space has no acceptor, so lexing stops with an error after "if"
        assert_eq!(classes, vec!["if:if".to_string()]);

        let mut tokenizer = Tokenizer::new(StrSource::new("iffy"), keyword_first.clone());
        assert_eq!(tokenizer.next_token().unwrap().unwrap().lex_class(), "VAR");

        let mut reversed = keyword_first;
        reversed.reverse();
        let mut tokenizer = Tokenizer::new(StrSource::new("if"), reversed);
        assert_eq!(tokenizer.next_token().unwrap().unwrap().lex_class(), "VAR");
    }

    #[test]
    fn test_contract_violation_aborts() {
        let broken = vec![TableAcceptor::new("BAD", 2, 1)
            .edge(0, CharMatcher::Any, 5)
            .into_shared()];
        let mut tokenizer = Tokenizer::new(StrSource::new("x"), broken);
        let err = tokenizer.next_token().unwrap_err();
        assert_eq!(err.to_string(), "Illegal state 5 in acceptor for BAD");
        assert!(err.requires_halt());
    }

    #[test]
    fn test_empty_input_is_end_of_input() {
        let mut tokenizer = Tokenizer::new(StrSource::new(""), demo_acceptors());
        assert_eq!(tokenizer.next_token().unwrap(), None);
    }

    #[test]
    fn test_token_spans_follow_lines() {
        let mut tokenizer = Tokenizer::new(StrSource::new("ab\n&&"), demo_acceptors());
        let first = tokenizer.next_token().unwrap().unwrap();
        let newline = tokenizer.next_token().unwrap().unwrap();
        let and = tokenizer.next_token().unwrap().unwrap();

        assert_eq!(first.span().to_string(), "1:1-3");
        assert!(newline.is_trivia());
        assert_eq!(and.span().start().line, 2);
        assert_eq!(and.span().start().column, 1);
        assert_eq!(and.span().len(), 2);
    }

    #[test]
    fn test_metrics_count_classes() {
        let mut tokenizer = Tokenizer::new(StrSource::new("ab cd &&"), demo_acceptors());
        while tokenizer.next_token().unwrap().is_some() {}

        let metrics = tokenizer.metrics();
        assert_eq!(metrics.total_tokens, 5);
        assert_eq!(metrics.trivia_tokens, 2);
        assert_eq!(metrics.proper_tokens(), 3);
        assert_eq!(metrics.chars_consumed, 8);
        assert_eq!(metrics.longest_token, 2);
        assert_eq!(metrics.tokens_by_class.get("EVEN"), Some(&2));
    }

    #[test]
    fn test_streaming_source_gives_same_tokens() {
        let source = ReaderSource::with_window(Cursor::new("abcd && ef"), 16);
        let tokens: Vec<String> = Tokenizer::new(source, demo_acceptors())
            .map(|t| t.unwrap().value().to_string())
            .collect();
        assert_eq!(tokens, vec!["abcd", " ", "&&", " ", "ef"]);
    }

    #[test]
    fn test_rewind_window_overrun_is_input_error() {
        let greedy = vec![TableAcceptor::new("A", 3, 2)
            .edge(0, CharMatcher::Exact('a'), 1)
            .edge(1, CharMatcher::Any, 1)
            .accept(1)
            .into_shared()];
        let long_tail = format!("a{}", "b".repeat(30));
        let source = ReaderSource::with_window(Cursor::new(long_tail), 10);
        let mut tokenizer = Tokenizer::new(source, greedy);

        // State 1 accepts on every character, so the mark keeps moving and no overrun occurs
        let token = tokenizer.next_token().unwrap().unwrap();
        assert_eq!(token.value().len(), 31);

        let lookahead_heavy = vec![TableAcceptor::new("AB", 4, 3)
            .edge(0, CharMatcher::Exact('a'), 1)
            .edge(1, CharMatcher::Exact('b'), 2)
            .edge(2, CharMatcher::Exact('b'), 2)
            .accept(1)
            .into_shared()];
        let source = ReaderSource::with_window(Cursor::new(format!("a{}", "b".repeat(30))), 10);
        let mut tokenizer = Tokenizer::new(source, lookahead_heavy);
        assert_matches!(
            tokenizer.next_token(),
            Err(LexerError::Input(InputError::RewindWindowExceeded { window: 10 }))
        );
    }

    /// Source that fails after a fixed number of reads and reports whether a mark is held
    struct FailingSource {
        inner: StrSource,
        reads_left: usize,
        fail_rewind: bool,
        marked: Rc<Cell<bool>>,
    }

    impl FailingSource {
        fn new(text: &str, reads_left: usize, fail_rewind: bool) -> (Self, Rc<Cell<bool>>) {
            let marked = Rc::new(Cell::new(false));
            let source = Self {
                inner: StrSource::new(text),
                reads_left,
                fail_rewind,
                marked: marked.clone(),
            };
            (source, marked)
        }
    }

    impl CharSource for FailingSource {
        fn read(&mut self) -> Result<Option<char>, InputError> {
            if self.reads_left == 0 {
                return Err(InputError::Io {
                    message: "device gone".to_string(),
                });
            }
            self.reads_left -= 1;
            self.inner.read()
        }

        fn mark(&mut self) {
            self.marked.set(true);
            self.inner.mark();
        }

        fn rewind(&mut self) -> Result<(), InputError> {
            if self.fail_rewind {
                return Err(InputError::RewindWindowExceeded { window: 10 });
            }
            self.inner.rewind()
        }

        fn release_mark(&mut self) {
            self.marked.set(false);
            self.inner.release_mark();
        }

        fn position(&self) -> Position {
            self.inner.position()
        }
    }

    #[test]
    fn test_read_failure_releases_mark() {
        // "ab" is accepted (mark set), then the third read fails
        let (source, marked) = FailingSource::new("abcd", 2, false);
        let mut tokenizer = Tokenizer::new(source, demo_acceptors());

        assert_matches!(
            tokenizer.next_token(),
            Err(LexerError::Input(InputError::Io { .. }))
        );
        assert!(!marked.get());
    }

    #[test]
    fn test_rewind_failure_releases_mark() {
        let (source, marked) = FailingSource::new("ab", 10, true);
        let mut tokenizer = Tokenizer::new(source, demo_acceptors());

        assert_matches!(
            tokenizer.next_token(),
            Err(LexerError::Input(InputError::RewindWindowExceeded { .. }))
        );
        assert!(!marked.get());
    }

    #[test]
    fn test_long_runs_lex_as_one_token() {
        let spaces = " ".repeat(70_000);
        let mut tokenizer = Tokenizer::new(StrSource::new(&spaces), micro_haskell_acceptors());
        let token = tokenizer.next_token().unwrap().unwrap();
        assert!(token.is_trivia());
        assert_eq!(token.value().len(), 70_000);
        assert_eq!(tokenizer.next_token().unwrap(), None);

        let comment = format!("--{}", "x".repeat(70_000));
        let mut tokenizer = Tokenizer::new(StrSource::new(&comment), micro_haskell_acceptors());
        assert_eq!(tokenizer.next_token().unwrap().unwrap().value(), comment);
    }

    #[test]
    fn test_token_length_cap_when_configured() {
        let preferences = LexicalPreferences {
            max_token_length: Some(4),
            ..LexicalPreferences::default()
        };
        let mut tokenizer =
            Tokenizer::with_preferences(StrSource::new("ab abcdef"), demo_acceptors(), preferences);

        assert_eq!(tokenizer.next_token().unwrap().unwrap().value(), "ab");
        assert_eq!(tokenizer.next_token().unwrap().unwrap().value(), " ");
        assert_matches!(
            tokenizer.next_token(),
            Err(LexerError::TokenTooLong { max: 4, .. })
        );
    }
}
