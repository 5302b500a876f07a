//! Character sources for the tokenizer
//!
//! The tokenizer reads one character at a time and backtracks to the end of
//! the longest match it has seen. Sources therefore support a single mark
//! that can be rewound to until it is released or replaced.

mod reader_source;
mod str_source;

pub use reader_source::ReaderSource;
pub use str_source::StrSource;

use crate::logging::codes;
use crate::logging::Code;
use crate::utils::Position;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Input file not found: {path}")]
    FileNotFound { path: String },

    #[error("I/O error while reading input: {message}")]
    Io { message: String },

    #[error("Invalid UTF-8 sequence at character offset {offset}")]
    InvalidEncoding { offset: usize },

    #[error("Backtrack exceeded the rewind window of {window} characters")]
    RewindWindowExceeded { window: usize },

    #[error("Rewind requested without an active mark")]
    NoActiveMark,
}

impl InputError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::FileNotFound { .. } => codes::input::FILE_NOT_FOUND,
            Self::Io { .. } => codes::input::IO_ERROR,
            Self::InvalidEncoding { .. } => codes::input::INVALID_ENCODING,
            Self::RewindWindowExceeded { .. } => codes::input::REWIND_WINDOW_EXCEEDED,
            Self::NoActiveMark => codes::input::NO_ACTIVE_MARK,
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
}

impl From<std::io::Error> for InputError {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: error.to_string(),
        }
    }
}

/// A forward character stream with one rewindable mark
pub trait CharSource {
    /// Next character, or `None` once the input is exhausted (repeatably)
    fn read(&mut self) -> Result<Option<char>, InputError>;

    /// Remember the current position, replacing any previous mark
    fn mark(&mut self);

    /// Return to the marked position; the mark stays in place
    fn rewind(&mut self) -> Result<(), InputError>;

    /// Forget the current mark
    fn release_mark(&mut self);

    /// Position of the next character to be read
    fn position(&self) -> Position;
}

impl<S: CharSource + ?Sized> CharSource for Box<S> {
    fn read(&mut self) -> Result<Option<char>, InputError> {
        (**self).read()
    }

    fn mark(&mut self) {
        (**self).mark()
    }

    fn rewind(&mut self) -> Result<(), InputError> {
        (**self).rewind()
    }

    fn release_mark(&mut self) {
        (**self).release_mark()
    }

    fn position(&self) -> Position {
        (**self).position()
    }
}
