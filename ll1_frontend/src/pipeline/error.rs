use crate::input::InputError;
use crate::lexical::LexerError;
use crate::logging::{codes, Code};
use crate::syntax::SyntaxError;
use crate::utils::Span;

/// Pipeline processing errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error("Input failed: {0}")]
    Input(#[from] InputError),

    #[error("Lexical analysis failed: {0}")]
    LexicalAnalysis(#[from] LexerError),

    #[error("Syntax analysis failed: {0}")]
    SyntaxAnalysis(#[from] SyntaxError),

    #[error("Tree export failed: {message}")]
    Export { message: String },
}

impl PipelineError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::Input(inner) => inner.error_code(),
            Self::LexicalAnalysis(inner) => inner.error_code(),
            Self::SyntaxAnalysis(inner) => inner.error_code(),
            Self::Export { .. } => codes::pipeline::TREE_EXPORT_FAILURE,
        }
    }

    /// Source location of the failure, when the failing stage knows it
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::LexicalAnalysis(inner) => inner.span(),
            Self::SyntaxAnalysis(inner) => inner.span(),
            Self::Input(_) | Self::Export { .. } => None,
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

impl From<std::io::Error> for PipelineError {
    fn from(error: std::io::Error) -> Self {
        Self::Input(InputError::from(error))
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(error: serde_json::Error) -> Self {
        Self::Export {
            message: error.to_string(),
        }
    }
}
