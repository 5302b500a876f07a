// Internal modules
pub mod config;
pub mod grammar;
pub mod input;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod pipeline;
pub mod syntax;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use lexical::{Acceptor, LexerError, SharedAcceptor, Tokenizer};
pub use pipeline::{PipelineError, PipelineResult};
pub use syntax::{Grammar, ParseOutcome, Parser, SyntaxError, SyntaxTree};
pub use tokens::{LexToken, LookaheadStream, TokenStream};

// Re-export pipeline output for JSON consumers
pub use pipeline::output::PipelineOutput;
