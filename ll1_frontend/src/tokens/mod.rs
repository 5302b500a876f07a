//! Tokens and token streams

pub mod token;
pub mod token_stream;

pub use token::{LexToken, TRIVIA_CLASS};
pub use token_stream::{LookaheadStream, TokenQueue, TokenStream};
