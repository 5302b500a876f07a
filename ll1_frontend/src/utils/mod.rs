//! Shared location types used by input sources, tokens, and diagnostics

pub mod span;

pub use span::{Position, SourceMap, Span};
