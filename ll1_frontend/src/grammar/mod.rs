//! Bundled lexical specifications and grammars

pub mod char_types;
pub mod demo;
pub mod micro_haskell;

pub use demo::{demo_acceptors, EvenAndGrammar};
pub use micro_haskell::micro_haskell_acceptors;
