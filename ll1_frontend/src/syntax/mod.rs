//! Syntax analysis: parse tables, the LL(1) parser and syntax trees

mod error;
mod parser;
pub mod table;
pub mod tree;

pub use error::{SyntaxError, SyntaxResult, END_OF_INPUT};
pub use parser::{ParseMetrics, ParseOutcome, Parser};
pub use table::{is_nonterminal_symbol, Grammar, ParseTable, TableRule, NONTERMINAL_PREFIX};
pub use tree::{NodeId, NodeKind, NodeRef, PreOrder, SyntaxTree};
