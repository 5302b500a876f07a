//! Table-driven LL(1) parser
//!
//! The parser keeps an explicit stack of tree nodes still to be matched.
//! Each step pops one node and looks at the next proper token: a terminal
//! must match its class, a nonterminal is expanded with the table entry for
//! the token's class (or for end of input). The children of an expansion are
//! pushed in reverse so the leftmost is handled first. No backtracking.

use super::error::{SyntaxError, SyntaxResult};
use super::table::Grammar;
use super::tree::{NodeId, SyntaxTree};
use crate::config::compile_time::syntax::INITIAL_STACK_CAPACITY;
use crate::config::runtime::SyntaxPreferences;
use crate::logging::codes;
use crate::tokens::{LexToken, TokenStream};
use crate::{log_debug, log_error, log_success, log_warning};

/// Counters for the most recent parse
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParseMetrics {
    pub expansions: usize,
    pub epsilon_expansions: usize,
    pub terminals_matched: usize,
    pub max_stack_depth: usize,
}

/// A completed parse
///
/// `trailing` holds the first proper token left over once the stack emptied.
/// Leftover input is not an error: the tree is still returned.
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    pub tree: SyntaxTree,
    pub trailing: Option<LexToken>,
}

impl ParseOutcome {
    /// True when the whole input was consumed
    pub fn is_complete(&self) -> bool {
        self.trailing.is_none()
    }
}

pub struct Parser<G: Grammar> {
    grammar: G,
    preferences: SyntaxPreferences,
    metrics: ParseMetrics,
}

impl<G: Grammar> Parser<G> {
    pub fn new(grammar: G) -> Self {
        Self::with_preferences(grammar, SyntaxPreferences::default())
    }

    pub fn with_preferences(grammar: G, preferences: SyntaxPreferences) -> Self {
        Self {
            grammar,
            preferences,
            metrics: ParseMetrics::default(),
        }
    }

    pub fn grammar(&self) -> &G {
        &self.grammar
    }

    pub fn metrics(&self) -> &ParseMetrics {
        &self.metrics
    }

    /// Parse the whole stream as the grammar's start symbol
    pub fn parse<T: TokenStream>(&mut self, stream: T) -> SyntaxResult<ParseOutcome> {
        let start = self.grammar.start_symbol().to_string();
        self.parse_as(stream, &start)
    }

    /// Parse the stream as `symbol`
    pub fn parse_as<T: TokenStream>(
        &mut self,
        mut stream: T,
        symbol: &str,
    ) -> SyntaxResult<ParseOutcome> {
        self.metrics = ParseMetrics::default();

        let mut tree = SyntaxTree::with_root(symbol, self.grammar.is_nonterminal(symbol));
        let mut stack: Vec<NodeId> = Vec::with_capacity(INITIAL_STACK_CAPACITY);
        stack.push(tree.root().id());

        while let Some(id) = stack.pop() {
            let lookahead = stream.peek_proper()?;
            let label = tree.label_of(id).to_string();

            if self.grammar.is_nonterminal(&label) {
                let class = lookahead.as_ref().map(LexToken::lex_class);
                let Some(rhs) = self.grammar.table_entry(&label, class) else {
                    return Err(self.report(mismatch(&label, lookahead.as_ref())));
                };

                if self.preferences.log_expansions {
                    log_debug!("Expanding nonterminal",
                        "nonterminal" => &label,
                        "lookahead" => class.unwrap_or(super::error::END_OF_INPUT),
                        "rhs" => rhs.join(" ")
                    );
                }

                self.metrics.expansions += 1;
                if rhs.is_empty() {
                    self.metrics.epsilon_expansions += 1;
                }

                let children: Vec<NodeId> = rhs
                    .iter()
                    .map(|symbol| tree.add_node(symbol, self.grammar.is_nonterminal(symbol)))
                    .collect();
                stack.extend(children.iter().rev());
                tree.set_rhs_children(id, rhs, children);
                self.metrics.max_stack_depth = self.metrics.max_stack_depth.max(stack.len());
            } else {
                match lookahead {
                    Some(token) if token.lex_class() == label => {
                        stream.pull_proper()?;
                        let span = token.span();
                        tree.set_value(id, token.into_value(), span);
                        self.metrics.terminals_matched += 1;
                    }
                    other => return Err(self.report(mismatch(&label, other.as_ref()))),
                }
            }
        }

        let trailing = stream.pull_proper()?;
        match &trailing {
            Some(token) => {
                if self.preferences.warn_on_trailing_input {
                    log_warning!(code = codes::warnings::TRAILING_INPUT,
                        &format!("Warning: {} found after parse completed.", token.value()),
                        "class" => token.lex_class(),
                        "span" => token.span()
                    );
                }
            }
            None => {
                log_success!(codes::success::PARSE_SUCCESSFUL, "Parse successful.",
                    "nodes" => tree.len()
                );
            }
        }

        Ok(ParseOutcome { tree, trailing })
    }

    fn report(&self, error: SyntaxError) -> SyntaxError {
        match error.span() {
            Some(span) => log_error!(error.error_code(), &error.to_string(), span = span),
            None => log_error!(error.error_code(), &error.to_string()),
        }
        error
    }
}

fn mismatch(expected: &str, found: Option<&LexToken>) -> SyntaxError {
    match found {
        Some(token) => SyntaxError::unexpected_input(expected, token.lex_class(), token.span()),
        None => SyntaxError::unexpected_end_of_input(expected),
    }
}
