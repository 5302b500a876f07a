//! Grammars as LL(1) parse tables
//!
//! Symbols are plain strings. Nonterminals start with `#`; every other symbol
//! is a terminal and must equal the lexical class of the token it matches.
//! The lookahead `None` stands for end of input.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const NONTERMINAL_PREFIX: char = '#';

pub fn is_nonterminal_symbol(symbol: &str) -> bool {
    symbol.starts_with(NONTERMINAL_PREFIX)
}

/// Start symbol plus table lookup
///
/// The table must describe an LL(1) grammar; the parser never backtracks and
/// does not check for conflicts.
pub trait Grammar {
    fn start_symbol(&self) -> &str;

    /// Right-hand side to expand `nonterminal` with, `None` for a blank entry
    fn table_entry(&self, nonterminal: &str, lookahead: Option<&str>) -> Option<Vec<String>>;

    fn is_nonterminal(&self, symbol: &str) -> bool {
        is_nonterminal_symbol(symbol)
    }
}

impl<G: Grammar + ?Sized> Grammar for &G {
    fn start_symbol(&self) -> &str {
        (**self).start_symbol()
    }

    fn table_entry(&self, nonterminal: &str, lookahead: Option<&str>) -> Option<Vec<String>> {
        (**self).table_entry(nonterminal, lookahead)
    }

    fn is_nonterminal(&self, symbol: &str) -> bool {
        (**self).is_nonterminal(symbol)
    }
}

/// One table cell; `lookahead: None` is the end-of-input column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRule {
    pub nonterminal: String,
    pub lookahead: Option<String>,
    pub rhs: Vec<String>,
}

/// Explicit parse table, buildable in code or loaded from JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TableFile", into = "TableFile")]
pub struct ParseTable {
    start_symbol: String,
    entries: HashMap<(String, Option<String>), Vec<String>>,
}

/// Serialized form: start symbol and a flat rule list
#[derive(Serialize, Deserialize)]
struct TableFile {
    start_symbol: String,
    #[serde(default)]
    rules: Vec<TableRule>,
}

impl ParseTable {
    pub fn new(start_symbol: &str) -> Self {
        Self {
            start_symbol: start_symbol.to_string(),
            entries: HashMap::new(),
        }
    }

    /// Fill the cell for `(nonterminal, lookahead)`, replacing any previous entry
    pub fn with_rule(mut self, nonterminal: &str, lookahead: Option<&str>, rhs: &[&str]) -> Self {
        self.insert(nonterminal, lookahead, rhs.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn insert(&mut self, nonterminal: &str, lookahead: Option<&str>, rhs: Vec<String>) {
        self.entries.insert(
            (nonterminal.to_string(), lookahead.map(str::to_string)),
            rhs,
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All filled cells, sorted by nonterminal then lookahead
    pub fn rules(&self) -> Vec<TableRule> {
        let mut rules: Vec<TableRule> = self
            .entries
            .iter()
            .map(|((nonterminal, lookahead), rhs)| TableRule {
                nonterminal: nonterminal.clone(),
                lookahead: lookahead.clone(),
                rhs: rhs.clone(),
            })
            .collect();
        rules.sort_by(|a, b| {
            (&a.nonterminal, &a.lookahead).cmp(&(&b.nonterminal, &b.lookahead))
        });
        rules
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl From<TableFile> for ParseTable {
    fn from(file: TableFile) -> Self {
        let mut table = ParseTable::new(&file.start_symbol);
        for rule in file.rules {
            table.insert(&rule.nonterminal, rule.lookahead.as_deref(), rule.rhs);
        }
        table
    }
}

impl From<ParseTable> for TableFile {
    fn from(table: ParseTable) -> Self {
        Self {
            rules: table.rules(),
            start_symbol: table.start_symbol,
        }
    }
}

impl Grammar for ParseTable {
    fn start_symbol(&self) -> &str {
        &self.start_symbol
    }

    fn table_entry(&self, nonterminal: &str, lookahead: Option<&str>) -> Option<Vec<String>> {
        self.entries
            .get(&(nonterminal.to_string(), lookahead.map(str::to_string)))
            .cloned()
    }
}
