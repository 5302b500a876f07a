use super::{PipelineError, PipelineResult};
use crate::syntax::SyntaxTree;
use crate::tokens::LexToken;
use serde::Serialize;

/// JSON export of a pipeline run
#[derive(Debug, Serialize)]
pub struct PipelineOutput<'a> {
    pub source: &'a str,
    pub complete: bool,
    pub trailing: Option<&'a LexToken>,
    pub token_count: usize,
    pub trivia_count: usize,
    pub tree: &'a SyntaxTree,
}

impl<'a> PipelineOutput<'a> {
    pub fn new(result: &'a PipelineResult) -> Self {
        Self {
            source: &result.source_name,
            complete: result.is_complete(),
            trailing: result.trailing.as_ref(),
            token_count: result.token_count(),
            trivia_count: result.trivia_count(),
            tree: &result.tree,
        }
    }

    pub fn to_json(&self) -> Result<String, PipelineError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
