use crate::lexical::LexicalMetrics;
use crate::syntax::{ParseMetrics, SyntaxTree};
use crate::tokens::LexToken;
use std::time::Duration;

/// Outcome of lexing and parsing one input
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub source_name: String,
    pub tree: SyntaxTree,
    /// First proper token left over after the parse, if any
    pub trailing: Option<LexToken>,
    pub lexical_metrics: LexicalMetrics,
    pub parse_metrics: ParseMetrics,
    pub processing_duration: Duration,
}

impl PipelineResult {
    pub fn is_complete(&self) -> bool {
        self.trailing.is_none()
    }

    /// Tokens produced by the tokenizer, trivia included
    pub fn token_count(&self) -> usize {
        self.lexical_metrics.total_tokens
    }

    pub fn trivia_count(&self) -> usize {
        self.lexical_metrics.trivia_tokens
    }

    pub fn log_success(&self) {
        crate::log_success!(
            crate::logging::codes::success::PIPELINE_COMPLETE,
            "Pipeline completed",
            "source" => &self.source_name,
            "tokens" => self.token_count(),
            "trivia" => self.trivia_count(),
            "nodes" => self.tree.len(),
            "complete" => self.is_complete(),
            "duration_ms" => format!("{:.2}", self.processing_duration.as_secs_f64() * 1000.0)
        );
    }
}

/// Outcome of tokenizing one input without parsing it
#[derive(Debug, Clone)]
pub struct TokenizeResult {
    pub source_name: String,
    /// Non-trivia tokens in input order
    pub tokens: Vec<LexToken>,
    pub metrics: LexicalMetrics,
    pub processing_duration: Duration,
}

impl TokenizeResult {
    pub fn log_success(&self) {
        crate::log_success!(
            crate::logging::codes::success::TOKENIZATION_COMPLETE,
            "Tokenization completed",
            "source" => &self.source_name,
            "tokens" => self.metrics.total_tokens,
            "trivia" => self.metrics.trivia_tokens,
            "duration_ms" => format!("{:.2}", self.processing_duration.as_secs_f64() * 1000.0)
        );
    }
}
