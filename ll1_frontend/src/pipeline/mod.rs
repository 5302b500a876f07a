//! End-to-end composition: character source, tokenizer, lookahead stream, parser
//!
//! Every entry point runs inside a logging session named after its input, so
//! the events of one run can be told apart.

mod error;
pub mod output;
mod result;

pub use error::PipelineError;
pub use output::PipelineOutput;
pub use result::{PipelineResult, TokenizeResult};

use crate::config::runtime::RuntimeConfig;
use crate::input::{CharSource, ReaderSource, StrSource};
use crate::lexical::{SharedAcceptor, Tokenizer};
use crate::logging::{self, codes};
use crate::syntax::{Grammar, Parser};
use crate::tokens::{LookaheadStream, TokenStream};
use crate::{log_info, log_success};
use std::path::Path;
use std::time::Instant;

/// Session name used for in-memory inputs
pub const STRING_SOURCE_NAME: &str = "<string>";

/// Tokenize `text`, keeping only proper tokens
pub fn tokenize_str(
    text: &str,
    acceptors: Vec<SharedAcceptor>,
) -> Result<TokenizeResult, PipelineError> {
    tokenize_str_with_config(text, acceptors, &RuntimeConfig::default())
}

pub fn tokenize_str_with_config(
    text: &str,
    acceptors: Vec<SharedAcceptor>,
    config: &RuntimeConfig,
) -> Result<TokenizeResult, PipelineError> {
    logging::with_session_context(STRING_SOURCE_NAME, || -> Result<_, PipelineError> {
        let start_time = Instant::now();
        let tokenizer =
            Tokenizer::with_preferences(StrSource::new(text), acceptors, config.lexical.clone());
        let mut stream = LookaheadStream::new(tokenizer);

        let mut tokens = Vec::new();
        while let Some(token) = stream.pull_proper()? {
            tokens.push(token);
        }

        let result = TokenizeResult {
            source_name: STRING_SOURCE_NAME.to_string(),
            tokens,
            metrics: stream.metrics().clone(),
            processing_duration: start_time.elapsed(),
        };
        result.log_success();
        Ok(result)
    })
}

/// Lex and parse `text` with `grammar`
pub fn parse_str<G: Grammar>(
    text: &str,
    acceptors: Vec<SharedAcceptor>,
    grammar: G,
) -> Result<PipelineResult, PipelineError> {
    parse_str_with_config(text, acceptors, grammar, &RuntimeConfig::default())
}

pub fn parse_str_with_config<G: Grammar>(
    text: &str,
    acceptors: Vec<SharedAcceptor>,
    grammar: G,
    config: &RuntimeConfig,
) -> Result<PipelineResult, PipelineError> {
    logging::with_session_context(STRING_SOURCE_NAME, || {
        run_parse(STRING_SOURCE_NAME, StrSource::new(text), acceptors, grammar, config)
    })
}

/// Lex and parse the file at `path` with `grammar`, streaming its contents
pub fn parse_file<G: Grammar, P: AsRef<Path>>(
    path: P,
    acceptors: Vec<SharedAcceptor>,
    grammar: G,
) -> Result<PipelineResult, PipelineError> {
    parse_file_with_config(path, acceptors, grammar, &RuntimeConfig::default())
}

pub fn parse_file_with_config<G: Grammar, P: AsRef<Path>>(
    path: P,
    acceptors: Vec<SharedAcceptor>,
    grammar: G,
    config: &RuntimeConfig,
) -> Result<PipelineResult, PipelineError> {
    let name = path.as_ref().display().to_string();
    logging::with_session_context(&name, || -> Result<_, PipelineError> {
        let source = ReaderSource::from_path_with_window(path.as_ref(), config.input.rewind_window)?;
        log_success!(codes::success::SOURCE_OPENED, "Opened input file",
            "path" => &name,
            "rewind_window" => source.window()
        );
        run_parse(&name, source, acceptors, grammar, config)
    })
}

fn run_parse<S: CharSource, G: Grammar>(
    name: &str,
    source: S,
    acceptors: Vec<SharedAcceptor>,
    grammar: G,
    config: &RuntimeConfig,
) -> Result<PipelineResult, PipelineError> {
    let start_time = Instant::now();
    log_info!("Starting parse", "source" => name, "start_symbol" => grammar.start_symbol());

    let tokenizer = Tokenizer::with_preferences(source, acceptors, config.lexical.clone());
    let mut stream = LookaheadStream::new(tokenizer);
    let mut parser = Parser::with_preferences(grammar, config.syntax.clone());
    let outcome = parser.parse(&mut stream)?;

    let result = PipelineResult {
        source_name: name.to_string(),
        tree: outcome.tree,
        trailing: outcome.trailing,
        lexical_metrics: stream.metrics().clone(),
        parse_metrics: parser.metrics().clone(),
        processing_duration: start_time.elapsed(),
    };
    result.log_success();
    Ok(result)
}
