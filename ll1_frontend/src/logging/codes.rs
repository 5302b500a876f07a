//! Error and success codes with their classification metadata
//!
//! Single source of truth for every code the front end emits. Error types
//! expose `error_code()` and resolve severity, category, and recommended
//! action through the registry below.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        requires_halt: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            requires_halt,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const CONFIGURATION_ERROR: Code = Code::new("ERR003");
}

/// Character source error codes
pub mod input {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const IO_ERROR: Code = Code::new("E006");
    pub const INVALID_ENCODING: Code = Code::new("E007");
    pub const REWIND_WINDOW_EXCEEDED: Code = Code::new("E008");
    pub const NO_ACTIVE_MARK: Code = Code::new("E009");
}

/// Lexical analysis error codes
pub mod lexical {
    use super::Code;

    pub const UNRECOGNIZED_INPUT: Code = Code::new("E020");
    pub const TOKEN_TOO_LONG: Code = Code::new("E021");
    pub const ILLEGAL_AUTOMATON_STATE: Code = Code::new("E022");
}

/// Syntax analysis error codes
pub mod syntax {
    use super::Code;

    pub const UNEXPECTED_INPUT: Code = Code::new("E040");
    pub const UNEXPECTED_END_OF_INPUT: Code = Code::new("E041");
}

/// Warning codes
pub mod warnings {
    use super::Code;

    pub const TRAILING_INPUT: Code = Code::new("W040");
}

/// Pipeline error codes
pub mod pipeline {
    use super::Code;

    pub const TREE_EXPORT_FAILURE: Code = Code::new("E061");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");

    pub const SOURCE_OPENED: Code = Code::new("I006");

    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");

    pub const PARSE_SUCCESSFUL: Code = Code::new("I040");

    pub const PIPELINE_COMPLETE: Code = Code::new("I060");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        let entries = [
            // System errors
            ErrorMetadata::new(
                "ERR003",
                "System",
                Severity::High,
                false,
                true,
                "Runtime configuration could not be loaded",
                "Fix the configuration file or unset the overriding environment variables",
            ),
            // Input errors
            ErrorMetadata::new(
                "E005",
                "Input",
                Severity::Medium,
                false,
                true,
                "Input file not found at specified path",
                "Check the file path and ensure the file exists",
            ),
            ErrorMetadata::new(
                "E006",
                "Input",
                Severity::Medium,
                false,
                true,
                "I/O error while reading characters",
                "Check permissions and that the input is still readable",
            ),
            ErrorMetadata::new(
                "E007",
                "Input",
                Severity::Medium,
                false,
                true,
                "Input is not valid UTF-8",
                "Convert the input to UTF-8",
            ),
            ErrorMetadata::new(
                "E008",
                "Input",
                Severity::High,
                false,
                true,
                "Tokenizer backtracked further than the reader's rewind window",
                "Increase input.rewind_window or shorten the failing lexeme",
            ),
            ErrorMetadata::new(
                "E009",
                "Input",
                Severity::Critical,
                false,
                true,
                "Rewind requested without an active mark",
                "Report tokenizer bug",
            ),
            // Lexical errors
            ErrorMetadata::new(
                "E020",
                "Lexical",
                Severity::Medium,
                true,
                false,
                "No acceptor recognizes the input at this position",
                "Fix the offending characters or extend the lexical specification",
            ),
            ErrorMetadata::new(
                "E021",
                "Lexical",
                Severity::Medium,
                false,
                true,
                "Token exceeds the maximum allowed length",
                "Split the input or raise lexical.max_token_length",
            ),
            ErrorMetadata::new(
                "E022",
                "Lexical",
                Severity::Critical,
                false,
                true,
                "Acceptor transition returned a state outside its declared range",
                "Fix the transition function of the named acceptor",
            ),
            // Syntax errors
            ErrorMetadata::new(
                "E040",
                "Syntax",
                Severity::Medium,
                true,
                false,
                "Token does not match what the grammar expects here",
                "Check the token sequence against the grammar",
            ),
            ErrorMetadata::new(
                "E041",
                "Syntax",
                Severity::Medium,
                true,
                false,
                "Input ended while the grammar still expected symbols",
                "Complete the input",
            ),
            // Warnings
            ErrorMetadata::new(
                "W040",
                "Syntax",
                Severity::Low,
                true,
                false,
                "Input remained after the start symbol was fully derived",
                "Remove trailing input or check the grammar's start symbol",
            ),
            // Pipeline errors
            ErrorMetadata::new(
                "E061",
                "Pipeline",
                Severity::Medium,
                true,
                false,
                "Syntax tree could not be exported",
                "Check serializer output and available memory",
            ),
            // Success codes
            ErrorMetadata::new(
                "I004",
                "System",
                Severity::Low,
                true,
                false,
                "Logging system initialized",
                "Continue",
            ),
            ErrorMetadata::new(
                "I006",
                "Input",
                Severity::Low,
                true,
                false,
                "Input source opened",
                "Continue to tokenization",
            ),
            ErrorMetadata::new(
                "I020",
                "Lexical",
                Severity::Low,
                true,
                false,
                "Tokenization completed",
                "Continue to parsing",
            ),
            ErrorMetadata::new(
                "I040",
                "Syntax",
                Severity::Low,
                true,
                false,
                "Parse successful",
                "Consume the syntax tree",
            ),
            ErrorMetadata::new(
                "I060",
                "Pipeline",
                Severity::Low,
                true,
                false,
                "Pipeline completed",
                "Consume the pipeline result",
            ),
        ];

        entries
            .into_iter()
            .map(|metadata| (metadata.code, metadata))
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

pub fn get_severity(code: &str) -> Severity {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

pub fn is_recoverable(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

pub fn requires_halt(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

pub fn get_description(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

pub fn get_action(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

pub fn get_category(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}
