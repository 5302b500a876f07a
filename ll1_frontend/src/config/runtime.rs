// RUNTIME PREFERENCES (User Experience)

use super::compile_time;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use thiserror::Error;

/// Smallest rewind window a reader may be configured with
pub const MIN_REWIND_WINDOW: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputPreferences {
    /// Characters a streaming reader retains behind an active mark
    pub rewind_window: usize,
}

impl Default for InputPreferences {
    fn default() -> Self {
        Self {
            rewind_window: env::var(env_vars::INPUT_REWIND_WINDOW)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(compile_time::input::REWIND_WINDOW),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalPreferences {
    /// Whether to count tokens per lexical class
    pub collect_class_metrics: bool,

    /// Whether to emit a debug event for every token produced
    pub log_each_token: bool,

    /// Optional cap on the characters one token may span; unlimited when unset
    pub max_token_length: Option<usize>,
}

impl Default for LexicalPreferences {
    fn default() -> Self {
        Self {
            collect_class_metrics: env::var(env_vars::LEXICAL_CLASS_METRICS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            log_each_token: env::var(env_vars::LEXICAL_LOG_TOKENS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            max_token_length: env::var(env_vars::LEXICAL_MAX_TOKEN_LENGTH)
                .ok()
                .and_then(|v| v.parse().ok()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntaxPreferences {
    /// Whether to emit a debug event for every production applied
    pub log_expansions: bool,

    /// Whether leftover input after a complete parse is reported as a warning
    pub warn_on_trailing_input: bool,
}

impl Default for SyntaxPreferences {
    fn default() -> Self {
        Self {
            log_expansions: env::var(env_vars::SYNTAX_LOG_EXPANSIONS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            warn_on_trailing_input: env::var(env_vars::SYNTAX_WARN_TRAILING)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Whether to emit JSON lines instead of plain text
    pub use_structured_logging: bool,

    /// Whether to write events to the console at all
    pub enable_console_logging: bool,

    /// Minimum level that reaches the loggers
    pub min_log_level: LogLevel,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env::var(env_vars::LOGGING_USE_STRUCTURED)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            enable_console_logging: env::var(env_vars::LOGGING_ENABLE_CONSOLE)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Info),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    pub fn to_events_log_level(&self) -> crate::logging::events::LogLevel {
        match self {
            LogLevel::Error => crate::logging::events::LogLevel::Error,
            LogLevel::Warning => crate::logging::events::LogLevel::Warning,
            LogLevel::Info => crate::logging::events::LogLevel::Info,
            LogLevel::Debug => crate::logging::events::LogLevel::Debug,
        }
    }
}

/// Parse log level from string (used for environment variables and CLI flags)
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Invalid configuration in '{path}': {message}")]
    Parse { path: String, message: String },

    #[error("Invalid configuration value for {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

impl ConfigError {
    pub fn error_code(&self) -> crate::logging::Code {
        crate::logging::codes::system::CONFIGURATION_ERROR
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub input: InputPreferences,
    pub lexical: LexicalPreferences,
    pub syntax: SyntaxPreferences,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    /// Defaults with `LL1_*` environment overrides, validated
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self::default();
        config.validate()?;
        Ok(config)
    }

    /// Load preferences from a TOML file; absent sections fall back to defaults
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let config = Self::from_toml_str(&content).map_err(|e| match e {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: RuntimeConfig = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input.rewind_window < MIN_REWIND_WINDOW {
            return Err(ConfigError::Invalid {
                field: "input.rewind_window",
                message: format!(
                    "must be at least {} (got {})",
                    MIN_REWIND_WINDOW, self.input.rewind_window
                ),
            });
        }
        if self.lexical.max_token_length == Some(0) {
            return Err(ConfigError::Invalid {
                field: "lexical.max_token_length",
                message: "must be at least 1 when set".to_string(),
            });
        }
        Ok(())
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    pub const INPUT_REWIND_WINDOW: &str = "LL1_INPUT_REWIND_WINDOW";

    pub const LEXICAL_CLASS_METRICS: &str = "LL1_LEXICAL_CLASS_METRICS";
    pub const LEXICAL_LOG_TOKENS: &str = "LL1_LEXICAL_LOG_TOKENS";
    pub const LEXICAL_MAX_TOKEN_LENGTH: &str = "LL1_LEXICAL_MAX_TOKEN_LENGTH";

    pub const SYNTAX_LOG_EXPANSIONS: &str = "LL1_SYNTAX_LOG_EXPANSIONS";
    pub const SYNTAX_WARN_TRAILING: &str = "LL1_SYNTAX_WARN_TRAILING";

    pub const LOGGING_USE_STRUCTURED: &str = "LL1_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "LL1_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "LL1_LOGGING_MIN_LEVEL";
}
