//! Logging service and logger implementations

use super::codes::Code;
use super::config;
use super::events::{LogEvent, LogLevel};
use std::sync::{Arc, Mutex};

/// Destination for log events
pub trait Logger: Send + Sync {
    fn log(&self, event: &LogEvent);
}

/// Main logging service with a minimum level filter
pub struct LoggingService {
    logger: Arc<dyn Logger>,
    min_level: LogLevel,
}

impl LoggingService {
    pub fn new(logger: Arc<dyn Logger>, min_level: LogLevel) -> Self {
        Self { logger, min_level }
    }

    /// Create service from runtime logging preferences
    pub fn with_config() -> Self {
        let min_level = config::get_min_log_level();
        let mut multi = MultiLogger::new(min_level);

        if config::use_console_logging() {
            multi = if config::use_structured_logging() {
                multi.with_structured_console(min_level)
            } else {
                multi.with_console(min_level)
            };
        }

        Self::new(Arc::new(multi), min_level)
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    pub fn should_log(&self, level: LogLevel) -> bool {
        level <= self.min_level
    }

    pub fn log_event(&self, event: LogEvent) {
        if self.should_log(event.level) {
            self.logger.log(&event);
        }
    }
}

/// Plain text logger
///
/// Every event goes to stderr; stdout belongs to the program's own output.
pub struct ConsoleLogger {
    min_level: LogLevel,
}

impl ConsoleLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, event: &LogEvent) {
        if event.level <= self.min_level {
            eprintln!("{}", event.format());
        }
    }
}

/// JSON-lines logger for tooling integration, written to stderr
pub struct StructuredLogger {
    min_level: LogLevel,
}

impl StructuredLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }
}

impl Logger for StructuredLogger {
    fn log(&self, event: &LogEvent) {
        if event.level <= self.min_level {
            let line = event.format_json().unwrap_or_else(|_| event.format());
            eprintln!("{}", line);
        }
    }
}

/// In-memory logger, bounded by the compile-time buffer size
pub struct MemoryLogger {
    events: Mutex<Vec<LogEvent>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn get_events(&self) -> Vec<LogEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }

    pub fn event_count(&self) -> usize {
        self.events.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn get_errors(&self) -> Vec<LogEvent> {
        self.filtered(|e| e.is_error())
    }

    pub fn get_warnings(&self) -> Vec<LogEvent> {
        self.filtered(|e| e.is_warning())
    }

    pub fn has_error_with_code(&self, code: Code) -> bool {
        !self.filtered(|e| e.is_error() && e.code == code).is_empty()
    }

    pub fn has_success_with_code(&self, code: Code) -> bool {
        !self.filtered(|e| e.is_info() && e.code == code).is_empty()
    }

    pub fn get_events_by_category(&self, category: &str) -> Vec<LogEvent> {
        self.filtered(|e| e.category() == category)
    }

    fn filtered<F>(&self, predicate: F) -> Vec<LogEvent>
    where
        F: Fn(&LogEvent) -> bool,
    {
        self.events
            .lock()
            .map(|events| events.iter().filter(|e| predicate(e)).cloned().collect())
            .unwrap_or_default()
    }
}

impl Default for MemoryLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for MemoryLogger {
    fn log(&self, event: &LogEvent) {
        let Ok(mut events) = self.events.lock() else {
            return;
        };

        let max_events = config::get_log_buffer_size();
        if events.len() >= max_events {
            let remove_count = events.len() - max_events + 1;
            events.drain(0..remove_count);
        }

        events.push(event.clone());
    }
}

/// Fan-out logger
pub struct MultiLogger {
    loggers: Vec<Arc<dyn Logger>>,
    min_level: LogLevel,
}

impl MultiLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self {
            loggers: Vec::new(),
            min_level,
        }
    }

    pub fn add_logger(&mut self, logger: Arc<dyn Logger>) {
        self.loggers.push(logger);
    }

    pub fn with_console(mut self, console_level: LogLevel) -> Self {
        self.add_logger(Arc::new(ConsoleLogger::new(console_level)));
        self
    }

    pub fn with_structured_console(mut self, console_level: LogLevel) -> Self {
        self.add_logger(Arc::new(StructuredLogger::new(console_level)));
        self
    }

    pub fn len(&self) -> usize {
        self.loggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loggers.is_empty()
    }
}

impl Logger for MultiLogger {
    fn log(&self, event: &LogEvent) {
        if event.level <= self.min_level {
            for logger in &self.loggers {
                logger.log(event);
            }
        }
    }
}

/// Create logging service based on current configuration
pub fn create_configured_service() -> LoggingService {
    LoggingService::with_config()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;

    #[test]
    fn test_memory_logger() {
        let logger = MemoryLogger::new();

        logger.log(&LogEvent::info("Message 1"));
        logger.log(&LogEvent::error(
            codes::lexical::UNRECOGNIZED_INPUT,
            "Error message",
        ));

        assert_eq!(logger.event_count(), 2);
        assert_eq!(logger.get_errors().len(), 1);
        assert!(logger.has_error_with_code(codes::lexical::UNRECOGNIZED_INPUT));
        assert_eq!(logger.get_events_by_category("Lexical").len(), 1);

        logger.clear();
        assert_eq!(logger.event_count(), 0);
    }

    #[test]
    fn test_memory_logger_respects_buffer_size() {
        let logger = MemoryLogger::new();
        let capacity = config::get_log_buffer_size();

        for i in 0..capacity + 5 {
            logger.log(&LogEvent::info(&format!("event {}", i)));
        }

        let events = logger.get_events();
        assert_eq!(events.len(), capacity);
        assert_eq!(events[0].message, "event 5");
    }

    #[test]
    fn test_multi_logger_fans_out() {
        let first = Arc::new(MemoryLogger::new());
        let second = Arc::new(MemoryLogger::new());
        let mut multi = MultiLogger::new(LogLevel::Debug);
        multi.add_logger(first.clone());
        multi.add_logger(second.clone());
        assert_eq!(multi.len(), 2);

        multi.log(&LogEvent::warning("careful"));

        assert_eq!(first.get_warnings().len(), 1);
        assert_eq!(second.get_warnings().len(), 1);
    }

    #[test]
    fn test_logging_service() {
        let logger = Arc::new(MemoryLogger::new());
        let service = LoggingService::new(logger.clone(), LogLevel::Debug);

        service.log_event(LogEvent::error(codes::input::IO_ERROR, "Test error"));
        service.log_event(LogEvent::success(
            codes::success::PARSE_SUCCESSFUL,
            "Parse successful.",
        ));
        service.log_event(LogEvent::info("Test info"));
        service.log_event(LogEvent::warning("Test warning"));
        service.log_event(LogEvent::debug("Test debug"));

        assert_eq!(logger.event_count(), 5);
        assert!(logger.has_error_with_code(codes::input::IO_ERROR));
        assert!(logger.has_success_with_code(codes::success::PARSE_SUCCESSFUL));
    }

    #[test]
    fn test_log_level_filtering() {
        let logger = Arc::new(MemoryLogger::new());
        let service = LoggingService::new(logger.clone(), LogLevel::Error);

        service.log_event(LogEvent::debug("Debug message"));
        service.log_event(LogEvent::info("Info message"));
        service.log_event(LogEvent::error(
            codes::input::IO_ERROR,
            "Error message",
        ));

        assert_eq!(logger.event_count(), 1);
        assert!(logger.has_error_with_code(codes::input::IO_ERROR));
    }
}
