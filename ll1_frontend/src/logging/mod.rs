//! Global logging for the front end
//!
//! A process-wide `LoggingService` set once at startup, plus a thread-local
//! session context naming the input being processed. Every event dispatched
//! while a session is active carries a `session` context entry and is also
//! delivered to the session's own logger when one was supplied.

pub mod codes;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use std::cell::RefCell;
use std::sync::{Arc, OnceLock};

pub use codes::Code;
pub use events::{LogEvent, LogLevel};
pub use service::{ConsoleLogger, Logger, LoggingService, MemoryLogger, MultiLogger, StructuredLogger};

// ============================================================================
// GLOBAL STATE
// ============================================================================

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

/// Per-thread description of the input currently being processed
#[derive(Clone)]
pub struct SessionContext {
    pub name: String,
    sink: Option<Arc<dyn Logger>>,
}

thread_local! {
    static SESSION_CONTEXT: RefCell<Option<SessionContext>> = RefCell::new(None);
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize global logging from runtime preferences
pub fn init_global_logging() -> Result<(), String> {
    config::validate_config().map_err(|e| format!("Configuration validation failed: {}", e))?;

    let logging_service = Arc::new(service::create_configured_service());

    GLOBAL_LOGGER
        .set(logging_service.clone())
        .map_err(|_| "Global logger already initialized")?;

    logging_service.log_event(LogEvent::success(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
    ));

    Ok(())
}

pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

// ============================================================================
// SESSION CONTEXT MANAGEMENT
// ============================================================================

fn swap_session(context: Option<SessionContext>) -> Option<SessionContext> {
    SESSION_CONTEXT.with(|ctx| std::mem::replace(&mut *ctx.borrow_mut(), context))
}

/// Run `f` with events tagged by `name`; the previous session is restored afterwards
///
/// A session logger installed by an enclosing session keeps receiving events.
pub fn with_session_context<F, R>(name: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    let sink = SESSION_CONTEXT.with(|ctx| ctx.borrow().as_ref().and_then(|s| s.sink.clone()));
    let previous = swap_session(Some(SessionContext {
        name: name.to_string(),
        sink,
    }));
    let result = f();
    swap_session(previous);
    result
}

/// Like `with_session_context`, additionally delivering every event to `logger`
pub fn with_session_logger<F, R>(name: &str, logger: Arc<dyn Logger>, f: F) -> R
where
    F: FnOnce() -> R,
{
    let previous = swap_session(Some(SessionContext {
        name: name.to_string(),
        sink: Some(logger),
    }));
    let result = f();
    swap_session(previous);
    result
}

/// Name of the active session on this thread
pub fn current_session_name() -> Option<String> {
    SESSION_CONTEXT.with(|ctx| ctx.borrow().as_ref().map(|s| s.name.clone()))
}

fn dispatch(mut event: LogEvent) {
    let session = SESSION_CONTEXT.with(|ctx| ctx.borrow().clone());

    if let Some(session) = &session {
        event = event.with_context("session", &session.name);
        if let Some(sink) = &session.sink {
            sink.log(&event);
        }
    }

    if let Some(logger) = try_get_global_logger() {
        logger.log_event(event);
    }
}

fn with_pairs(mut event: LogEvent, context: Vec<(&str, &str)>) -> LogEvent {
    for (key, value) in context {
        event = event.with_context(key, value);
    }
    event
}

// ============================================================================
// MACRO SUPPORT FUNCTIONS
// ============================================================================

pub fn log_error_with_context(
    code: Code,
    message: &str,
    span: Option<crate::utils::Span>,
    context: Vec<(&str, &str)>,
) {
    let mut event = with_pairs(LogEvent::error(code, message), context);
    if let Some(s) = span {
        event = event.with_span(s);
    }
    dispatch(event);
}

pub fn log_success_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    dispatch(with_pairs(LogEvent::success(code, message), context));
}

pub fn log_info_with_context(message: &str, context: Vec<(&str, &str)>) {
    dispatch(with_pairs(LogEvent::info(message), context));
}

pub fn log_warning_with_context(code: Option<Code>, message: &str, context: Vec<(&str, &str)>) {
    let event = match code {
        Some(code) => LogEvent::warning_with_code(code, message),
        None => LogEvent::warning(message),
    };
    dispatch(with_pairs(event, context));
}

pub fn log_debug_with_context(message: &str, context: Vec<(&str, &str)>) {
    dispatch(with_pairs(LogEvent::debug(message), context));
}
