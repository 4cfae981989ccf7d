//! crates/logging/src/thread_local.rs
//! Thread-local storage for verbosity configuration and event collection.
//!
//! The event buffer holds at most [`MAX_BUFFERED_EVENTS`] entries; once full,
//! the oldest event is dropped for each new one.

use super::config::VerbosityConfig;
use super::levels::DebugFlag;
use std::cell::RefCell;
use std::collections::VecDeque;

thread_local! {
    static VERBOSITY: RefCell<VerbosityConfig> = RefCell::new(VerbosityConfig::default());
    #[allow(clippy::missing_const_for_thread_local)]
    static EVENTS: RefCell<VecDeque<DiagnosticEvent>> = RefCell::new(VecDeque::new());
}

/// Upper bound on undrained events kept per thread.
pub const MAX_BUFFERED_EVENTS: usize = 1024;

/// Diagnostic event collected during execution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiagnosticEvent {
    /// The debug flag category.
    pub flag: DebugFlag,
    /// The verbosity level.
    pub level: u8,
    /// The diagnostic message.
    pub message: String,
}

/// Initialize verbosity configuration for the current thread.
pub fn init(config: VerbosityConfig) {
    VERBOSITY.with(|v| {
        *v.borrow_mut() = config;
    });
}

/// Check if the debug flag is at or above the specified level.
pub fn debug_gte(flag: DebugFlag, level: u8) -> bool {
    VERBOSITY.with(|v| v.borrow().debug.get(flag) >= level)
}

/// Emit a debug diagnostic event, evicting the oldest one when the buffer is
/// full.
pub fn emit_debug(flag: DebugFlag, level: u8, message: String) {
    EVENTS.with(|e| {
        let mut events = e.borrow_mut();
        if events.len() == MAX_BUFFERED_EVENTS {
            events.pop_front();
        }
        events.push_back(DiagnosticEvent {
            flag,
            level,
            message,
        });
    });
}

/// Drain all collected events, clearing the internal buffer.
pub fn drain_events() -> Vec<DiagnosticEvent> {
    EVENTS.with(|e| e.borrow_mut().drain(..).collect())
}

/// Apply a debug flag token to the current configuration.
pub fn apply_debug_flag(token: &str) -> Result<(), String> {
    VERBOSITY.with(|v| v.borrow_mut().apply_debug_flag(token))
}
