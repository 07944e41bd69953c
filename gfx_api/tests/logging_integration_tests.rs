//! Integration tests for the Engine logging system
//!
//! These tests verify the logging system through the public API only.
//! No GPU required.
//!
//! Run with: cargo test --test logging_integration_tests

use gfx_api::gfx::log::{LogEntry, LogSeverity, Logger};
use gfx_api::gfx::Engine;
use serial_test::serial;
use std::sync::{Arc, Mutex};

// ============================================================================
// TEST LOGGER IMPLEMENTATION
// ============================================================================

/// Test logger that captures log entries for verification
struct TestLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogger {
    fn new() -> (Self, Arc<Mutex<Vec<LogEntry>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        (Self { entries: entries.clone() }, entries)
    }
}

impl Logger for TestLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

// ============================================================================
// LOGGING TESTS
// ============================================================================

#[test]
#[serial]
fn test_integration_custom_logger() {
    let (test_logger, entries) = TestLogger::new();
    Engine::set_logger(test_logger);

    Engine::log(LogSeverity::Info, "test::module", "Test info message".to_string());
    Engine::log(LogSeverity::Warn, "test::module", "Test warning message".to_string());

    let captured_entries = entries.lock().unwrap().clone();
    Engine::reset_logger();

    assert_eq!(captured_entries.len(), 2);
    assert_eq!(captured_entries[0].severity, LogSeverity::Info);
    assert_eq!(captured_entries[0].source, "test::module");
    assert_eq!(captured_entries[0].message, "Test info message");
    assert_eq!(captured_entries[1].severity, LogSeverity::Warn);
    assert!(captured_entries[1].file.is_none());
}

#[test]
#[serial]
fn test_integration_error_logging_with_location() {
    let (test_logger, entries) = TestLogger::new();
    Engine::set_logger(test_logger);

    Engine::log_detailed(
        LogSeverity::Error,
        "test::error",
        "Critical error occurred".to_string(),
        "test_file.rs",
        42,
    );

    let captured_entries = entries.lock().unwrap().clone();
    Engine::reset_logger();

    assert_eq!(captured_entries.len(), 1);
    let entry = &captured_entries[0];
    assert_eq!(entry.severity, LogSeverity::Error);
    assert_eq!(entry.message, "Critical error occurred");
    assert_eq!(entry.file, Some("test_file.rs"));
    assert_eq!(entry.line, Some(42));
}

#[test]
#[serial]
fn test_integration_macros_route_through_engine() {
    let (test_logger, entries) = TestLogger::new();
    Engine::set_logger(test_logger);

    gfx_api::engine_trace!("gfx::test", "trace {}", 1);
    gfx_api::engine_debug!("gfx::test", "debug {}", 2);
    gfx_api::engine_info!("gfx::test", "info {}", 3);
    gfx_api::engine_warn!("gfx::test", "warn {}", 4);
    gfx_api::engine_error!("gfx::test", "error {}", 5);

    let captured_entries = entries.lock().unwrap().clone();
    Engine::reset_logger();

    let severities: Vec<LogSeverity> = captured_entries.iter().map(|e| e.severity).collect();
    assert_eq!(
        severities,
        vec![
            LogSeverity::Trace,
            LogSeverity::Debug,
            LogSeverity::Info,
            LogSeverity::Warn,
            LogSeverity::Error,
        ]
    );
    assert_eq!(captured_entries[3].message, "warn 4");
    // Only the error macro records its location
    assert!(captured_entries[3].line.is_none());
    assert!(captured_entries[4]
        .file
        .is_some_and(|file| file.ends_with("logging_integration_tests.rs")));
}

#[test]
#[serial]
fn test_integration_logger_reset() {
    let (test_logger, entries) = TestLogger::new();
    Engine::set_logger(test_logger);

    Engine::log(LogSeverity::Info, "test", "Message 1".to_string());
    assert_eq!(entries.lock().unwrap().len(), 1);

    Engine::reset_logger();

    // Goes to the default logger, not captured
    Engine::log(LogSeverity::Info, "test", "Message 2".to_string());
    assert_eq!(entries.lock().unwrap().len(), 1);
}
