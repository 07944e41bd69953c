/// gfx_api Engine - holder of the active context and the logger
///
/// The active context is installed explicitly once at startup and handed out to
/// whoever needs to create resources. Native graphics contexts are bound to the
/// thread that created them, so the active context is tracked per thread; the
/// logger is process-wide.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::{OnceLock, RwLock};
use std::time::SystemTime;

use crate::context::Context;
use crate::error::{Error, Result};
use crate::log::{DefaultLogger, LogEntry, LogSeverity, Logger};

// ===== INTERNAL STATE =====

thread_local! {
    /// Engine state for the current (rendering) thread
    static ENGINE_STATE: RefCell<Option<EngineState>> = const { RefCell::new(None) };
}

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

/// Internal state structure
struct EngineState {
    /// Active context (None until `create_context`)
    context: Option<Rc<dyn Context>>,
}

impl EngineState {
    fn new() -> Self {
        Self { context: None }
    }
}

// ===== PUBLIC API =====

/// Engine holder
///
/// # Example
///
/// ```ignore
/// use gfx_api::gfx::{Engine, Config, render::PixelFormat};
/// use gfx_api_renderer_opengl::OpenGlContext;
///
/// Engine::initialize()?;
/// Engine::create_context(OpenGlContext::new(gl, Config::default()))?;
///
/// let ctx = Engine::context()?;
/// let texture = ctx.create_texture(256, 256, PixelFormat::Rgba, "font atlas")?;
///
/// Engine::shutdown();
/// # Ok::<(), gfx_api::gfx::Error>(())
/// ```
pub struct Engine;

impl Engine {
    /// Helper to log errors before returning them
    fn log_and_return_error(error: Error) -> Error {
        crate::engine_error!("gfx::Engine", "{}", error);
        error
    }

    /// Initialize the engine on the current thread
    ///
    /// Idempotent: calling it again keeps the current state.
    pub fn initialize() -> Result<()> {
        ENGINE_STATE.with(|state| {
            let mut state = state.borrow_mut();
            if state.is_none() {
                *state = Some(EngineState::new());
            }
        });
        Ok(())
    }

    /// Shutdown the engine on the current thread and drop the active context
    ///
    /// Resources still held by callers keep the backend device alive until
    /// they are dropped.
    pub fn shutdown() {
        let state = ENGINE_STATE.with(|state| state.borrow_mut().take());
        if let Some(EngineState { context: Some(ctx) }) = state {
            crate::engine_info!("gfx::Engine", "Shutting down '{}' context", ctx.backend_name());
        }
    }

    /// Install the active context
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The engine is not initialized
    /// - A context is already installed
    pub fn create_context<C: Context + 'static>(context: C) -> Result<()> {
        let context: Rc<dyn Context> = Rc::new(context);
        let backend = context.backend_name();

        ENGINE_STATE.with(|state| {
            let mut state = state.borrow_mut();
            let state = state.as_mut().ok_or_else(|| {
                Self::log_and_return_error(Error::InitializationFailed(
                    "Engine not initialized. Call Engine::initialize() first.".to_string(),
                ))
            })?;

            if state.context.is_some() {
                return Err(Self::log_and_return_error(Error::InitializationFailed(
                    "Context already exists. Call Engine::destroy_context() first.".to_string(),
                )));
            }

            state.context = Some(context);
            Ok(())
        })?;

        crate::engine_info!("gfx::Engine", "'{}' context installed", backend);
        Ok(())
    }

    /// Get the active context
    ///
    /// # Errors
    ///
    /// Returns an error if the engine is not initialized or no context was installed
    /// on this thread.
    pub fn context() -> Result<Rc<dyn Context>> {
        ENGINE_STATE.with(|state| {
            let state = state.borrow();
            let state = state.as_ref().ok_or_else(|| {
                Self::log_and_return_error(Error::InitializationFailed(
                    "Engine not initialized. Call Engine::initialize() first.".to_string(),
                ))
            })?;

            state.context.clone().ok_or_else(|| {
                Self::log_and_return_error(Error::InitializationFailed(
                    "Context not created. Call Engine::create_context() first.".to_string(),
                ))
            })
        })
    }

    /// Remove the active context, allowing another one to be installed
    ///
    /// # Errors
    ///
    /// Returns an error if the engine is not initialized
    pub fn destroy_context() -> Result<()> {
        ENGINE_STATE.with(|state| {
            let mut state = state.borrow_mut();
            let state = state.as_mut().ok_or_else(|| {
                Self::log_and_return_error(Error::InitializationFailed(
                    "Engine not initialized".to_string(),
                ))
            })?;
            state.context = None;
            Ok(())
        })?;

        crate::engine_info!("gfx::Engine", "Context destroyed");
        Ok(())
    }

    /// Returns true if a context is installed on this thread
    pub fn has_context() -> bool {
        ENGINE_STATE.with(|state| {
            state
                .borrow()
                .as_ref()
                .is_some_and(|state| state.context.is_some())
        })
    }

    // ===== LOGGING API =====

    /// Set a custom logger
    pub fn set_logger<L: Logger + 'static>(logger: L) {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(mut lock) = logger_lock.write() {
            *lock = Box::new(logger);
        }
    }

    /// Reset logger to default (DefaultLogger)
    pub fn reset_logger() {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(mut lock) = logger_lock.write() {
            *lock = Box::new(DefaultLogger);
        }
    }

    /// Internal logging method (for simple logs without file:line)
    ///
    /// Used by macros like engine_info!, engine_warn!, etc.
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        Self::dispatch(LogEntry {
            severity,
            timestamp: SystemTime::now(),
            source: source.to_string(),
            message,
            file: None,
            line: None,
        });
    }

    /// Internal logging method with file:line information
    ///
    /// Used by engine_error! and engine_fatal!.
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        Self::dispatch(LogEntry {
            severity,
            timestamp: SystemTime::now(),
            source: source.to_string(),
            message,
            file: Some(file),
            line: Some(line),
        });
    }

    fn dispatch(entry: LogEntry) {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        // A logger that panicked poisons the lock; keep logging through it anyway.
        let lock = logger_lock.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        lock.log(&entry);
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
