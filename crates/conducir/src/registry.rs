//! Operation dispatch: the handler capability trait and the name → handler
//! registry.
//!
//! Dispatch is an explicit table populated at construction. An operation
//! whose name has no entry fails with `UnknownOperation`, which aborts the
//! current test case and nothing else. The registry itself never retries;
//! resilience lives inside the individual handlers.

use crate::context::BrowserContext;
use crate::driver::BrowserDriver;
use crate::result::{ConducirError, ConducirResult};
use crate::schema::Operation;
use crate::settings::EngineSettings;
use crate::wait::CancelToken;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// The single shared mutable resource of a run: the driver, the window/frame
/// context, the scalar settings, and the run's cancellation token.
pub struct Session {
    /// External browser capability
    pub driver: Box<dyn BrowserDriver>,
    /// Window/frame nesting state
    pub context: BrowserContext,
    /// Scalar engine settings
    pub settings: EngineSettings,
    /// Cancellation flag observed by polls and the engine loop
    pub cancel: CancelToken,
}

impl Session {
    /// Create a session around a driver with the given settings
    #[must_use]
    pub fn new(driver: Box<dyn BrowserDriver>, settings: EngineSettings) -> Self {
        Self {
            driver,
            context: BrowserContext::new(),
            settings,
            cancel: CancelToken::new(),
        }
    }

    /// Use an externally shared cancellation token
    #[must_use]
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("context", &self.context)
            .field("settings", &self.settings)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

/// A named operation handler: a pure function of (operation attributes,
/// session) to success or error.
pub trait OperationHandler {
    /// The operation name this handler serves
    fn name(&self) -> &'static str;

    /// Execute the operation against the session
    fn execute(&self, op: &Operation, session: &mut Session) -> ConducirResult<()>;
}

/// Registry mapping operation names to handlers.
pub struct OperationRegistry {
    handlers: HashMap<&'static str, Box<dyn OperationHandler>>,
}

impl Default for OperationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl OperationRegistry {
    /// Create a registry populated with the builtin handlers
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::empty();
        crate::handlers::register_builtins(&mut registry);
        registry
    }

    /// Create a registry with no handlers
    #[must_use]
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a handler under its own name; replaces any previous entry
    pub fn register(&mut self, handler: Box<dyn OperationHandler>) {
        self.handlers.insert(handler.name(), handler);
    }

    /// Whether a handler exists for the name
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered operation names
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.handlers.keys().copied().collect()
    }

    /// Look up the handler for the operation and run it.
    ///
    /// # Errors
    /// `UnknownOperation` when no handler matches, otherwise whatever the
    /// handler reports.
    pub fn dispatch(&self, op: &Operation, session: &mut Session) -> ConducirResult<()> {
        let handler = self
            .handlers
            .get(op.name.as_str())
            .ok_or_else(|| ConducirError::UnknownOperation {
                name: op.name.clone(),
            })?;
        debug!(operation = %op.name, "dispatching operation");
        handler.execute(op, session)
    }
}

impl fmt::Debug for OperationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = self.names();
        names.sort_unstable();
        f.debug_struct("OperationRegistry")
            .field("handlers", &names)
            .finish()
    }
}
