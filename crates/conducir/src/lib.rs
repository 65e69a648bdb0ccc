//! Conducir: Configuration-Driven Browser UI Operation Engine
//!
//! Conducir (Spanish: "to drive") turns a declaratively configured list of
//! UI operations into a sequence of calls against an abstract browser
//! driver, with retry, polling, and window/frame context-switch semantics
//! that tolerate the non-determinism of asynchronous UI rendering.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    CONDUCIR Architecture                        │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐   ┌────────────┐   ┌────────────┐             │
//! │   │ Suite      │   │ Test       │   │ Execution  │             │
//! │   │ (YAML)     │──►│ Selector   │──►│ Engine     │             │
//! │   └────────────┘   └────────────┘   └─────┬──────┘             │
//! │                                           │                    │
//! │                                    ┌──────▼──────┐             │
//! │                                    │ Operation   │             │
//! │                                    │ Registry    │             │
//! │                                    └──────┬──────┘             │
//! │              ┌────────────┬───────────────┤                    │
//! │       ┌──────▼─────┐ ┌────▼─────┐  ┌──────▼──────┐            │
//! │       │ Browser    │ │ Wait /   │  │ Browser     │            │
//! │       │ Context    │ │ Poll     │  │ Driver      │            │
//! │       │ (stack)    │ │          │  │ (external)  │            │
//! │       └────────────┘ └──────────┘  └─────────────┘            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The browser itself is an external collaborator behind the
//! [`BrowserDriver`] trait; parsing of raw configuration is serde's job.
//! Execution is single-threaded and sequential: one session, one test case
//! at a time, every operation blocking until its handler returns.

#![warn(missing_docs)]

mod context;
mod driver;
mod engine;

/// Builtin operation handlers and the click-retry policy.
pub mod handlers;

mod registry;
mod report;
mod result;
mod schema;
mod selector;
mod settings;
mod wait;

#[cfg(test)]
mod testutil;

pub use context::{BrowserContext, ContextEntry};
pub use driver::{BrowserDriver, DriverResult, ElementState, Locator};
pub use engine::ExecutionEngine;
pub use registry::{OperationHandler, OperationRegistry, Session};
pub use report::{CaseResult, CaseStatus, RunReport};
pub use result::{ConducirError, ConducirResult, DriverError};
pub use schema::{
    ElementProbe, Operation, OperationGroup, RunSelection, Suite, TestCase, ATTR_CUSTOM_REFRESH,
    ATTR_DYNAMIC_TIMESTAMP, ATTR_RELATIVE_PATH, ATTR_SELECT, ATTR_SELECT_INDEX, ATTR_SELECT_TEXT,
    ATTR_VALUE, ATTR_XPATH,
};
pub use selector::{Selection, TestSelector};
pub use settings::{
    EngineSettings, APPEAR_TIMEOUT_MULTIPLIER, DEFAULT_REFRESH_INTERVAL_SECS,
    DEFAULT_WAIT_TIMEOUT_SECS,
};
pub use wait::{bounded_wait, refresh_poll, CancelToken, PollOptions, PollPredicate};
