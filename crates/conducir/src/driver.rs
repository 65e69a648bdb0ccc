//! BrowserDriver - Abstract Browser Automation Trait
//!
//! The engine consumes the browser purely through this trait, so any
//! automation backend (CDP, WebDriver, an in-process fake) can sit behind it.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  BrowserDriver (Abstract Trait)                                  │
//! ├──────────────────────────────────────────────────────────────────┤
//! │                                                                  │
//! │  ┌───────────────────┐  ┌───────────────────┐  ┌─────────────┐  │
//! │  │  WebDriver bridge │  │  CDP bridge       │  │  MockDriver │  │
//! │  │  (remote grid)    │  │  (local browser)  │  │  (tests)    │  │
//! │  └───────────────────┘  └───────────────────┘  └─────────────┘  │
//! │                                                                  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```

use crate::result::DriverError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Result type for driver calls
pub type DriverResult<T> = Result<T, DriverError>;

/// A path expression identifying a UI element (xpath-style).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locator(String);

impl Locator {
    /// Create a new locator
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// The raw path expression
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Locator {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

/// Element readiness states the engine can wait on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementState {
    /// Element exists in the DOM
    Present,
    /// Element exists and is rendered
    Visible,
    /// Element is visible and accepts input
    Clickable,
    /// Element is absent or hidden
    Invisible,
}

impl ElementState {
    /// State name for logs and error messages
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Visible => "visible",
            Self::Clickable => "clickable",
            Self::Invisible => "invisible",
        }
    }
}

impl fmt::Display for ElementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Abstract browser capability consumed by the operation handlers.
///
/// Window handles are opaque string identifiers. `wait_until` delegates the
/// bounded wait to the backend: it returns `Ok(true)` when the condition held
/// within the timeout, `Ok(false)` on expiry, and `Err` only for failures
/// unrelated to the condition (lost session, protocol error). The engine maps
/// `Ok(false)` to its own timeout error so the taxonomy stays uniform.
pub trait BrowserDriver {
    /// Navigate the current window to a URL
    fn navigate(&mut self, url: &str) -> DriverResult<()>;

    /// Reload the current page
    fn refresh(&mut self) -> DriverResult<()>;

    /// Click the first element matching the locator
    fn click(&mut self, locator: &Locator) -> DriverResult<()>;

    /// Clear the value of an input element
    fn clear(&mut self, locator: &Locator) -> DriverResult<()>;

    /// Type text into an element
    fn type_text(&mut self, locator: &Locator, text: &str) -> DriverResult<()>;

    /// Read an attribute of the first matching element
    fn read_attribute(&mut self, locator: &Locator, attribute: &str) -> DriverResult<String>;

    /// Whether a checkbox/radio element is currently selected
    fn is_checked(&mut self, locator: &Locator) -> DriverResult<bool>;

    /// Select a dropdown option by 0-based position
    fn select_by_index(&mut self, locator: &Locator, index: usize) -> DriverResult<()>;

    /// Select a dropdown option by its visible text
    fn select_by_text(&mut self, locator: &Locator, text: &str) -> DriverResult<()>;

    /// Count elements currently matching the locator
    fn count_elements(&mut self, locator: &Locator) -> DriverResult<usize>;

    /// Enumerate all known window handles
    fn window_handles(&mut self) -> DriverResult<Vec<String>>;

    /// Handle of the window the session currently points at
    fn current_window(&mut self) -> DriverResult<String>;

    /// Title of the window the session currently points at
    fn window_title(&mut self) -> DriverResult<String>;

    /// Switch the session to another window
    fn switch_to_window(&mut self, handle: &str) -> DriverResult<()>;

    /// Switch the session into a frame by name
    fn switch_to_frame(&mut self, name: &str) -> DriverResult<()>;

    /// Switch the session into a frame by 0-based index
    fn switch_to_frame_index(&mut self, index: usize) -> DriverResult<()>;

    /// Block until the element reaches the given state, or the timeout
    /// expires. `Ok(true)` = condition held, `Ok(false)` = timed out.
    fn wait_until(
        &mut self,
        locator: &Locator,
        state: ElementState,
        timeout: Duration,
    ) -> DriverResult<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locator_display() {
        let locator = Locator::new("//div[@id='main']");
        assert_eq!(locator.to_string(), "//div[@id='main']");
        assert_eq!(locator.as_str(), "//div[@id='main']");
    }

    #[test]
    fn test_locator_from_str() {
        let locator: Locator = "//button".into();
        assert_eq!(locator.as_str(), "//button");
    }

    #[test]
    fn test_element_state_names() {
        assert_eq!(ElementState::Present.as_str(), "present");
        assert_eq!(ElementState::Visible.as_str(), "visible");
        assert_eq!(ElementState::Clickable.as_str(), "clickable");
        assert_eq!(ElementState::Invisible.as_str(), "invisible");
    }
}
