//! Scriptable in-memory driver shared by the unit tests.

use crate::driver::{BrowserDriver, DriverResult, ElementState, Locator};
use crate::result::DriverError;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Mock driver that records every call and plays back scripted behavior.
///
/// Calls are logged as `"<verb>:<args>"` strings so tests can assert on
/// exact sequences and side-effect counts.
#[derive(Debug)]
pub struct MockDriver {
    /// Every driver call in order, formatted for assertions
    pub calls: Vec<String>,
    /// locator → clicks that fail before one succeeds
    pub click_failures: HashMap<String, usize>,
    /// locator → checkbox state
    pub checked: HashMap<String, bool>,
    /// (locator, attribute) → value
    pub attributes: HashMap<(String, String), String>,
    /// locator → scripted element counts, consumed per query (last repeats)
    pub counts: HashMap<String, VecDeque<usize>>,
    /// (handle, title) pairs the driver knows about
    pub windows: Vec<(String, String)>,
    /// handle the session currently points at
    pub current_window: String,
    /// (locator, state) pairs whose bounded wait reports expiry
    pub wait_expiries: Vec<(String, ElementState)>,
    /// frames entered, for nesting assertions
    pub frames: Vec<String>,
    /// make navigate fail, for session-start error paths
    pub fail_navigate: bool,
}

impl Default for MockDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDriver {
    /// A driver with one main window `w0` titled "main"
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            click_failures: HashMap::new(),
            checked: HashMap::new(),
            attributes: HashMap::new(),
            counts: HashMap::new(),
            windows: vec![("w0".to_string(), "main".to_string())],
            current_window: "w0".to_string(),
            wait_expiries: Vec::new(),
            frames: Vec::new(),
            fail_navigate: false,
        }
    }

    /// Add a window the driver can switch into
    pub fn add_window(&mut self, handle: &str, title: &str) {
        self.windows.push((handle.to_string(), title.to_string()));
    }

    /// Script the element counts returned for a locator, in query order
    pub fn script_counts(&mut self, locator: &str, counts: &[usize]) {
        self.counts
            .insert(locator.to_string(), counts.iter().copied().collect());
    }

    /// Number of logged calls starting with `prefix`
    pub fn calls_matching(&self, prefix: &str) -> usize {
        self.calls.iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn log(&mut self, call: String) {
        self.calls.push(call);
    }
}

impl BrowserDriver for MockDriver {
    fn navigate(&mut self, url: &str) -> DriverResult<()> {
        self.log(format!("navigate:{url}"));
        if self.fail_navigate {
            return Err(DriverError::new(format!("cannot reach {url}")));
        }
        Ok(())
    }

    fn refresh(&mut self) -> DriverResult<()> {
        self.log("refresh".to_string());
        Ok(())
    }

    fn click(&mut self, locator: &Locator) -> DriverResult<()> {
        self.log(format!("click:{locator}"));
        if let Some(remaining) = self.click_failures.get_mut(locator.as_str()) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(DriverError::new("element is stale"));
            }
        }
        Ok(())
    }

    fn clear(&mut self, locator: &Locator) -> DriverResult<()> {
        self.log(format!("clear:{locator}"));
        Ok(())
    }

    fn type_text(&mut self, locator: &Locator, text: &str) -> DriverResult<()> {
        self.log(format!("type:{locator}:{text}"));
        Ok(())
    }

    fn read_attribute(&mut self, locator: &Locator, attribute: &str) -> DriverResult<String> {
        self.log(format!("attr:{locator}:{attribute}"));
        self.attributes
            .get(&(locator.as_str().to_string(), attribute.to_string()))
            .cloned()
            .ok_or_else(|| DriverError::new(format!("no attribute {attribute} on {locator}")))
    }

    fn is_checked(&mut self, locator: &Locator) -> DriverResult<bool> {
        self.log(format!("checked:{locator}"));
        Ok(self.checked.get(locator.as_str()).copied().unwrap_or(false))
    }

    fn select_by_index(&mut self, locator: &Locator, index: usize) -> DriverResult<()> {
        self.log(format!("select-index:{locator}:{index}"));
        Ok(())
    }

    fn select_by_text(&mut self, locator: &Locator, text: &str) -> DriverResult<()> {
        self.log(format!("select-text:{locator}:{text}"));
        Ok(())
    }

    fn count_elements(&mut self, locator: &Locator) -> DriverResult<usize> {
        self.log(format!("count:{locator}"));
        let count = match self.counts.get_mut(locator.as_str()) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or(0),
            Some(queue) => queue.front().copied().unwrap_or(0),
            None => 0,
        };
        Ok(count)
    }

    fn window_handles(&mut self) -> DriverResult<Vec<String>> {
        self.log("handles".to_string());
        Ok(self.windows.iter().map(|(h, _)| h.clone()).collect())
    }

    fn current_window(&mut self) -> DriverResult<String> {
        self.log("current-window".to_string());
        Ok(self.current_window.clone())
    }

    fn window_title(&mut self) -> DriverResult<String> {
        self.log("title".to_string());
        let title = self
            .windows
            .iter()
            .find(|(h, _)| *h == self.current_window)
            .map(|(_, t)| t.clone())
            .unwrap_or_default();
        Ok(title)
    }

    fn switch_to_window(&mut self, handle: &str) -> DriverResult<()> {
        self.log(format!("switch-window:{handle}"));
        if self.windows.iter().any(|(h, _)| h == handle) {
            self.current_window = handle.to_string();
            // re-entering a window leaves frame context behind
            self.frames.clear();
            Ok(())
        } else {
            Err(DriverError::new(format!("no such window {handle}")))
        }
    }

    fn switch_to_frame(&mut self, name: &str) -> DriverResult<()> {
        self.log(format!("switch-frame:{name}"));
        self.frames.push(name.to_string());
        Ok(())
    }

    fn switch_to_frame_index(&mut self, index: usize) -> DriverResult<()> {
        self.log(format!("switch-frame-index:{index}"));
        self.frames.push(format!("#{index}"));
        Ok(())
    }

    fn wait_until(
        &mut self,
        locator: &Locator,
        state: ElementState,
        _timeout: Duration,
    ) -> DriverResult<bool> {
        self.log(format!("wait:{locator}:{state}"));
        let expired = self
            .wait_expiries
            .iter()
            .any(|(l, s)| l == locator.as_str() && *s == state);
        Ok(!expired)
    }
}

/// Handle-keeping wrapper around [`MockDriver`] so a test can box the driver
/// into a `Session` and still inspect it afterwards.
#[derive(Debug, Clone, Default)]
pub struct SharedMockDriver(Arc<Mutex<MockDriver>>);

impl SharedMockDriver {
    /// A shared driver around a fresh [`MockDriver`]
    pub fn new() -> Self {
        Self(Arc::new(Mutex::new(MockDriver::new())))
    }

    /// Access the underlying mock for scripting and assertions
    pub fn lock(&self) -> MutexGuard<'_, MockDriver> {
        self.0.lock().expect("mock driver poisoned")
    }
}

impl BrowserDriver for SharedMockDriver {
    fn navigate(&mut self, url: &str) -> DriverResult<()> {
        self.lock().navigate(url)
    }

    fn refresh(&mut self) -> DriverResult<()> {
        self.lock().refresh()
    }

    fn click(&mut self, locator: &Locator) -> DriverResult<()> {
        self.lock().click(locator)
    }

    fn clear(&mut self, locator: &Locator) -> DriverResult<()> {
        self.lock().clear(locator)
    }

    fn type_text(&mut self, locator: &Locator, text: &str) -> DriverResult<()> {
        self.lock().type_text(locator, text)
    }

    fn read_attribute(&mut self, locator: &Locator, attribute: &str) -> DriverResult<String> {
        self.lock().read_attribute(locator, attribute)
    }

    fn is_checked(&mut self, locator: &Locator) -> DriverResult<bool> {
        self.lock().is_checked(locator)
    }

    fn select_by_index(&mut self, locator: &Locator, index: usize) -> DriverResult<()> {
        self.lock().select_by_index(locator, index)
    }

    fn select_by_text(&mut self, locator: &Locator, text: &str) -> DriverResult<()> {
        self.lock().select_by_text(locator, text)
    }

    fn count_elements(&mut self, locator: &Locator) -> DriverResult<usize> {
        self.lock().count_elements(locator)
    }

    fn window_handles(&mut self) -> DriverResult<Vec<String>> {
        self.lock().window_handles()
    }

    fn current_window(&mut self) -> DriverResult<String> {
        self.lock().current_window()
    }

    fn window_title(&mut self) -> DriverResult<String> {
        self.lock().window_title()
    }

    fn switch_to_window(&mut self, handle: &str) -> DriverResult<()> {
        self.lock().switch_to_window(handle)
    }

    fn switch_to_frame(&mut self, name: &str) -> DriverResult<()> {
        self.lock().switch_to_frame(name)
    }

    fn switch_to_frame_index(&mut self, index: usize) -> DriverResult<()> {
        self.lock().switch_to_frame_index(index)
    }

    fn wait_until(
        &mut self,
        locator: &Locator,
        state: ElementState,
        timeout: Duration,
    ) -> DriverResult<bool> {
        self.lock().wait_until(locator, state, timeout)
    }
}
