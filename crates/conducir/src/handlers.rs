//! Builtin operation handlers.
//!
//! Each handler is a pure function of (operation attributes, session). The
//! resilience rules live here: the click path re-waits and retries around
//! stale elements, the checkbox path is idempotent, and the repeated waits
//! lean on the refresh-poll in [`crate::wait`].

use crate::driver::{BrowserDriver, ElementState, Locator};
use crate::registry::{OperationHandler, OperationRegistry, Session};
use crate::result::{ConducirError, ConducirResult};
use crate::schema::{
    Operation, ATTR_CUSTOM_REFRESH, ATTR_DYNAMIC_TIMESTAMP, ATTR_RELATIVE_PATH, ATTR_SELECT,
    ATTR_SELECT_INDEX, ATTR_SELECT_TEXT, ATTR_VALUE, ATTR_XPATH,
};
use crate::wait::{bounded_wait, refresh_poll, PollOptions, PollPredicate};
use regex::Regex;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Click attempts before giving up on a target
const CLICK_ATTEMPTS: u32 = 3;

/// Timestamp suffix layout: MM-dd-yyyy-HH-mm-ss
const TIMESTAMP_FORMAT: &str = "%m-%d-%Y-%H-%M-%S";

/// Register every builtin handler on the registry.
pub fn register_builtins(registry: &mut OperationRegistry) {
    registry.register(Box::new(KeyboardInput));
    registry.register(Box::new(Click));
    registry.register(Box::new(SelectDropDown));
    registry.register(Box::new(SelectCheckBox));
    registry.register(Box::new(SelectPopupWindow));
    registry.register(Box::new(BackToParentWindow));
    registry.register(Box::new(SelectFrame));
    registry.register(Box::new(WaitInvisible));
    registry.register(Box::new(WaitForAppear));
    registry.register(Box::new(WaitAppearRepeatedly));
    registry.register(Box::new(WaitDisappearRepeatedly));
    registry.register(Box::new(ClickIfAnotherElementExist));
}

fn target_locator(op: &Operation) -> ConducirResult<Locator> {
    Ok(Locator::new(op.require_attr(ATTR_XPATH)?))
}

/// Click with stale-element tolerance.
///
/// Waits for presence, visibility, and clickability in sequence (same
/// timeout each, composed rather than short-circuited), then attempts the
/// click up to [`CLICK_ATTEMPTS`] times. A failed attempt is logged and
/// followed by a fresh clickability wait; elements re-rendered between the
/// visibility check and the click are absorbed this way without looping
/// forever.
pub(crate) fn click_with_retry(
    driver: &mut dyn BrowserDriver,
    locator: &Locator,
    timeout: Duration,
) -> ConducirResult<()> {
    bounded_wait(driver, locator, ElementState::Present, timeout)?;
    bounded_wait(driver, locator, ElementState::Visible, timeout)?;
    bounded_wait(driver, locator, ElementState::Clickable, timeout)?;

    for attempt in 1..=CLICK_ATTEMPTS {
        match driver.click(locator) {
            Ok(()) => return Ok(()),
            Err(err) => {
                warn!(locator = %locator, attempt, error = %err, "click attempt failed");
                if attempt < CLICK_ATTEMPTS {
                    bounded_wait(driver, locator, ElementState::Clickable, timeout)?;
                }
            }
        }
    }

    Err(ConducirError::RetryExhausted {
        locator: locator.to_string(),
        attempts: CLICK_ATTEMPTS,
    })
}

/// Type a value into an input box.
///
/// The value may be suffixed with the current local time (when the
/// `dynamic-time-stamp` flag is set, for inputs that must be unique per run)
/// and prefixed with the configured base path (when `relative-path` is set).
struct KeyboardInput;

impl OperationHandler for KeyboardInput {
    fn name(&self) -> &'static str {
        "KeyboardInput"
    }

    fn execute(&self, op: &Operation, session: &mut Session) -> ConducirResult<()> {
        let locator = target_locator(op)?;
        let mut value = op.require_attr(ATTR_VALUE)?.to_string();

        if op.flag(ATTR_DYNAMIC_TIMESTAMP) {
            value.push_str(&chrono::Local::now().format(TIMESTAMP_FORMAT).to_string());
        }
        if op.flag(ATTR_RELATIVE_PATH) {
            value = format!("{}{}", session.settings.base_path, value);
        }

        debug!(locator = %locator, value = %value, "keyboard input");
        let timeout = session.settings.wait_timeout();
        let driver = session.driver.as_mut();
        bounded_wait(driver, &locator, ElementState::Clickable, timeout)?;
        driver.click(&locator)?;
        driver.clear(&locator)?;
        driver.type_text(&locator, &value)?;
        Ok(())
    }
}

/// Click the target element (with retry, see [`click_with_retry`]).
struct Click;

impl OperationHandler for Click {
    fn name(&self) -> &'static str {
        "Click"
    }

    fn execute(&self, op: &Operation, session: &mut Session) -> ConducirResult<()> {
        let locator = target_locator(op)?;
        click_with_retry(
            session.driver.as_mut(),
            &locator,
            session.settings.wait_timeout(),
        )
    }
}

/// Select a dropdown option by 0-based position or by visible text.
/// Exactly one of `select-index` / `select-text` must be supplied.
struct SelectDropDown;

impl OperationHandler for SelectDropDown {
    fn name(&self) -> &'static str {
        "SelectDropDown"
    }

    fn execute(&self, op: &Operation, session: &mut Session) -> ConducirResult<()> {
        let locator = target_locator(op)?;
        let timeout = session.settings.wait_timeout();
        bounded_wait(
            session.driver.as_mut(),
            &locator,
            ElementState::Visible,
            timeout,
        )?;

        let index = op.index_attr(ATTR_SELECT_INDEX)?;
        let text = op.attr(ATTR_SELECT_TEXT);
        match (index, text) {
            (Some(_), Some(_)) => Err(ConducirError::AmbiguousAttribute {
                operation: op.name.clone(),
                detail: "both select-index and select-text supplied".to_string(),
            }),
            (Some(i), None) => {
                debug!(locator = %locator, index = i, "select by index");
                Ok(session.driver.select_by_index(&locator, i)?)
            }
            (None, Some(t)) => {
                debug!(locator = %locator, text = t, "select by text");
                Ok(session.driver.select_by_text(&locator, t)?)
            }
            (None, None) => Err(ConducirError::missing_attribute(
                &op.name,
                "select-index or select-text",
            )),
        }
    }
}

/// Drive a checkbox to the desired state. Reads the current state first and
/// clicks only on mismatch, so re-running against an already-correct box is
/// a no-op.
struct SelectCheckBox;

impl OperationHandler for SelectCheckBox {
    fn name(&self) -> &'static str {
        "SelectCheckBox"
    }

    fn execute(&self, op: &Operation, session: &mut Session) -> ConducirResult<()> {
        let locator = target_locator(op)?;
        let desired = op.bool_attr(ATTR_SELECT)?;
        let current = session.driver.is_checked(&locator)?;
        if current == desired {
            debug!(locator = %locator, desired, "checkbox already in desired state");
            return Ok(());
        }
        click_with_retry(
            session.driver.as_mut(),
            &locator,
            session.settings.wait_timeout(),
        )
    }
}

/// Switch into the popup window whose title equals the operation's target
/// string (carried in the `xpath` attribute). The handle left behind is
/// pushed on the context stack; if no enumerated window matches, the session
/// is switched back to it and the miss is reported.
struct SelectPopupWindow;

impl OperationHandler for SelectPopupWindow {
    fn name(&self) -> &'static str {
        "SelectPopupWindow"
    }

    fn execute(&self, op: &Operation, session: &mut Session) -> ConducirResult<()> {
        let title = op.require_attr(ATTR_XPATH)?;
        let saved = session.driver.current_window()?;
        let handles = session.driver.window_handles()?;

        for handle in handles {
            session.driver.switch_to_window(&handle)?;
            if session.driver.window_title()? == title {
                info!(title, handle = %handle, "switched to popup window");
                session.context.push_window(saved);
                session.context.set_current(handle);
                return Ok(());
            }
        }

        session.driver.switch_to_window(&saved)?;
        Err(ConducirError::WindowNotFound {
            title: title.to_string(),
        })
    }
}

/// Return to the window saved by the matching enter operation.
struct BackToParentWindow;

impl OperationHandler for BackToParentWindow {
    fn name(&self) -> &'static str {
        "BackToParentWindow"
    }

    fn execute(&self, _op: &Operation, session: &mut Session) -> ConducirResult<()> {
        let entry = session
            .context
            .pop()
            .ok_or(ConducirError::ContextStackEmpty)?;
        let parent = entry.parent_handle().to_string();
        session.driver.switch_to_window(&parent)?;
        info!(handle = %parent, "returned to parent window");
        session.context.set_current(parent);
        Ok(())
    }
}

/// Switch into a frame by name; an empty name means the first frame by
/// index. The current window handle is pushed so a later return restores it.
struct SelectFrame;

impl OperationHandler for SelectFrame {
    fn name(&self) -> &'static str {
        "SelectFrame"
    }

    fn execute(&self, op: &Operation, session: &mut Session) -> ConducirResult<()> {
        let name = op.require_attr(ATTR_XPATH)?;
        let saved = session.driver.current_window()?;
        if name.is_empty() {
            session.driver.switch_to_frame_index(0)?;
        } else {
            session.driver.switch_to_frame(name)?;
        }
        debug!(frame = name, "entered frame");
        session.context.push_frame(saved);
        Ok(())
    }
}

/// Bounded wait until the target is absent or hidden; covers modal closing
/// delays that would otherwise swallow the next click.
struct WaitInvisible;

impl OperationHandler for WaitInvisible {
    fn name(&self) -> &'static str {
        "WaitInvisible"
    }

    fn execute(&self, op: &Operation, session: &mut Session) -> ConducirResult<()> {
        let locator = target_locator(op)?;
        bounded_wait(
            session.driver.as_mut(),
            &locator,
            ElementState::Invisible,
            session.settings.wait_timeout(),
        )
    }
}

/// Bounded wait (extended timeout) until the target is present and visible.
struct WaitForAppear;

impl OperationHandler for WaitForAppear {
    fn name(&self) -> &'static str {
        "WaitForAppear"
    }

    fn execute(&self, op: &Operation, session: &mut Session) -> ConducirResult<()> {
        let locator = target_locator(op)?;
        let timeout = session.settings.appear_timeout();
        let driver = session.driver.as_mut();
        bounded_wait(driver, &locator, ElementState::Present, timeout)?;
        bounded_wait(driver, &locator, ElementState::Visible, timeout)?;
        Ok(())
    }
}

fn wait_repeatedly(
    op: &Operation,
    session: &mut Session,
    predicate: PollPredicate,
) -> ConducirResult<()> {
    let locator = target_locator(op)?;
    let refresh_locator = op.attr(ATTR_CUSTOM_REFRESH).map(Locator::new);
    let timeout = session.settings.wait_timeout();

    let mut options = PollOptions::new(session.settings.refresh_interval());
    if let Some(deadline) = session.settings.poll_deadline() {
        options = options.with_deadline(deadline);
    }

    let cancel = session.cancel.clone();
    refresh_poll(
        session.driver.as_mut(),
        &locator,
        predicate,
        &options,
        &cancel,
        |driver| match &refresh_locator {
            Some(refresh) => click_with_retry(driver, refresh, timeout),
            None => driver.refresh().map_err(Into::into),
        },
    )?;
    Ok(())
}

/// Refresh-poll until at least one matching element exists. Used to hold a
/// case until a long-running backend transition surfaces in the UI.
struct WaitAppearRepeatedly;

impl OperationHandler for WaitAppearRepeatedly {
    fn name(&self) -> &'static str {
        "WaitAppearRepeatedly"
    }

    fn execute(&self, op: &Operation, session: &mut Session) -> ConducirResult<()> {
        wait_repeatedly(op, session, PollPredicate::Appear)
    }
}

/// Refresh-poll until no matching element exists.
struct WaitDisappearRepeatedly;

impl OperationHandler for WaitDisappearRepeatedly {
    fn name(&self) -> &'static str {
        "WaitDisappearRepeatedly"
    }

    fn execute(&self, op: &Operation, session: &mut Session) -> ConducirResult<()> {
        wait_repeatedly(op, session, PollPredicate::Disappear)
    }
}

/// Deprecated row-correlation click, retained for configuration
/// compatibility only.
///
/// Reads an attribute off a secondary element, extracts a token with the
/// configured regex (first capture group), substitutes it for the `?`
/// placeholder in the primary locator, and clicks the result.
struct ClickIfAnotherElementExist;

impl OperationHandler for ClickIfAnotherElementExist {
    fn name(&self) -> &'static str {
        "ClickIfAnotherElementExist"
    }

    fn execute(&self, op: &Operation, session: &mut Session) -> ConducirResult<()> {
        let probe = op
            .element
            .as_ref()
            .ok_or_else(|| ConducirError::missing_attribute(&op.name, "element"))?;

        let probe_locator = Locator::new(probe.xpath.as_str());
        let attr_value = session
            .driver
            .read_attribute(&probe_locator, &probe.extract_attribute)?;

        let pattern = Regex::new(&probe.attribute_regex)
            .map_err(|e| ConducirError::invalid_attribute("attribute-regex", e.to_string()))?;
        let captures = pattern
            .captures(&attr_value)
            .ok_or_else(|| ConducirError::NoRowMatch {
                locator: probe.xpath.clone(),
                pattern: probe.attribute_regex.clone(),
            })?;
        let token = captures
            .get(1)
            .ok_or_else(|| {
                ConducirError::invalid_attribute(
                    "attribute-regex",
                    "pattern must contain one capture group",
                )
            })?
            .as_str();

        let resolved = Locator::new(op.require_attr(ATTR_XPATH)?.replace('?', token));
        debug!(token, locator = %resolved, "resolved row-correlated locator");
        click_with_retry(
            session.driver.as_mut(),
            &resolved,
            session.settings.wait_timeout(),
        )
    }
}
