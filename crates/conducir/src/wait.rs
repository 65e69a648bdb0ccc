//! Wait primitives: bounded waits and the unbounded refresh-poll.
//!
//! Two distinct mechanisms live here. The *bounded wait* delegates to the
//! driver's own wait-until capability with a fixed timeout and maps expiry
//! into the engine's error taxonomy. The *refresh-poll* re-triggers a page
//! or element refresh, sleeps a configured interval, and re-counts matching
//! elements until an appear/disappear predicate holds; it has no iteration
//! cap, so callers bound it with a deadline or preempt it through a
//! [`CancelToken`].

use crate::driver::{BrowserDriver, ElementState, Locator};
use crate::result::{ConducirError, ConducirResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Granularity at which a sleeping poll observes cancellation and deadlines
const POLL_SLEEP_CHUNK: Duration = Duration::from_millis(250);

/// Cloneable cancellation flag threaded through the run and into the
/// refresh-poll. Cancelling is sticky.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token in the not-cancelled state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    fn check(&self) -> ConducirResult<()> {
        if self.is_cancelled() {
            Err(ConducirError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Block until the element reaches `state`, failing with a timeout error on
/// expiry. The actual waiting is the driver's; this only maps the outcome.
pub fn bounded_wait(
    driver: &mut dyn BrowserDriver,
    locator: &Locator,
    state: ElementState,
    timeout: Duration,
) -> ConducirResult<()> {
    debug!(locator = %locator, state = %state, ?timeout, "bounded wait");
    if driver.wait_until(locator, state, timeout)? {
        Ok(())
    } else {
        Err(ConducirError::Timeout {
            locator: locator.to_string(),
            condition: state,
        })
    }
}

/// Termination predicate for the refresh-poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollPredicate {
    /// Stop once at least one matching element exists
    Appear,
    /// Stop once no matching element exists
    Disappear,
}

impl PollPredicate {
    /// Whether the observed count satisfies the predicate
    #[must_use]
    pub const fn satisfied_by(&self, count: usize) -> bool {
        match self {
            Self::Appear => count > 0,
            Self::Disappear => count == 0,
        }
    }

    /// The element state a timeout of this poll is reported against
    #[must_use]
    pub const fn timeout_state(&self) -> ElementState {
        match self {
            Self::Appear => ElementState::Present,
            Self::Disappear => ElementState::Invisible,
        }
    }
}

/// Options for the refresh-poll: sleep interval between cycles and an
/// optional cap on total wall-clock time.
#[derive(Debug, Clone)]
pub struct PollOptions {
    /// Sleep between refresh cycles
    pub interval: Duration,
    /// Cap on total poll time; `None` polls until the predicate holds
    pub deadline: Option<Duration>,
}

impl PollOptions {
    /// Create options with the given interval and no deadline
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            deadline: None,
        }
    }

    /// Set the deadline
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// Run the refresh-poll until `predicate` holds over the count of elements
/// matching `locator`.
///
/// Each cycle: trigger `refresh`, sleep `options.interval`, count matching
/// elements, test the predicate. Cancellation and the deadline are observed
/// before each refresh and while sleeping. Returns the number of count
/// checks performed, so callers (and tests) can reason about cycles.
pub fn refresh_poll<F>(
    driver: &mut dyn BrowserDriver,
    locator: &Locator,
    predicate: PollPredicate,
    options: &PollOptions,
    cancel: &CancelToken,
    mut refresh: F,
) -> ConducirResult<usize>
where
    F: FnMut(&mut dyn BrowserDriver) -> ConducirResult<()>,
{
    let start = Instant::now();
    let mut checks = 0usize;

    loop {
        cancel.check()?;
        check_deadline(start, options.deadline, locator, predicate)?;

        debug!(locator = %locator, ?predicate, "refresh-poll cycle");
        refresh(driver)?;

        sleep_observing(options.interval, start, options.deadline, cancel, locator, predicate)?;

        let count = driver.count_elements(locator)?;
        checks += 1;
        debug!(locator = %locator, count, checks, "refresh-poll count");

        if predicate.satisfied_by(count) {
            return Ok(checks);
        }
    }
}

fn check_deadline(
    start: Instant,
    deadline: Option<Duration>,
    locator: &Locator,
    predicate: PollPredicate,
) -> ConducirResult<()> {
    match deadline {
        Some(limit) if start.elapsed() >= limit => Err(ConducirError::Timeout {
            locator: locator.to_string(),
            condition: predicate.timeout_state(),
        }),
        _ => Ok(()),
    }
}

/// Sleep `interval` in chunks, observing cancellation and the deadline.
fn sleep_observing(
    interval: Duration,
    start: Instant,
    deadline: Option<Duration>,
    cancel: &CancelToken,
    locator: &Locator,
    predicate: PollPredicate,
) -> ConducirResult<()> {
    let sleep_until = Instant::now() + interval;
    loop {
        cancel.check()?;
        check_deadline(start, deadline, locator, predicate)?;

        let now = Instant::now();
        if now >= sleep_until {
            return Ok(());
        }
        std::thread::sleep((sleep_until - now).min(POLL_SLEEP_CHUNK));
    }
}
