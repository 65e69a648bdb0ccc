//! Scalar engine settings supplied by the configuration source.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default bounded-wait timeout (seconds)
pub const DEFAULT_WAIT_TIMEOUT_SECS: u64 = 20;

/// WaitForAppear runs with this multiple of the default timeout
pub const APPEAR_TIMEOUT_MULTIPLIER: u32 = 3;

/// Default sleep between refresh-poll cycles (seconds). Kept short enough
/// that the session does not idle into a forced re-login.
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 120;

/// Scalar settings read from configuration: login URL, wait timeouts,
/// refresh-poll interval, and the base path used for relative-path value
/// substitution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct EngineSettings {
    /// URL opened once at session start; empty skips the initial navigation
    pub login_url: String,
    /// Bounded-wait timeout in whole seconds
    pub wait_timeout_secs: u64,
    /// Sleep between refresh-poll cycles in whole seconds
    pub refresh_interval_secs: u64,
    /// Prefix applied to values flagged `relative-path`
    pub base_path: String,
    /// Optional cap on the total time a refresh-poll may run, in whole
    /// seconds; `None` polls until the predicate holds or the run is
    /// cancelled
    pub poll_deadline_secs: Option<u64>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            login_url: String::new(),
            wait_timeout_secs: DEFAULT_WAIT_TIMEOUT_SECS,
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            base_path: String::new(),
            poll_deadline_secs: None,
        }
    }
}

impl EngineSettings {
    /// Create settings with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the login URL
    #[must_use]
    pub fn with_login_url(mut self, url: impl Into<String>) -> Self {
        self.login_url = url.into();
        self
    }

    /// Set the bounded-wait timeout in seconds
    #[must_use]
    pub const fn with_wait_timeout_secs(mut self, secs: u64) -> Self {
        self.wait_timeout_secs = secs;
        self
    }

    /// Set the refresh-poll interval in seconds
    #[must_use]
    pub const fn with_refresh_interval_secs(mut self, secs: u64) -> Self {
        self.refresh_interval_secs = secs;
        self
    }

    /// Set the base path used for relative-path substitution
    #[must_use]
    pub fn with_base_path(mut self, path: impl Into<String>) -> Self {
        self.base_path = path.into();
        self
    }

    /// Set the refresh-poll deadline in seconds
    #[must_use]
    pub const fn with_poll_deadline_secs(mut self, secs: u64) -> Self {
        self.poll_deadline_secs = Some(secs);
        self
    }

    /// Bounded-wait timeout as a Duration
    #[must_use]
    pub const fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }

    /// The extended timeout used by WaitForAppear
    #[must_use]
    pub const fn appear_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs * APPEAR_TIMEOUT_MULTIPLIER as u64)
    }

    /// Refresh-poll interval as a Duration
    #[must_use]
    pub const fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    /// Refresh-poll deadline as a Duration, if configured
    #[must_use]
    pub fn poll_deadline(&self) -> Option<Duration> {
        self.poll_deadline_secs.map(Duration::from_secs)
    }
}
