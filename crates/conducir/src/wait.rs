//! Wait options and deadlines for auto-waiting resolution.
//!
//! Every locator action and navigation check polls the live page until the
//! target becomes actionable or the deadline expires. Construction of a
//! deadline is cheap; the polling loops live at the call sites so they can
//! yield to the runtime between probes.

use std::time::{Duration, Instant};

/// Default timeout for auto-waiting (30 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Default polling interval for auto-waiting (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Options for wait operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// A running deadline for one resolution attempt
#[derive(Debug, Clone)]
pub(crate) struct Deadline {
    start: Instant,
    options: WaitOptions,
}

impl Deadline {
    pub(crate) fn new(options: WaitOptions) -> Self {
        Self {
            start: Instant::now(),
            options,
        }
    }

    /// Whether the deadline has passed
    pub(crate) fn expired(&self) -> bool {
        self.start.elapsed() >= self.options.timeout()
    }

    /// Timeout this deadline was configured with, in milliseconds
    pub(crate) const fn timeout_ms(&self) -> u64 {
        self.options.timeout_ms
    }

    /// Yield until the next probe is due
    pub(crate) async fn tick(&self) {
        tokio::time::sleep(self.options.poll_interval()).await;
    }
}
