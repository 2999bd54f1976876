//! Wait budgets and how templates name them.

use std::time::Duration;

use crate::error::{Error, Result};

use super::engine::WaitEngine;

// ============================================================================
// Constants
// ============================================================================

/// Default total wait budget (5 seconds).
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default pause between attempts (100 milliseconds).
pub const DEFAULT_WAIT_INTERVAL: Duration = Duration::from_millis(100);

// ============================================================================
// WaitPreset
// ============================================================================

/// A validated `{timeout, interval}` pair.
///
/// The interval is always positive. A zero timeout means a single attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WaitPreset {
    timeout: Duration,
    interval: Duration,
}

impl Default for WaitPreset {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_WAIT_TIMEOUT,
            interval: DEFAULT_WAIT_INTERVAL,
        }
    }
}

impl WaitPreset {
    /// Creates a preset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `interval` is zero.
    pub fn new(timeout: Duration, interval: Duration) -> Result<Self> {
        if interval.is_zero() {
            return Err(Error::invalid_argument("wait interval must be positive"));
        }
        Ok(Self { timeout, interval })
    }

    /// Creates a preset from fractional seconds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `interval_secs` is not a
    /// positive number, `timeout_secs` is negative or not finite, or either
    /// does not fit in a [`Duration`].
    pub fn from_secs(timeout_secs: f64, interval_secs: f64) -> Result<Self> {
        if !interval_secs.is_finite() || interval_secs <= 0.0 {
            return Err(Error::invalid_argument(format!(
                "wait interval must be positive, got {interval_secs}"
            )));
        }
        if !timeout_secs.is_finite() || timeout_secs < 0.0 {
            return Err(Error::invalid_argument(format!(
                "wait timeout must not be negative, got {timeout_secs}"
            )));
        }
        let timeout = Duration::try_from_secs_f64(timeout_secs).map_err(|e| {
            Error::invalid_argument(format!("wait timeout {timeout_secs} is out of range: {e}"))
        })?;
        let interval = Duration::try_from_secs_f64(interval_secs).map_err(|e| {
            Error::invalid_argument(format!("wait interval {interval_secs} is out of range: {e}"))
        })?;
        Self::new(timeout, interval)
    }

    /// Total budget.
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Pause between attempts.
    #[inline]
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Engine polling with this budget.
    #[inline]
    #[must_use]
    pub fn engine(self) -> WaitEngine {
        WaitEngine::new(self)
    }
}

// ============================================================================
// WaitSpec
// ============================================================================

/// How a content template asks to wait.
#[derive(Debug, Clone, PartialEq)]
pub enum WaitSpec {
    /// The configured default budget.
    Default,
    /// A named preset from configuration.
    Preset(String),
    /// A timeout in seconds with the default interval.
    Timeout(f64),
    /// Explicit timeout and interval in seconds.
    Custom {
        /// Total budget in seconds.
        timeout: f64,
        /// Pause between attempts in seconds.
        interval: f64,
    },
}

impl From<&str> for WaitSpec {
    fn from(name: &str) -> Self {
        Self::Preset(name.to_string())
    }
}

impl From<String> for WaitSpec {
    fn from(name: String) -> Self {
        Self::Preset(name)
    }
}

impl From<f64> for WaitSpec {
    fn from(timeout: f64) -> Self {
        Self::Timeout(timeout)
    }
}

// ============================================================================
// Tests
// ============================================================================
