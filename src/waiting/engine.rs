//! Bounded polling.
//!
//! ```text
//! PENDING ──tick──► unsuccessful ──sleep──► tick ...
//!    │                                │
//!    └──► SUCCEEDED              deadline reached ──► TIMED_OUT
//! ```
//!
//! Each tick evaluates the operation once. Success returns immediately.
//! A transient error ([`Error::is_transient`]) counts as an unsuccessful
//! tick; any other error aborts the wait. The last pause is shortened so the
//! final tick lands on the deadline.

use std::fmt;
use std::future::Future;
use std::result::Result as StdResult;
use std::time::Duration;

use serde_json::Value;
use tokio::time::{Instant, sleep};
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::navigator::NavigatorHandle;

use super::preset::WaitPreset;

// ============================================================================
// Truthy
// ============================================================================

/// Default success predicate for [`WaitEngine::run`].
pub trait Truthy {
    /// Returns `true` when the value counts as a successful evaluation.
    fn is_truthy(&self) -> bool;
}

impl Truthy for bool {
    fn is_truthy(&self) -> bool {
        *self
    }
}

impl<T> Truthy for Option<T> {
    fn is_truthy(&self) -> bool {
        self.is_some()
    }
}

impl<T> Truthy for Vec<T> {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl Truthy for String {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl Truthy for Value {
    fn is_truthy(&self) -> bool {
        !matches!(self, Value::Null | Value::Bool(false))
    }
}

impl Truthy for NavigatorHandle {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

// ============================================================================
// Failures
// ============================================================================

/// A wait that ran out of budget.
#[derive(Debug)]
pub struct WaitTimeout<T> {
    /// Budget that was exhausted.
    pub timeout: Duration,
    /// Attempts evaluated.
    pub attempts: u32,
    /// Value from the latest attempt that produced one.
    pub last_value: Option<T>,
}

/// Why a wait did not succeed.
#[derive(Debug)]
pub enum WaitFailure<T> {
    /// Budget exhausted.
    TimedOut(WaitTimeout<T>),
    /// A non-transient error ended the wait.
    Aborted(Error),
}

impl<T> fmt::Display for WaitFailure<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TimedOut(t) => write!(
                f,
                "wait timed out after {}ms ({} attempts)",
                t.timeout.as_millis(),
                t.attempts
            ),
            Self::Aborted(e) => write!(f, "wait aborted: {e}"),
        }
    }
}

impl<T: fmt::Debug> From<WaitTimeout<T>> for Error {
    fn from(t: WaitTimeout<T>) -> Self {
        Error::WaitTimeout {
            timeout_ms: u64::try_from(t.timeout.as_millis()).unwrap_or(u64::MAX),
            attempts: t.attempts,
            last_value: t.last_value.map(|v| format!("{v:?}")),
        }
    }
}

impl<T: fmt::Debug> From<WaitFailure<T>> for Error {
    fn from(failure: WaitFailure<T>) -> Self {
        match failure {
            WaitFailure::TimedOut(t) => t.into(),
            WaitFailure::Aborted(e) => e,
        }
    }
}

// ============================================================================
// WaitEngine
// ============================================================================

/// Polls an operation until it succeeds or the budget runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitEngine {
    preset: WaitPreset,
}

impl WaitEngine {
    /// Creates an engine with the given budget.
    #[must_use]
    pub fn new(preset: WaitPreset) -> Self {
        Self { preset }
    }

    /// Creates an engine from fractional seconds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for a non-positive interval or a
    /// negative timeout.
    pub fn from_secs(timeout_secs: f64, interval_secs: f64) -> Result<Self> {
        WaitPreset::from_secs(timeout_secs, interval_secs).map(Self::new)
    }

    /// Total budget.
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.preset.timeout()
    }

    /// Pause between attempts.
    #[inline]
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.preset.interval()
    }

    /// Polls `op` until `is_success` accepts its value.
    pub async fn run_until<T, F, Fut, P>(
        &self,
        mut op: F,
        mut is_success: P,
    ) -> StdResult<T, WaitFailure<T>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
        P: FnMut(&T) -> bool,
    {
        let timeout = self.timeout();
        let interval = self.interval();
        let start = Instant::now();
        // Budgets past the clock's range never expire.
        let deadline = start.checked_add(timeout);
        let mut attempts: u32 = 0;
        let mut last_value = None;

        loop {
            attempts = attempts.saturating_add(1);
            match op().await {
                Ok(value) if is_success(&value) => {
                    debug!(
                        attempts,
                        elapsed_ms = start.elapsed().as_millis(),
                        "Wait succeeded"
                    );
                    return Ok(value);
                }
                Ok(value) => {
                    trace!(attempts, "Wait attempt unsuccessful");
                    last_value = Some(value);
                }
                Err(e) if e.is_transient() => {
                    trace!(attempts, error = %e, "Wait attempt found nothing yet");
                }
                Err(e) => {
                    debug!(attempts, error = %e, "Wait aborted");
                    return Err(WaitFailure::Aborted(e));
                }
            }

            let pause = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        debug!(attempts, timeout_ms = timeout.as_millis(), "Wait timed out");
                        return Err(WaitFailure::TimedOut(WaitTimeout {
                            timeout,
                            attempts,
                            last_value,
                        }));
                    }
                    interval.min(deadline - now)
                }
                None => interval,
            };

            sleep(pause).await;
        }
    }

    /// Polls `op` until its value is [`Truthy`].
    pub async fn run<T, F, Fut>(&self, op: F) -> StdResult<T, WaitFailure<T>>
    where
        T: Truthy,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.run_until(op, T::is_truthy).await
    }

    /// Like [`run`](Self::run), with failures converted into [`Error`].
    pub async fn wait_for<T, F, Fut>(&self, op: F) -> Result<T>
    where
        T: Truthy + fmt::Debug,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.run(op).await.map_err(Error::from)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::Cell;

    fn engine(timeout: f64, interval: f64) -> WaitEngine {
        WaitEngine::from_secs(timeout, interval).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_on_third_attempt_without_fourth() {
        let calls = Cell::new(0u32);
        let start = Instant::now();

        let value = engine(1.0, 0.2)
            .run(|| {
                calls.set(calls.get() + 1);
                let n = calls.get();
                async move { Ok(if n >= 3 { Some(n) } else { None }) }
            })
            .await
            .unwrap();

        assert_eq!(value, Some(3));
        assert_eq!(calls.get(), 3);
        assert_eq!(start.elapsed(), Duration::from_millis(400));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_carries_last_value() {
        let calls = Cell::new(0u32);
        let start = Instant::now();

        let failure = engine(1.0, 0.2)
            .run_until(
                || {
                    calls.set(calls.get() + 1);
                    let n = calls.get();
                    async move { Ok(n) }
                },
                |_| false,
            )
            .await
            .unwrap_err();

        match failure {
            WaitFailure::TimedOut(t) => {
                assert_eq!(t.attempts, 6);
                assert_eq!(t.last_value, Some(6));
            }
            WaitFailure::Aborted(e) => panic!("unexpected abort: {e}"),
        }
        assert_eq!(start.elapsed(), Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_attempt_lands_on_deadline() {
        let calls = Cell::new(0u32);
        let start = Instant::now();

        let failure = engine(0.5, 0.2)
            .run(|| {
                calls.set(calls.get() + 1);
                async { Ok(false) }
            })
            .await
            .unwrap_err();

        assert!(matches!(failure, WaitFailure::TimedOut(_)));
        assert_eq!(calls.get(), 4);
        assert_eq!(start.elapsed(), Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_timeout_single_attempt() {
        let calls = Cell::new(0u32);

        let failure = engine(0.0, 0.1)
            .run(|| {
                calls.set(calls.get() + 1);
                async { Ok(Vec::<u8>::new()) }
            })
            .await
            .unwrap_err();

        assert!(matches!(failure, WaitFailure::TimedOut(_)));
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unbounded_timeout_keeps_polling() {
        let calls = Cell::new(0u32);
        let engine = WaitPreset::new(Duration::MAX, Duration::from_millis(10))
            .unwrap()
            .engine();

        let value = engine
            .run(|| {
                calls.set(calls.get() + 1);
                let n = calls.get();
                async move { Ok(n >= 3) }
            })
            .await
            .unwrap();

        assert!(value);
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_errors_are_retried() {
        let calls = Cell::new(0u32);

        let value = engine(1.0, 0.1)
            .run(|| {
                calls.set(calls.get() + 1);
                let n = calls.get();
                async move {
                    if n < 4 {
                        Err(Error::element_not_found("#late"))
                    } else {
                        Ok(true)
                    }
                }
            })
            .await
            .unwrap();

        assert!(value);
        assert_eq!(calls.get(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_only_timeout_has_no_value() {
        let failure = engine(0.3, 0.1)
            .run(|| async { Err::<bool, _>(Error::element_not_found("#never")) })
            .await
            .unwrap_err();

        match failure {
            WaitFailure::TimedOut(t) => assert!(t.last_value.is_none()),
            WaitFailure::Aborted(e) => panic!("unexpected abort: {e}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_other_errors_abort_immediately() {
        let calls = Cell::new(0u32);

        let failure = engine(5.0, 0.1)
            .run(|| {
                calls.set(calls.get() + 1);
                async { Err::<bool, _>(Error::invalid_selector("[", "unterminated")) }
            })
            .await
            .unwrap_err();

        assert!(matches!(
            failure,
            WaitFailure::Aborted(Error::InvalidSelector { .. })
        ));
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_converts_timeout() {
        let err = engine(0.2, 0.1)
            .wait_for(|| async { Ok(Value::Null) })
            .await
            .unwrap_err();

        match err {
            Error::WaitTimeout {
                timeout_ms,
                attempts,
                last_value,
            } => {
                assert_eq!(timeout_ms, 200);
                assert_eq!(attempts, 3);
                assert_eq!(last_value.as_deref(), Some("Null"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_truthy() {
        assert!(true.is_truthy());
        assert!(!Option::<u8>::None.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(Value::from(0).is_truthy());
        assert!(!NavigatorHandle::empty().is_truthy());
    }
}
