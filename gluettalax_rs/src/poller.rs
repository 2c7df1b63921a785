//! Bounded polling of remote state.
//!
//! A poll starts `Pending`, invokes `check` and stops as soon as the state is
//! terminal (`Done`). After every non-terminal check the elapsed time is
//! compared with the timeout; once it is reached the poll fails (`TimedOut`)
//! with the error built by the caller. Otherwise it sleeps `delay` and checks
//! again. The first check always runs, so a zero timeout still accepts a state
//! that is already terminal.

use std::cell::Cell;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::error::{GlueError, Result};

/// Source of time for the poll loop.
pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&self, duration: Duration);
}

/// Wall clock with a blocking sleep.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Clock that only moves when slept on. Used to drive polls in tests.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    elapsed: Cell<Duration>,
    sleeps: Cell<usize>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            elapsed: Cell::new(Duration::ZERO),
            sleeps: Cell::new(0),
        }
    }

    /// Number of sleeps performed so far.
    pub fn sleeps(&self) -> usize {
        self.sleeps.get()
    }

    /// Total simulated time.
    pub fn elapsed(&self) -> Duration {
        self.elapsed.get()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed.get()
    }

    fn sleep(&self, duration: Duration) {
        self.elapsed.set(self.elapsed.get() + duration);
        self.sleeps.set(self.sleeps.get() + 1);
    }
}

/// Delay, timeout and async policy of a remote wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub delay: Duration,
    /// `None` waits without bound.
    pub timeout: Option<Duration>,
    /// Fire and return without waiting for a terminal state.
    pub run_async: bool,
}

impl PollConfig {
    pub fn new(delay: Duration, timeout: Option<Duration>) -> Self {
        Self {
            delay,
            timeout,
            run_async: false,
        }
    }

    pub fn with_async(mut self, run_async: bool) -> Self {
        self.run_async = run_async;
        self
    }
}

/// Runs poll loops against a [`Clock`].
pub struct Poller<'c> {
    clock: &'c dyn Clock,
    delay: Duration,
    timeout: Option<Duration>,
}

impl<'c> Poller<'c> {
    pub fn new(clock: &'c dyn Clock, config: &PollConfig) -> Self {
        Self {
            clock,
            delay: config.delay,
            timeout: config.timeout,
        }
    }

    /// Poll `check` until `is_terminal` holds.
    ///
    /// Errors from `check` propagate unchanged. On timeout the error is built
    /// by `on_timeout`, which receives the time waited so far.
    pub fn poll<S, C, T, E>(&self, mut check: C, is_terminal: T, on_timeout: E) -> Result<S>
    where
        C: FnMut() -> Result<S>,
        T: Fn(&S) -> bool,
        E: FnOnce(Duration) -> GlueError,
    {
        let started = self.clock.now();
        let mut checks = 0usize;
        loop {
            let state = check()?;
            checks += 1;
            if is_terminal(&state) {
                debug!(checks, "poll reached terminal state");
                return Ok(state);
            }
            let elapsed = self.clock.now().saturating_duration_since(started);
            if self.timeout.is_some_and(|timeout| elapsed >= timeout) {
                debug!(checks, ?elapsed, "poll timed out");
                return Err(on_timeout(elapsed));
            }
            trace!(checks, delay = ?self.delay, "state not terminal, sleeping");
            self.clock.sleep(self.delay);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timeout_error(waited: Duration) -> GlueError {
        GlueError::CrawlerTimeout {
            name: "test".into(),
            waited,
        }
    }

    #[test]
    fn test_zero_timeout_accepts_terminal_first_check() {
        let clock = ManualClock::new();
        let config = PollConfig::new(Duration::from_secs(10), Some(Duration::ZERO));
        let poller = Poller::new(&clock, &config);
        let result = poller.poll(|| Ok("READY"), |s| *s == "READY", timeout_error);
        assert_eq!(result.unwrap(), "READY");
        assert_eq!(clock.sleeps(), 0);
    }

    #[test]
    fn test_zero_timeout_fails_after_one_check() {
        let clock = ManualClock::new();
        let config = PollConfig::new(Duration::from_secs(10), Some(Duration::ZERO));
        let poller = Poller::new(&clock, &config);
        let mut checks = 0;
        let result = poller.poll(
            || {
                checks += 1;
                Ok("RUNNING")
            },
            |s| *s == "READY",
            timeout_error,
        );
        assert!(matches!(result, Err(GlueError::CrawlerTimeout { .. })));
        assert_eq!(checks, 1);
        assert_eq!(clock.sleeps(), 0);
    }

    #[test]
    fn test_sleeps_between_checks_until_terminal() {
        let clock = ManualClock::new();
        let config = PollConfig::new(Duration::from_secs(10), Some(Duration::from_secs(600)));
        let poller = Poller::new(&clock, &config);
        let mut remaining = 3;
        let result = poller.poll(
            || {
                remaining -= 1;
                Ok(remaining)
            },
            |r| *r == 0,
            timeout_error,
        );
        assert_eq!(result.unwrap(), 0);
        assert_eq!(clock.sleeps(), 2);
        assert_eq!(clock.elapsed(), Duration::from_secs(20));
    }

    #[test]
    fn test_times_out_when_budget_is_spent() {
        let clock = ManualClock::new();
        let config = PollConfig::new(Duration::from_secs(10), Some(Duration::from_secs(25)));
        let poller = Poller::new(&clock, &config);
        let mut checks = 0;
        let result = poller.poll(
            || {
                checks += 1;
                Ok(false)
            },
            |done| *done,
            timeout_error,
        );
        match result {
            Err(GlueError::CrawlerTimeout { waited, .. }) => {
                assert_eq!(waited, Duration::from_secs(30));
            }
            other => panic!("expected timeout, got {other:?}"),
        }
        // Checks at 0s, 10s, 20s and 30s.
        assert_eq!(checks, 4);
    }

    #[test]
    fn test_check_errors_propagate() {
        let clock = ManualClock::new();
        let config = PollConfig::new(Duration::from_secs(1), None);
        let poller = Poller::new(&clock, &config);
        let result: Result<()> = poller.poll(
            || Err(GlueError::CrawlerNotFound("gone".into())),
            |_| true,
            timeout_error,
        );
        assert!(matches!(result, Err(GlueError::CrawlerNotFound(_))));
    }

    #[test]
    fn test_async_flag_builder() {
        let config = PollConfig::new(Duration::from_secs(1), None).with_async(true);
        assert!(config.run_async);
    }
}
