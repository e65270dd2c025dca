//! Wall-clock time and cooperative shutdown for the simulator.
//!
//! These use `std::time::Instant` and `std::thread`, which are not available
//! in `no_std`, so they live here rather than in the common crate.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use matrix_common::Clock;

/// [`Clock`] backed by `Instant` and `thread::sleep`.
pub struct StdClock {
    origin: Instant,
}

impl StdClock {
    pub fn new() -> Self { Self { origin: Instant::now() } }
}

impl Default for StdClock {
    fn default() -> Self { Self::new() }
}

impl Clock for StdClock {
    fn now(&self) -> Duration { self.origin.elapsed() }

    fn sleep(
        &mut self,
        duration: Duration,
    ) {
        thread::sleep(duration);
    }
}

/// Shared stop flag checked between frames and between weather refreshes.
#[derive(Clone, Debug, Default)]
pub struct StopToken(Arc<AtomicBool>);

impl StopToken {
    pub fn new() -> Self { Self::default() }

    pub fn stop(&self) { self.0.store(true, Ordering::Relaxed); }

    pub fn is_stopped(&self) -> bool { self.0.load(Ordering::Relaxed) }

    /// Sleep up to `duration` in short slices, returning early once stopped.
    ///
    /// Returns `true` if the full duration elapsed without a stop.
    pub fn sleep(
        &self,
        duration: Duration,
    ) -> bool {
        const SLICE: Duration = Duration::from_millis(50);

        let deadline = Instant::now() + duration;
        loop {
            if self.is_stopped() {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            thread::sleep(SLICE.min(deadline - now));
        }
    }
}

/// Stop predicate for the render loop: runs until `token` is stopped or
/// `limit` (if any) has passed since this call.
pub fn run_until(
    token: &StopToken,
    limit: Option<Duration>,
) -> impl FnMut() -> bool + '_ {
    let started = Instant::now();
    move || !token.is_stopped() && limit.is_none_or(|limit| started.elapsed() < limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_token_shared_between_clones() {
        let token = StopToken::new();
        let other = token.clone();
        assert!(!other.is_stopped());
        token.stop();
        assert!(other.is_stopped());
    }

    #[test]
    fn test_sleep_returns_early_when_stopped() {
        let token = StopToken::new();
        token.stop();
        let started = Instant::now();
        assert!(!token.sleep(Duration::from_secs(10)));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_sleep_completes_without_stop() {
        assert!(StopToken::new().sleep(Duration::from_millis(5)));
    }

    #[test]
    fn test_run_until_limit() {
        let token = StopToken::new();
        let mut unlimited = run_until(&token, None);
        assert!(unlimited());

        let mut expired = run_until(&token, Some(Duration::ZERO));
        assert!(!expired());

        token.stop();
        assert!(!unlimited());
    }

    #[test]
    fn test_std_clock_is_monotonic() {
        let mut clock = StdClock::new();
        let before = clock.now();
        clock.sleep(Duration::from_millis(2));
        assert!(clock.now() >= before + Duration::from_millis(2));
    }
}
