//! Poll policies
//!
//! A [`PollPolicy`] decides how long to wait before each status poll and
//! when to give up. The reconciler only asks the policy for the next delay,
//! so bounds can be added without touching the reconciliation logic.
//!
//! The default policy, [`FixedInterval`], never gives up: a job is polled
//! until the server reports a terminal status. Wrap it with
//! [`PollPolicy::with_max_rounds`] or [`PollPolicy::with_deadline`] to bound
//! the wait.

use std::time::Duration;

/// Strategy for spacing status polls
pub trait PollPolicy: Send + Sync {
    /// Delay before polling round `round` (starting at 1), or `None` to stop
    ///
    /// `elapsed` is the time spent waiting on this operation so far.
    fn next_delay(&self, round: u32, elapsed: Duration) -> Option<Duration>;

    /// Stops after `max_rounds` polls
    fn with_max_rounds(self, max_rounds: u32) -> MaxRounds<Self>
    where
        Self: Sized,
    {
        MaxRounds {
            inner: self,
            max_rounds,
        }
    }

    /// Stops once the next poll would happen after `deadline`
    fn with_deadline(self, deadline: Duration) -> Deadline<Self>
    where
        Self: Sized,
    {
        Deadline {
            inner: self,
            deadline,
        }
    }
}

/// Waits the same interval before every poll, forever
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedInterval {
    interval: Duration,
}

impl FixedInterval {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl PollPolicy for FixedInterval {
    fn next_delay(&self, _round: u32, _elapsed: Duration) -> Option<Duration> {
        Some(self.interval)
    }
}

/// Doubles the delay after every poll, up to a cap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExponentialBackoff {
    initial: Duration,
    max: Duration,
}

impl ExponentialBackoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self { initial, max }
    }
}

impl PollPolicy for ExponentialBackoff {
    fn next_delay(&self, round: u32, _elapsed: Duration) -> Option<Duration> {
        let exponent = round.saturating_sub(1).min(31);
        let delay = self
            .initial
            .checked_mul(1u32 << exponent)
            .unwrap_or(self.max);
        Some(delay.min(self.max))
    }
}

/// Caps the number of polls of an inner policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxRounds<P> {
    inner: P,
    max_rounds: u32,
}

impl<P: PollPolicy> PollPolicy for MaxRounds<P> {
    fn next_delay(&self, round: u32, elapsed: Duration) -> Option<Duration> {
        if round > self.max_rounds {
            return None;
        }
        self.inner.next_delay(round, elapsed)
    }
}

/// Caps the total wait of an inner policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline<P> {
    inner: P,
    deadline: Duration,
}

impl<P: PollPolicy> PollPolicy for Deadline<P> {
    fn next_delay(&self, round: u32, elapsed: Duration) -> Option<Duration> {
        let delay = self.inner.next_delay(round, elapsed)?;
        if elapsed.saturating_add(delay) > self.deadline {
            return None;
        }
        Some(delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_interval_never_stops() {
        let policy = FixedInterval::new(Duration::from_secs(1));
        assert_eq!(policy.next_delay(1, Duration::ZERO), Some(Duration::from_secs(1)));
        assert_eq!(
            policy.next_delay(10_000, Duration::from_secs(86_400)),
            Some(Duration::from_secs(1))
        );
    }

    #[test]
    fn test_exponential_backoff_caps_delay() {
        let policy = ExponentialBackoff::new(Duration::from_millis(500), Duration::from_secs(30));
        assert_eq!(policy.next_delay(1, Duration::ZERO), Some(Duration::from_millis(500)));
        assert_eq!(policy.next_delay(2, Duration::ZERO), Some(Duration::from_secs(1)));
        assert_eq!(policy.next_delay(3, Duration::ZERO), Some(Duration::from_secs(2)));
        assert_eq!(policy.next_delay(8, Duration::ZERO), Some(Duration::from_secs(30)));
        assert_eq!(policy.next_delay(u32::MAX, Duration::ZERO), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_max_rounds() {
        let policy = FixedInterval::new(Duration::from_millis(10)).with_max_rounds(2);
        assert!(policy.next_delay(1, Duration::ZERO).is_some());
        assert!(policy.next_delay(2, Duration::ZERO).is_some());
        assert!(policy.next_delay(3, Duration::ZERO).is_none());
    }

    #[test]
    fn test_deadline() {
        let policy = FixedInterval::new(Duration::from_secs(1)).with_deadline(Duration::from_secs(5));
        assert!(policy.next_delay(1, Duration::from_secs(3)).is_some());
        assert!(policy.next_delay(2, Duration::from_secs(4)).is_some());
        assert!(policy.next_delay(3, Duration::from_millis(4_500)).is_none());
    }
}
