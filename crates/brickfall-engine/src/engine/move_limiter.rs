use std::time::Duration;

/// Rate limit for horizontal moves.
///
/// A held direction key usually reaches the engine as a burst of repeated
/// commands. The limiter accepts a move only when at least `delay` has passed
/// since the previous accepted move, so one held key cannot jump several
/// columns within a single short burst. Timestamps are whatever monotonic
/// time the caller measures moves with.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use brickfall_engine::MoveRateLimiter;
///
/// let mut limiter = MoveRateLimiter::new(Duration::from_millis(30));
/// assert!(limiter.try_acquire(Duration::ZERO));
/// assert!(!limiter.try_acquire(Duration::from_millis(29)));
/// assert!(limiter.try_acquire(Duration::from_millis(30)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRateLimiter {
    delay: Duration,
    last_accepted: Option<Duration>,
}

impl MoveRateLimiter {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_accepted: None,
        }
    }

    fn is_ready(&self, now: Duration) -> bool {
        match self.last_accepted {
            None => true,
            Some(last) => now.saturating_sub(last) >= self.delay,
        }
    }

    /// Accepts a move at time `now` if the delay has passed since the last
    /// accepted one, and records `now` when it does.
    pub fn try_acquire(&mut self, now: Duration) -> bool {
        if !self.is_ready(now) {
            return false;
        }
        self.last_accepted = Some(now);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn test_first_move_is_always_accepted() {
        let mut limiter = MoveRateLimiter::new(MS * 30);
        assert!(limiter.try_acquire(MS * 5));
    }

    #[test]
    fn test_delay_measured_from_last_accepted() {
        let mut limiter = MoveRateLimiter::new(MS * 30);
        assert!(limiter.try_acquire(MS * 100));
        // Rejected attempts do not move the reference point.
        assert!(!limiter.try_acquire(MS * 110));
        assert!(!limiter.try_acquire(MS * 129));
        // Exactly the delay is enough.
        assert!(limiter.try_acquire(MS * 130));
        assert!(!limiter.try_acquire(MS * 159));
    }

    #[test]
    fn test_zero_delay_never_limits() {
        let mut limiter = MoveRateLimiter::new(Duration::ZERO);
        for _ in 0..5 {
            assert!(limiter.try_acquire(MS * 7));
        }
    }
}
