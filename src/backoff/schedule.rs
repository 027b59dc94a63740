use std::time::Duration;

use rand::Rng;

/// Endless sequence of nominal waits between attempts.
///
/// `delay_0` is the initial delay, each following value is the previous one
/// scaled by the multiplier and capped at the maximum.
#[derive(Clone, Debug)]
pub struct DelaySchedule {
    next: Duration,
    multiplier: f64,
    max: Duration,
}

impl DelaySchedule {
    pub fn new(initial: Duration, multiplier: f64, max: Duration) -> Self {
        Self {
            next: initial,
            multiplier,
            max,
        }
    }

    fn scale(&self, delay: Duration) -> Duration {
        let nanos = delay.as_nanos() as f64 * self.multiplier;
        if !nanos.is_finite() || nanos >= self.max.as_nanos() as f64 {
            return self.max;
        }
        Duration::from_nanos(nanos.round() as u64)
            .max(delay)
            .min(self.max)
    }
}

impl Iterator for DelaySchedule {
    type Item = Duration;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next;
        self.next = self.scale(current);
        Some(current)
    }
}

/// Uniform random wait in `[0, delay]`.
pub fn jittered(delay: Duration) -> Duration {
    let nanos = u64::try_from(delay.as_nanos()).unwrap_or(u64::MAX);
    if nanos == 0 {
        return Duration::ZERO;
    }
    Duration::from_nanos(rand::thread_rng().gen_range(0..=nanos))
}
