use core::ops::Add;
use std::time::Duration;

/// Host-supplied timestamp in seconds.
///
/// The engine never reads a wall clock; callers pass the current time in, which
/// keeps scheduling deterministic and replayable.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Default)]
pub struct Time(pub f64); // seconds

impl Time {
    pub const ZERO: Time = Time(0.0);

    pub fn from_millis(ms: f64) -> Self {
        Time(ms / 1000.0)
    }

    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }
}

impl Add<Duration> for Time {
    type Output = Time;

    fn add(self, rhs: Duration) -> Time {
        Time(self.0 + rhs.as_secs_f64())
    }
}
