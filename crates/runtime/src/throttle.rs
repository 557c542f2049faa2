use std::time::Duration;

use foundation::time::Time;
use serde::{Deserialize, Serialize};

/// How a pending request's deadline reacts to newer requests.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerPolicy {
    /// The deadline is fixed when the first request of a burst arrives. Newer
    /// requests only replace the value, so a continuous stream still fires
    /// once per interval.
    #[default]
    FixedWindow,
    /// Every request pushes the deadline out by a full interval. A continuous
    /// stream fires only once it pauses.
    Restart,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Nothing was pending; a new deadline was armed.
    Scheduled,
    /// A pending value was replaced by this one.
    Superseded,
    /// `now` was not finite; nothing changed.
    Rejected,
}

#[derive(Debug, Clone, PartialEq)]
struct Pending<T> {
    value: T,
    deadline: Time,
}

/// Latest-value, delayed-execution gate.
///
/// Requests are coalesced: at most one value is pending, and a newer request
/// replaces it. The value is released by [`Throttle::poll`] once its deadline
/// has passed. Time is supplied by the caller.
#[derive(Debug, Clone)]
pub struct Throttle<T> {
    interval: Duration,
    policy: TimerPolicy,
    pending: Option<Pending<T>>,
}

impl<T> Throttle<T> {
    pub fn new(interval: Duration) -> Self {
        Self::with_policy(interval, TimerPolicy::default())
    }

    pub fn with_policy(interval: Duration, policy: TimerPolicy) -> Self {
        Self {
            interval,
            policy,
            pending: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn policy(&self) -> TimerPolicy {
        self.policy
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref().map(|p| &p.value)
    }

    /// When the pending value becomes due, if any.
    pub fn next_deadline(&self) -> Option<Time> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Queues `value`, replacing whatever was pending.
    ///
    /// A non-finite `now` is refused so a deadline can never become NaN.
    pub fn request(&mut self, now: Time, value: T) -> RequestOutcome {
        if !now.is_finite() {
            return RequestOutcome::Rejected;
        }
        match self.pending.as_mut() {
            Some(p) => {
                p.value = value;
                if self.policy == TimerPolicy::Restart {
                    p.deadline = now + self.interval;
                }
                RequestOutcome::Superseded
            }
            None => {
                self.pending = Some(Pending {
                    value,
                    deadline: now + self.interval,
                });
                RequestOutcome::Scheduled
            }
        }
    }

    /// Releases the pending value if its deadline is at or before `now`.
    /// A non-finite `now` releases nothing.
    pub fn poll(&mut self, now: Time) -> Option<T> {
        let due = now.is_finite() && self.pending.as_ref().is_some_and(|p| p.deadline <= now);
        if !due {
            return None;
        }
        self.pending.take().map(|p| p.value)
    }

    /// Drops the pending value. Returns `true` if something was cancelled.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::{RequestOutcome, Throttle, TimerPolicy};
    use foundation::time::Time;
    use std::time::Duration;

    fn ms(v: f64) -> Time {
        Time::from_millis(v)
    }

    #[test]
    fn nothing_fires_before_the_interval() {
        let mut t = Throttle::new(Duration::from_millis(32));
        assert_eq!(t.request(ms(0.0), 1), RequestOutcome::Scheduled);
        assert_eq!(t.poll(ms(31.0)), None);
        assert!(t.is_pending());
        assert_eq!(t.poll(ms(32.0)), Some(1));
        assert!(!t.is_pending());
    }

    #[test]
    fn burst_coalesces_to_the_last_value() {
        let mut t = Throttle::new(Duration::from_millis(32));
        let mut fired = Vec::new();
        for i in 0..10 {
            let now = ms(i as f64);
            let outcome = t.request(now, i);
            if i == 0 {
                assert_eq!(outcome, RequestOutcome::Scheduled);
            } else {
                assert_eq!(outcome, RequestOutcome::Superseded);
            }
            fired.extend(t.poll(now));
        }
        for step in 10..100 {
            fired.extend(t.poll(ms(step as f64)));
        }
        assert_eq!(fired, vec![9]);
    }

    #[test]
    fn fixed_window_fires_during_a_continuous_stream() {
        let mut t = Throttle::with_policy(Duration::from_millis(500), TimerPolicy::FixedWindow);
        let mut fired = Vec::new();
        for step in 0..16 {
            let now = Time(step as f64 * 0.125);
            t.request(now, step);
            fired.extend(t.poll(now));
        }
        assert_eq!(fired, vec![4, 9, 14]);
        assert_eq!(t.pending(), Some(&15));
    }

    #[test]
    fn restart_waits_for_the_stream_to_pause() {
        let mut t = Throttle::with_policy(Duration::from_millis(32), TimerPolicy::Restart);
        let mut fired = Vec::new();
        for step in 0..100 {
            let now = ms(step as f64);
            t.request(now, step);
            fired.extend(t.poll(now));
        }
        assert!(fired.is_empty());
        assert_eq!(t.next_deadline(), Some(ms(99.0) + Duration::from_millis(32)));
        assert_eq!(t.poll(ms(120.0)), None);
        assert_eq!(t.poll(ms(140.0)), Some(99));
    }

    #[test]
    fn cancel_drops_the_pending_value() {
        let mut t = Throttle::new(Duration::from_millis(32));
        assert!(!t.cancel());
        t.request(ms(0.0), "a");
        assert_eq!(t.pending(), Some(&"a"));
        assert!(t.cancel());
        assert_eq!(t.poll(ms(100.0)), None);
    }

    #[test]
    fn non_finite_time_never_arms_a_deadline() {
        let mut t = Throttle::new(Duration::from_millis(32));
        assert_eq!(t.request(Time(f64::NAN), 1), RequestOutcome::Rejected);
        assert_eq!(t.request(Time(f64::INFINITY), 2), RequestOutcome::Rejected);
        assert!(!t.is_pending());

        assert_eq!(t.request(ms(0.0), 3), RequestOutcome::Scheduled);
        assert_eq!(t.request(Time(f64::NAN), 4), RequestOutcome::Rejected);
        assert_eq!(t.pending(), Some(&3));
        assert_eq!(t.next_deadline(), Some(ms(32.0)));
        assert_eq!(t.poll(Time(f64::NAN)), None);
        assert_eq!(t.poll(ms(32.0)), Some(3));
    }
}
