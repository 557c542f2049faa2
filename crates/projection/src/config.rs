use std::time::Duration;

use runtime::throttle::TimerPolicy;
use serde::{Deserialize, Serialize};

use crate::error::ProjectionError;

pub const DEFAULT_INSET_FRACTION: f64 = 0.2;
pub const DEFAULT_SMOOTHING_FACTOR: f64 = 0.8;
pub const DEFAULT_THROTTLE_INTERVAL_MS: u64 = 32;

/// Tuning knobs for the drag re-projection.
///
/// The defaults are visual heuristics rather than derived values, so they are
/// exposed here instead of being baked into the algorithms.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectionConfig {
    /// Share of the latitude span by which the reference latitudes are moved
    /// inward from the shape's top and bottom edges.
    pub inset_fraction: f64,
    /// How much of each scale's deviation from 1.0 is kept (0 = no distortion,
    /// 1 = full interpolated scale).
    pub smoothing_factor: f64,
    /// Minimum spacing between two recomputes while dragging.
    pub throttle_interval_ms: u64,
    pub timer_policy: TimerPolicy,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            inset_fraction: DEFAULT_INSET_FRACTION,
            smoothing_factor: DEFAULT_SMOOTHING_FACTOR,
            throttle_interval_ms: DEFAULT_THROTTLE_INTERVAL_MS,
            timer_policy: TimerPolicy::default(),
        }
    }
}

impl ProjectionConfig {
    pub fn throttle_interval(&self) -> Duration {
        Duration::from_millis(self.throttle_interval_ms)
    }

    pub fn validate(&self) -> Result<(), ProjectionError> {
        // An inset of half the span or more would make the reference lines cross.
        if !(0.0..0.5).contains(&self.inset_fraction) {
            return Err(ProjectionError::InvalidConfig(format!(
                "inset_fraction must be in [0, 0.5), got {}",
                self.inset_fraction
            )));
        }
        if !(0.0..=1.0).contains(&self.smoothing_factor) {
            return Err(ProjectionError::InvalidConfig(format!(
                "smoothing_factor must be in [0, 1], got {}",
                self.smoothing_factor
            )));
        }
        if self.throttle_interval_ms == 0 {
            return Err(ProjectionError::InvalidConfig(
                "throttle_interval_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
