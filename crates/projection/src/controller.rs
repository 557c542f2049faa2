use foundation::bounds::GeoBounds;
use foundation::latlng::LatLng;
use foundation::time::Time;
use geometry::Geometry;
use runtime::throttle::{RequestOutcome, Throttle};
use tracing::{trace, warn};

use crate::config::ProjectionConfig;
use crate::error::ProjectionError;
use crate::info::ProjectionInfo;
use crate::session::ProjectionSession;

/// Host-side conversion from a container pixel to a geographic position.
///
/// `None` means the point has no geographic meaning (outside the projection's
/// valid range); the request is then dropped.
pub trait ScreenProjector {
    fn screen_to_lat_lng(&self, x: f64, y: f64) -> Option<LatLng>;
}

impl<F> ScreenProjector for F
where
    F: Fn(f64, f64) -> Option<LatLng>,
{
    fn screen_to_lat_lng(&self, x: f64, y: f64) -> Option<LatLng> {
        self(x, y)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// A recompute was armed for this target.
    Scheduled,
    /// The target replaced one that was still pending.
    Superseded,
    /// The point could not be converted, or the timestamp was not finite;
    /// nothing changed.
    Rejected,
}

impl From<RequestOutcome> for UpdateOutcome {
    fn from(o: RequestOutcome) -> Self {
        match o {
            RequestOutcome::Scheduled => UpdateOutcome::Scheduled,
            RequestOutcome::Superseded => UpdateOutcome::Superseded,
            RequestOutcome::Rejected => UpdateOutcome::Rejected,
        }
    }
}

/// Drives a [`ProjectionSession`] from a pointer stream.
///
/// Requests go through a latest-wins [`Throttle`]; the host calls
/// [`ProjectionController::tick`] from its frame loop and the pending target, if
/// due, is recomputed synchronously.
#[derive(Debug, Clone)]
pub struct ProjectionController {
    config: ProjectionConfig,
    session: ProjectionSession,
    throttle: Throttle<LatLng>,
    recomputes: u64,
}

impl ProjectionController {
    pub fn new(
        geometry: Geometry,
        bounds: GeoBounds,
        config: ProjectionConfig,
    ) -> Result<Self, ProjectionError> {
        Self::with_session(ProjectionSession::new(geometry, bounds), config)
    }

    pub fn with_session(
        session: ProjectionSession,
        config: ProjectionConfig,
    ) -> Result<Self, ProjectionError> {
        config.validate()?;
        Ok(Self {
            throttle: Throttle::with_policy(config.throttle_interval(), config.timer_policy),
            config,
            session,
            recomputes: 0,
        })
    }

    /// Replaces the shape being projected. Any pending recompute is dropped.
    pub fn initialize(&mut self, geometry: Geometry, bounds: GeoBounds) {
        if self.throttle.cancel() {
            trace!("pending recompute cancelled by initialize");
        }
        self.session = ProjectionSession::new(geometry, bounds);
    }

    /// Converts the screen point and queues it as the next target.
    pub fn request_update(
        &mut self,
        projector: &impl ScreenProjector,
        x: f64,
        y: f64,
        now: Time,
    ) -> UpdateOutcome {
        match projector.screen_to_lat_lng(x, y) {
            Some(target) if target.is_finite() => self.request_target(target, now),
            _ => {
                warn!(x, y, "screen point could not be converted, update skipped");
                UpdateOutcome::Rejected
            }
        }
    }

    pub fn request_target(&mut self, target: LatLng, now: Time) -> UpdateOutcome {
        if !target.is_finite() {
            warn!(lat = target.lat, lng = target.lng, "non-finite target, update skipped");
            return UpdateOutcome::Rejected;
        }
        let outcome = self.throttle.request(now, target);
        match outcome {
            RequestOutcome::Superseded => {
                trace!(lat = target.lat, lng = target.lng, "pending target superseded");
            }
            RequestOutcome::Rejected => {
                warn!(now = now.0, "non-finite timestamp, update skipped");
            }
            RequestOutcome::Scheduled => {}
        }
        outcome.into()
    }

    /// Runs the pending recompute if its deadline has passed.
    ///
    /// Returns whether the session changed. On error the previous session is
    /// kept.
    pub fn tick(&mut self, now: Time) -> Result<bool, ProjectionError> {
        match self.throttle.poll(now) {
            Some(target) => self.recompute(target).map(|()| true),
            None => Ok(false),
        }
    }

    /// Runs the pending recompute immediately, ignoring its deadline.
    pub fn flush(&mut self) -> Result<bool, ProjectionError> {
        match self.throttle.next_deadline() {
            Some(deadline) => self.tick(deadline),
            None => Ok(false),
        }
    }

    /// Drops the transform and any pending recompute.
    pub fn reset(&mut self) {
        if self.throttle.cancel() {
            trace!("pending recompute cancelled by reset");
        }
        self.session = self.session.reset();
    }

    fn recompute(&mut self, target: LatLng) -> Result<(), ProjectionError> {
        match self.session.retarget(target, &self.config) {
            Ok(next) => {
                self.session = next;
                self.recomputes += 1;
                Ok(())
            }
            Err(err) => {
                warn!(%err, "recompute failed, keeping previous projection");
                Err(err)
            }
        }
    }

    pub fn session(&self) -> &ProjectionSession {
        &self.session
    }

    pub fn current_geometry(&self) -> &Geometry {
        self.session.current_geometry()
    }

    pub fn projection_info(&self) -> ProjectionInfo {
        self.session.projection_info()
    }

    pub fn is_pending(&self) -> bool {
        self.throttle.is_pending()
    }

    pub fn pending_target(&self) -> Option<LatLng> {
        self.throttle.pending().copied()
    }

    pub fn next_deadline(&self) -> Option<Time> {
        self.throttle.next_deadline()
    }

    /// Number of recomputes that completed since creation.
    pub fn recompute_count(&self) -> u64 {
        self.recomputes
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }
}
