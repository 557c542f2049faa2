use std::sync::Arc;

use foundation::bounds::GeoBounds;
use foundation::latlng::LatLng;
use geometry::Geometry;
use tracing::debug;

use crate::config::ProjectionConfig;
use crate::error::ProjectionError;
use crate::gradient::{GradientTransformBuilder, ProjectionTransform};
use crate::info::ProjectionInfo;
use crate::warp::GeometryTransformer;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SessionState {
    Untransformed,
    Transformed,
}

/// Inputs that move a session from one snapshot to the next.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SessionEvent {
    /// Recompute the projection for a new geographic center.
    Retarget(LatLng),
    Reset,
}

/// A computed transform paired with the geometry it produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Projected {
    pub transform: ProjectionTransform,
    pub geometry: Geometry,
}

/// Immutable snapshot of one shape's projection state.
///
/// The original geometry, bounds and center are fixed at creation. The derived
/// part is either absent or a complete [`Projected`]; transitions return new
/// snapshots and never touch `self`. Clones share the geometry buffers.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionSession {
    original_geometry: Arc<Geometry>,
    original_bounds: GeoBounds,
    original_center: LatLng,
    projected: Option<Arc<Projected>>,
}

impl ProjectionSession {
    /// Starts an untransformed session for `geometry` drawn inside `bounds`.
    pub fn new(geometry: Geometry, bounds: GeoBounds) -> Self {
        Self {
            original_geometry: Arc::new(geometry),
            original_center: bounds.center(),
            original_bounds: bounds,
            projected: None,
        }
    }

    /// Like [`ProjectionSession::new`], with bounds taken from the geometry's
    /// own envelope.
    pub fn from_geometry(geometry: Geometry) -> Result<Self, ProjectionError> {
        let bounds = geometry.bounds()?;
        Ok(Self::new(geometry, bounds))
    }

    pub fn original_geometry(&self) -> &Geometry {
        &self.original_geometry
    }

    pub fn original_bounds(&self) -> GeoBounds {
        self.original_bounds
    }

    pub fn original_center(&self) -> LatLng {
        self.original_center
    }

    pub fn state(&self) -> SessionState {
        if self.projected.is_some() {
            SessionState::Transformed
        } else {
            SessionState::Untransformed
        }
    }

    pub fn is_transformed(&self) -> bool {
        self.projected.is_some()
    }

    pub fn projected(&self) -> Option<&Projected> {
        self.projected.as_deref()
    }

    pub fn current_transform(&self) -> Option<&ProjectionTransform> {
        self.projected().map(|p| &p.transform)
    }

    pub fn transformed_geometry(&self) -> Option<&Geometry> {
        self.projected().map(|p| &p.geometry)
    }

    /// The geometry to draw: transformed if available, else the original.
    pub fn current_geometry(&self) -> &Geometry {
        self.transformed_geometry().unwrap_or(&self.original_geometry)
    }

    pub fn projection_info(&self) -> ProjectionInfo {
        match self.current_transform() {
            Some(t) => ProjectionInfo::from_transform(t),
            None => ProjectionInfo::untransformed(),
        }
    }

    /// New snapshot projected for `target`.
    pub fn retarget(
        &self,
        target: LatLng,
        config: &ProjectionConfig,
    ) -> Result<Self, ProjectionError> {
        if !target.is_finite() {
            return Err(ProjectionError::NonFiniteTarget {
                lat: target.lat,
                lng: target.lng,
            });
        }
        config.validate()?;

        let transform =
            GradientTransformBuilder::from_config(config).build(&self.original_bounds, target);
        let geometry = GeometryTransformer::from_config(config).transform(
            &self.original_geometry,
            self.original_center,
            &transform,
        );

        debug!(
            target_lat = target.lat,
            target_lng = target.lng,
            top_lat = transform.top_latitude,
            bottom_lat = transform.bottom_latitude,
            top_h = transform.top_horizontal_scale,
            bottom_h = transform.bottom_horizontal_scale,
            "projection recomputed"
        );

        Ok(Self {
            original_geometry: Arc::clone(&self.original_geometry),
            original_bounds: self.original_bounds,
            original_center: self.original_center,
            projected: Some(Arc::new(Projected {
                transform,
                geometry,
            })),
        })
    }

    /// New snapshot without a transform; the original is kept.
    pub fn reset(&self) -> Self {
        Self {
            original_geometry: Arc::clone(&self.original_geometry),
            original_bounds: self.original_bounds,
            original_center: self.original_center,
            projected: None,
        }
    }

    pub fn apply(
        &self,
        event: SessionEvent,
        config: &ProjectionConfig,
    ) -> Result<Self, ProjectionError> {
        match event {
            SessionEvent::Retarget(target) => self.retarget(target, config),
            SessionEvent::Reset => Ok(self.reset()),
        }
    }
}
