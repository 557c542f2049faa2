use foundation::latlng::LatLng;
use geometry::{Geometry, Position};

use crate::config::{DEFAULT_SMOOTHING_FACTOR, ProjectionConfig};
use crate::gradient::ProjectionTransform;

/// Applies a [`ProjectionTransform`] to every vertex of a geometry.
///
/// Each vertex is translated so the original center lands on the transform's
/// center, then scaled about it by the ratio interpolated at the vertex's new
/// latitude. Ring and polygon structure is left untouched.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeometryTransformer {
    smoothing_factor: f64,
}

impl Default for GeometryTransformer {
    fn default() -> Self {
        Self::new(DEFAULT_SMOOTHING_FACTOR)
    }
}

impl GeometryTransformer {
    pub fn new(smoothing_factor: f64) -> Self {
        Self { smoothing_factor }
    }

    pub fn from_config(config: &ProjectionConfig) -> Self {
        Self::new(config.smoothing_factor)
    }

    pub fn smoothing_factor(&self) -> f64 {
        self.smoothing_factor
    }

    /// Pulls `scale` toward 1.0, keeping `smoothing_factor` of its deviation.
    #[inline]
    pub fn smooth(&self, scale: f64) -> f64 {
        1.0 + (scale - 1.0) * self.smoothing_factor
    }

    pub fn transform_position(
        &self,
        [lng, lat]: Position,
        original_center: LatLng,
        transform: &ProjectionTransform,
    ) -> Position {
        let relative_lng = lng - original_center.lng;
        let relative_lat = lat - original_center.lat;

        let provisional_lat = transform.center_lat + relative_lat;
        let (h, v) = transform.scale_at(provisional_lat);

        [
            relative_lng * self.smooth(h) + transform.center_lng,
            relative_lat * self.smooth(v) + transform.center_lat,
        ]
    }

    pub fn transform(
        &self,
        geometry: &Geometry,
        original_center: LatLng,
        transform: &ProjectionTransform,
    ) -> Geometry {
        geometry.map_positions(|p| self.transform_position(p, original_center, transform))
    }
}
