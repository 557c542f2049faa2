use foundation::bounds::GeoBounds;
use foundation::latlng::LatLng;
use foundation::math::mercator::{horizontal_scale, vertical_scale};
use serde::Serialize;

use crate::config::{DEFAULT_INSET_FRACTION, ProjectionConfig};

/// Latitude-gradient scale field for a shape moved to a new center.
///
/// Scales are ratios against the shape's original position: 1.0 means no
/// distortion. `top_latitude`/`bottom_latitude` are the inset reference lines
/// at the new position; scales are interpolated between them.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct ProjectionTransform {
    pub top_latitude: f64,
    pub bottom_latitude: f64,
    pub top_horizontal_scale: f64,
    pub bottom_horizontal_scale: f64,
    pub top_vertical_scale: f64,
    pub bottom_vertical_scale: f64,
    pub center_lat: f64,
    pub center_lng: f64,
}

impl ProjectionTransform {
    pub fn center(&self) -> LatLng {
        LatLng::new(self.center_lat, self.center_lng)
    }

    /// Position of `lat` between the reference lines: 0 at the top line, 1 at
    /// the bottom line. Latitudes outside are clamped; a zero-height band
    /// yields 0.
    pub fn interpolation_factor(&self, lat: f64) -> f64 {
        let range = (self.top_latitude - self.bottom_latitude).abs();
        if range.is_nan() || range <= 0.0 {
            return 0.0;
        }
        let lo = self.top_latitude.min(self.bottom_latitude);
        let hi = self.top_latitude.max(self.bottom_latitude);
        let clamped = lat.clamp(lo, hi);
        (clamped - self.top_latitude).abs() / range
    }

    /// Interpolated `(horizontal, vertical)` ratio at `lat`, before smoothing.
    pub fn scale_at(&self, lat: f64) -> (f64, f64) {
        let f = self.interpolation_factor(lat);
        (
            lerp(self.top_horizontal_scale, self.bottom_horizontal_scale, f),
            lerp(self.top_vertical_scale, self.bottom_vertical_scale, f),
        )
    }
}

#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Builds a [`ProjectionTransform`] by comparing Mercator scale at inset
/// reference latitudes of the original and the moved envelope.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GradientTransformBuilder {
    inset_fraction: f64,
}

impl Default for GradientTransformBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_INSET_FRACTION)
    }
}

impl GradientTransformBuilder {
    pub fn new(inset_fraction: f64) -> Self {
        Self { inset_fraction }
    }

    pub fn from_config(config: &ProjectionConfig) -> Self {
        Self::new(config.inset_fraction)
    }

    pub fn inset_fraction(&self) -> f64 {
        self.inset_fraction
    }

    pub fn build(&self, original: &GeoBounds, target: LatLng) -> ProjectionTransform {
        let lat_span = original.lat_span();
        let inset = lat_span * self.inset_fraction;

        let new_top = target.lat + lat_span / 2.0;
        let new_bottom = target.lat - lat_span / 2.0;
        let effective_top = new_top - inset;
        let effective_bottom = new_bottom + inset;

        let orig_effective_top = original.north_east.lat - inset;
        let orig_effective_bottom = original.south_west.lat + inset;

        // Scale functions clamp to +-85 degrees, so every denominator is >= 1.
        ProjectionTransform {
            top_latitude: effective_top,
            bottom_latitude: effective_bottom,
            top_horizontal_scale: horizontal_scale(effective_top)
                / horizontal_scale(orig_effective_top),
            bottom_horizontal_scale: horizontal_scale(effective_bottom)
                / horizontal_scale(orig_effective_bottom),
            top_vertical_scale: vertical_scale(effective_top) / vertical_scale(orig_effective_top),
            bottom_vertical_scale: vertical_scale(effective_bottom)
                / vertical_scale(orig_effective_bottom),
            center_lat: target.lat,
            center_lng: target.lng,
        }
    }
}

/// [`GradientTransformBuilder::build`] with the default 20% inset.
pub fn gradient_transform(original: &GeoBounds, target: LatLng) -> ProjectionTransform {
    GradientTransformBuilder::default().build(original, target)
}
