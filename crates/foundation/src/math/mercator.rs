//! Web Mercator scale factors and the spherical Mercator projection.
//!
//! The scale factors are a lightweight approximation of how the projection
//! stretches the map at a latitude. They are used to distort shapes that are
//! dragged to a new latitude, not to reproject coordinates exactly.

use crate::latlng::LatLng;

/// Spherical Mercator radius (meters), as used by Web Mercator.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Scale factors are sampled no further poleward than this (degrees).
pub const MAX_SCALE_LATITUDE: f64 = 85.0;

/// Weight of `|tan(lat)|` in the vertical scale approximation.
pub const VERTICAL_TAN_WEIGHT: f64 = 0.3;

/// Latitude limit of the square Web Mercator world (degrees).
pub const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_779_806_59;

#[inline]
fn clamp_latitude(lat_deg: f64) -> f64 {
    lat_deg.clamp(-MAX_SCALE_LATITUDE, MAX_SCALE_LATITUDE)
}

/// Horizontal stretch at `lat_deg`: `1 / cos(lat)`.
///
/// The latitude is clamped to `[-85, 85]` so the result is always finite.
pub fn horizontal_scale(lat_deg: f64) -> f64 {
    1.0 / clamp_latitude(lat_deg).to_radians().cos()
}

/// Vertical stretch at `lat_deg`: `1 + 0.3 * |tan(lat)|`.
///
/// Same clamp as [`horizontal_scale`].
pub fn vertical_scale(lat_deg: f64) -> f64 {
    1.0 + clamp_latitude(lat_deg).to_radians().tan().abs() * VERTICAL_TAN_WEIGHT
}

/// Forward spherical Mercator: degrees to projected meters `[x, y]`.
pub fn project(p: LatLng) -> [f64; 2] {
    let lat = p
        .lat
        .clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE)
        .to_radians();
    let x = EARTH_RADIUS_M * p.lng.to_radians();
    let y = EARTH_RADIUS_M * (core::f64::consts::FRAC_PI_4 + lat / 2.0).tan().ln();
    [x, y]
}

/// Inverse spherical Mercator: projected meters `[x, y]` to degrees.
pub fn unproject(xy: [f64; 2]) -> LatLng {
    let lng = (xy[0] / EARTH_RADIUS_M).to_degrees();
    let lat = (2.0 * (xy[1] / EARTH_RADIUS_M).exp().atan() - core::f64::consts::FRAC_PI_2)
        .to_degrees();
    LatLng::new(lat, lng)
}
