use core::f64::consts::PI;

use foundation::latlng::LatLng;
use foundation::math::mercator::{EARTH_RADIUS_M, project, unproject};
use serde::{Deserialize, Serialize};

use crate::controller::ScreenProjector;

/// Edge length of one tile at zoom 0, in pixels.
pub const TILE_SIZE: f64 = 256.0;

// Projected meters to the unit square: x' = A*x + 0.5, y' = -A*y + 0.5.
const UNIT_SCALE: f64 = 0.5 / (PI * EARTH_RADIUS_M);

/// A Web Mercator map view: center, zoom and container size in pixels.
///
/// Screen coordinates have their origin in the top-left corner of the
/// container, with y growing downwards.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct MercatorViewport {
    pub center: LatLng,
    pub zoom: f64,
    pub width: f64,
    pub height: f64,
}

impl MercatorViewport {
    pub fn new(center: LatLng, zoom: f64, width: f64, height: f64) -> Self {
        Self {
            center,
            zoom,
            width,
            height,
        }
    }

    /// Side of the whole world in pixels at the current zoom.
    pub fn world_size(&self) -> f64 {
        TILE_SIZE * self.zoom.exp2()
    }

    pub fn lat_lng_to_world_pixel(&self, p: LatLng) -> [f64; 2] {
        let [x, y] = project(p);
        let size = self.world_size();
        [
            size * (UNIT_SCALE * x + 0.5),
            size * (-UNIT_SCALE * y + 0.5),
        ]
    }

    pub fn lat_lng_to_screen(&self, p: LatLng) -> [f64; 2] {
        let [wx, wy] = self.lat_lng_to_world_pixel(p);
        let [cx, cy] = self.lat_lng_to_world_pixel(self.center);
        [
            wx - cx + self.width / 2.0,
            wy - cy + self.height / 2.0,
        ]
    }
}

impl ScreenProjector for MercatorViewport {
    fn screen_to_lat_lng(&self, x: f64, y: f64) -> Option<LatLng> {
        if !(x.is_finite() && y.is_finite()) {
            return None;
        }
        let size = self.world_size();
        let [cx, cy] = self.lat_lng_to_world_pixel(self.center);
        let wx = cx + x - self.width / 2.0;
        let wy = cy + y - self.height / 2.0;
        // Above or below the square world there is no latitude to map to.
        if !(0.0..=size).contains(&wy) {
            return None;
        }
        let mx = (wx / size - 0.5) / UNIT_SCALE;
        let my = (wy / size - 0.5) / -UNIT_SCALE;
        let p = unproject([mx, my]);
        p.is_finite().then_some(p)
    }
}

#[cfg(test)]
mod tests {
    use super::{MercatorViewport, TILE_SIZE};
    use crate::controller::ScreenProjector;
    use foundation::latlng::LatLng;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn europe() -> MercatorViewport {
        MercatorViewport::new(LatLng::new(48.0, 10.0), 4.0, 800.0, 600.0)
    }

    #[test]
    fn world_size_doubles_per_zoom_level() {
        let mut v = europe();
        v.zoom = 0.0;
        assert_eq!(v.world_size(), TILE_SIZE);
        v.zoom = 3.0;
        assert_eq!(v.world_size(), TILE_SIZE * 8.0);
    }

    #[test]
    fn origin_of_the_world_is_the_top_left_corner() {
        let v = MercatorViewport::new(LatLng::new(0.0, 0.0), 0.0, 256.0, 256.0);
        let [x, y] = v.lat_lng_to_world_pixel(LatLng::new(0.0, 0.0));
        assert_close(x, 128.0, 1e-9);
        assert_close(y, 128.0, 1e-9);
        let [x, _] = v.lat_lng_to_world_pixel(LatLng::new(0.0, -180.0));
        assert_close(x, 0.0, 1e-9);
    }

    #[test]
    fn screen_center_is_the_viewport_center() {
        let v = europe();
        let p = v.screen_to_lat_lng(400.0, 300.0).unwrap();
        assert_close(p.lat, 48.0, 1e-9);
        assert_close(p.lng, 10.0, 1e-9);
        let [x, y] = v.lat_lng_to_screen(v.center);
        assert_close(x, 400.0, 1e-9);
        assert_close(y, 300.0, 1e-9);
    }

    #[test]
    fn screen_and_geographic_positions_round_trip() {
        let v = europe();
        for p in [
            LatLng::new(60.0, 25.0),
            LatLng::new(36.0, -9.0),
            LatLng::new(52.5, 13.4),
        ] {
            let [x, y] = v.lat_lng_to_screen(p);
            let back = v.screen_to_lat_lng(x, y).unwrap();
            assert_close(back.lat, p.lat, 1e-9);
            assert_close(back.lng, p.lng, 1e-9);
        }
    }

    #[test]
    fn moving_up_the_screen_moves_north() {
        let v = europe();
        let upper = v.screen_to_lat_lng(400.0, 100.0).unwrap();
        let lower = v.screen_to_lat_lng(400.0, 500.0).unwrap();
        assert!(upper.lat > lower.lat);
    }

    #[test]
    fn points_off_the_world_are_not_converted() {
        let v = europe();
        assert_eq!(v.screen_to_lat_lng(400.0, -1.0e6), None);
        assert_eq!(v.screen_to_lat_lng(400.0, 1.0e6), None);
        assert_eq!(v.screen_to_lat_lng(f64::NAN, 300.0), None);
        assert_eq!(v.screen_to_lat_lng(400.0, f64::INFINITY), None);
    }
}
