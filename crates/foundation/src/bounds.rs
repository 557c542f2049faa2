use serde::{Deserialize, Serialize};

use crate::latlng::LatLng;

/// Axis-aligned geographic bounding box.
///
/// Well-formed boxes have `south_west <= north_east` on both axes. This is not
/// validated; consumers are expected to degrade gracefully on inverted input.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl GeoBounds {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        GeoBounds {
            south_west,
            north_east,
        }
    }

    /// A zero-area box around a single position.
    pub fn from_point(p: LatLng) -> Self {
        GeoBounds::new(p, p)
    }

    /// Grows the box so it covers `p`.
    pub fn extend(&mut self, p: LatLng) {
        self.south_west.lat = self.south_west.lat.min(p.lat);
        self.south_west.lng = self.south_west.lng.min(p.lng);
        self.north_east.lat = self.north_east.lat.max(p.lat);
        self.north_east.lng = self.north_east.lng.max(p.lng);
    }

    /// Midpoint of the box diagonal.
    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }

    /// Signed latitude extent; negative for inverted boxes.
    pub fn lat_span(&self) -> f64 {
        self.north_east.lat - self.south_west.lat
    }

    pub fn lng_span(&self) -> f64 {
        self.north_east.lng - self.south_west.lng
    }
}
