use foundation::bounds::GeoBounds;
use foundation::latlng::LatLng;

use crate::error::GeometryError;
use crate::shape::Geometry;

/// Min/max envelope over every ring (holes included) of every polygon.
pub fn bounds(geometry: &Geometry) -> Result<GeoBounds, GeometryError> {
    let mut positions = geometry.positions().copied().map(LatLng::from_lng_lat);
    let first = positions.next().ok_or(GeometryError::Empty)?;
    let mut out = GeoBounds::from_point(first);
    for p in positions {
        out.extend(p);
    }
    Ok(out)
}

/// Center of the geometry's envelope.
pub fn center(geometry: &Geometry) -> Result<LatLng, GeometryError> {
    bounds(geometry).map(|b| b.center())
}

impl Geometry {
    pub fn bounds(&self) -> Result<GeoBounds, GeometryError> {
        bounds(self)
    }
}

#[cfg(test)]
mod tests {
    use super::{bounds, center};
    use crate::error::GeometryError;
    use crate::shape::Geometry;
    use foundation::latlng::LatLng;

    #[test]
    fn envelope_of_unit_square() {
        let g = Geometry::polygon(vec![vec![
            [0.0, 0.0],
            [1.0, 0.0],
            [1.0, 1.0],
            [0.0, 1.0],
            [0.0, 0.0],
        ]]);
        let b = bounds(&g).unwrap();
        assert_eq!(b.south_west, LatLng::new(0.0, 0.0));
        assert_eq!(b.north_east, LatLng::new(1.0, 1.0));
        assert_eq!(center(&g).unwrap(), LatLng::new(0.5, 0.5));
    }

    #[test]
    fn envelope_spans_all_parts_and_holes() {
        // The hole pokes outside the exterior, which is malformed but still
        // contributes to the envelope.
        let g = Geometry::multi_polygon(vec![
            vec![
                vec![[-10.0, 40.0], [-5.0, 40.0], [-5.0, 45.0], [-10.0, 40.0]],
                vec![[-6.0, 41.0], [-4.0, 41.0], [-6.0, 42.0], [-6.0, 41.0]],
            ],
            vec![vec![[2.0, 50.0], [3.0, 50.0], [3.0, 52.0], [2.0, 50.0]]],
        ]);
        let b = g.bounds().unwrap();
        assert_eq!(b.south_west, LatLng::new(40.0, -10.0));
        assert_eq!(b.north_east, LatLng::new(52.0, 3.0));
    }

    #[test]
    fn empty_geometry_has_no_envelope() {
        assert_eq!(bounds(&Geometry::polygon(vec![])), Err(GeometryError::Empty));
        assert_eq!(
            center(&Geometry::multi_polygon(vec![vec![vec![]]])),
            Err(GeometryError::Empty)
        );
    }
}
