/// A `[lng, lat]` pair in degrees (GeoJSON order).
pub type Position = [f64; 2];

/// Closed boundary loop. Order and winding are kept as supplied.
pub type Ring = Vec<Position>;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Polygon,
    MultiPolygon,
}

impl GeometryKind {
    /// GeoJSON `type` member for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            GeometryKind::Polygon => "Polygon",
            GeometryKind::MultiPolygon => "MultiPolygon",
        }
    }
}

impl std::fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outer boundary followed by zero or more holes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    pub rings: Vec<Ring>,
}

impl Polygon {
    pub fn new(rings: Vec<Ring>) -> Self {
        Self { rings }
    }

    pub fn exterior(&self) -> Option<&Ring> {
        self.rings.first()
    }

    pub fn holes(&self) -> &[Ring] {
        self.rings.get(1..).unwrap_or(&[])
    }

    pub fn positions(&self) -> impl Iterator<Item = &Position> + '_ {
        self.rings.iter().flatten()
    }

    /// Rebuilds the polygon with every position passed through `f`.
    pub fn map_positions(&self, f: &mut impl FnMut(Position) -> Position) -> Polygon {
        Polygon {
            rings: self
                .rings
                .iter()
                .map(|ring| ring.iter().map(|&p| f(p)).collect())
                .collect(),
        }
    }
}

/// Polygonal geometry handled by the projection engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Polygon(Polygon),
    MultiPolygon(Vec<Polygon>),
}

impl Geometry {
    pub fn polygon(rings: Vec<Ring>) -> Self {
        Geometry::Polygon(Polygon::new(rings))
    }

    pub fn multi_polygon(polygons: Vec<Vec<Ring>>) -> Self {
        Geometry::MultiPolygon(polygons.into_iter().map(Polygon::new).collect())
    }

    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Polygon(_) => GeometryKind::Polygon,
            Geometry::MultiPolygon(_) => GeometryKind::MultiPolygon,
        }
    }

    pub fn polygons(&self) -> &[Polygon] {
        match self {
            Geometry::Polygon(p) => core::slice::from_ref(p),
            Geometry::MultiPolygon(ps) => ps,
        }
    }

    /// Every position of every ring of every polygon, in storage order.
    pub fn positions(&self) -> impl Iterator<Item = &Position> + '_ {
        self.polygons().iter().flat_map(|p| p.positions())
    }

    pub fn vertex_count(&self) -> usize {
        self.positions().count()
    }

    pub fn is_empty(&self) -> bool {
        self.positions().next().is_none()
    }

    /// Same variant and ring structure, coordinates replaced by `f`.
    pub fn map_positions(&self, mut f: impl FnMut(Position) -> Position) -> Geometry {
        match self {
            Geometry::Polygon(p) => Geometry::Polygon(p.map_positions(&mut f)),
            Geometry::MultiPolygon(ps) => {
                Geometry::MultiPolygon(ps.iter().map(|p| p.map_positions(&mut f)).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Geometry, GeometryKind, Polygon};
    use pretty_assertions::assert_eq;

    fn square(x0: f64, y0: f64, size: f64) -> Vec<[f64; 2]> {
        vec![
            [x0, y0],
            [x0 + size, y0],
            [x0 + size, y0 + size],
            [x0, y0 + size],
            [x0, y0],
        ]
    }

    #[test]
    fn polygon_exposes_exterior_and_holes() {
        let p = Polygon::new(vec![square(0.0, 0.0, 10.0), square(2.0, 2.0, 1.0)]);
        assert_eq!(p.exterior().map(Vec::len), Some(5));
        assert_eq!(p.holes().len(), 1);
        assert!(Polygon::default().holes().is_empty());
    }

    #[test]
    fn positions_walk_holes_and_parts() {
        let g = Geometry::multi_polygon(vec![
            vec![square(0.0, 0.0, 10.0), square(2.0, 2.0, 1.0)],
            vec![square(20.0, 0.0, 1.0)],
        ]);
        assert_eq!(g.kind(), GeometryKind::MultiPolygon);
        assert_eq!(g.polygons().len(), 2);
        assert_eq!(g.vertex_count(), 15);
        assert!(!g.is_empty());
        assert!(Geometry::polygon(vec![]).is_empty());
        assert!(Geometry::multi_polygon(vec![vec![vec![]]]).is_empty());
    }

    #[test]
    fn map_positions_preserves_structure() {
        let g = Geometry::polygon(vec![square(0.0, 0.0, 1.0), square(0.25, 0.25, 0.5)]);
        let shifted = g.map_positions(|[lng, lat]| [lng + 10.0, lat]);

        let Geometry::Polygon(p) = &shifted else {
            panic!("variant changed: {:?}", shifted.kind());
        };
        assert_eq!(p.rings.len(), 2);
        assert_eq!(p.rings[0][1], [11.0, 0.0]);
        assert_eq!(p.rings[1][0], [10.25, 0.25]);
        assert_eq!(g.vertex_count(), shifted.vertex_count());
    }

    #[test]
    fn kind_names_match_geojson() {
        assert_eq!(GeometryKind::Polygon.to_string(), "Polygon");
        assert_eq!(GeometryKind::MultiPolygon.as_str(), "MultiPolygon");
    }
}
