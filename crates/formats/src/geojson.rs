use geometry::{Geometry, Polygon, Position, Ring};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum GeoJsonError {
    Json(String),
    /// A well-formed geometry the engine cannot project (points, lines, ...).
    UnsupportedGeometry(String),
    Invalid(String),
}

impl std::fmt::Display for GeoJsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeoJsonError::Json(e) => write!(f, "JSON parse error: {e}"),
            GeoJsonError::UnsupportedGeometry(ty) => {
                write!(f, "unsupported geometry type: {ty} (expected Polygon or MultiPolygon)")
            }
            GeoJsonError::Invalid(reason) => write!(f, "invalid GeoJSON: {reason}"),
        }
    }
}

impl std::error::Error for GeoJsonError {}

/// A polygonal geometry with the properties of the feature it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeFeature {
    pub id: Option<String>,
    pub properties: Map<String, Value>,
    pub geometry: Geometry,
}

impl ShapeFeature {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            id: None,
            properties: Map::new(),
            geometry,
        }
    }

    pub fn from_geojson_str(payload: &str) -> Result<Self, GeoJsonError> {
        let value: Value =
            serde_json::from_str(payload).map_err(|e| GeoJsonError::Json(e.to_string()))?;
        Self::from_geojson_value(&value)
    }

    /// Accepts a bare geometry, a `Feature`, or a `FeatureCollection`; a
    /// collection contributes its first feature.
    pub fn from_geojson_value(value: &Value) -> Result<Self, GeoJsonError> {
        let obj = value
            .as_object()
            .ok_or_else(|| invalid("top-level value must be an object"))?;
        match type_of(obj)? {
            "FeatureCollection" => {
                let first = obj
                    .get("features")
                    .and_then(|v| v.as_array())
                    .ok_or_else(|| invalid("FeatureCollection missing features"))?
                    .first()
                    .ok_or_else(|| invalid("FeatureCollection has no features"))?;
                Self::from_feature_value(first)
            }
            "Feature" => Self::from_feature_value(value),
            _ => Ok(Self::new(parse_geometry_value(value)?)),
        }
    }

    fn from_feature_value(value: &Value) -> Result<Self, GeoJsonError> {
        let obj = value
            .as_object()
            .ok_or_else(|| invalid("feature must be an object"))?;
        let ty = type_of(obj)?;
        if ty != "Feature" {
            return Err(invalid(format!("unexpected feature type: {ty}")));
        }

        let id = match obj.get("id") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };
        let properties = obj
            .get("properties")
            .and_then(|v| v.as_object())
            .cloned()
            .unwrap_or_default();
        let geometry = obj
            .get("geometry")
            .filter(|v| !v.is_null())
            .ok_or_else(|| invalid("feature missing geometry"))?;

        Ok(Self {
            id,
            properties,
            geometry: parse_geometry_value(geometry)?,
        })
    }

    pub fn to_geojson_value(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("type".to_string(), Value::String("Feature".to_string()));
        if let Some(id) = &self.id {
            obj.insert("id".to_string(), Value::String(id.clone()));
        }
        obj.insert(
            "properties".to_string(),
            Value::Object(self.properties.clone()),
        );
        obj.insert("geometry".to_string(), geometry_to_value(&self.geometry));
        Value::Object(obj)
    }
}

pub fn parse_geometry_str(payload: &str) -> Result<Geometry, GeoJsonError> {
    ShapeFeature::from_geojson_str(payload).map(|f| f.geometry)
}

/// Parses a GeoJSON `Polygon` or `MultiPolygon` geometry object.
pub fn parse_geometry_value(value: &Value) -> Result<Geometry, GeoJsonError> {
    let obj = value
        .as_object()
        .ok_or_else(|| invalid("geometry must be an object"))?;
    let ty = type_of(obj)?;
    let coords = || {
        obj.get("coordinates")
            .ok_or_else(|| invalid("geometry missing coordinates"))
    };

    match ty {
        "Polygon" => Ok(Geometry::Polygon(parse_polygon(coords()?)?)),
        "MultiPolygon" => {
            let polys = coords()?
                .as_array()
                .ok_or_else(|| invalid("MultiPolygon coordinates must be an array of polygons"))?;
            let mut out = Vec::with_capacity(polys.len());
            for poly in polys {
                out.push(parse_polygon(poly)?);
            }
            Ok(Geometry::MultiPolygon(out))
        }
        "Point" | "MultiPoint" | "LineString" | "MultiLineString" | "GeometryCollection" => {
            Err(GeoJsonError::UnsupportedGeometry(ty.to_string()))
        }
        other => Err(invalid(format!("unknown geometry type: {other}"))),
    }
}

pub fn geometry_to_value(geometry: &Geometry) -> Value {
    let coordinates = match geometry {
        Geometry::Polygon(p) => polygon_coords(p),
        Geometry::MultiPolygon(ps) => Value::Array(ps.iter().map(polygon_coords).collect()),
    };
    let mut obj = Map::new();
    obj.insert(
        "type".to_string(),
        Value::String(geometry.kind().as_str().to_string()),
    );
    obj.insert("coordinates".to_string(), coordinates);
    Value::Object(obj)
}

/// Wraps `geometry` in a `Feature` carrying `properties`.
pub fn feature_value(geometry: &Geometry, properties: Map<String, Value>) -> Value {
    ShapeFeature {
        id: None,
        properties,
        geometry: geometry.clone(),
    }
    .to_geojson_value()
}

fn polygon_coords(p: &Polygon) -> Value {
    Value::Array(
        p.rings
            .iter()
            .map(|ring| {
                Value::Array(
                    ring.iter()
                        .map(|&[lng, lat]| Value::Array(vec![Value::from(lng), Value::from(lat)]))
                        .collect(),
                )
            })
            .collect(),
    )
}

fn type_of(obj: &Map<String, Value>) -> Result<&str, GeoJsonError> {
    obj.get("type")
        .and_then(|v| v.as_str())
        .ok_or_else(|| invalid("object missing type"))
}

fn invalid(reason: impl Into<String>) -> GeoJsonError {
    GeoJsonError::Invalid(reason.into())
}

fn parse_polygon(coords: &Value) -> Result<Polygon, GeoJsonError> {
    let rings = coords
        .as_array()
        .ok_or_else(|| invalid("Polygon coordinates must be an array of rings"))?;
    let mut out = Vec::with_capacity(rings.len());
    for ring in rings {
        out.push(parse_ring(ring)?);
    }
    Ok(Polygon::new(out))
}

fn parse_ring(coords: &Value) -> Result<Ring, GeoJsonError> {
    let arr = coords
        .as_array()
        .ok_or_else(|| invalid("ring must be an array of positions"))?;
    let mut out = Vec::with_capacity(arr.len());
    for item in arr {
        out.push(parse_position(item)?);
    }
    Ok(out)
}

fn parse_position(value: &Value) -> Result<Position, GeoJsonError> {
    let arr = value
        .as_array()
        .ok_or_else(|| invalid("position must be an array"))?;
    // Altitude and any further members are ignored.
    let (Some(lng), Some(lat)) = (
        arr.first().and_then(|v| v.as_f64()),
        arr.get(1).and_then(|v| v.as_f64()),
    ) else {
        return Err(invalid("position must start with numeric [lng, lat]"));
    };
    Ok([lng, lat])
}

#[cfg(test)]
mod tests {
    use super::{
        GeoJsonError, ShapeFeature, feature_value, geometry_to_value, parse_geometry_str,
    };
    use geometry::{Geometry, GeometryKind};
    use pretty_assertions::assert_eq;
    use serde_json::{Map, Value, json};

    #[test]
    fn reads_a_bare_polygon() {
        let g = parse_geometry_str(
            r#"{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,1],[0,0]]]}"#,
        )
        .unwrap();
        assert_eq!(
            g,
            Geometry::polygon(vec![vec![
                [0.0, 0.0],
                [1.0, 0.0],
                [1.0, 1.0],
                [0.0, 1.0],
                [0.0, 0.0]
            ]])
        );
    }

    #[test]
    fn reads_a_feature_with_properties() {
        let f = ShapeFeature::from_geojson_value(&json!({
            "type": "Feature",
            "id": 7,
            "properties": { "name": "Block" },
            "geometry": {
                "type": "MultiPolygon",
                "coordinates": [
                    [[[0, 0], [2, 0], [2, 2], [0, 0]], [[0.5, 0.5], [1, 0.5], [1, 1], [0.5, 0.5]]],
                    [[[5, 5, 120], [6, 5, 120], [6, 6, 120], [5, 5, 120]]]
                ]
            }
        }))
        .unwrap();
        assert_eq!(f.id.as_deref(), Some("7"));
        assert_eq!(f.properties["name"], "Block");
        assert_eq!(f.geometry.kind(), GeometryKind::MultiPolygon);
        assert_eq!(f.geometry.polygons().len(), 2);
        assert_eq!(f.geometry.polygons()[0].holes().len(), 1);
        assert_eq!(f.geometry.polygons()[1].rings[0][0], [5.0, 5.0]);
    }

    #[test]
    fn collection_uses_its_first_feature() {
        let f = ShapeFeature::from_geojson_value(&json!({
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "properties": { "n": 1 },
                  "geometry": {
                      "type": "Polygon",
                      "coordinates": [[[0, 0], [1, 0], [0, 1], [0, 0]]]
                  } },
                { "type": "Feature", "properties": { "n": 2 },
                  "geometry": { "type": "Point", "coordinates": [0, 0] } }
            ]
        }))
        .unwrap();
        assert_eq!(f.properties["n"], 1);

        let err = ShapeFeature::from_geojson_value(&json!({
            "type": "FeatureCollection",
            "features": []
        }))
        .unwrap_err();
        assert!(matches!(err, GeoJsonError::Invalid(_)));
    }

    #[test]
    fn non_polygonal_input_is_unsupported() {
        for ty in ["Point", "LineString", "MultiLineString"] {
            let err = parse_geometry_str(&format!(r#"{{"type":"{ty}","coordinates":[]}}"#))
                .unwrap_err();
            assert_eq!(err, GeoJsonError::UnsupportedGeometry(ty.to_string()));
        }
        assert!(err_is_invalid(r#"{"type":"Blob","coordinates":[]}"#));
    }

    #[test]
    fn malformed_input_is_reported() {
        assert!(matches!(
            parse_geometry_str("{not json").unwrap_err(),
            GeoJsonError::Json(_)
        ));
        assert!(err_is_invalid(r#"[1, 2]"#));
        assert!(err_is_invalid(r#"{"type":"Polygon"}"#));
        assert!(err_is_invalid(r#"{"type":"Polygon","coordinates":[[[0,"a"]]]}"#));
        assert!(err_is_invalid(r#"{"type":"Polygon","coordinates":[[[0]]]}"#));
        assert!(err_is_invalid(r#"{"type":"Feature","geometry":null}"#));
    }

    fn err_is_invalid(payload: &str) -> bool {
        matches!(parse_geometry_str(payload), Err(GeoJsonError::Invalid(_)))
    }

    #[test]
    fn writes_geometry_and_features() {
        let g = Geometry::multi_polygon(vec![vec![vec![
            [0.5, 1.0],
            [2.0, 1.0],
            [2.0, 3.0],
            [0.5, 1.0],
        ]]]);
        assert_eq!(
            geometry_to_value(&g),
            json!({
                "type": "MultiPolygon",
                "coordinates": [[[[0.5, 1.0], [2.0, 1.0], [2.0, 3.0], [0.5, 1.0]]]]
            })
        );

        let mut props = Map::new();
        props.insert("label".to_string(), Value::from("moved"));
        let f = feature_value(&g, props);
        assert_eq!(f["type"], "Feature");
        assert_eq!(f["properties"]["label"], "moved");
        let back = ShapeFeature::from_geojson_value(&f).unwrap();
        assert_eq!(back.geometry, g);
    }
}
