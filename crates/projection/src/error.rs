use geometry::GeometryError;

#[derive(Debug, Clone, PartialEq)]
pub enum ProjectionError {
    Geometry(GeometryError),
    /// A recompute was asked for a target that is not a finite position.
    NonFiniteTarget { lat: f64, lng: f64 },
    InvalidConfig(String),
}

impl std::fmt::Display for ProjectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectionError::Geometry(e) => write!(f, "geometry: {e}"),
            ProjectionError::NonFiniteTarget { lat, lng } => {
                write!(f, "target is not a finite position: lat={lat} lng={lng}")
            }
            ProjectionError::InvalidConfig(reason) => write!(f, "invalid config: {reason}"),
        }
    }
}

impl std::error::Error for ProjectionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProjectionError::Geometry(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GeometryError> for ProjectionError {
    fn from(e: GeometryError) -> Self {
        ProjectionError::Geometry(e)
    }
}
