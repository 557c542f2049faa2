#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    /// The geometry has no coordinates, so no envelope exists.
    Empty,
}

impl std::fmt::Display for GeometryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeometryError::Empty => write!(f, "geometry has no coordinates"),
        }
    }
}

impl std::error::Error for GeometryError {}
