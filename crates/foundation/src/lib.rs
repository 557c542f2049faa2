pub mod bounds;
pub mod latlng;
pub mod math;
pub mod time;

// Foundation crate: small, well-tested geographic primitives only.
pub use bounds::*;
pub use latlng::*;
pub use time::*;
