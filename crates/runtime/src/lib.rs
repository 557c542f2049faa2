pub mod throttle;

pub use throttle::*;
