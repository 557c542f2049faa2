pub mod config;
pub mod controller;
pub mod error;
pub mod gradient;
pub mod info;
pub mod session;
pub mod viewport;
pub mod warp;

pub use config::*;
pub use controller::*;
pub use error::*;
pub use gradient::*;
pub use info::*;
pub use session::*;
pub use viewport::*;
pub use warp::*;
