pub mod envelope;
pub mod error;
pub mod shape;

pub use envelope::*;
pub use error::*;
pub use shape::*;
