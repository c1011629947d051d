// models/src/lib.rs

pub mod errors;
pub mod geo;
pub mod medical;

pub use errors::{ValidationError, ValidationResult};
pub use geo::GeoPoint;
pub use medical::*;
