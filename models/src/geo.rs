// models/src/geo.rs

use serde::{Deserialize, Serialize};

use crate::errors::{ValidationError, ValidationResult};

/// A position on the globe in decimal degrees.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Builds a point, rejecting coordinates outside the decimal-degree ranges.
    ///
    /// Distance math accepts any value; this is for request boundaries.
    pub fn checked(latitude: f64, longitude: f64) -> ValidationResult<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ValidationError::InvalidLatitude(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(ValidationError::InvalidLongitude(longitude));
        }
        Ok(Self::new(latitude, longitude))
    }
}
