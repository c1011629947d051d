// models/src/medical/triage.rs

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{ValidationError, ValidationResult};
use crate::geo::GeoPoint;

/// Urgency tier of a symptom report.
///
/// Variants are declared from least to most urgent so that `Ord` ranks
/// `Red` highest.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SeverityTier {
    Green,
    Yellow,
    Red,
}

impl SeverityTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityTier::Green => "GREEN",
            SeverityTier::Yellow => "YELLOW",
            SeverityTier::Red => "RED",
        }
    }

    pub fn is_emergency(&self) -> bool {
        matches!(self, SeverityTier::Red)
    }
}

impl fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of classifying a symptom report. Field names follow the public
/// API payload (`severity`, `phone`).
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct SeverityVerdict {
    #[serde(rename = "severity")]
    pub tier: SeverityTier,
    pub action: String,
    pub recommendation: String,
    pub estimated_response: String,
    pub phone: String,
}

/// What the patient reported.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct SymptomReport {
    pub symptoms: Vec<String>,
    pub age: i32,
    pub pain_rating: i32,
    pub location: Option<GeoPoint>,
}

impl SymptomReport {
    pub fn new(symptoms: Vec<String>, age: i32, pain_rating: i32) -> Self {
        Self { symptoms, age, pain_rating, location: None }
    }

    pub fn with_location(mut self, location: GeoPoint) -> Self {
        self.location = Some(location);
        self
    }

    /// Range checks callers run before handing the report to the classifier.
    /// The classifier itself accepts anything numeric.
    pub fn validate(&self) -> ValidationResult<()> {
        if !(0..=10).contains(&self.pain_rating) {
            return Err(ValidationError::InvalidPainRating(self.pain_rating));
        }
        if self.age < 0 {
            return Err(ValidationError::InvalidAge(self.age));
        }
        if let Some(point) = self.location {
            GeoPoint::checked(point.latitude, point.longitude)?;
        }
        Ok(())
    }
}
