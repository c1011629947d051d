// models/src/medical/hospital.rs

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// A facility that can receive patients.
///
/// Coordinates are kept as flat `latitude`/`longitude` fields so the record
/// stays a plain struct for the storage encoding; use [`HospitalRecord::location`]
/// for geometry.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct HospitalRecord {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub services: Vec<String>,
    #[serde(rename = "type")]
    pub facility_type: Option<String>,
    pub beds: Option<u32>,
    pub emergency: bool,
    pub operating_hours: Option<String>,
    pub rating: Option<f32>,
    pub website: Option<String>,
}

impl HospitalRecord {
    /// A minimal record with no facility details; emergency care is assumed.
    pub fn new(id: impl Into<String>, name: impl Into<String>, address: impl Into<String>, location: GeoPoint) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            address: address.into(),
            phone: None,
            latitude: location.latitude,
            longitude: location.longitude,
            services: Vec::new(),
            facility_type: None,
            beds: None,
            emergency: true,
            operating_hours: None,
            rating: None,
            website: None,
        }
    }

    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_services<I, S>(mut self, services: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.services = services.into_iter().map(Into::into).collect();
        self
    }
}

/// A hospital annotated with its distance from a query point. Serialized flat.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RankedHospital {
    #[serde(flatten)]
    pub hospital: HospitalRecord,
    pub distance_km: f64,
}

impl RankedHospital {
    /// Distance rounded to two decimals, as shown to clients.
    pub fn rounded(mut self) -> Self {
        self.distance_km = (self.distance_km * 100.0).round() / 100.0;
        self
    }
}
