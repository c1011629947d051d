// lib/src/lib.rs

pub mod engine;
pub mod errors;
pub mod services;
pub mod storage_engine;

pub use engine::{
    assess, classify, distance_km, rank_by_proximity, score_symptoms, EARTH_RADIUS_KM,
};
pub use errors::{MediAlertError, Result};
pub use services::{DoctorService, HospitalService, HospitalServiceConfig};
pub use storage_engine::Storage;
