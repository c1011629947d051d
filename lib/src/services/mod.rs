// lib/src/services/mod.rs

pub mod doctor_service;
pub mod emergency_numbers;
pub mod hospital_service;

pub use doctor_service::DoctorService;
pub use emergency_numbers::{emergency_numbers, primary_number};
pub use hospital_service::{FacilityDirectory, HealthsitesClient, HospitalService, HospitalServiceConfig};
