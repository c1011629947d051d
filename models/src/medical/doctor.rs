// models/src/medical/doctor.rs

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: String,
    pub name: String,
    pub specialty: String,
    pub rating: f32,
    pub available: bool,
    pub phone: String,
    pub experience_years: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorReview {
    pub patient: String,
    pub rating: u8,
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorReviews {
    pub doctor_id: String,
    pub doctor_name: String,
    pub rating: f32,
    pub total_reviews: u32,
    pub reviews: Vec<DoctorReview>,
}

/// Booking request as submitted by a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsultationRequest {
    pub doctor_id: String,
    pub booking_date: String,
    pub booking_time: String,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consultation {
    pub consultation_id: String,
    pub user_id: u64,
    pub doctor_id: String,
    pub doctor_name: String,
    pub date: String,
    pub time: String,
    pub symptoms: Vec<String>,
    pub notes: String,
    pub status: String,
    pub booked_at: String,
}
