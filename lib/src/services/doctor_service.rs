// lib/src/services/doctor_service.rs

use chrono::Utc;
use log::info;
use tokio::sync::RwLock;

use models::{Consultation, ConsultationRequest, Doctor, DoctorReview, DoctorReviews};

use crate::errors::{MediAlertError, Result};

const SPECIALTIES: [&str; 8] = [
    "General Practitioner",
    "Cardiologist",
    "Pediatrician",
    "Orthopedic Surgeon",
    "Dermatologist",
    "Neurologist",
    "Psychiatrist",
    "Emergency Medicine",
];

const DAILY_SLOTS: [&str; 9] = [
    "09:00 AM", "09:30 AM", "10:00 AM", "10:30 AM", "02:00 PM", "02:30 PM", "03:00 PM", "03:30 PM", "04:00 PM",
];

fn doctor(id: &str, name: &str, specialty: &str, rating: f32, available: bool, experience_years: u32) -> Doctor {
    Doctor {
        id: id.to_string(),
        name: name.to_string(),
        specialty: specialty.to_string(),
        rating,
        available,
        phone: "+234-803-XXXX".to_string(),
        experience_years,
    }
}

/// Mock doctor directory with an in-memory booking ledger.
pub struct DoctorService {
    doctors: Vec<Doctor>,
    consultations: RwLock<Vec<Consultation>>,
}

impl Default for DoctorService {
    fn default() -> Self {
        Self::new()
    }
}

impl DoctorService {
    pub fn new() -> Self {
        Self {
            doctors: vec![
                doctor("doc_001", "Dr. Chioma Okafor", "General Practitioner", 4.8, true, 8),
                doctor("doc_002", "Dr. Seun Adeyemi", "Cardiologist", 4.9, true, 12),
                doctor("doc_003", "Dr. Ngozi Eze", "Pediatrician", 4.7, true, 10),
                doctor("doc_004", "Dr. Kunle Okonkwo", "Orthopedic Surgeon", 4.6, false, 15),
            ],
            consultations: RwLock::new(Vec::new()),
        }
    }

    /// Available doctors, optionally narrowed by a case-insensitive specialty fragment.
    pub fn available_doctors(&self, specialty: Option<&str>) -> Vec<Doctor> {
        let needle = specialty.map(str::to_lowercase);
        self.doctors
            .iter()
            .filter(|d| d.available)
            .filter(|d| match &needle {
                Some(needle) => d.specialty.to_lowercase().contains(needle),
                None => true,
            })
            .cloned()
            .collect()
    }

    pub fn doctor_by_id(&self, doctor_id: &str) -> Option<&Doctor> {
        self.doctors.iter().find(|d| d.id == doctor_id)
    }

    /// Every doctor keeps the same daily schedule.
    pub fn available_slots(&self, _doctor_id: &str, _date: &str) -> Vec<&'static str> {
        DAILY_SLOTS.to_vec()
    }

    pub fn specialties(&self) -> Vec<&'static str> {
        SPECIALTIES.to_vec()
    }

    /// Doctors whose name or specialty contains `query`, ignoring case.
    pub fn search(&self, query: &str) -> Vec<Doctor> {
        let needle = query.to_lowercase();
        self.doctors
            .iter()
            .filter(|d| d.name.to_lowercase().contains(&needle) || d.specialty.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    pub fn reviews(&self, doctor_id: &str) -> Result<DoctorReviews> {
        let doctor = self
            .doctor_by_id(doctor_id)
            .ok_or_else(|| MediAlertError::NotFound("Doctor not found".to_string()))?;
        Ok(DoctorReviews {
            doctor_id: doctor.id.clone(),
            doctor_name: doctor.name.clone(),
            rating: doctor.rating,
            total_reviews: 150,
            reviews: vec![
                DoctorReview {
                    patient: "Patient A".to_string(),
                    rating: 5,
                    comment: "Excellent service and very professional".to_string(),
                },
                DoctorReview {
                    patient: "Patient B".to_string(),
                    rating: 4,
                    comment: "Good doctor, would recommend".to_string(),
                },
            ],
        })
    }

    pub async fn book_consultation(&self, user_id: u64, request: ConsultationRequest) -> Result<Consultation> {
        if request.booking_date.trim().is_empty() || request.booking_time.trim().is_empty() {
            return Err(MediAlertError::InvalidData("booking_date and booking_time are required".to_string()));
        }
        let doctor = self
            .doctor_by_id(&request.doctor_id)
            .ok_or_else(|| MediAlertError::NotFound("Doctor not found".to_string()))?;

        let mut ledger = self.consultations.write().await;
        let consultation = Consultation {
            consultation_id: format!("cons_{}", ledger.len() + 1),
            user_id,
            doctor_id: doctor.id.clone(),
            doctor_name: doctor.name.clone(),
            date: request.booking_date,
            time: request.booking_time,
            symptoms: request.symptoms,
            notes: request.notes,
            status: "booked".to_string(),
            booked_at: Utc::now().to_rfc3339(),
        };
        ledger.push(consultation.clone());
        info!("Booked {} with {} for user {}", consultation.consultation_id, doctor.id, user_id);
        Ok(consultation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(doctor_id: &str) -> ConsultationRequest {
        ConsultationRequest {
            doctor_id: doctor_id.to_string(),
            booking_date: "2026-10-20".to_string(),
            booking_time: "09:30 AM".to_string(),
            symptoms: vec!["cough".to_string()],
            notes: String::new(),
        }
    }

    #[test]
    fn should_hide_unavailable_doctors() {
        let service = DoctorService::new();
        let ids: Vec<String> = service.available_doctors(None).into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["doc_001", "doc_002", "doc_003"]);
        assert!(service.available_doctors(Some("orthopedic")).is_empty());
        assert_eq!(service.available_doctors(Some("CARDIO"))[0].id, "doc_002");
    }

    #[test]
    fn should_search_name_and_specialty() {
        let service = DoctorService::new();
        assert_eq!(service.search("ngozi")[0].id, "doc_003");
        assert_eq!(service.search("surgeon")[0].id, "doc_004");
        assert!(service.search("dentist").is_empty());
    }

    #[test]
    fn should_report_reviews_for_known_doctor_only() {
        let service = DoctorService::new();
        let reviews = service.reviews("doc_001").unwrap();
        assert_eq!(reviews.total_reviews, 150);
        assert_eq!(reviews.reviews.len(), 2);
        assert!(matches!(service.reviews("doc_999"), Err(MediAlertError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_number_bookings_sequentially() {
        let service = DoctorService::new();
        let first = service.book_consultation(1, request("doc_001")).await.unwrap();
        let second = service.book_consultation(2, request("doc_002")).await.unwrap();

        assert_eq!(first.consultation_id, "cons_1");
        assert_eq!(second.consultation_id, "cons_2");
        assert_eq!(first.status, "booked");
        assert_eq!(first.doctor_name, "Dr. Chioma Okafor");
        assert_eq!(first.user_id, 1);
    }

    #[tokio::test]
    async fn should_refuse_booking_unknown_doctor() {
        let service = DoctorService::new();
        let err = service.book_consultation(1, request("doc_404")).await.unwrap_err();
        assert_eq!(err.to_string(), "Not Found: Doctor not found");

        // Nothing was recorded, so numbering still starts at one.
        let booked = service.book_consultation(1, request("doc_001")).await.unwrap();
        assert_eq!(booked.consultation_id, "cons_1");
    }

    #[tokio::test]
    async fn should_refuse_booking_without_date_or_time() {
        let service = DoctorService::new();
        let mut missing_time = request("doc_001");
        missing_time.booking_time = "  ".to_string();

        let err = service.book_consultation(1, missing_time).await.unwrap_err();
        assert!(matches!(err, MediAlertError::InvalidData(_)));

        let booked = service.book_consultation(1, request("doc_001")).await.unwrap();
        assert_eq!(booked.consultation_id, "cons_1");
    }
}
