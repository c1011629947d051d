// models/src/medical/mod.rs

pub mod assessment;
pub mod doctor;
pub mod emergency_contact;
pub mod hospital;
pub mod triage;
pub mod user;

pub use assessment::{Assessment, AssessmentContext, NewAssessment};
pub use doctor::{Consultation, ConsultationRequest, Doctor, DoctorReview, DoctorReviews};
pub use emergency_contact::{EmergencyContact, NewEmergencyContact};
pub use hospital::{HospitalRecord, RankedHospital};
pub use triage::{SeverityTier, SeverityVerdict, SymptomReport};
pub use user::{Login, NewUser, User, UserProfile};
