// rest_api/src/handlers.rs

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::Utc;
use log::{info, warn};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::task;

use lib::{assess, MediAlertError};
use lib::services::{emergency_numbers as numbers_for, primary_number};
use models::{AssessmentContext, ConsultationRequest, GeoPoint, Login, NewEmergencyContact, NewUser, SymptomReport};
use security::{hash_password, verify_password, AuthError};

use crate::{AppState, RestApiError};

#[derive(Debug, Default, Deserialize)]
pub struct TokenQuery {
    pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AssessRequest {
    pub symptoms: Vec<String>,
    pub age: i32,
    pub pain_rating: i32,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub medical_history: Option<String>,
    pub current_medications: Option<String>,
    pub allergies: Option<String>,
    pub location_address: Option<String>,
    pub emergency_contacts_to_notify: Option<Vec<u64>>,
}

impl AssessRequest {
    fn into_parts(self) -> Result<(SymptomReport, AssessmentContext), RestApiError> {
        let mut report = SymptomReport::new(self.symptoms, self.age, self.pain_rating);
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => report = report.with_location(GeoPoint::new(latitude, longitude)),
            (None, None) => {}
            _ => {
                return Err(RestApiError::InvalidInput(
                    "latitude and longitude must be given together".to_string(),
                ))
            }
        }
        report.validate()?;

        let context = AssessmentContext {
            medical_history: self.medical_history,
            current_medications: self.current_medications,
            allergies: self.allergies,
            location_address: self.location_address,
            emergency_contacts_to_notify: self.emergency_contacts_to_notify,
        };
        Ok((report, context))
    }
}

#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct LiveNearbyQuery {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius_km: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct HospitalSearchQuery {
    pub query: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct HospitalAlertRequest {
    pub hospital_id: String,
    #[serde(default)]
    pub patient_info: Value,
    #[serde(default)]
    pub location: Value,
    #[serde(default)]
    pub symptoms: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SpecialtyQuery {
    pub specialty: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DoctorSearchQuery {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    pub date: String,
}

fn origin_or_default(state: &AppState, latitude: Option<f64>, longitude: Option<f64>) -> Result<GeoPoint, RestApiError> {
    let fallback = state.default_location();
    let origin = GeoPoint::checked(latitude.unwrap_or(fallback.latitude), longitude.unwrap_or(fallback.longitude))?;
    Ok(origin)
}

fn checked_radius(radius_km: f64) -> Result<f64, RestApiError> {
    if radius_km.is_finite() && radius_km >= 0.0 {
        Ok(radius_km)
    } else {
        Err(RestApiError::InvalidInput(format!("Invalid radius: {}", radius_km)))
    }
}

pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Welcome to MediAlert - Emergency Medical Help API",
        "health": "/api/health",
    }))
}

pub async fn health_check() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "timestamp": Utc::now(),
            "app": "MediAlert v1.0.0",
        })),
    )
}

// --- Accounts ---

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<NewUser>,
) -> Result<Json<Value>, RestApiError> {
    payload.validate()?;
    let password = payload.password.clone();
    let password_hash = task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(MediAlertError::from)??;
    let user = state.storage.users.add_user(&payload, password_hash).await?;
    info!("Registered user {}", user.id);
    Ok(Json(json!(user.profile())))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<Login>,
) -> Result<Json<Value>, RestApiError> {
    let Some(user) = state.storage.users.get_user_by_email(&payload.email).await? else {
        warn!("Login rejected for unknown email");
        return Err(AuthError::InvalidCredentials.into());
    };
    let password = payload.password;
    let password_hash = user.password_hash.clone();
    let verified = task::spawn_blocking(move || verify_password(&password, &password_hash))
        .await
        .map_err(MediAlertError::from)??;
    if !verified {
        warn!("Login rejected for user {}", user.id);
        return Err(AuthError::InvalidCredentials.into());
    }

    let access_token = state.jwt.issue(user.id)?;
    info!("User {} logged in", user.id);
    Ok(Json(json!({
        "access_token": access_token,
        "token_type": "bearer",
    })))
}

// --- Emergency assessment ---

pub async fn assess_emergency(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(auth): Query<TokenQuery>,
    Json(payload): Json<AssessRequest>,
) -> Result<Json<Value>, RestApiError> {
    let user = state.optional_user(&headers, auth.token.as_deref()).await?;
    let (report, context) = payload.into_parts()?;

    let stored = state
        .storage
        .assessments
        .insert_assessment(assess(report, context, user.map(|u| u.id)))
        .await?;
    if stored.severity_level().is_emergency() {
        warn!("Assessment {} classified {}: {}", stored.id, stored.severity_level(), stored.verdict.action);
    } else {
        info!("Assessment {} classified {}", stored.id, stored.severity_level());
    }

    Ok(Json(json!({
        "id": stored.id,
        "severity_level": stored.severity_level(),
        "assessment_result": stored.verdict,
        "created_at": stored.created_at,
    })))
}

pub async fn get_assessment(
    State(state): State<AppState>,
    Path(assessment_id): Path<u64>,
) -> Result<Json<Value>, RestApiError> {
    let stored = state
        .storage
        .assessments
        .get_assessment(assessment_id)
        .await?
        .ok_or_else(|| RestApiError::NotFound("Assessment not found".to_string()))?;

    Ok(Json(json!({
        "id": stored.id,
        "severity_level": stored.severity_level(),
        "assessment_result": stored.verdict,
        "created_at": stored.created_at,
    })))
}

pub async fn alert_hospital(Json(payload): Json<HospitalAlertRequest>) -> Result<Json<Value>, RestApiError> {
    if payload.hospital_id.trim().is_empty() {
        return Err(RestApiError::InvalidInput("hospital_id is required".to_string()));
    }
    info!(
        "Emergency alert for hospital {} ({} symptoms reported)",
        payload.hospital_id,
        payload.symptoms.len()
    );
    Ok(Json(json!({
        "status": "success",
        "message": "Emergency alert sent to hospital",
        "hospital_id": payload.hospital_id,
        "alert_timestamp": Utc::now(),
    })))
}

pub async fn emergency_numbers(Path(country): Path<String>) -> Json<Value> {
    let numbers = numbers_for(&country);
    let primary = primary_number(&numbers);
    Json(json!({
        "country": country,
        "emergency_numbers": numbers,
        "primary": primary,
    }))
}

// --- Hospitals ---

pub async fn nearby_hospitals(
    State(state): State<AppState>,
    Query(query): Query<NearbyQuery>,
) -> Result<Json<Value>, RestApiError> {
    let origin = GeoPoint::checked(query.latitude, query.longitude)?;
    let radius_km = checked_radius(query.radius_km.unwrap_or(state.hospital_settings.default_radius_km))?;
    let hospitals = state.hospitals.nearby(origin, radius_km).await?;
    Ok(Json(json!(hospitals)))
}

pub async fn sync_hospitals(State(state): State<AppState>) -> Result<Json<Value>, RestApiError> {
    let count = state.hospitals.sync_catalog().await?;
    Ok(Json(json!({
        "message": "Hospitals synced successfully",
        "count": count,
    })))
}

pub async fn real_nearby_hospitals(
    State(state): State<AppState>,
    Query(query): Query<LiveNearbyQuery>,
) -> Result<Json<Value>, RestApiError> {
    let origin = origin_or_default(&state, query.latitude, query.longitude)?;
    let radius_km = checked_radius(query.radius_km.unwrap_or(state.hospital_settings.real_radius_km))?;
    let hospitals = state.hospitals.real_nearby(origin, radius_km).await;
    Ok(Json(json!({
        "status": "success",
        "count": hospitals.len(),
        "hospitals": hospitals,
        "user_location": { "lat": origin.latitude, "lon": origin.longitude },
    })))
}

pub async fn search_hospitals(
    State(state): State<AppState>,
    Query(query): Query<HospitalSearchQuery>,
) -> Result<Json<Value>, RestApiError> {
    let origin = origin_or_default(&state, query.latitude, query.longitude)?;
    let results = state.hospitals.search(&query.query, origin).await;
    Ok(Json(json!({
        "query": query.query,
        "results": results,
        "count": results.len(),
    })))
}

// --- Emergency contacts ---

pub async fn add_emergency_contact(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(auth): Query<TokenQuery>,
    Json(payload): Json<NewEmergencyContact>,
) -> Result<Json<Value>, RestApiError> {
    let user = state.current_user(&headers, auth.token.as_deref()).await?;
    payload.validate()?;
    let contact = state.storage.contacts.add_contact(user.id, payload).await?;
    info!("User {} added emergency contact {}", user.id, contact.id);
    Ok(Json(json!(contact)))
}

pub async fn list_emergency_contacts(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(auth): Query<TokenQuery>,
) -> Result<Json<Value>, RestApiError> {
    let user = state.current_user(&headers, auth.token.as_deref()).await?;
    let contacts = state.storage.contacts.list_contacts(user.id).await?;
    Ok(Json(json!(contacts)))
}

// --- Doctors ---

pub async fn available_doctors(
    State(state): State<AppState>,
    Query(query): Query<SpecialtyQuery>,
) -> Json<Value> {
    let doctors = state.doctors.available_doctors(query.specialty.as_deref());
    Json(json!({
        "status": "success",
        "count": doctors.len(),
        "doctors": doctors,
    }))
}

pub async fn specialties(State(state): State<AppState>) -> Json<Value> {
    let specialties = state.doctors.specialties();
    Json(json!({
        "specialties": specialties,
        "count": specialties.len(),
    }))
}

pub async fn search_doctors(
    State(state): State<AppState>,
    Query(query): Query<DoctorSearchQuery>,
) -> Json<Value> {
    let results = state.doctors.search(&query.query);
    Json(json!({
        "query": query.query,
        "results": results,
        "count": results.len(),
    }))
}

pub async fn doctor_details(
    State(state): State<AppState>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Value>, RestApiError> {
    let doctor = state
        .doctors
        .doctor_by_id(&doctor_id)
        .ok_or_else(|| RestApiError::NotFound("Doctor not found".to_string()))?;
    Ok(Json(json!(doctor)))
}

pub async fn doctor_slots(
    State(state): State<AppState>,
    Path(doctor_id): Path<String>,
    Query(query): Query<SlotsQuery>,
) -> Json<Value> {
    let slots = state.doctors.available_slots(&doctor_id, &query.date);
    Json(json!({
        "doctor_id": doctor_id,
        "date": query.date,
        "available_slots": slots,
    }))
}

pub async fn doctor_reviews(
    State(state): State<AppState>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Value>, RestApiError> {
    let reviews = state.doctors.reviews(&doctor_id)?;
    Ok(Json(json!(reviews)))
}

pub async fn book_consultation(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(auth): Query<TokenQuery>,
    Json(payload): Json<ConsultationRequest>,
) -> Result<Json<Value>, RestApiError> {
    let user = state.current_user(&headers, auth.token.as_deref()).await?;
    let consultation = state.doctors.book_consultation(user.id, payload).await?;
    Ok(Json(json!({
        "status": "success",
        "message": format!("Consultation booked with {}", consultation.doctor_name),
        "consultation": consultation,
    })))
}
