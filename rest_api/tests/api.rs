// rest_api/tests/api.rs

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use lib::services::FacilityDirectory;
use lib::{HospitalService, HospitalServiceConfig, MediAlertError, Storage};
use models::{GeoPoint, HospitalRecord};
use rest_api::config::HospitalsConfig;
use rest_api::{build_router, AppState};
use security::JwtKeys;

/// Directory that is always unreachable, so live lookups serve the fallback list.
struct OfflineDirectory;

#[async_trait]
impl FacilityDirectory for OfflineDirectory {
    async fn fetch_facilities(&self, _origin: GeoPoint, _radius_km: f64) -> lib::Result<Vec<HospitalRecord>> {
        Err(MediAlertError::NetworkError("offline".to_string()))
    }
}

fn test_app() -> Router {
    let storage = Storage::temporary().unwrap();
    let hospitals = HospitalService::new(
        Arc::new(OfflineDirectory),
        storage.hospitals.clone(),
        HospitalServiceConfig::default(),
    );
    let state = AppState::new(storage, hospitals, JwtKeys::new("test-secret", 30), HospitalsConfig::default());
    build_router(state)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn with_bearer(mut request: Request<Body>, token: &str) -> Request<Body> {
    request
        .headers_mut()
        .insert(header::AUTHORIZATION, format!("Bearer {}", token).parse().unwrap());
    request
}

fn registration(email: &str) -> Value {
    json!({
        "email": email,
        "phone": "+2348030000000",
        "full_name": "Ada Obi",
        "age": 34,
        "gender": "female",
        "password": "s3cret-pass",
    })
}

async fn register_and_login(app: &Router, email: &str) -> String {
    let (status, _) = send(app, post_json("/api/auth/register", registration(email))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(app, post_json("/api/auth/login", json!({ "email": email, "password": "s3cret-pass" }))).await;
    assert_eq!(status, StatusCode::OK);
    body["access_token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn should_report_health() {
    let app = test_app();
    let (status, body) = send(&app, get("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["app"], "MediAlert v1.0.0");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn should_register_login_and_reject_duplicates() {
    let app = test_app();

    let (status, profile) = send(&app, post_json("/api/auth/register", registration("ada@example.com"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["email"], "ada@example.com");
    assert!(profile.get("password_hash").is_none());

    let (status, body) = send(&app, post_json("/api/auth/register", registration("ada@example.com"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "status": "error", "message": "Email already registered" }));

    let (status, body) =
        send(&app, post_json("/api/auth/login", json!({ "email": "ada@example.com", "password": "s3cret-pass" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "bearer");
    assert!(body["access_token"].as_str().is_some_and(|t| !t.is_empty()));

    let (status, body) =
        send(&app, post_json("/api/auth/login", json!({ "email": "ada@example.com", "password": "wrong" }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid credentials");

    let (status, _) =
        send(&app, post_json("/api/auth/login", json!({ "email": "nobody@example.com", "password": "x" }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_assess_anonymously_and_fetch_the_assessment() {
    let app = test_app();

    let (status, body) = send(
        &app,
        post_json(
            "/api/emergency/assess",
            json!({
                "symptoms": ["Chest pain radiating to arm"],
                "age": 58,
                "pain_rating": 7,
                "latitude": 4.8156,
                "longitude": 6.9271,
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["severity_level"], "RED");
    assert_eq!(body["assessment_result"]["severity"], "RED");
    assert_eq!(body["assessment_result"]["action"], "CALL AMBULANCE NOW");
    assert_eq!(body["assessment_result"]["phone"], "112");

    let id = body["id"].as_u64().unwrap();
    let (status, fetched) = send(&app, get(&format!("/api/emergency/assessment/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"], id);
    assert_eq!(fetched["assessment_result"], body["assessment_result"]);
}

#[tokio::test]
async fn should_classify_mild_symptoms_green_without_location() {
    let app = test_app();
    let (status, body) = send(
        &app,
        post_json("/api/emergency/assess", json!({ "symptoms": ["mild headache"], "age": 70, "pain_rating": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["severity_level"], "GREEN");
    assert_eq!(body["assessment_result"]["action"], "Monitor at home");
}

#[tokio::test]
async fn should_reject_out_of_range_assessment_input() {
    let app = test_app();
    let (status, body) = send(
        &app,
        post_json("/api/emergency/assess", json!({ "symptoms": ["cough"], "age": 30, "pain_rating": 11 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");

    let (status, _) = send(
        &app,
        post_json(
            "/api/emergency/assess",
            json!({ "symptoms": ["cough"], "age": 30, "pain_rating": 2, "latitude": 95.0, "longitude": 6.9 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn should_reject_assessment_with_only_one_coordinate() {
    let app = test_app();
    let (status, body) = send(
        &app,
        post_json(
            "/api/emergency/assess",
            json!({ "symptoms": ["cough"], "age": 30, "pain_rating": 2, "latitude": 4.8156 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "status": "error", "message": "latitude and longitude must be given together" }));
}

#[tokio::test]
async fn should_reject_assessment_with_bad_token() {
    let app = test_app();
    let request = with_bearer(
        post_json("/api/emergency/assess", json!({ "symptoms": ["cough"], "age": 30, "pain_rating": 2 })),
        "not-a-token",
    );
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_return_404_for_unknown_assessment() {
    let app = test_app();
    let (status, body) = send(&app, get("/api/emergency/assessment/999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "status": "error", "message": "Assessment not found" }));
}

#[tokio::test]
async fn should_require_token_for_contacts() {
    let app = test_app();
    let contact = json!({ "contact_name": "Emeka", "contact_phone": "+2348031111111", "relationship": "brother" });

    let (status, body) = send(&app, post_json("/api/contacts/add", contact.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Not authenticated");

    let token = register_and_login(&app, "contacts@example.com").await;
    let (status, created) = send(&app, with_bearer(post_json("/api/contacts/add", contact), &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["is_active"], true);
    assert_eq!(created["contact_name"], "Emeka");

    let (status, listed) = send(&app, get(&format!("/api/contacts?token={}", token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["id"], created["id"]);
}

#[tokio::test]
async fn should_rank_synced_hospitals_by_distance() {
    let app = test_app();
    let (status, body) = send(&app, post_json("/api/hospitals/sync", json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);

    let (status, body) = send(&app, get("/api/hospitals/nearby?latitude=4.8156&longitude=6.9271&radius_km=20")).await;
    assert_eq!(status, StatusCode::OK);
    let hospitals = body.as_array().unwrap();
    assert_eq!(hospitals.len(), 2);
    assert_eq!(hospitals[0]["name"], "Rivers State University Teaching Hospital");
    assert_eq!(hospitals[0]["distance_km"], 0.0);
    assert!(hospitals[1]["distance_km"].as_f64().unwrap() > 10.0);

    let (_, body) = send(&app, get("/api/hospitals/nearby?latitude=4.8156&longitude=6.9271")).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn should_reject_negative_search_radius() {
    let app = test_app();
    let (status, body) = send(&app, get("/api/hospitals/nearby?latitude=4.8156&longitude=6.9271&radius_km=-1")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");

    let (status, _) = send(&app, get("/api/hospitals/real/nearby?radius_km=-1")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn should_serve_fallback_hospitals_when_directory_is_down() {
    let app = test_app();
    let (status, body) = send(&app, get("/api/hospitals/real/nearby")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["count"], 5);
    assert_eq!(body["user_location"]["lat"], 4.8156);

    let (status, body) = send(&app, get("/api/hospitals/real/search?query=teaching")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["query"], "teaching");
    assert_eq!(body["count"], 2);
}

#[tokio::test]
async fn should_acknowledge_hospital_alert() {
    let app = test_app();
    let (status, body) = send(
        &app,
        post_json(
            "/api/emergency/alert-hospital",
            json!({
                "hospital_id": "hs_1",
                "patient_info": { "age": 40 },
                "location": { "lat": 4.8, "lon": 6.9 },
                "symptoms": ["chest pain"],
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["hospital_id"], "hs_1");
}

#[tokio::test]
async fn should_list_emergency_numbers_with_default_country() {
    let app = test_app();
    let (_, body) = send(&app, get("/api/emergency-numbers/us")).await;
    assert_eq!(body["primary"], "911");

    let (_, body) = send(&app, get("/api/emergency-numbers/ZZ")).await;
    assert_eq!(body["country"], "ZZ");
    assert_eq!(body["primary"], "112");
    assert_eq!(body["emergency_numbers"]["police"], "101");
}

#[tokio::test]
async fn should_browse_doctors() {
    let app = test_app();

    let (_, body) = send(&app, get("/api/doctors/available")).await;
    assert_eq!(body["count"], 3);

    let (_, body) = send(&app, get("/api/doctors/available?specialty=cardio")).await;
    assert_eq!(body["doctors"][0]["id"], "doc_002");

    let (_, body) = send(&app, get("/api/doctors/specialties")).await;
    assert_eq!(body["count"], 8);

    let (_, body) = send(&app, get("/api/doctors/search?query=ngozi")).await;
    assert_eq!(body["count"], 1);

    let (status, body) = send(&app, get("/api/doctors/doc_001")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Dr. Chioma Okafor");

    let (status, _) = send(&app, get("/api/doctors/doc_999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, get("/api/doctors/slots/doc_001?date=2025-01-10")).await;
    assert_eq!(body["available_slots"].as_array().unwrap().len(), 9);

    let (_, body) = send(&app, get("/api/doctors/doc_002/reviews")).await;
    assert_eq!(body["total_reviews"], 150);
}

#[tokio::test]
async fn should_book_consultation_for_authenticated_user() {
    let app = test_app();
    let booking = json!({
        "doctor_id": "doc_003",
        "booking_date": "2025-01-10",
        "booking_time": "10:00 AM",
        "symptoms": ["fever"],
    });

    let (status, _) = send(&app, post_json("/api/doctors/book", booking.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = register_and_login(&app, "booker@example.com").await;
    let (status, body) = send(&app, with_bearer(post_json("/api/doctors/book", booking), &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["consultation"]["consultation_id"], "cons_1");
    assert_eq!(body["consultation"]["status"], "booked");

    let unknown = json!({ "doctor_id": "doc_999", "booking_date": "2025-01-10", "booking_time": "10:00 AM" });
    let (status, body) = send(&app, with_bearer(post_json("/api/doctors/book", unknown), &token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "status": "error", "message": "Doctor not found" }));
}
