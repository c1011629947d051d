use axum::{
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use anyhow::Context;
use anyhow::Error as AnyhowError;
use log::{error, info};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::cors::{Any, CorsLayer};

use lib::{DoctorService, HospitalService, MediAlertError, Storage};
use models::{GeoPoint, User, ValidationError};
use security::{AuthError, JwtKeys};

pub mod config;
mod handlers;

use crate::config::{AppConfig, HospitalsConfig};

// Define the REST API error enum
#[derive(Debug, Error)]
pub enum RestApiError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Service error: {0}")]
    Service(#[from] MediAlertError),
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] AnyhowError),
}

impl From<ValidationError> for RestApiError {
    fn from(err: ValidationError) -> Self {
        RestApiError::InvalidInput(err.to_string())
    }
}

// Implement IntoResponse for RestApiError to convert it into an HTTP response
impl IntoResponse for RestApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            RestApiError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            RestApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            RestApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            RestApiError::Service(e) => match e {
                MediAlertError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
                MediAlertError::AlreadyExists(msg) | MediAlertError::InvalidData(msg) => (StatusCode::BAD_REQUEST, msg),
                MediAlertError::Validation(e) => (StatusCode::BAD_REQUEST, e.to_string()),
                other => {
                    error!("Request failed: {}", other);
                    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
                }
            },
            RestApiError::Auth(e) => match e {
                AuthError::PasswordHashError(_) | AuthError::JwtError(_) => {
                    error!("Auth failure: {}", e);
                    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
                }
                AuthError::InvalidToken(_) => (StatusCode::UNAUTHORIZED, "Invalid token".to_string()),
                other => (StatusCode::UNAUTHORIZED, other.to_string()),
            },
            RestApiError::Anyhow(e) => {
                error!("Request failed: {:#}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = Json(json!({
            "status": "error",
            "message": error_message,
        }));

        (status, body).into_response()
    }
}

// Shared state for the Axum application
#[derive(Clone)]
pub struct AppState {
    pub storage: Storage,
    pub hospitals: Arc<HospitalService>,
    pub doctors: Arc<DoctorService>,
    pub jwt: Arc<JwtKeys>,
    pub hospital_settings: Arc<HospitalsConfig>,
}

impl AppState {
    /// Opens storage and builds the live hospital client described by `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self, AnyhowError> {
        let storage = Storage::open(&config.storage.data_directory)
            .with_context(|| format!("Failed to open storage at {}", config.storage.data_directory))?;
        let hospitals = HospitalService::with_healthsites(storage.hospitals.clone(), config.hospitals.service_config())
            .context("Failed to build hospital lookup client")?;
        Ok(Self::new(
            storage,
            hospitals,
            JwtKeys::new(&config.security.secret_key, config.security.token_ttl_minutes),
            config.hospitals.clone(),
        ))
    }

    pub fn new(storage: Storage, hospitals: HospitalService, jwt: JwtKeys, hospital_settings: HospitalsConfig) -> Self {
        Self {
            storage,
            hospitals: Arc::new(hospitals),
            doctors: Arc::new(DoctorService::new()),
            jwt: Arc::new(jwt),
            hospital_settings: Arc::new(hospital_settings),
        }
    }

    pub fn default_location(&self) -> GeoPoint {
        self.hospital_settings.default_location()
    }

    /// Resolves the caller from a bearer header or `?token=`. A missing token is `Ok(None)`;
    /// a present but bad token is an error.
    pub async fn optional_user(&self, headers: &HeaderMap, query_token: Option<&str>) -> Result<Option<User>, RestApiError> {
        let header = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
        let Some(token) = security::resolve_token(header, query_token) else {
            return Ok(None);
        };
        let user_id = self.jwt.validate(token)?.user_id()?;
        match self.storage.users.get_user_by_id(user_id).await? {
            Some(user) => Ok(Some(user)),
            None => Err(RestApiError::Unauthorized("User not found".to_string())),
        }
    }

    /// Like [`AppState::optional_user`] but a token is mandatory.
    pub async fn current_user(&self, headers: &HeaderMap, query_token: Option<&str>) -> Result<User, RestApiError> {
        self.optional_user(headers, query_token)
            .await?
            .ok_or(RestApiError::Auth(AuthError::MissingToken))
    }
}

/// All routes, with permissive CORS.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .allow_origin(Any);

    Router::new()
        .route("/", get(handlers::root))
        .route("/api/health", get(handlers::health_check))
        .route("/api/auth/register", post(handlers::register))
        .route("/api/auth/login", post(handlers::login))
        .route("/api/emergency/assess", post(handlers::assess_emergency))
        .route("/api/emergency/assessment/:assessment_id", get(handlers::get_assessment))
        .route("/api/emergency/alert-hospital", post(handlers::alert_hospital))
        .route("/api/emergency-numbers/:country", get(handlers::emergency_numbers))
        .route("/api/hospitals/nearby", get(handlers::nearby_hospitals))
        .route("/api/hospitals/sync", post(handlers::sync_hospitals))
        .route("/api/hospitals/real/nearby", get(handlers::real_nearby_hospitals))
        .route("/api/hospitals/real/search", get(handlers::search_hospitals))
        .route("/api/contacts/add", post(handlers::add_emergency_contact))
        .route("/api/contacts", get(handlers::list_emergency_contacts))
        .route("/api/doctors/available", get(handlers::available_doctors))
        .route("/api/doctors/specialties", get(handlers::specialties))
        .route("/api/doctors/search", get(handlers::search_doctors))
        .route("/api/doctors/book", post(handlers::book_consultation))
        .route("/api/doctors/slots/:doctor_id", get(handlers::doctor_slots))
        .route("/api/doctors/:doctor_id", get(handlers::doctor_details))
        .route("/api/doctors/:doctor_id/reviews", get(handlers::doctor_reviews))
        .with_state(state)
        .layer(cors)
}

// Main function to start the REST API server
pub async fn start_server(config: AppConfig, shutdown_rx: oneshot::Receiver<()>) -> Result<(), AnyhowError> {
    let app_state = AppState::from_config(&config)?;
    let storage = app_state.storage.clone();
    let app = build_router(app_state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", config.server.host, config.server.port))?;

    let combined_shutdown_signal = async {
        tokio::select! {
            _ = shutdown_rx => {
                info!("Received external shutdown signal.");
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl-C, shutting down.");
            }
        }
    };

    let listener = TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind to address: {}", addr))?;
    info!("MediAlert API listening on {}", addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(combined_shutdown_signal)
        .await
        .context("REST API server failed to start or run")?;

    storage.flush().await.context("Failed to flush storage on shutdown")?;
    info!("MediAlert API stopped.");
    Ok(())
}
