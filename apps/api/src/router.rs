use axum::{
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

use appointment_cell::appointment_routes;
use dashboard_cell::dashboard_routes;
use patient_cell::patient_routes;
use shared_config::StorageBackend;

use crate::state::Services;

pub fn create_router(services: &Services) -> Router {
    let backend = services.backend;

    Router::new()
        .route("/", get(|| async { "Santria Clinic API is running!" }))
        .route("/health", get(move || health(backend)))
        .nest("/api/patients", patient_routes(services.patients.clone()))
        .nest("/api/appointments", appointment_routes(services.appointments.clone()))
        .nest("/api/dashboard", dashboard_routes(services.dashboard.clone()))
        .fallback(not_found)
}

async fn health(backend: StorageBackend) -> Json<Value> {
    Json(json!({
        "status": "OK",
        "timestamp": chrono::Utc::now(),
        "service": "Santria Clinic API",
        "storage": backend
    }))
}

async fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({
        "success": false,
        "error": "Route not found"
    })))
}
