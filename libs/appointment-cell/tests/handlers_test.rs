use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use tower::ServiceExt;

use appointment_cell::appointment_routes;
use appointment_cell::services::{AppointmentLifecycleService, InMemoryAppointmentRepository};
use patient_cell::services::seed::{sample_patients, JOHN_DOE_ID};
use patient_cell::services::{InMemoryPatientRepository, PatientService};
use shared_utils::test_utils::fixed_clock;

async fn create_test_app() -> Router {
    let clock = fixed_clock("2024-01-10");
    let patient_repository = Arc::new(InMemoryPatientRepository::new(clock.clone()));
    for patient in sample_patients(Utc::now()) {
        patient_repository.insert(patient).await;
    }
    let patients = Arc::new(PatientService::new(patient_repository, clock.clone()));
    let repository = Arc::new(InMemoryAppointmentRepository::new(clock.clone()));

    appointment_routes(Arc::new(AppointmentLifecycleService::new(repository, patients, clock)))
}

fn appointment_body(time: &str) -> Value {
    json!({
        "patient_id": JOHN_DOE_ID,
        "doctor_name": "Dr. Emily Smith",
        "specialty": "Cardiology",
        "appointment_date": "2024-01-15",
        "appointment_time": time,
        "duration": 30,
        "type": "consultation",
        "symptoms": ["chest pain"]
    })
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap_or(Value::Null) };
    (status, json)
}

#[tokio::test]
async fn test_create_and_fetch_appointment() {
    let app = create_test_app().await;

    let (status, created) = send(&app, "POST", "/", Some(appointment_body("09:00"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["success"], true);
    assert_eq!(created["data"]["patient_name"], "John Doe");
    assert_eq!(created["data"]["status"], "pending");
    assert_eq!(created["data"]["appointment_time"], "09:00");

    let id = created["data"]["id"].as_str().unwrap();
    let (status, fetched) = send(&app, "GET", &format!("/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"]["id"], id);
}

#[tokio::test]
async fn test_double_booking_returns_bad_request() {
    let app = create_test_app().await;
    send(&app, "POST", "/", Some(appointment_body("09:00"))).await;

    let (status, body) = send(&app, "POST", "/", Some(appointment_body("09:15"))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Doctor is not available at the requested time");
}

#[tokio::test]
async fn test_field_validation_runs_before_scheduling() {
    let app = create_test_app().await;
    let mut body = appointment_body("19:00");
    body["doctor_name"] = json!("Emily Smith");

    let (status, response) = send(&app, "POST", "/", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error = response["error"].as_str().unwrap();
    assert!(error.contains("Dr."));
    assert!(error.contains("08:00 and 18:00"));
}

#[tokio::test]
async fn test_list_with_filters() {
    let app = create_test_app().await;
    send(&app, "POST", "/", Some(appointment_body("11:00"))).await;
    send(&app, "POST", "/", Some(appointment_body("09:00"))).await;

    let (status, body) = send(&app, "GET", "/?date=2024-01-15&status=pending", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(body["data"][0]["appointment_time"], "09:00");
    assert_eq!(body["filters"]["status"], "pending");

    let (status, body) = send(&app, "GET", "/?status=confirmed", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);

    let (status, _) = send(&app, "GET", "/?status=archived", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_status_patch_and_cancel() {
    let app = create_test_app().await;
    let (_, created) = send(&app, "POST", "/", Some(appointment_body("09:00"))).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, "PATCH", &format!("/{}/status", id), Some(json!({ "status": "confirmed" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "confirmed");

    let (status, _) = send(&app, "PATCH", &format!("/{}/status", id), Some(json!({ "status": "done" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "DELETE", &format!("/{}?reason=Feeling%20better", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "cancelled");
    assert_eq!(body["data"]["notes"], "Feeling better");

    // Still retrievable after cancellation.
    let (status, _) = send(&app, "GET", &format!("/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_update_appointment() {
    let app = create_test_app().await;
    let (_, created) = send(&app, "POST", "/", Some(appointment_body("09:00"))).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, "PUT", &format!("/{}", id), Some(json!({
        "appointment_time": "10:30",
        "duration": 45,
        "notes": "Bring lab results"
    }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["appointment_time"], "10:30");
    assert_eq!(body["data"]["duration"], 45);
    assert_eq!(body["data"]["id"], id.as_str());
}

#[tokio::test]
async fn test_conflict_check_endpoint() {
    let app = create_test_app().await;
    send(&app, "POST", "/", Some(appointment_body("09:00"))).await;

    let uri = "/conflicts/check?doctor_name=Dr.%20Emily%20Smith&date=2024-01-15&time=09:15&duration=30";
    let (status, body) = send(&app, "GET", uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["available"], false);
    assert_eq!(body["data"]["conflicting_appointments"].as_array().unwrap().len(), 1);

    let uri = "/conflicts/check?doctor_name=Dr.%20Emily%20Smith&date=2024-01-15&time=09:30&duration=30";
    let (_, body) = send(&app, "GET", uri, None).await;
    assert_eq!(body["data"]["available"], true);
}

#[tokio::test]
async fn test_unknown_appointment_is_not_found() {
    let app = create_test_app().await;

    let (status, body) = send(&app, "GET", &format!("/{}", uuid::Uuid::new_v4()), None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Appointment not found");
}
