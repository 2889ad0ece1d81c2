use std::sync::Arc;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;

use crate::models::{CreatePatientRequest, PatientError, PatientSearchQuery, UpdatePatientRequest};
use crate::services::PatientService;

impl From<PatientError> for AppError {
    fn from(error: PatientError) -> Self {
        match error {
            PatientError::NotFound => AppError::NotFound("Patient not found".to_string()),
            PatientError::EmailAlreadyExists { .. } => AppError::Conflict(error.to_string()),
            PatientError::Storage(e) => AppError::Database(e.to_string()),
        }
    }
}

#[axum::debug_handler]
pub async fn list_patients(
    State(service): State<Arc<PatientService>>,
    Query(query): Query<PatientSearchQuery>,
) -> Result<Json<Value>, AppError> {
    if let Some(term) = query.search.as_deref() {
        if term.trim().chars().count() > 100 {
            return Err(AppError::ValidationError(
                "Search query must be between 1 and 100 characters".to_string(),
            ));
        }
    }

    let patients = service.list_patients(query).await?;

    Ok(Json(json!({
        "success": true,
        "count": patients.len(),
        "data": patients
    })))
}

#[axum::debug_handler]
pub async fn get_patient(
    State(service): State<Arc<PatientService>>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let patient = service.get_patient(patient_id).await?;

    Ok(Json(json!({
        "success": true,
        "data": patient
    })))
}

#[axum::debug_handler]
pub async fn create_patient(
    State(service): State<Arc<PatientService>>,
    Json(request): Json<CreatePatientRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    request
        .validate(service.today())
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let patient = service.create_patient(request).await?;

    Ok((StatusCode::CREATED, Json(json!({
        "success": true,
        "message": "Patient created successfully",
        "data": patient
    }))))
}

#[axum::debug_handler]
pub async fn update_patient(
    State(service): State<Arc<PatientService>>,
    Path(patient_id): Path<Uuid>,
    Json(request): Json<UpdatePatientRequest>,
) -> Result<Json<Value>, AppError> {
    request
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let patient = service.update_patient(patient_id, request).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Patient updated successfully",
        "data": patient
    })))
}

#[axum::debug_handler]
pub async fn delete_patient(
    State(service): State<Arc<PatientService>>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    service.delete_patient(patient_id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Patient deleted successfully"
    })))
}
