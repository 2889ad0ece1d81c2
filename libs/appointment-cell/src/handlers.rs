use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;

use crate::models::{
    AppointmentChanges, AppointmentError, AppointmentFilter, AppointmentListQuery, AppointmentStatus,
    CancelAppointmentQuery, ConflictCheckQuery, CreateAppointmentRequest, StatusUpdateRequest,
};
use crate::services::AppointmentLifecycleService;

impl From<AppointmentError> for AppError {
    fn from(error: AppointmentError) -> Self {
        match error {
            AppointmentError::NotFound => AppError::NotFound(error.to_string()),
            AppointmentError::InvalidPatient
            | AppointmentError::InvalidDate
            | AppointmentError::DoctorUnavailable
            | AppointmentError::InvalidStatus(_) => AppError::BadRequest(error.to_string()),
            AppointmentError::ValidationError(msg) => AppError::ValidationError(msg),
            AppointmentError::Storage(e) => AppError::Database(e.to_string()),
        }
    }
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(service): State<Arc<AppointmentLifecycleService>>,
    Query(query): Query<AppointmentListQuery>,
) -> Result<Json<Value>, AppError> {
    let status = query.status
        .as_deref()
        .map(str::parse::<AppointmentStatus>)
        .transpose()?;

    let filter = AppointmentFilter {
        date: query.date,
        status,
        patient_id: query.patient_id,
    };
    let appointments = service.list_appointments(filter.clone()).await?;

    Ok(Json(json!({
        "success": true,
        "count": appointments.len(),
        "filters": filter,
        "data": appointments
    })))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(service): State<Arc<AppointmentLifecycleService>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let appointment = service.get_appointment(appointment_id).await?;

    Ok(Json(json!({
        "success": true,
        "data": appointment
    })))
}

#[axum::debug_handler]
pub async fn create_appointment(
    State(service): State<Arc<AppointmentLifecycleService>>,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    request
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let appointment = service.create_appointment(request).await?;

    Ok((StatusCode::CREATED, Json(json!({
        "success": true,
        "message": "Appointment created successfully",
        "data": appointment
    }))))
}

#[axum::debug_handler]
pub async fn update_appointment(
    State(service): State<Arc<AppointmentLifecycleService>>,
    Path(appointment_id): Path<Uuid>,
    Json(changes): Json<AppointmentChanges>,
) -> Result<Json<Value>, AppError> {
    changes
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let appointment = service.update_appointment(appointment_id, changes).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Appointment updated successfully",
        "data": appointment
    })))
}

#[axum::debug_handler]
pub async fn update_appointment_status(
    State(service): State<Arc<AppointmentLifecycleService>>,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<StatusUpdateRequest>,
) -> Result<Json<Value>, AppError> {
    request
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let appointment = service.update_status(appointment_id, request).await?;

    Ok(Json(json!({
        "success": true,
        "message": format!("Appointment status updated to {}", appointment.status),
        "data": appointment
    })))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(service): State<Arc<AppointmentLifecycleService>>,
    Path(appointment_id): Path<Uuid>,
    Query(query): Query<CancelAppointmentQuery>,
) -> Result<Json<Value>, AppError> {
    let appointment = service.cancel(appointment_id, query.reason).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Appointment cancelled successfully",
        "data": appointment
    })))
}

#[axum::debug_handler]
pub async fn check_conflicts(
    State(service): State<Arc<AppointmentLifecycleService>>,
    Query(query): Query<ConflictCheckQuery>,
) -> Result<Json<Value>, AppError> {
    let result = service.check_conflicts(query).await?;

    Ok(Json(json!({
        "success": true,
        "data": result
    })))
}
