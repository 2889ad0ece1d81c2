use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::{json, Value};

use shared_models::error::AppError;

use crate::models::{DashboardError, MonthlyQuery, RangeQuery, StatsQuery, WeeklyQuery};
use crate::services::DashboardService;

impl From<DashboardError> for AppError {
    fn from(error: DashboardError) -> Self {
        match error {
            DashboardError::InvalidPeriod(msg) => AppError::BadRequest(msg),
            DashboardError::Storage(e) => AppError::Database(e.to_string()),
        }
    }
}

#[axum::debug_handler]
pub async fn get_dashboard_stats(
    State(service): State<Arc<DashboardService>>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<Value>, AppError> {
    let overview = service.overview(query.date).await?;

    Ok(Json(json!({
        "success": true,
        "data": overview
    })))
}

#[axum::debug_handler]
pub async fn get_weekly_stats(
    State(service): State<Arc<DashboardService>>,
    Query(query): Query<WeeklyQuery>,
) -> Result<Json<Value>, AppError> {
    let weekly = service.weekly(query.start_date).await?;

    Ok(Json(json!({
        "success": true,
        "data": weekly
    })))
}

#[axum::debug_handler]
pub async fn get_monthly_stats(
    State(service): State<Arc<DashboardService>>,
    Query(query): Query<MonthlyQuery>,
) -> Result<Json<Value>, AppError> {
    query
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let monthly = service.monthly(query.year, query.month).await?;

    Ok(Json(json!({
        "success": true,
        "data": monthly
    })))
}

#[axum::debug_handler]
pub async fn get_range_stats(
    State(service): State<Arc<DashboardService>>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Value>, AppError> {
    query
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let range = service.range(query.start_date, query.end_date).await?;

    Ok(Json(json!({
        "success": true,
        "count": range.days,
        "data": range
    })))
}
