use std::sync::Arc;
use axum::{routing::get, Router};

use crate::handlers::*;
use crate::services::DashboardService;

pub fn dashboard_routes(service: Arc<DashboardService>) -> Router {
    Router::new()
        .route("/stats", get(get_dashboard_stats))
        .route("/weekly", get(get_weekly_stats))
        .route("/monthly", get(get_monthly_stats))
        .route("/range", get(get_range_stats))
        .with_state(service)
}
