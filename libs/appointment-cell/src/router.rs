use std::sync::Arc;

use axum::{
    Router,
    routing::{get, patch},
};

use crate::handlers;
use crate::services::AppointmentLifecycleService;

pub fn appointment_routes(service: Arc<AppointmentLifecycleService>) -> Router {
    Router::new()
        .route("/", get(handlers::list_appointments).post(handlers::create_appointment))
        .route("/conflicts/check", get(handlers::check_conflicts))
        .route(
            "/{appointment_id}",
            get(handlers::get_appointment)
                .put(handlers::update_appointment)
                .delete(handlers::cancel_appointment),
        )
        .route("/{appointment_id}/status", patch(handlers::update_appointment_status))
        .with_state(service)
}
