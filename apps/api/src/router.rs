use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use appointment_cell::router::appointment_routes;
use appointment_cell::SchedulingService;

pub fn create_router(scheduler: Arc<SchedulingService>) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic Appointment Scheduler is running!" }))
        .nest("/appointments", appointment_routes(scheduler))
}
