// libs/appointment-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::services::SchedulingService;

pub fn appointment_routes(scheduler: Arc<SchedulingService>) -> Router {
    Router::new()
        .route("/schedule", post(handlers::schedule_appointment))
        .route("/slots", get(handlers::list_slots))
        .route("/doctors", get(handlers::list_doctors))
        .route("/form", get(handlers::booking_form).post(handlers::submit_booking_form))
        .with_state(scheduler)
}
