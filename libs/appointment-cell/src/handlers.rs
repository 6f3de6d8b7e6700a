// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Form, Query, State},
    http::StatusCode,
    response::Html,
    Json,
};
use serde_json::{json, Value};
use tracing::{error, info, warn};

use shared_models::error::AppError;

use crate::form::{render_form_page, render_outcome_page, BookingForm};
use crate::models::{ScheduleAppointmentRequest, SchedulingError, SlotQuery};
use crate::services::SchedulingService;

fn map_scheduling_error(e: SchedulingError) -> AppError {
    match e {
        SchedulingError::Validation(msg) => AppError::ValidationError(msg),
        SchedulingError::NotConfigured(msg) => AppError::ExternalService(msg),
        SchedulingError::Internal(msg) => AppError::Internal(msg),
    }
}

// ==============================================================================
// JSON API HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn schedule_appointment(
    State(scheduler): State<Arc<SchedulingService>>,
    Json(request): Json<ScheduleAppointmentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let outcome = scheduler.schedule(request).await.map_err(map_scheduling_error)?;

    if !outcome.is_confirmed {
        return Err(AppError::BookingFailed(outcome.errors));
    }

    let message = if outcome.errors.is_empty() {
        "Appointment booked successfully"
    } else {
        "Appointment booked, but some notifications failed"
    };

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "booking": outcome,
            "message": message
        })),
    ))
}

#[axum::debug_handler]
pub async fn list_slots(
    State(scheduler): State<Arc<SchedulingService>>,
    Query(query): Query<SlotQuery>,
) -> Result<Json<Value>, AppError> {
    let slots = scheduler.candidate_slots(query.date);

    Ok(Json(json!({
        "date": query.date,
        "slots": slots,
        "total": slots.len()
    })))
}

#[axum::debug_handler]
pub async fn list_doctors(
    State(scheduler): State<Arc<SchedulingService>>,
) -> Result<Json<Value>, AppError> {
    let doctors: Vec<&str> = scheduler.doctors().iter().map(|d| d.name.as_str()).collect();

    Ok(Json(json!({
        "doctors": doctors,
        "total": doctors.len()
    })))
}

// ==============================================================================
// HTML FORM HANDLERS
// ==============================================================================

pub async fn booking_form(State(scheduler): State<Arc<SchedulingService>>) -> Html<String> {
    Html(render_form_page(scheduler.doctors(), None))
}

pub async fn submit_booking_form(
    State(scheduler): State<Arc<SchedulingService>>,
    Form(form): Form<BookingForm>,
) -> (StatusCode, Html<String>) {
    let request = match form.into_request() {
        Ok(request) => request,
        Err(msg) => {
            return (
                StatusCode::BAD_REQUEST,
                Html(render_form_page(scheduler.doctors(), Some(msg.as_str()))),
            );
        }
    };

    match scheduler.schedule(request).await {
        Ok(outcome) => {
            if outcome.is_confirmed {
                info!("Form booking confirmed: {:?}", outcome.confirmation_number);
                (StatusCode::OK, Html(render_outcome_page(&outcome)))
            } else {
                warn!("Form booking failed: {:?}", outcome.errors);
                (StatusCode::BAD_GATEWAY, Html(render_outcome_page(&outcome)))
            }
        }
        Err(SchedulingError::Validation(msg)) => (
            StatusCode::BAD_REQUEST,
            Html(render_form_page(scheduler.doctors(), Some(msg.as_str()))),
        ),
        Err(e) => {
            error!("Form booking error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(render_form_page(scheduler.doctors(), Some(e.to_string().as_str()))),
            )
        }
    }
}
