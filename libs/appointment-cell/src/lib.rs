// libs/appointment-cell/src/lib.rs
//! Appointment scheduling: validates a booking, records the patient,
//! reserves the calendar slot and sends confirmations.

pub mod form;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{
    AppointmentSummary, NotificationChannel, ScheduleAppointmentRequest, SchedulingError,
    SchedulingOutcome,
};
pub use services::SchedulingService;
