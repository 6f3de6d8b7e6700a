//! # Calendar Cell
//!
//! Reserves appointment slots on a Google Calendar.
//!
//! - `services/google.rs` — events API client (`events.insert`) and the fixed
//!   candidate slot list offered to the booking form
//! - `services/auth.rs` — bearer token source: a static access token or a
//!   service-account key exchanged for short-lived tokens
//!
//! Slots are not derived from free/busy data and inserts are not checked for
//! overlap with existing events.

pub mod models;
pub mod services;

pub use models::{CalendarError, CandidateSlot, NewCalendarEvent};
pub use services::{CalendarProvider, GoogleCalendarClient};
