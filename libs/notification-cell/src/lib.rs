//! # Notification Cell
//!
//! Outbound SMS (Twilio) and email (SendGrid) delivery. Every send is a single
//! attempt; callers decide what a failure means for them.

pub mod models;
pub mod services;

pub use models::NotificationError;
pub use services::{NotificationClient, Notifier, SendGridEmailClient, TwilioSmsClient};
