// libs/appointment-cell/src/services/confirmation.rs
use rand::Rng;

use crate::models::{AppointmentSummary, CONFIRMATION_NUMBER_LENGTH};

const CONFIRMATION_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub const PATIENT_SUBJECT: &str = "Appointment Confirmation";
pub const DOCTOR_SUBJECT: &str = "New Appointment Scheduled";

/// Random receipt code; carries no meaning and is not checked for uniqueness.
pub fn generate_confirmation_number() -> String {
    let mut rng = rand::thread_rng();
    (0..CONFIRMATION_NUMBER_LENGTH)
        .map(|_| CONFIRMATION_CHARSET[rng.gen_range(0..CONFIRMATION_CHARSET.len())] as char)
        .collect()
}

/// The single message body sent on every channel.
pub fn compose_message(patient_name: &str, appointment: &AppointmentSummary, confirmation_number: &str) -> String {
    format!(
        "Appointment Confirmed\n\
         Name: {}\n\
         Doctor: {}\n\
         Date: {}\n\
         Time: {}\n\
         Confirmation#: {}",
        patient_name,
        appointment.doctor,
        appointment.date.format("%Y-%m-%d"),
        appointment.time.format("%H:%M"),
        confirmation_number,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    #[test]
    fn test_confirmation_number_is_eight_uppercase_alphanumerics() {
        for _ in 0..50 {
            let number = generate_confirmation_number();
            assert_eq!(number.len(), 8);
            assert!(number.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_message_layout() {
        let appointment = AppointmentSummary {
            doctor: "Dr. Smith".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            time: NaiveTime::from_hms_opt(9, 5, 0).unwrap(),
            duration_minutes: 30,
            reason: None,
            event_id: "evt1".to_string(),
        };

        let message = compose_message("Jane Doe", &appointment, "AB12CD34");

        assert_eq!(
            message,
            "Appointment Confirmed\nName: Jane Doe\nDoctor: Dr. Smith\nDate: 2026-10-19\nTime: 09:05\nConfirmation#: AB12CD34"
        );
    }
}
