// libs/appointment-cell/src/form.rs
//! Server-rendered booking form and result page.

use chrono::{Duration, Local, NaiveDate};
use serde::Deserialize;

use patient_cell::PatientDetails;
use shared_config::DoctorContact;

use crate::models::{clock_time, ScheduleAppointmentRequest, SchedulingOutcome, DEFAULT_DURATION_MINUTES};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub date_of_birth: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub appointment_date: String,
    #[serde(default)]
    pub appointment_time: String,
    #[serde(default)]
    pub doctor: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub insurance: String,
    #[serde(default)]
    pub member_id: String,
    #[serde(default)]
    pub group_number: String,
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_date(label: &str, value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| format!("{} must be a date in YYYY-MM-DD format.", label))
}

impl BookingForm {
    pub fn into_request(self) -> Result<ScheduleAppointmentRequest, String> {
        let date_of_birth = parse_date("Date of Birth", &self.date_of_birth)?;
        let appointment_date = parse_date("Appointment Date", &self.appointment_date)?;
        let appointment_time = clock_time::parse(&self.appointment_time)
            .ok_or_else(|| "Appointment Time must be in HH:MM format.".to_string())?;

        Ok(ScheduleAppointmentRequest {
            patient: PatientDetails {
                first_name: self.first_name.trim().to_string(),
                last_name: self.last_name.trim().to_string(),
                date_of_birth,
                phone: optional(&self.phone),
                email: optional(&self.email),
                address: optional(&self.address),
                insurance_carrier: optional(&self.insurance),
                member_id: optional(&self.member_id),
                group_number: optional(&self.group_number),
            },
            appointment_date,
            appointment_time,
            duration_minutes: DEFAULT_DURATION_MINUTES,
            doctor: self.doctor.trim().to_string(),
            reason: optional(&self.reason),
            doctor_email: None,
            doctor_phone: None,
        })
    }
}

pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn page(body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Medical Appointment Scheduler</title>\n</head>\n<body>\n\
         <h1>Medical Appointment Scheduler</h1>\n{}\n</body>\n</html>\n",
        body
    )
}

fn text_input(name: &str, label: &str, input_type: &str, value: &str) -> String {
    format!(
        "<label>{label}<br><input type=\"{input_type}\" name=\"{name}\" value=\"{value}\"></label><br>\n",
        label = label,
        input_type = input_type,
        name = name,
        value = escape_html(value),
    )
}

pub fn render_form_page(doctors: &[DoctorContact], error: Option<&str>) -> String {
    let tomorrow = (Local::now() + Duration::days(1)).date_naive();

    let doctor_options: String = doctors
        .iter()
        .map(|d| format!("<option value=\"{0}\">{0}</option>", escape_html(&d.name)))
        .collect::<Vec<_>>()
        .join("");

    let error_block = error
        .map(|e| format!("<p class=\"error\">{}</p>\n", escape_html(e)))
        .unwrap_or_default();

    let body = format!(
        "<p><strong>Welcome!</strong> Please fill in your details below to schedule an appointment.</p>\n\
         {error_block}\
         <form method=\"post\" action=\"/appointments/form\">\n\
         <h2>Patient Information</h2>\n\
         {first}{last}{dob}{email}{phone}\
         <label>Address<br><textarea name=\"address\"></textarea></label><br>\n\
         <h2>Appointment Details</h2>\n\
         {date}{time}\
         <label>Doctor<br><select name=\"doctor\">{doctor_options}</select></label><br>\n\
         <label>Reason for Appointment<br><textarea name=\"reason\"></textarea></label><br>\n\
         {insurance}{member}{group}\
         <button type=\"submit\">Book an Appointment</button>\n\
         </form>",
        error_block = error_block,
        first = text_input("first_name", "First Name", "text", ""),
        last = text_input("last_name", "Last Name", "text", ""),
        dob = text_input("date_of_birth", "Date of Birth", "date", "2000-01-01"),
        email = text_input("email", "Email", "email", ""),
        phone = text_input("phone", "Phone Number (E.164, e.g. +9190XXXXXXXX)", "tel", ""),
        date = text_input("appointment_date", "Appointment Date", "date", &tomorrow.format("%Y-%m-%d").to_string()),
        time = text_input("appointment_time", "Appointment Time", "time", "10:00"),
        doctor_options = doctor_options,
        insurance = text_input("insurance", "Insurance Provider (Optional)", "text", ""),
        member = text_input("member_id", "Member ID (Optional)", "text", ""),
        group = text_input("group_number", "Group Number (Optional)", "text", ""),
    );

    page(&body)
}

pub fn render_outcome_page(outcome: &SchedulingOutcome) -> String {
    let mut body = String::new();

    match (&outcome.confirmation_number, &outcome.appointment) {
        (Some(confirmation), Some(appointment)) if outcome.is_confirmed => {
            body.push_str("<p class=\"success\">Appointment booked successfully!</p>\n");
            body.push_str(&format!(
                "<p><strong>Confirmation Number:</strong> <code>{}</code></p>\n",
                escape_html(confirmation)
            ));
            body.push_str(&format!(
                "<p><strong>Calendar Event ID:</strong> <code>{}</code></p>\n",
                escape_html(&appointment.event_id)
            ));
            body.push_str("<p><strong>Thanks for your appointment! See you there.</strong></p>\n");

            if !outcome.errors.is_empty() {
                body.push_str("<p class=\"warning\">Some notifications failed. See details below.</p>\n");
                body.push_str(&error_list(&outcome.errors));
            }
        }
        _ => {
            body.push_str("<p class=\"error\">Failed to create calendar event.</p>\n");
            body.push_str(&error_list(&outcome.errors));
        }
    }

    body.push_str("<p><a href=\"/appointments/form\">Book another appointment</a></p>");
    page(&body)
}

fn error_list(errors: &[String]) -> String {
    let items: String = errors
        .iter()
        .map(|e| format!("<li>{}</li>", escape_html(e)))
        .collect();
    format!("<ul>{}</ul>\n", items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use crate::models::AppointmentSummary;
    use shared_config::default_doctor_directory;

    fn filled_form() -> BookingForm {
        BookingForm {
            first_name: " Jane ".to_string(),
            last_name: "Doe".to_string(),
            date_of_birth: "1990-05-05".to_string(),
            email: "".to_string(),
            phone: "+19995551234".to_string(),
            appointment_date: "2026-10-19".to_string(),
            appointment_time: "10:00".to_string(),
            doctor: "Dr. Smith".to_string(),
            insurance: "Acme Health".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_form_converts_blank_fields_to_none() {
        let request = filled_form().into_request().unwrap();

        assert_eq!(request.patient.first_name, "Jane");
        assert_eq!(request.patient.email, None);
        assert_eq!(request.patient.insurance_carrier.as_deref(), Some("Acme Health"));
        assert_eq!(request.appointment_time, NaiveTime::from_hms_opt(10, 0, 0).unwrap());
        assert_eq!(request.duration_minutes, 30);
    }

    #[test]
    fn test_form_rejects_bad_dates() {
        let mut form = filled_form();
        form.appointment_date = "19/10/2026".to_string();
        assert_eq!(
            form.into_request().unwrap_err(),
            "Appointment Date must be a date in YYYY-MM-DD format."
        );
    }

    #[test]
    fn test_form_page_lists_doctors_and_escapes_errors() {
        let html = render_form_page(&default_doctor_directory(), Some("<script>"));
        assert!(html.contains("<option value=\"Dr. Gupta\">Dr. Gupta</option>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_outcome_page_shows_confirmation_and_warnings() {
        let outcome = SchedulingOutcome {
            is_confirmed: true,
            confirmation_number: Some("AB12CD34".to_string()),
            patient_id: Some("P1".to_string()),
            is_new_patient: true,
            appointment: Some(AppointmentSummary {
                doctor: "Dr. Smith".to_string(),
                date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
                time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
                duration_minutes: 30,
                reason: None,
                event_id: "evt123".to_string(),
            }),
            notifications_sent: Vec::new(),
            errors: vec!["SMS error: Twilio client not configured".to_string()],
        };

        let html = render_outcome_page(&outcome);
        assert!(html.contains("AB12CD34"));
        assert!(html.contains("evt123"));
        assert!(html.contains("Some notifications failed"));
        assert!(html.contains("<li>SMS error: Twilio client not configured</li>"));
    }

    #[test]
    fn test_outcome_page_for_failed_booking() {
        let outcome = SchedulingOutcome {
            errors: vec!["Failed to create calendar event".to_string()],
            ..Default::default()
        };
        let html = render_outcome_page(&outcome);
        assert!(html.contains("class=\"error\""));
        assert!(!html.contains("Confirmation Number"));
    }
}
