// libs/appointment-cell/src/services/scheduler.rs
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};

use calendar_cell::{CalendarProvider, CandidateSlot, GoogleCalendarClient, NewCalendarEvent};
use notification_cell::{NotificationClient, Notifier};
use patient_cell::{PatientRepository, PatientService};
use shared_config::{AppConfig, DoctorContact};

use crate::models::{
    AppointmentSummary, NotificationChannel, ScheduleAppointmentRequest, SchedulingError,
    SchedulingOutcome,
};
use crate::services::confirmation::{
    compose_message, generate_confirmation_number, DOCTOR_SUBJECT, PATIENT_SUBJECT,
};
use crate::services::validation::{appointment_window, validate_request};

/// Drives one booking: patient record, calendar event, then notifications.
pub struct SchedulingService {
    patients: Arc<dyn PatientRepository>,
    calendar: Arc<dyn CalendarProvider>,
    notifier: Arc<dyn Notifier>,
    doctors: Vec<DoctorContact>,
}

impl SchedulingService {
    pub fn new(
        patients: Arc<dyn PatientRepository>,
        calendar: Arc<dyn CalendarProvider>,
        notifier: Arc<dyn Notifier>,
        doctors: Vec<DoctorContact>,
    ) -> Self {
        Self {
            patients,
            calendar,
            notifier,
            doctors,
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, SchedulingError> {
        let calendar = GoogleCalendarClient::new(config)
            .map_err(|e| SchedulingError::NotConfigured(e.to_string()))?;

        Ok(Self::new(
            Arc::new(PatientService::new(config)),
            Arc::new(calendar),
            Arc::new(NotificationClient::new(config)),
            config.doctor_directory.clone(),
        ))
    }

    pub fn doctors(&self) -> &[DoctorContact] {
        &self.doctors
    }

    pub fn find_doctor(&self, name: &str) -> Option<&DoctorContact> {
        self.doctors.iter().find(|d| d.name == name)
    }

    pub fn candidate_slots(&self, day: NaiveDate) -> Vec<CandidateSlot> {
        self.calendar.list_candidate_slots(day)
    }

    /// Validation failures return `Err` with nothing written. Every later
    /// failure is reported through `SchedulingOutcome::errors`.
    pub async fn schedule(
        &self,
        request: ScheduleAppointmentRequest,
    ) -> Result<SchedulingOutcome, SchedulingError> {
        validate_request(&request)?;
        let (start, end) = appointment_window(&request)?;

        let patient_name = request.patient.full_name();
        info!("Scheduling appointment for {} with {} on {} at {}",
              patient_name, request.doctor, request.appointment_date, request.appointment_time);

        let mut outcome = SchedulingOutcome::default();

        // The row stays committed even if the calendar insert below fails
        let record = match self.patients.upsert(&request.patient, Local::now().date_naive()).await {
            Ok(record) => record,
            Err(e) => {
                warn!("Patient record for {} could not be saved: {}", patient_name, e);
                outcome.errors.push(format!("Patient record error: {}", e));
                return Ok(outcome);
            }
        };
        outcome.patient_id = Some(record.patient_id.clone());
        outcome.is_new_patient = record.is_new_patient;

        let event = NewCalendarEvent {
            title: format!("Appointment with {} - {}", patient_name, request.doctor),
            start,
            end,
            location: request.patient.address.clone(),
            description: request.reason.clone(),
        };

        let event_id = match self.calendar.create_event(self.calendar.default_calendar_id(), &event).await {
            Ok(id) => id,
            Err(e) => {
                warn!("Calendar booking failed for patient {}: {}", record.patient_id, e);
                outcome.errors.push("Failed to create calendar event".to_string());
                outcome.errors.push(e.to_string());
                return Ok(outcome);
            }
        };

        let confirmation_number = generate_confirmation_number();
        let appointment = AppointmentSummary {
            doctor: request.doctor.clone(),
            date: request.appointment_date,
            time: request.appointment_time,
            duration_minutes: request.duration_minutes,
            reason: request.reason.clone(),
            event_id,
        };
        let message = compose_message(&patient_name, &appointment, &confirmation_number);

        outcome.is_confirmed = true;
        outcome.confirmation_number = Some(confirmation_number);
        outcome.appointment = Some(appointment);

        self.send_notifications(&request, &message, &mut outcome).await;

        info!("Appointment confirmed for patient {} ({} notification warnings)",
              record.patient_id, outcome.errors.len());

        Ok(outcome)
    }

    async fn send_notifications(
        &self,
        request: &ScheduleAppointmentRequest,
        message: &str,
        outcome: &mut SchedulingOutcome,
    ) {
        let directory_entry = self.find_doctor(&request.doctor);
        let doctor_email = non_blank(request.doctor_email.as_deref())
            .or_else(|| directory_entry.and_then(|d| non_blank(d.email.as_deref())));
        let doctor_phone = non_blank(request.doctor_phone.as_deref())
            .or_else(|| directory_entry.and_then(|d| non_blank(d.phone.as_deref())));

        let patient_email = non_blank(request.patient.email.as_deref());
        let patient_phone = non_blank(request.patient.phone.as_deref());

        if let Some(to) = patient_email {
            let result = self.notifier.send_email(to, PATIENT_SUBJECT, message).await.map(|_| ());
            record_send(outcome, NotificationChannel::PatientEmail, result);
        }
        if let Some(to) = patient_phone {
            let result = self.notifier.send_sms(to, message).await.map(|_| ());
            record_send(outcome, NotificationChannel::PatientSms, result);
        }
        if let Some(to) = doctor_email {
            let result = self.notifier.send_email(to, DOCTOR_SUBJECT, message).await.map(|_| ());
            record_send(outcome, NotificationChannel::DoctorEmail, result);
        }
        if let Some(to) = doctor_phone {
            let result = self.notifier.send_sms(to, message).await.map(|_| ());
            record_send(outcome, NotificationChannel::DoctorSms, result);
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn record_send<E: std::fmt::Display>(
    outcome: &mut SchedulingOutcome,
    channel: NotificationChannel,
    result: Result<(), E>,
) {
    match result {
        Ok(()) => {
            debug!("Notification sent on {}", channel);
            outcome.notifications_sent.push(channel);
        }
        Err(e) => {
            warn!("Notification failed on {}: {}", channel, e);
            outcome.errors.push(format!("{}: {}", channel.error_prefix(), e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use chrono::{NaiveTime, TimeDelta};

    use calendar_cell::CalendarError;
    use notification_cell::NotificationError;
    use patient_cell::{InMemoryPatientStore, Patient, PatientDetails, PatientError, PatientRecordOutcome};
    use shared_config::default_doctor_directory;

    struct FakeCalendar {
        fail: bool,
        inserts: AtomicUsize,
        events: Mutex<Vec<NewCalendarEvent>>,
    }

    impl FakeCalendar {
        fn new(fail: bool) -> Self {
            Self { fail, inserts: AtomicUsize::new(0), events: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait]
    impl CalendarProvider for FakeCalendar {
        fn default_calendar_id(&self) -> &str {
            "primary"
        }

        fn list_candidate_slots(&self, _day: NaiveDate) -> Vec<CandidateSlot> {
            Vec::new()
        }

        async fn create_event(&self, _calendar_id: &str, event: &NewCalendarEvent) -> Result<String, CalendarError> {
            if self.fail {
                return Err(CalendarError::ApiError { message: "HTTP 500: backend error".to_string() });
            }
            let n = self.inserts.fetch_add(1, Ordering::SeqCst) + 1;
            self.events.lock().unwrap().push(event.clone());
            Ok(format!("evt{}", n))
        }
    }

    #[derive(Default)]
    struct FakeNotifier {
        fail: bool,
        sent: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl Notifier for FakeNotifier {
        async fn send_sms(&self, to: &str, _message: &str) -> Result<String, NotificationError> {
            self.sent.lock().unwrap().push(("sms".to_string(), to.to_string()));
            if self.fail {
                return Err(NotificationError::not_configured("Twilio"));
            }
            Ok("SM1".to_string())
        }

        async fn send_email(&self, to: &str, _subject: &str, _message: &str) -> Result<u16, NotificationError> {
            self.sent.lock().unwrap().push(("email".to_string(), to.to_string()));
            if self.fail {
                return Err(NotificationError::provider("SendGrid", "HTTP 401"));
            }
            Ok(202)
        }
    }

    struct UnavailablePatientStore;

    #[async_trait]
    impl PatientRepository for UnavailablePatientStore {
        async fn find_by_identity(
            &self,
            _first_name: &str,
            _last_name: &str,
            _date_of_birth: NaiveDate,
        ) -> Result<Option<Patient>, PatientError> {
            Err(PatientError::DatabaseError("API error (503): unavailable".to_string()))
        }

        async fn upsert(
            &self,
            _details: &PatientDetails,
            _visit_date: NaiveDate,
        ) -> Result<PatientRecordOutcome, PatientError> {
            Err(PatientError::DatabaseError("API error (503): unavailable".to_string()))
        }
    }

    fn jane_request() -> ScheduleAppointmentRequest {
        ScheduleAppointmentRequest {
            patient: PatientDetails {
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                date_of_birth: NaiveDate::from_ymd_opt(1990, 5, 5).unwrap(),
                phone: Some("+19995551234".to_string()),
                email: Some("jane@example.com".to_string()),
                address: Some("12 Main Street".to_string()),
                insurance_carrier: None,
                member_id: None,
                group_number: None,
            },
            appointment_date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            appointment_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            duration_minutes: 30,
            doctor: "Dr. Smith".to_string(),
            reason: Some("Check-up".to_string()),
            doctor_email: None,
            doctor_phone: None,
        }
    }

    fn service(
        store: Arc<InMemoryPatientStore>,
        calendar: Arc<FakeCalendar>,
        notifier: Arc<FakeNotifier>,
    ) -> SchedulingService {
        SchedulingService::new(store, calendar, notifier, default_doctor_directory())
    }

    #[tokio::test]
    async fn test_successful_booking_notifies_patient_and_doctor() {
        let calendar = Arc::new(FakeCalendar::new(false));
        let notifier = Arc::new(FakeNotifier::default());
        let scheduler = service(Arc::new(InMemoryPatientStore::new()), calendar.clone(), notifier.clone());

        let outcome = scheduler.schedule(jane_request()).await.unwrap();

        assert!(outcome.is_confirmed);
        assert!(outcome.is_new_patient);
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.event_id(), Some("evt1"));
        assert_eq!(outcome.confirmation_number.as_ref().map(String::len), Some(8));
        assert_eq!(
            outcome.notifications_sent,
            vec![
                NotificationChannel::PatientEmail,
                NotificationChannel::PatientSms,
                NotificationChannel::DoctorEmail,
            ]
        );

        let events = calendar.events.lock().unwrap();
        assert_eq!(events[0].title, "Appointment with Jane Doe - Dr. Smith");
        assert_eq!(events[0].end - events[0].start, TimeDelta::minutes(30));
        assert_eq!(events[0].location.as_deref(), Some("12 Main Street"));

        let sent = notifier.sent.lock().unwrap();
        assert!(sent.contains(&("email".to_string(), "dr.smith@example.com".to_string())));
    }

    #[tokio::test]
    async fn test_calendar_failure_skips_notifications() {
        let store = Arc::new(InMemoryPatientStore::new());
        let notifier = Arc::new(FakeNotifier::default());
        let scheduler = service(store.clone(), Arc::new(FakeCalendar::new(true)), notifier.clone());

        let outcome = scheduler.schedule(jane_request()).await.unwrap();

        assert!(!outcome.is_confirmed);
        assert!(outcome.confirmation_number.is_none());
        assert!(outcome.appointment.is_none());
        assert_eq!(outcome.errors[0], "Failed to create calendar event");
        assert!(notifier.sent.lock().unwrap().is_empty());
        // patient row is kept even though the booking failed
        assert_eq!(store.patients().await.len(), 1);
    }

    #[tokio::test]
    async fn test_all_channels_failing_still_confirms() {
        let notifier = Arc::new(FakeNotifier { fail: true, ..Default::default() });
        let scheduler = service(
            Arc::new(InMemoryPatientStore::new()),
            Arc::new(FakeCalendar::new(false)),
            notifier.clone(),
        );

        let mut request = jane_request();
        request.doctor_phone = Some("+19995550000".to_string());

        let outcome = scheduler.schedule(request).await.unwrap();

        assert!(outcome.is_confirmed);
        assert!(outcome.confirmation_number.is_some());
        assert_eq!(outcome.event_id(), Some("evt1"));
        assert!(outcome.notifications_sent.is_empty());
        assert_eq!(outcome.errors.len(), 4);
        assert!(outcome.errors[0].starts_with("Email error: "));
        assert!(outcome.errors[1].starts_with("SMS error: "));
        assert!(outcome.errors[2].starts_with("Doctor email error: "));
        assert!(outcome.errors[3].starts_with("Doctor SMS error: "));
        assert_eq!(notifier.sent.lock().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_duplicate_submission_is_not_deduplicated() {
        let calendar = Arc::new(FakeCalendar::new(false));
        let scheduler = service(
            Arc::new(InMemoryPatientStore::new()),
            calendar.clone(),
            Arc::new(FakeNotifier::default()),
        );

        let first = scheduler.schedule(jane_request()).await.unwrap();
        let second = scheduler.schedule(jane_request()).await.unwrap();

        assert_ne!(first.confirmation_number, second.confirmation_number);
        assert_ne!(first.event_id(), second.event_id());
        assert_eq!(first.patient_id, second.patient_id);
        assert!(first.is_new_patient);
        assert!(!second.is_new_patient);
        assert_eq!(calendar.inserts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_validation_failure_has_no_side_effects() {
        let store = Arc::new(InMemoryPatientStore::new());
        let calendar = Arc::new(FakeCalendar::new(false));
        let scheduler = service(store.clone(), calendar.clone(), Arc::new(FakeNotifier::default()));

        let mut request = jane_request();
        request.patient.last_name = String::new();

        let result = scheduler.schedule(request).await;

        assert_matches!(result, Err(SchedulingError::Validation(_)));
        assert!(store.patients().await.is_empty());
        assert_eq!(calendar.inserts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_doctor_without_override_only_notifies_patient() {
        let notifier = Arc::new(FakeNotifier::default());
        let scheduler = service(
            Arc::new(InMemoryPatientStore::new()),
            Arc::new(FakeCalendar::new(false)),
            notifier.clone(),
        );

        let mut request = jane_request();
        request.doctor = "Dr. Who".to_string();
        request.patient.email = None;

        let outcome = scheduler.schedule(request).await.unwrap();

        assert_eq!(outcome.notifications_sent, vec![NotificationChannel::PatientSms]);
        assert_eq!(notifier.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_oversized_duration_is_rejected_before_any_write() {
        let store = Arc::new(InMemoryPatientStore::new());
        let calendar = Arc::new(FakeCalendar::new(false));
        let scheduler = service(store.clone(), calendar.clone(), Arc::new(FakeNotifier::default()));

        let mut request = jane_request();
        request.duration_minutes = 9_000_000_000_000;

        let result = scheduler.schedule(request).await;

        assert_matches!(result, Err(SchedulingError::Validation(_)));
        assert!(store.patients().await.is_empty());
        assert_eq!(calendar.inserts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_out_of_range_date_is_rejected_before_any_write() {
        let store = Arc::new(InMemoryPatientStore::new());
        let scheduler = service(store.clone(), Arc::new(FakeCalendar::new(false)), Arc::new(FakeNotifier::default()));

        let mut request = jane_request();
        request.appointment_date = NaiveDate::MAX;
        request.appointment_time = NaiveTime::from_hms_opt(23, 59, 0).unwrap();

        assert_matches!(scheduler.schedule(request).await, Err(SchedulingError::Validation(_)));
        assert!(store.patients().await.is_empty());
    }

    #[tokio::test]
    async fn test_patient_store_failure_stops_before_calendar() {
        let calendar = Arc::new(FakeCalendar::new(false));
        let notifier = Arc::new(FakeNotifier::default());
        let scheduler = SchedulingService::new(
            Arc::new(UnavailablePatientStore),
            calendar.clone(),
            notifier.clone(),
            default_doctor_directory(),
        );

        let outcome = scheduler.schedule(jane_request()).await.unwrap();

        assert!(!outcome.is_confirmed);
        assert!(outcome.patient_id.is_none());
        assert!(outcome.confirmation_number.is_none());
        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.errors[0].starts_with("Patient record error: "));
        assert_eq!(calendar.inserts.load(Ordering::SeqCst), 0);
        assert!(notifier.sent.lock().unwrap().is_empty());
    }

    #[test]
    fn test_find_doctor_matches_directory_name() {
        let scheduler = service(
            Arc::new(InMemoryPatientStore::new()),
            Arc::new(FakeCalendar::new(false)),
            Arc::new(FakeNotifier::default()),
        );

        let gupta = scheduler.find_doctor("Dr. Gupta").unwrap();
        assert_eq!(gupta.email.as_deref(), Some("dr.gupta@example.com"));
        assert!(scheduler.find_doctor("Dr. Who").is_none());
    }
}
