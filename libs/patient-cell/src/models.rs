use serde::{Deserialize, Serialize};
use chrono::NaiveDate;
use uuid::Uuid;

/// Row of the `patients` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub patient_id: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub insurance_carrier: Option<String>,
    pub member_id: Option<String>,
    pub group_number: Option<String>,
    pub last_visit: Option<NaiveDate>,
    #[serde(default)]
    pub is_new_patient: bool,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Builds a fresh row for a patient seen for the first time.
    pub fn from_details(patient_id: String, details: &PatientDetails, visit_date: NaiveDate) -> Self {
        Self {
            patient_id,
            first_name: details.first_name.clone(),
            last_name: details.last_name.clone(),
            date_of_birth: Some(details.date_of_birth),
            phone: details.phone.clone(),
            email: details.email.clone(),
            address: details.address.clone(),
            insurance_carrier: details.insurance_carrier.clone(),
            member_id: details.member_id.clone(),
            group_number: details.group_number.clone(),
            last_visit: Some(visit_date),
            is_new_patient: true,
        }
    }

    /// Overwrites contact and insurance fields with the submitted values.
    pub fn apply_contact_update(&mut self, details: &PatientDetails, visit_date: NaiveDate) {
        self.phone = details.phone.clone();
        self.email = details.email.clone();
        self.address = details.address.clone();
        self.insurance_carrier = details.insurance_carrier.clone();
        self.member_id = details.member_id.clone();
        self.group_number = details.group_number.clone();
        self.last_visit = Some(visit_date);
        self.is_new_patient = false;
    }
}

/// Patient information as submitted with a booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientDetails {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub insurance_carrier: Option<String>,
    pub member_id: Option<String>,
    pub group_number: Option<String>,
}

impl PatientDetails {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRecordOutcome {
    pub patient_id: String,
    pub is_new_patient: bool,
}

/// Generates identifiers of the form `P` followed by ten uppercase hex digits.
pub fn generate_patient_id() -> String {
    let raw = Uuid::new_v4().simple().to_string();
    format!("P{}", raw[..10].to_uppercase())
}

#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum PatientError {
    #[error("Patient not found")]
    NotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),
}
