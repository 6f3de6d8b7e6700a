use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};
use async_trait::async_trait;
use chrono::NaiveDate;

use shared_config::AppConfig;
use shared_database::supabase::{return_representation, SupabaseClient};

use crate::models::{
    generate_patient_id, Patient, PatientDetails, PatientError, PatientRecordOutcome,
};
use crate::services::PatientRepository;

const PATIENTS_PATH: &str = "/rest/v1/patients";

pub struct PatientService {
    supabase: SupabaseClient,
}

impl PatientService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    async fn create_patient(&self, patient: &Patient) -> Result<Patient, PatientError> {
        debug!("Creating patient record {} for {}", patient.patient_id, patient.full_name());

        let body = serde_json::to_value(patient)
            .map_err(|e| PatientError::DatabaseError(e.to_string()))?;

        let result: Vec<Value> = self.supabase.request_with_headers(
            Method::POST,
            PATIENTS_PATH,
            Some(body),
            Some(return_representation()),
        ).await.map_err(|e| PatientError::DatabaseError(e.to_string()))?;

        first_row(result)?
            .ok_or_else(|| PatientError::DatabaseError("Failed to create patient record".to_string()))
    }

    async fn update_contact_fields(&self, patient: &Patient) -> Result<Patient, PatientError> {
        debug!("Updating contact fields for patient: {}", patient.patient_id);

        let update_data = json!({
            "phone": patient.phone,
            "email": patient.email,
            "address": patient.address,
            "insurance_carrier": patient.insurance_carrier,
            "member_id": patient.member_id,
            "group_number": patient.group_number,
            "last_visit": patient.last_visit,
            "is_new_patient": patient.is_new_patient,
        });

        let path = format!(
            "{}?patient_id=eq.{}",
            PATIENTS_PATH,
            urlencoding::encode(&patient.patient_id)
        );

        let result: Vec<Value> = self.supabase.request_with_headers(
            Method::PATCH,
            &path,
            Some(update_data),
            Some(return_representation()),
        ).await.map_err(|e| PatientError::DatabaseError(e.to_string()))?;

        first_row(result)?.ok_or(PatientError::NotFound)
    }
}

fn first_row(rows: Vec<Value>) -> Result<Option<Patient>, PatientError> {
    match rows.into_iter().next() {
        Some(row) => serde_json::from_value(row)
            .map(Some)
            .map_err(|e| PatientError::DatabaseError(format!("Malformed patient row: {}", e))),
        None => Ok(None),
    }
}

#[async_trait]
impl PatientRepository for PatientService {
    async fn find_by_identity(
        &self,
        first_name: &str,
        last_name: &str,
        date_of_birth: NaiveDate,
    ) -> Result<Option<Patient>, PatientError> {
        debug!("Looking up patient {} {} born {}", first_name, last_name, date_of_birth);

        let path = format!(
            "{}?first_name=eq.{}&last_name=eq.{}&date_of_birth=eq.{}&limit=1",
            PATIENTS_PATH,
            urlencoding::encode(first_name),
            urlencoding::encode(last_name),
            date_of_birth.format("%Y-%m-%d"),
        );

        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            &path,
            None,
        ).await.map_err(|e| PatientError::DatabaseError(e.to_string()))?;

        first_row(result)
    }

    async fn upsert(
        &self,
        details: &PatientDetails,
        visit_date: NaiveDate,
    ) -> Result<PatientRecordOutcome, PatientError> {
        let existing = self
            .find_by_identity(&details.first_name, &details.last_name, details.date_of_birth)
            .await?;

        let saved = match existing {
            Some(mut patient) => {
                patient.apply_contact_update(details, visit_date);
                self.update_contact_fields(&patient).await?
            }
            None => {
                let patient = Patient::from_details(generate_patient_id(), details, visit_date);
                self.create_patient(&patient).await?
            }
        };

        info!("Patient {} stored (new: {})", saved.patient_id, saved.is_new_patient);

        Ok(PatientRecordOutcome {
            patient_id: saved.patient_id,
            is_new_patient: saved.is_new_patient,
        })
    }
}
