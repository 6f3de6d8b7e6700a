use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;

use crate::models::{
    generate_patient_id, Patient, PatientDetails, PatientError, PatientRecordOutcome,
};
use crate::services::PatientRepository;

/// Process-local patient table, used for local runs without Supabase and in tests.
#[derive(Default)]
pub struct InMemoryPatientStore {
    rows: RwLock<Vec<Patient>>,
}

impl InMemoryPatientStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn patients(&self) -> Vec<Patient> {
        self.rows.read().await.clone()
    }
}

#[async_trait]
impl PatientRepository for InMemoryPatientStore {
    async fn find_by_identity(
        &self,
        first_name: &str,
        last_name: &str,
        date_of_birth: NaiveDate,
    ) -> Result<Option<Patient>, PatientError> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .find(|p| {
                p.first_name == first_name
                    && p.last_name == last_name
                    && p.date_of_birth == Some(date_of_birth)
            })
            .cloned())
    }

    async fn upsert(
        &self,
        details: &PatientDetails,
        visit_date: NaiveDate,
    ) -> Result<PatientRecordOutcome, PatientError> {
        let mut rows = self.rows.write().await;

        let existing = rows.iter_mut().find(|p| {
            p.first_name == details.first_name
                && p.last_name == details.last_name
                && p.date_of_birth == Some(details.date_of_birth)
        });

        if let Some(patient) = existing {
            patient.apply_contact_update(details, visit_date);
            return Ok(PatientRecordOutcome {
                patient_id: patient.patient_id.clone(),
                is_new_patient: false,
            });
        }

        let patient = Patient::from_details(generate_patient_id(), details, visit_date);
        let outcome = PatientRecordOutcome {
            patient_id: patient.patient_id.clone(),
            is_new_patient: true,
        };
        rows.push(patient);
        Ok(outcome)
    }
}
