pub mod memory;
pub mod patient;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::models::{Patient, PatientDetails, PatientError, PatientRecordOutcome};

pub use memory::InMemoryPatientStore;
pub use patient::PatientService;

/// Storage seam for patient rows, looked up by (first name, last name, date of birth).
#[async_trait]
pub trait PatientRepository: Send + Sync {
    async fn find_by_identity(
        &self,
        first_name: &str,
        last_name: &str,
        date_of_birth: NaiveDate,
    ) -> Result<Option<Patient>, PatientError>;

    /// Reuses the matching row (overwriting its contact fields) or inserts a new one.
    async fn upsert(
        &self,
        details: &PatientDetails,
        visit_date: NaiveDate,
    ) -> Result<PatientRecordOutcome, PatientError>;
}
