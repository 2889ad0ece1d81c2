use async_trait::async_trait;
use uuid::Uuid;

use patient_cell::services::PatientService;
use shared_database::DatabaseError;

/// What scheduling needs to know about patients.
#[async_trait]
pub trait PatientDirectory: Send + Sync {
    async fn exists(&self, patient_id: Uuid) -> Result<bool, DatabaseError>;

    /// `"first last"` when the patient exists.
    async fn display_name(&self, patient_id: Uuid) -> Result<Option<String>, DatabaseError>;
}

#[async_trait]
impl PatientDirectory for PatientService {
    async fn exists(&self, patient_id: Uuid) -> Result<bool, DatabaseError> {
        self.patient_exists(patient_id).await
    }

    async fn display_name(&self, patient_id: Uuid) -> Result<Option<String>, DatabaseError> {
        Ok(self.find_patient(patient_id).await?.map(|patient| patient.full_name()))
    }
}
