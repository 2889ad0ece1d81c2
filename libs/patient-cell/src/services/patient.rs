use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_database::DatabaseError;
use shared_utils::Clock;

use crate::models::{CreatePatientRequest, Patient, PatientError, PatientSearchQuery, UpdatePatientRequest};
use crate::services::repository::PatientRepository;

pub struct PatientService {
    repository: Arc<dyn PatientRepository>,
    clock: Arc<dyn Clock>,
}

impl PatientService {
    pub fn new(repository: Arc<dyn PatientRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub async fn create_patient(&self, mut request: CreatePatientRequest) -> Result<Patient, PatientError> {
        request.email = request.email.trim().to_lowercase();
        debug!("Creating new patient profile for: {}", request.email);

        if self.repository.find_by_email(&request.email).await?.is_some() {
            warn!("Rejected duplicate patient email {}", request.email);
            return Err(PatientError::EmailAlreadyExists { email: request.email });
        }

        let patient = self.repository.create(request).await?;
        info!("Patient profile created with ID: {}", patient.id);
        Ok(patient)
    }

    pub async fn get_patient(&self, patient_id: Uuid) -> Result<Patient, PatientError> {
        debug!("Fetching patient profile: {}", patient_id);

        self.repository
            .find_by_id(patient_id)
            .await?
            .ok_or(PatientError::NotFound)
    }

    pub async fn patient_exists(&self, patient_id: Uuid) -> Result<bool, DatabaseError> {
        self.repository.exists(patient_id).await
    }

    /// Raw lookup for other cells; storage faults pass through untouched.
    pub async fn find_patient(&self, patient_id: Uuid) -> Result<Option<Patient>, DatabaseError> {
        self.repository.find_by_id(patient_id).await
    }

    /// Every patient, newest first.
    pub async fn roster(&self) -> Result<Vec<Patient>, DatabaseError> {
        self.repository.find_all(None).await
    }

    pub async fn list_patients(&self, query: PatientSearchQuery) -> Result<Vec<Patient>, PatientError> {
        let search = query.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty());
        debug!("Listing patients, search: {:?}", search);

        Ok(self.repository.find_all(search).await?)
    }

    pub async fn update_patient(
        &self,
        patient_id: Uuid,
        mut request: UpdatePatientRequest,
    ) -> Result<Patient, PatientError> {
        debug!("Updating patient profile: {}", patient_id);

        if !self.repository.exists(patient_id).await? {
            return Err(PatientError::NotFound);
        }

        if let Some(email) = request.email.as_mut() {
            *email = email.trim().to_lowercase();
            if let Some(existing) = self.repository.find_by_email(email).await? {
                if existing.id != patient_id {
                    return Err(PatientError::EmailAlreadyExists { email: email.clone() });
                }
            }
        }

        self.repository
            .update(patient_id, request)
            .await?
            .ok_or(PatientError::NotFound)
    }

    pub async fn delete_patient(&self, patient_id: Uuid) -> Result<(), PatientError> {
        if !self.repository.delete(patient_id).await? {
            return Err(PatientError::NotFound);
        }

        info!("Patient {} deleted", patient_id);
        Ok(())
    }
}
