use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_database::{DatabaseError, MemoryTable, PostgrestClient};
use shared_database::postgrest::eq;
use shared_utils::Clock;

use crate::models::{CreatePatientRequest, Patient, UpdatePatientRequest};

const TABLE: &str = "patients";

#[async_trait]
pub trait PatientRepository: Send + Sync {
    async fn create(&self, request: CreatePatientRequest) -> Result<Patient, DatabaseError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Patient>, DatabaseError>;

    async fn exists(&self, id: Uuid) -> Result<bool, DatabaseError>;

    /// Newest first.
    async fn find_all(&self, search: Option<&str>) -> Result<Vec<Patient>, DatabaseError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Patient>, DatabaseError>;

    async fn update(&self, id: Uuid, changes: UpdatePatientRequest) -> Result<Option<Patient>, DatabaseError>;

    async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError>;
}

// ==============================================================================
// IN-MEMORY
// ==============================================================================

#[derive(Debug)]
pub struct InMemoryPatientRepository {
    table: MemoryTable<Patient>,
    clock: Arc<dyn Clock>,
}

impl InMemoryPatientRepository {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            table: MemoryTable::new(),
            clock,
        }
    }

    /// Store a fully formed record as-is (seeding, fixtures).
    pub async fn insert(&self, patient: Patient) {
        self.table.insert(patient.id, patient).await;
    }
}

#[async_trait]
impl PatientRepository for InMemoryPatientRepository {
    async fn create(&self, request: CreatePatientRequest) -> Result<Patient, DatabaseError> {
        let now = self.clock.now();
        let patient = Patient {
            id: Uuid::new_v4(),
            first_name: request.first_name,
            last_name: request.last_name,
            date_of_birth: request.date_of_birth,
            gender: request.gender,
            phone_number: request.phone_number,
            email: request.email,
            address: request.address,
            emergency_contact: request.emergency_contact,
            medical_history: request.medical_history,
            insurance_provider: request.insurance_provider,
            insurance_number: request.insurance_number,
            created_at: now,
            updated_at: now,
        };

        self.table.insert(patient.id, patient.clone()).await;
        debug!("Stored patient {}", patient.id);
        Ok(patient)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Patient>, DatabaseError> {
        Ok(self.table.get(&id).await)
    }

    async fn exists(&self, id: Uuid) -> Result<bool, DatabaseError> {
        Ok(self.table.contains(&id).await)
    }

    async fn find_all(&self, search: Option<&str>) -> Result<Vec<Patient>, DatabaseError> {
        let mut patients: Vec<Patient> = self.table.values().await
            .into_iter()
            .filter(|patient| search.map_or(true, |term| patient.matches_search(term)))
            .collect();

        patients.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(patients)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Patient>, DatabaseError> {
        Ok(self.table.values().await
            .into_iter()
            .find(|patient| patient.email.eq_ignore_ascii_case(email)))
    }

    async fn update(&self, id: Uuid, changes: UpdatePatientRequest) -> Result<Option<Patient>, DatabaseError> {
        let now = self.clock.now();
        Ok(self.table.modify(&id, |patient| {
            changes.apply_to(patient);
            patient.updated_at = now;
        }).await)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        Ok(self.table.remove(&id).await)
    }
}

// ==============================================================================
// POSTGREST
// ==============================================================================

#[derive(Debug)]
pub struct PostgrestPatientRepository {
    client: PostgrestClient,
    clock: Arc<dyn Clock>,
}

impl PostgrestPatientRepository {
    pub fn new(client: PostgrestClient, clock: Arc<dyn Clock>) -> Self {
        Self { client, clock }
    }
}

#[async_trait]
impl PatientRepository for PostgrestPatientRepository {
    async fn create(&self, request: CreatePatientRequest) -> Result<Patient, DatabaseError> {
        let now = self.clock.now();
        let mut body = serde_json::to_value(&request)?;
        if let Value::Object(map) = &mut body {
            map.insert("id".to_string(), json!(Uuid::new_v4()));
            map.insert("created_at".to_string(), json!(now));
            map.insert("updated_at".to_string(), json!(now));
        }

        self.client.insert(TABLE, &body).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Patient>, DatabaseError> {
        let rows: Vec<Patient> = self.client.select(TABLE, &[eq("id", id)]).await?;
        Ok(rows.into_iter().next())
    }

    async fn exists(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let rows: Vec<Value> = self.client
            .select(TABLE, &[eq("id", id), ("select".to_string(), "id".to_string())])
            .await?;
        Ok(!rows.is_empty())
    }

    async fn find_all(&self, search: Option<&str>) -> Result<Vec<Patient>, DatabaseError> {
        let mut query = vec![("order".to_string(), "created_at.desc".to_string())];
        if let Some(term) = search {
            query.push((
                "or".to_string(),
                format!("(first_name.ilike.*{}*,last_name.ilike.*{}*)", term, term),
            ));
        }

        self.client.select(TABLE, &query).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Patient>, DatabaseError> {
        let rows: Vec<Patient> = self.client
            .select(TABLE, &[("email".to_string(), format!("ilike.{}", email))])
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn update(&self, id: Uuid, changes: UpdatePatientRequest) -> Result<Option<Patient>, DatabaseError> {
        let mut body = serde_json::to_value(&changes)?;
        if let Value::Object(map) = &mut body {
            map.insert("updated_at".to_string(), json!(self.clock.now()));
        }

        let rows: Vec<Patient> = self.client.update(TABLE, &[eq("id", id)], &body).await?;
        Ok(rows.into_iter().next())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        Ok(self.client.delete(TABLE, &[eq("id", id)]).await? > 0)
    }
}
