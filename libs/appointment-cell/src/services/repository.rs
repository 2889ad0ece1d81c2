use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_database::{DatabaseError, MemoryTable, PostgrestClient};
use shared_database::postgrest::eq;
use shared_utils::Clock;

use crate::models::{Appointment, AppointmentChanges, AppointmentFilter, NewAppointment};

const TABLE: &str = "appointments";

/// Durable record store for appointments. Storage faults stay `DatabaseError`;
/// business outcomes are decided by the callers.
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn create(&self, appointment: NewAppointment) -> Result<Appointment, DatabaseError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Appointment>, DatabaseError>;

    async fn exists(&self, id: Uuid) -> Result<bool, DatabaseError>;

    /// AND of the given filters, ordered by date then time.
    async fn find_all(&self, filter: AppointmentFilter) -> Result<Vec<Appointment>, DatabaseError>;

    async fn update(&self, id: Uuid, changes: AppointmentChanges) -> Result<Option<Appointment>, DatabaseError>;

    async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError>;
}

// ==============================================================================
// IN-MEMORY
// ==============================================================================

#[derive(Debug)]
pub struct InMemoryAppointmentRepository {
    table: MemoryTable<Appointment>,
    clock: Arc<dyn Clock>,
}

impl InMemoryAppointmentRepository {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            table: MemoryTable::new(),
            clock,
        }
    }

    /// Store a fully formed record as-is (seeding, fixtures).
    pub async fn insert(&self, appointment: Appointment) {
        self.table.insert(appointment.id, appointment).await;
    }
}

#[async_trait]
impl AppointmentRepository for InMemoryAppointmentRepository {
    async fn create(&self, appointment: NewAppointment) -> Result<Appointment, DatabaseError> {
        let appointment = appointment.into_appointment(Uuid::new_v4(), self.clock.now());

        self.table.insert(appointment.id, appointment.clone()).await;
        debug!("Stored appointment {}", appointment.id);
        Ok(appointment)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Appointment>, DatabaseError> {
        Ok(self.table.get(&id).await)
    }

    async fn exists(&self, id: Uuid) -> Result<bool, DatabaseError> {
        Ok(self.table.contains(&id).await)
    }

    async fn find_all(&self, filter: AppointmentFilter) -> Result<Vec<Appointment>, DatabaseError> {
        let mut appointments: Vec<Appointment> = self.table.values().await
            .into_iter()
            .filter(|appointment| filter.matches(appointment))
            .collect();

        appointments.sort_by(|a, b| {
            a.scheduled_start()
                .cmp(&b.scheduled_start())
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        Ok(appointments)
    }

    async fn update(&self, id: Uuid, changes: AppointmentChanges) -> Result<Option<Appointment>, DatabaseError> {
        let now = self.clock.now();
        Ok(self.table.modify(&id, |appointment| {
            changes.apply_to(appointment);
            appointment.updated_at = now;
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
pub struct PostgrestAppointmentRepository {
    client: PostgrestClient,
    clock: Arc<dyn Clock>,
}

impl PostgrestAppointmentRepository {
    pub fn new(client: PostgrestClient, clock: Arc<dyn Clock>) -> Self {
        Self { client, clock }
    }
}

#[async_trait]
impl AppointmentRepository for PostgrestAppointmentRepository {
    async fn create(&self, appointment: NewAppointment) -> Result<Appointment, DatabaseError> {
        let now = self.clock.now();
        let mut body = serde_json::to_value(&appointment)?;
        if let Value::Object(map) = &mut body {
            map.insert("id".to_string(), json!(Uuid::new_v4()));
            map.insert("created_at".to_string(), json!(now));
            map.insert("updated_at".to_string(), json!(now));
        }

        self.client.insert(TABLE, &body).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Appointment>, DatabaseError> {
        let rows: Vec<Appointment> = self.client.select(TABLE, &[eq("id", id)]).await?;
        Ok(rows.into_iter().next())
    }

    async fn exists(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let rows: Vec<Value> = self.client
            .select(TABLE, &[eq("id", id), ("select".to_string(), "id".to_string())])
            .await?;
        Ok(!rows.is_empty())
    }

    async fn find_all(&self, filter: AppointmentFilter) -> Result<Vec<Appointment>, DatabaseError> {
        let mut query = Vec::new();
        if let Some(date) = filter.date {
            query.push(eq("appointment_date", date));
        }
        if let Some(status) = filter.status {
            query.push(eq("status", status));
        }
        if let Some(patient_id) = filter.patient_id {
            query.push(eq("patient_id", patient_id));
        }
        query.push((
            "order".to_string(),
            "appointment_date.asc,appointment_time.asc".to_string(),
        ));

        self.client.select(TABLE, &query).await
    }

    async fn update(&self, id: Uuid, changes: AppointmentChanges) -> Result<Option<Appointment>, DatabaseError> {
        let mut body = serde_json::to_value(&changes)?;
        if let Value::Object(map) = &mut body {
            map.insert("updated_at".to_string(), json!(self.clock.now()));
        }

        let rows: Vec<Appointment> = self.client.update(TABLE, &[eq("id", id)], &body).await?;
        Ok(rows.into_iter().next())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        Ok(self.client.delete(TABLE, &[eq("id", id)]).await? > 0)
    }
}
