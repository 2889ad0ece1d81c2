use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::debug;
use uuid::Uuid;

/// In-process mutual exclusion per doctor-day and per appointment. Every
/// check-then-write on a `(doctor_name, date)` pair runs while holding that
/// pair's guard.
///
/// Lock order: an appointment guard is always taken before a doctor-day guard,
/// never the other way round.
#[derive(Debug, Clone, Default)]
pub struct SchedulingLocks {
    slots: Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

impl SchedulingLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock_key(doctor_name: &str, date: NaiveDate) -> String {
        format!("schedule:{}:{}", doctor_name, date)
    }

    pub fn record_key(appointment_id: Uuid) -> String {
        format!("appointment:{}", appointment_id)
    }

    pub async fn acquire(&self, doctor_name: &str, date: NaiveDate) -> OwnedMutexGuard<()> {
        self.acquire_key(Self::lock_key(doctor_name, date)).await
    }

    /// Serialises writers of a single appointment record.
    pub async fn acquire_record(&self, appointment_id: Uuid) -> OwnedMutexGuard<()> {
        self.acquire_key(Self::record_key(appointment_id)).await
    }

    async fn acquire_key(&self, key: String) -> OwnedMutexGuard<()> {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            // Entries nobody holds or waits on are dropped.
            slots.retain(|_, slot| Arc::strong_count(slot) > 1);
            slots.entry(key.clone()).or_default().clone()
        };

        debug!("Waiting for scheduling lock {}", key);
        slot.lock_owned().await
    }

    /// Number of doctor-days currently held or awaited.
    pub fn active(&self) -> usize {
        let slots = self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        slots.values().filter(|slot| Arc::strong_count(slot) > 1).count()
    }
}
