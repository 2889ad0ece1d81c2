use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::{debug, warn};
use uuid::Uuid;

use shared_database::DatabaseError;

use crate::models::{intervals_overlap, Appointment, AppointmentFilter};
use crate::services::repository::AppointmentRepository;

/// Answers whether a doctor is free for a proposed slot. Only same-day,
/// same-doctor, non-cancelled appointments are considered.
pub struct AvailabilityChecker {
    repository: Arc<dyn AppointmentRepository>,
}

impl AvailabilityChecker {
    pub fn new(repository: Arc<dyn AppointmentRepository>) -> Self {
        Self { repository }
    }

    pub async fn is_available(
        &self,
        doctor_name: &str,
        date: NaiveDate,
        time: NaiveTime,
        duration: i32,
        exclude_appointment_id: Option<Uuid>,
    ) -> Result<bool, DatabaseError> {
        let candidates = self.candidates(doctor_name, date, exclude_appointment_id).await?;
        let available = !candidates
            .iter()
            .any(|existing| Self::collides(existing, date, time, duration));

        if !available {
            debug!("Doctor {} is booked on {} at {}", doctor_name, date, time);
        }
        Ok(available)
    }

    /// Same predicate as `is_available`, returning every clashing appointment.
    pub async fn conflicts(
        &self,
        doctor_name: &str,
        date: NaiveDate,
        time: NaiveTime,
        duration: i32,
        exclude_appointment_id: Option<Uuid>,
    ) -> Result<Vec<Appointment>, DatabaseError> {
        debug!("Checking conflicts for doctor {} on {} at {} for {} minutes",
               doctor_name, date, time, duration);

        let conflicting: Vec<Appointment> = self
            .candidates(doctor_name, date, exclude_appointment_id)
            .await?
            .into_iter()
            .filter(|existing| Self::collides(existing, date, time, duration))
            .collect();

        if !conflicting.is_empty() {
            warn!("Conflict detected for doctor {} - {} conflicting appointments",
                  doctor_name, conflicting.len());
        }
        Ok(conflicting)
    }

    async fn candidates(
        &self,
        doctor_name: &str,
        date: NaiveDate,
        exclude_appointment_id: Option<Uuid>,
    ) -> Result<Vec<Appointment>, DatabaseError> {
        Ok(self.repository
            .find_all(AppointmentFilter::on_date(date))
            .await?
            .into_iter()
            .filter(|existing| existing.doctor_name == doctor_name)
            .filter(|existing| existing.blocks_schedule())
            .filter(|existing| Some(existing.id) != exclude_appointment_id)
            .collect())
    }

    fn collides(existing: &Appointment, date: NaiveDate, time: NaiveTime, duration: i32) -> bool {
        let start = date.and_time(time);
        let end = start
            .checked_add_signed(Duration::minutes(i64::from(duration)))
            .unwrap_or(NaiveDateTime::MAX);
        intervals_overlap(start, end, existing.scheduled_start(), existing.scheduled_end())
    }
}
