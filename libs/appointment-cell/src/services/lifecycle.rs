use std::sync::Arc;

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use shared_utils::Clock;

use crate::models::{
    validate_interval, Appointment, AppointmentChanges, AppointmentError, AppointmentFilter,
    AppointmentStatus, ConflictCheckQuery, ConflictCheckResponse, CreateAppointmentRequest,
    NewAppointment, StatusUpdateRequest,
};
use crate::services::availability::AvailabilityChecker;
use crate::services::locks::SchedulingLocks;
use crate::services::patients::PatientDirectory;
use crate::services::repository::AppointmentRepository;

pub const DEFAULT_CANCELLATION_NOTE: &str = "Appointment cancelled by user";

/// Owns every appointment write. Each write validates fully before the single
/// repository call, and every availability check runs under the doctor-day lock.
pub struct AppointmentLifecycleService {
    repository: Arc<dyn AppointmentRepository>,
    patients: Arc<dyn PatientDirectory>,
    clock: Arc<dyn Clock>,
    availability: AvailabilityChecker,
    locks: SchedulingLocks,
}

impl AppointmentLifecycleService {
    pub fn new(
        repository: Arc<dyn AppointmentRepository>,
        patients: Arc<dyn PatientDirectory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            availability: AvailabilityChecker::new(repository.clone()),
            repository,
            patients,
            clock,
            locks: SchedulingLocks::new(),
        }
    }

    #[instrument(skip(self, request), fields(doctor = %request.doctor_name, date = %request.appointment_date))]
    pub async fn create_appointment(
        &self,
        request: CreateAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        validate_interval(request.appointment_date, request.appointment_time, request.duration)?;

        let patient_name = self.patients
            .display_name(request.patient_id)
            .await?
            .ok_or(AppointmentError::InvalidPatient)?;

        if request.appointment_date < self.clock.today() {
            return Err(AppointmentError::InvalidDate);
        }

        let _guard = self.locks.acquire(&request.doctor_name, request.appointment_date).await;

        if !self.availability
            .is_available(
                &request.doctor_name,
                request.appointment_date,
                request.appointment_time,
                request.duration,
                None,
            )
            .await?
        {
            warn!("Rejected booking for {} on {} at {}: slot taken",
                  request.doctor_name, request.appointment_date, request.appointment_time);
            return Err(AppointmentError::DoctorUnavailable);
        }

        let appointment = self.repository
            .create(NewAppointment::from_request(request, patient_name))
            .await?;

        info!("Appointment {} booked with {} on {} at {}",
              appointment.id, appointment.doctor_name, appointment.appointment_date,
              appointment.appointment_time.format("%H:%M"));
        Ok(appointment)
    }

    #[instrument(skip(self, changes))]
    pub async fn update_appointment(
        &self,
        appointment_id: Uuid,
        changes: AppointmentChanges,
    ) -> Result<Appointment, AppointmentError> {
        self.commit(appointment_id, changes).await
    }

    #[instrument(skip(self, request), fields(status = %request.status))]
    pub async fn update_status(
        &self,
        appointment_id: Uuid,
        request: StatusUpdateRequest,
    ) -> Result<Appointment, AppointmentError> {
        if !self.repository.exists(appointment_id).await? {
            return Err(AppointmentError::NotFound);
        }

        let status: AppointmentStatus = request.status.parse()?;
        let changes = AppointmentChanges {
            status: Some(status),
            notes: request.notes,
            ..Default::default()
        };

        self.commit(appointment_id, changes).await
    }

    /// Soft delete: the record stays, marked cancelled.
    #[instrument(skip(self, reason))]
    pub async fn cancel(
        &self,
        appointment_id: Uuid,
        reason: Option<String>,
    ) -> Result<Appointment, AppointmentError> {
        let changes = AppointmentChanges {
            status: Some(AppointmentStatus::Cancelled),
            notes: Some(reason.unwrap_or_else(|| DEFAULT_CANCELLATION_NOTE.to_string())),
            ..Default::default()
        };

        let appointment = self.commit(appointment_id, changes).await?;
        info!("Appointment {} cancelled", appointment_id);
        Ok(appointment)
    }

    pub async fn get_appointment(&self, appointment_id: Uuid) -> Result<Appointment, AppointmentError> {
        debug!("Fetching appointment {}", appointment_id);

        self.repository
            .find_by_id(appointment_id)
            .await?
            .ok_or(AppointmentError::NotFound)
    }

    pub async fn list_appointments(
        &self,
        filter: AppointmentFilter,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        debug!("Listing appointments with filter {:?}", filter);
        Ok(self.repository.find_all(filter).await?)
    }

    pub async fn check_conflicts(
        &self,
        query: ConflictCheckQuery,
    ) -> Result<ConflictCheckResponse, AppointmentError> {
        validate_interval(query.date, query.time, query.duration)?;

        let conflicting_appointments = self.availability
            .conflicts(
                &query.doctor_name,
                query.date,
                query.time,
                query.duration,
                query.exclude_appointment_id,
            )
            .await?;

        Ok(ConflictCheckResponse {
            available: conflicting_appointments.is_empty(),
            conflicting_appointments,
        })
    }

    /// Shared write path for update, status change and cancel. Writers of one
    /// record queue on its guard, so the record read here is the one written over.
    async fn commit(
        &self,
        appointment_id: Uuid,
        mut changes: AppointmentChanges,
    ) -> Result<Appointment, AppointmentError> {
        changes.patient_name = None;

        let _record = self.locks.acquire_record(appointment_id).await;

        let current = self.repository
            .find_by_id(appointment_id)
            .await?
            .ok_or(AppointmentError::NotFound)?;

        let merged = changes.preview(&current);
        let _schedule = self.locks.acquire(&merged.doctor_name, merged.appointment_date).await;

        self.write_checked(&current, merged, changes).await
    }

    async fn write_checked(
        &self,
        current: &Appointment,
        merged: Appointment,
        mut changes: AppointmentChanges,
    ) -> Result<Appointment, AppointmentError> {
        let reactivated = !current.status.is_active() && merged.status.is_active();
        let rescheduled = changes.touches_schedule() || merged.doctor_name != current.doctor_name;

        if rescheduled || reactivated {
            validate_interval(merged.appointment_date, merged.appointment_time, merged.duration)?;

            if merged.blocks_schedule()
                && !self.availability
                    .is_available(
                        &merged.doctor_name,
                        merged.appointment_date,
                        merged.appointment_time,
                        merged.duration,
                        Some(current.id),
                    )
                    .await?
            {
                warn!("Rejected change to appointment {}: {} is booked on {} at {}",
                      current.id, merged.doctor_name, merged.appointment_date,
                      merged.appointment_time.format("%H:%M"));
                return Err(AppointmentError::DoctorUnavailable);
            }
        }

        if let Some(patient_id) = changes.patient_id {
            if !self.patients.exists(patient_id).await? {
                return Err(AppointmentError::InvalidPatient);
            }
            let patient_name = self.patients
                .display_name(patient_id)
                .await?
                .ok_or(AppointmentError::InvalidPatient)?;
            changes.patient_name = Some(patient_name);
        }

        let updated = self.repository
            .update(current.id, changes)
            .await?
            .ok_or(AppointmentError::NotFound)?;

        if updated.status != current.status {
            info!("Appointment {} status {} -> {}", updated.id, current.status, updated.status);
        } else {
            debug!("Appointment {} updated", updated.id);
        }
        Ok(updated)
    }
}
