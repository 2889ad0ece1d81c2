use std::sync::Arc;

use tracing::info;

use appointment_cell::services::seed::sample_appointments;
use appointment_cell::services::{
    AppointmentLifecycleService, AppointmentRepository, InMemoryAppointmentRepository,
    PostgrestAppointmentRepository,
};
use dashboard_cell::services::DashboardService;
use patient_cell::services::seed::sample_patients;
use patient_cell::services::{
    InMemoryPatientRepository, PatientRepository, PatientService, PostgrestPatientRepository,
};
use shared_config::{AppConfig, StorageBackend};
use shared_database::PostgrestClient;
use shared_utils::Clock;

/// Per-cell services wired against one storage backend.
pub struct Services {
    pub backend: StorageBackend,
    pub patients: Arc<PatientService>,
    pub appointments: Arc<AppointmentLifecycleService>,
    pub dashboard: Arc<DashboardService>,
}

impl Services {
    pub async fn build(config: &AppConfig, clock: Arc<dyn Clock>) -> Self {
        let backend = config.storage_backend();

        let (patient_repository, appointment_repository): (Arc<dyn PatientRepository>, Arc<dyn AppointmentRepository>) =
            match backend {
                StorageBackend::Postgrest => {
                    let client = PostgrestClient::new(config);
                    info!("Using PostgREST storage at {}", client.base_url());
                    (
                        Arc::new(PostgrestPatientRepository::new(client.clone(), clock.clone())),
                        Arc::new(PostgrestAppointmentRepository::new(client, clock.clone())),
                    )
                }
                StorageBackend::Memory => {
                    let patients = Arc::new(InMemoryPatientRepository::new(clock.clone()));
                    let appointments = Arc::new(InMemoryAppointmentRepository::new(clock.clone()));

                    if config.seed_sample_data {
                        let now = clock.now();
                        for patient in sample_patients(now) {
                            patients.insert(patient).await;
                        }
                        for appointment in sample_appointments(now) {
                            appointments.insert(appointment).await;
                        }
                        info!("Seeded in-memory storage with sample patients and appointments");
                    }

                    (patients, appointments)
                }
            };

        let patients = Arc::new(PatientService::new(patient_repository, clock.clone()));
        let appointments = Arc::new(AppointmentLifecycleService::new(
            appointment_repository.clone(),
            patients.clone(),
            clock.clone(),
        ));
        let dashboard = Arc::new(DashboardService::new(appointment_repository, patients.clone(), clock));

        Self { backend, patients, appointments, dashboard }
    }
}
