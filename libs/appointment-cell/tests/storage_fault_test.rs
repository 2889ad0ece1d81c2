use std::sync::Arc;

use assert_matches::assert_matches;
use async_trait::async_trait;
use mockall::mock;
use mockall::predicate::eq;
use uuid::Uuid;

use appointment_cell::models::*;
use appointment_cell::services::{AppointmentLifecycleService, AppointmentRepository, PatientDirectory};
use shared_database::DatabaseError;
use shared_utils::test_utils::{date, fixed_clock};

mock! {
    pub Appointments {}

    #[async_trait]
    impl AppointmentRepository for Appointments {
        async fn create(&self, appointment: NewAppointment) -> Result<Appointment, DatabaseError>;
        async fn find_by_id(&self, id: Uuid) -> Result<Option<Appointment>, DatabaseError>;
        async fn exists(&self, id: Uuid) -> Result<bool, DatabaseError>;
        async fn find_all(&self, filter: AppointmentFilter) -> Result<Vec<Appointment>, DatabaseError>;
        async fn update(&self, id: Uuid, changes: AppointmentChanges) -> Result<Option<Appointment>, DatabaseError>;
        async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError>;
    }
}

mock! {
    pub Patients {}

    #[async_trait]
    impl PatientDirectory for Patients {
        async fn exists(&self, patient_id: Uuid) -> Result<bool, DatabaseError>;
        async fn display_name(&self, patient_id: Uuid) -> Result<Option<String>, DatabaseError>;
    }
}

fn unavailable() -> DatabaseError {
    DatabaseError::Status { status: 503, body: "upstream unavailable".to_string() }
}

fn request(patient_id: Uuid) -> CreateAppointmentRequest {
    CreateAppointmentRequest {
        patient_id,
        doctor_name: "Dr. Emily Smith".to_string(),
        specialty: Specialty::Cardiology,
        appointment_date: date("2024-01-15"),
        appointment_time: hhmm::parse("09:00").unwrap(),
        duration: 30,
        status: None,
        appointment_type: AppointmentType::Consultation,
        notes: None,
        symptoms: vec![],
    }
}

fn known_patient(patient_id: Uuid) -> MockPatients {
    let mut patients = MockPatients::new();
    patients
        .expect_display_name()
        .with(eq(patient_id))
        .returning(|_| Ok(Some("John Doe".to_string())));
    patients
}

#[tokio::test]
async fn test_availability_read_failure_is_not_a_conflict() {
    let patient_id = Uuid::new_v4();
    let mut repository = MockAppointments::new();
    repository.expect_find_all().returning(|_| Err(unavailable()));
    repository.expect_create().never();

    let service = AppointmentLifecycleService::new(
        Arc::new(repository),
        Arc::new(known_patient(patient_id)),
        fixed_clock("2024-01-10"),
    );

    let result = service.create_appointment(request(patient_id)).await;

    assert_matches!(result, Err(AppointmentError::Storage(DatabaseError::Status { status: 503, .. })));
}

#[tokio::test]
async fn test_patient_lookup_failure_surfaces_as_storage() {
    let mut repository = MockAppointments::new();
    repository.expect_find_all().never();
    repository.expect_create().never();

    let mut patients = MockPatients::new();
    patients.expect_display_name().returning(|_| Err(unavailable()));

    let service = AppointmentLifecycleService::new(
        Arc::new(repository),
        Arc::new(patients),
        fixed_clock("2024-01-10"),
    );

    let result = service.create_appointment(request(Uuid::new_v4())).await;

    assert_matches!(result, Err(AppointmentError::Storage(_)));
}

#[tokio::test]
async fn test_create_writes_once_with_resolved_fields() {
    let patient_id = Uuid::new_v4();
    let mut repository = MockAppointments::new();
    repository
        .expect_find_all()
        .with(eq(AppointmentFilter::on_date(date("2024-01-15"))))
        .times(1)
        .returning(|_| Ok(vec![]));
    repository
        .expect_create()
        .times(1)
        .withf(|new| new.patient_name == "John Doe" && new.status == AppointmentStatus::Pending)
        .returning(|new| Ok(new.into_appointment(Uuid::new_v4(), chrono::Utc::now())));

    let service = AppointmentLifecycleService::new(
        Arc::new(repository),
        Arc::new(known_patient(patient_id)),
        fixed_clock("2024-01-10"),
    );

    let appointment = service.create_appointment(request(patient_id)).await.unwrap();

    assert_eq!(appointment.patient_name, "John Doe");
}

#[tokio::test]
async fn test_failed_update_write_is_reported() {
    let id = Uuid::new_v4();
    let now = chrono::Utc::now();
    let existing = NewAppointment::from_request(request(Uuid::new_v4()), "John Doe".to_string())
        .into_appointment(id, now);

    let mut repository = MockAppointments::new();
    repository
        .expect_find_by_id()
        .with(eq(id))
        .returning(move |_| Ok(Some(existing.clone())));
    repository.expect_update().times(1).returning(|_, _| Err(unavailable()));

    let service = AppointmentLifecycleService::new(
        Arc::new(repository),
        Arc::new(MockPatients::new()),
        fixed_clock("2024-01-10"),
    );

    let result = service
        .update_appointment(id, AppointmentChanges {
            notes: Some("Bring previous results".to_string()),
            ..Default::default()
        })
        .await;

    assert_matches!(result, Err(AppointmentError::Storage(_)));
}

#[tokio::test]
async fn test_reassigning_to_unknown_patient_checks_existence_first() {
    let id = Uuid::new_v4();
    let stranger = Uuid::new_v4();
    let existing = NewAppointment::from_request(request(Uuid::new_v4()), "John Doe".to_string())
        .into_appointment(id, chrono::Utc::now());

    let mut repository = MockAppointments::new();
    repository
        .expect_find_by_id()
        .with(eq(id))
        .returning(move |_| Ok(Some(existing.clone())));
    repository.expect_update().never();

    let mut patients = MockPatients::new();
    patients.expect_exists().with(eq(stranger)).times(1).returning(|_| Ok(false));
    patients.expect_display_name().never();

    let service = AppointmentLifecycleService::new(
        Arc::new(repository),
        Arc::new(patients),
        fixed_clock("2024-01-10"),
    );

    let result = service
        .update_appointment(id, AppointmentChanges {
            patient_id: Some(stranger),
            ..Default::default()
        })
        .await;

    assert_matches!(result, Err(AppointmentError::InvalidPatient));
}
