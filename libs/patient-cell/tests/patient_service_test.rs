use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{Duration, NaiveDate};

use patient_cell::models::{
    CreatePatientRequest, EmergencyContact, Gender, PatientError, PatientSearchQuery, UpdatePatientRequest,
};
use patient_cell::services::{InMemoryPatientRepository, PatientService};
use shared_utils::test_utils::fixed_clock;
use shared_utils::FixedClock;

fn create_request(first_name: &str, last_name: &str, email: &str) -> CreatePatientRequest {
    CreatePatientRequest {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1988, 12, 3).unwrap(),
        gender: Gender::Female,
        phone_number: "+1-555-0133".to_string(),
        email: email.to_string(),
        address: "987 Cedar Ln, Elsewhere, USA".to_string(),
        emergency_contact: EmergencyContact {
            name: "Tom Brown".to_string(),
            relationship: "Brother".to_string(),
            phone: "+1-555-0134".to_string(),
        },
        medical_history: vec![],
        insurance_provider: None,
        insurance_number: None,
    }
}

fn setup() -> (PatientService, Arc<FixedClock>) {
    let clock = fixed_clock("2024-01-10");
    let repository = Arc::new(InMemoryPatientRepository::new(clock.clone()));
    (PatientService::new(repository, clock.clone()), clock)
}

#[tokio::test]
async fn test_create_and_fetch_patient() {
    let (service, _) = setup();

    let created = service
        .create_patient(create_request("Lisa", "Brown", "Lisa.Brown@Email.com"))
        .await
        .unwrap();

    assert_eq!(created.email, "lisa.brown@email.com");
    assert_eq!(created.created_at, created.updated_at);

    let fetched = service.get_patient(created.id).await.unwrap();
    assert_eq!(fetched.full_name(), "Lisa Brown");
    assert!(service.patient_exists(created.id).await.unwrap());
}

#[tokio::test]
async fn test_duplicate_email_is_rejected() {
    let (service, _) = setup();
    service
        .create_patient(create_request("Lisa", "Brown", "lisa.brown@email.com"))
        .await
        .unwrap();

    let result = service
        .create_patient(create_request("Lisa", "Green", "LISA.BROWN@email.com"))
        .await;

    assert_matches!(result, Err(PatientError::EmailAlreadyExists { .. }));
}

#[tokio::test]
async fn test_list_is_newest_first_and_searchable() {
    let (service, clock) = setup();
    service.create_patient(create_request("Emily", "Davis", "emily@email.com")).await.unwrap();
    clock.advance(Duration::hours(1));
    service.create_patient(create_request("Robert", "Wilson", "robert@email.com")).await.unwrap();

    let all = service.list_patients(PatientSearchQuery::default()).await.unwrap();
    let names: Vec<String> = all.iter().map(|p| p.first_name.clone()).collect();
    assert_eq!(names, vec!["Robert", "Emily"]);

    let found = service
        .list_patients(PatientSearchQuery { search: Some("  davis ".to_string()) })
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].first_name, "Emily");
}

#[tokio::test]
async fn test_update_rejects_email_of_another_patient() {
    let (service, _) = setup();
    let emily = service.create_patient(create_request("Emily", "Davis", "emily@email.com")).await.unwrap();
    service.create_patient(create_request("Robert", "Wilson", "robert@email.com")).await.unwrap();

    let result = service
        .update_patient(emily.id, UpdatePatientRequest {
            email: Some("robert@email.com".to_string()),
            ..Default::default()
        })
        .await;
    assert_matches!(result, Err(PatientError::EmailAlreadyExists { .. }));

    // Re-submitting the patient's own email is fine.
    let updated = service
        .update_patient(emily.id, UpdatePatientRequest {
            email: Some("emily@email.com".to_string()),
            last_name: Some("Moore".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(updated.last_name, "Moore");
}

#[tokio::test]
async fn test_update_bumps_updated_at() {
    let (service, clock) = setup();
    let created = service.create_patient(create_request("Emily", "Davis", "emily@email.com")).await.unwrap();
    clock.advance(Duration::minutes(5));

    let updated = service
        .update_patient(created.id, UpdatePatientRequest {
            phone_number: Some("+1-555-9999".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(updated.created_at, created.created_at);
    assert_eq!(updated.updated_at, created.updated_at + Duration::minutes(5));
}

#[tokio::test]
async fn test_missing_patient_errors() {
    let (service, _) = setup();
    let id = uuid::Uuid::new_v4();

    assert_matches!(service.get_patient(id).await, Err(PatientError::NotFound));
    assert_matches!(
        service.update_patient(id, UpdatePatientRequest::default()).await,
        Err(PatientError::NotFound)
    );
    assert_matches!(service.delete_patient(id).await, Err(PatientError::NotFound));
}

#[tokio::test]
async fn test_delete_removes_patient() {
    let (service, _) = setup();
    let created = service.create_patient(create_request("Emily", "Davis", "emily@email.com")).await.unwrap();

    service.delete_patient(created.id).await.unwrap();
    assert!(!service.patient_exists(created.id).await.unwrap());
}
