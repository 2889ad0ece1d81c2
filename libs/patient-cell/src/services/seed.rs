use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::models::{EmergencyContact, Gender, Patient};

pub const JOHN_DOE_ID: Uuid = Uuid::from_u128(0x8d2f0f4e_1b7a_4c3e_9a51_000000000001);
pub const SARAH_JOHNSON_ID: Uuid = Uuid::from_u128(0x8d2f0f4e_1b7a_4c3e_9a51_000000000002);
pub const MICHAEL_CHEN_ID: Uuid = Uuid::from_u128(0x8d2f0f4e_1b7a_4c3e_9a51_000000000003);

/// Demo patients loaded into the in-memory backend at startup.
pub fn sample_patients(now: DateTime<Utc>) -> Vec<Patient> {
    vec![
        sample(
            JOHN_DOE_ID, "John", "Doe", (1985, 3, 15), Gender::Male,
            "+1-555-0123", "john.doe@email.com", "123 Main St, Anytown, USA",
            ("Jane Doe", "Spouse", "+1-555-0124"),
            &["Hypertension", "Diabetes Type 2"],
            ("Blue Cross Blue Shield", "BCBS123456789"),
            now,
        ),
        sample(
            SARAH_JOHNSON_ID, "Sarah", "Johnson", (1992, 7, 22), Gender::Female,
            "+1-555-0125", "sarah.johnson@email.com", "456 Oak Ave, Somewhere, USA",
            ("Mike Johnson", "Father", "+1-555-0126"),
            &["Asthma"],
            ("Aetna", "AETNA987654321"),
            now,
        ),
        sample(
            MICHAEL_CHEN_ID, "Michael", "Chen", (1978, 11, 8), Gender::Male,
            "+1-555-0127", "michael.chen@email.com", "789 Pine Rd, Elsewhere, USA",
            ("Lisa Chen", "Wife", "+1-555-0128"),
            &["High Cholesterol"],
            ("Cigna", "CIGNA456789123"),
            now,
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn sample(
    id: Uuid,
    first_name: &str,
    last_name: &str,
    (year, month, day): (i32, u32, u32),
    gender: Gender,
    phone_number: &str,
    email: &str,
    address: &str,
    (contact_name, relationship, contact_phone): (&str, &str, &str),
    medical_history: &[&str],
    (insurance_provider, insurance_number): (&str, &str),
    now: DateTime<Utc>,
) -> Patient {
    Patient {
        id,
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default(),
        gender,
        phone_number: phone_number.to_string(),
        email: email.to_string(),
        address: address.to_string(),
        emergency_contact: EmergencyContact {
            name: contact_name.to_string(),
            relationship: relationship.to_string(),
            phone: contact_phone.to_string(),
        },
        medical_history: medical_history.iter().map(|s| s.to_string()).collect(),
        insurance_provider: Some(insurance_provider.to_string()),
        insurance_number: Some(insurance_number.to_string()),
        created_at: now,
        updated_at: now,
    }
}
