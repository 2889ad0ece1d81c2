use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::clock::FixedClock;

/// `2024-01-15`, the date most scheduling fixtures are built around.
pub fn reference_date() -> NaiveDate {
    date("2024-01-15")
}

pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("fixture date must be YYYY-MM-DD")
}

pub fn fixed_clock(today: &str) -> Arc<FixedClock> {
    Arc::new(FixedClock::on(date(today)))
}

/// Canned PostgREST rows for wiremock-backed repository tests.
pub struct MockPostgrestResponses;

impl MockPostgrestResponses {
    pub fn patient_response(patient_id: &str, email: &str, first_name: &str, last_name: &str) -> Value {
        json!({
            "id": patient_id,
            "first_name": first_name,
            "last_name": last_name,
            "date_of_birth": "1985-03-15",
            "gender": "Male",
            "phone_number": "+1-555-0123",
            "email": email,
            "address": "123 Main St, Anytown, USA",
            "emergency_contact": {
                "name": "Jane Doe",
                "relationship": "Spouse",
                "phone": "+1-555-0124"
            },
            "medical_history": ["Hypertension"],
            "insurance_provider": null,
            "insurance_number": null,
            "created_at": Utc::now().to_rfc3339(),
            "updated_at": Utc::now().to_rfc3339()
        })
    }

    pub fn appointment_response(
        appointment_id: &str,
        patient_id: &str,
        doctor_name: &str,
        date: &str,
        time: &str,
        status: &str,
    ) -> Value {
        json!({
            "id": appointment_id,
            "patient_id": patient_id,
            "patient_name": "John Doe",
            "doctor_name": doctor_name,
            "specialty": "Cardiology",
            "appointment_date": date,
            "appointment_time": time,
            "duration": 30,
            "status": status,
            "type": "consultation",
            "notes": null,
            "symptoms": [],
            "created_at": Utc::now().to_rfc3339(),
            "updated_at": Utc::now().to_rfc3339()
        })
    }

    pub fn random_id() -> String {
        Uuid::new_v4().to_string()
    }
}
