use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use patient_cell::services::seed::{JOHN_DOE_ID, MICHAEL_CHEN_ID, SARAH_JOHNSON_ID};

use crate::models::{Appointment, AppointmentStatus, AppointmentType, Specialty};

/// Demo appointments matching the seeded patients.
pub fn sample_appointments(now: DateTime<Utc>) -> Vec<Appointment> {
    vec![
        sample(
            Uuid::from_u128(0x5c1e7a90_3d42_4f6b_8e17_000000000001),
            (JOHN_DOE_ID, "John Doe"),
            "Dr. Emily Smith", Specialty::Cardiology,
            (2024, 1, 15), (9, 0), 30,
            AppointmentStatus::Confirmed, AppointmentType::Consultation,
            "Regular checkup for hypertension", &["chest pain", "shortness of breath"],
            now,
        ),
        sample(
            Uuid::from_u128(0x5c1e7a90_3d42_4f6b_8e17_000000000002),
            (SARAH_JOHNSON_ID, "Sarah Johnson"),
            "Dr. Robert Wilson", Specialty::Pulmonology,
            (2024, 1, 16), (14, 30), 45,
            AppointmentStatus::Pending, AppointmentType::FollowUp,
            "Asthma follow-up", &["wheezing", "coughing"],
            now,
        ),
        sample(
            Uuid::from_u128(0x5c1e7a90_3d42_4f6b_8e17_000000000003),
            (MICHAEL_CHEN_ID, "Michael Chen"),
            "Dr. Lisa Rodriguez", Specialty::Endocrinology,
            (2024, 1, 17), (11, 0), 30,
            AppointmentStatus::Completed, AppointmentType::Consultation,
            "Cholesterol management consultation", &["fatigue"],
            now,
        ),
        sample(
            Uuid::from_u128(0x5c1e7a90_3d42_4f6b_8e17_000000000004),
            (JOHN_DOE_ID, "John Doe"),
            "Dr. Emily Smith", Specialty::Cardiology,
            (2024, 1, 20), (10, 0), 30,
            AppointmentStatus::Cancelled, AppointmentType::FollowUp,
            "Cancelled due to patient request", &[],
            now,
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn sample(
    id: Uuid,
    (patient_id, patient_name): (Uuid, &str),
    doctor_name: &str,
    specialty: Specialty,
    (year, month, day): (i32, u32, u32),
    (hour, minute): (u32, u32),
    duration: i32,
    status: AppointmentStatus,
    appointment_type: AppointmentType,
    notes: &str,
    symptoms: &[&str],
    now: DateTime<Utc>,
) -> Appointment {
    Appointment {
        id,
        patient_id,
        patient_name: patient_name.to_string(),
        doctor_name: doctor_name.to_string(),
        specialty,
        appointment_date: NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default(),
        appointment_time: NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN),
        duration,
        status,
        appointment_type,
        notes: Some(notes.to_string()),
        symptoms: symptoms.iter().map(|s| s.to_string()).collect(),
        created_at: now,
        updated_at: now,
    }
}
