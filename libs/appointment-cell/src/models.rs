use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_database::DatabaseError;
use shared_utils::validation::{ValidationErrors, Validator, DOCTOR_NAME};

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub patient_name: String,
    pub doctor_name: String,
    pub specialty: Specialty,
    pub appointment_date: NaiveDate,
    #[serde(with = "hhmm")]
    pub appointment_time: NaiveTime,
    pub duration: i32,
    pub status: AppointmentStatus,
    #[serde(rename = "type")]
    pub appointment_type: AppointmentType,
    pub notes: Option<String>,
    #[serde(default)]
    pub symptoms: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    pub fn scheduled_start(&self) -> NaiveDateTime {
        self.appointment_date.and_time(self.appointment_time)
    }

    pub fn scheduled_end(&self) -> NaiveDateTime {
        self.scheduled_start()
            .checked_add_signed(Duration::minutes(i64::from(self.duration)))
            .unwrap_or(NaiveDateTime::MAX)
    }

    /// Cancelled appointments never hold their slot.
    pub fn blocks_schedule(&self) -> bool {
        self.status.is_active()
    }
}

/// Half-open `[start, end)` overlap.
pub fn intervals_overlap(
    start1: NaiveDateTime,
    end1: NaiveDateTime,
    start2: NaiveDateTime,
    end2: NaiveDateTime,
) -> bool {
    start1 < end2 && start2 < end1
}

/// Rejects non-positive durations and intervals that run past midnight.
pub fn validate_interval(date: NaiveDate, time: NaiveTime, duration: i32) -> Result<(), AppointmentError> {
    if duration <= 0 {
        return Err(AppointmentError::ValidationError(
            "Duration must be a positive number of minutes".to_string(),
        ));
    }

    let out_of_range = || AppointmentError::ValidationError("Appointment date out of range".to_string());
    let end = date
        .and_time(time)
        .checked_add_signed(Duration::minutes(i64::from(duration)))
        .ok_or_else(out_of_range)?;
    let midnight = date
        .succ_opt()
        .map(|next| next.and_time(NaiveTime::MIN))
        .ok_or_else(out_of_range)?;

    if end > midnight {
        return Err(AppointmentError::ValidationError(
            "Appointment must end on the day it starts".to_string(),
        ));
    }

    Ok(())
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 4] = [
        AppointmentStatus::Pending,
        AppointmentStatus::Confirmed,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, AppointmentStatus::Cancelled)
    }

    /// Still ahead of the patient: pending or confirmed.
    pub fn is_upcoming(&self) -> bool {
        matches!(self, AppointmentStatus::Pending | AppointmentStatus::Confirmed)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = AppointmentError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        AppointmentStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| AppointmentError::InvalidStatus(value.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Specialty {
    Cardiology,
    Pulmonology,
    Endocrinology,
    Neurology,
    Orthopedics,
    Dermatology,
    #[serde(rename = "General Medicine")]
    GeneralMedicine,
    Pediatrics,
    Gynecology,
    Oncology,
}

impl Specialty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Specialty::Cardiology => "Cardiology",
            Specialty::Pulmonology => "Pulmonology",
            Specialty::Endocrinology => "Endocrinology",
            Specialty::Neurology => "Neurology",
            Specialty::Orthopedics => "Orthopedics",
            Specialty::Dermatology => "Dermatology",
            Specialty::GeneralMedicine => "General Medicine",
            Specialty::Pediatrics => "Pediatrics",
            Specialty::Gynecology => "Gynecology",
            Specialty::Oncology => "Oncology",
        }
    }
}

impl fmt::Display for Specialty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AppointmentType {
    #[default]
    Consultation,
    Examination,
    FollowUp,
    Emergency,
    Routine,
}

// ==============================================================================
// REQUEST / WRITE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    pub patient_id: Uuid,
    pub doctor_name: String,
    pub specialty: Specialty,
    pub appointment_date: NaiveDate,
    #[serde(with = "hhmm")]
    pub appointment_time: NaiveTime,
    pub duration: i32,
    pub status: Option<AppointmentStatus>,
    #[serde(rename = "type", default)]
    pub appointment_type: AppointmentType,
    pub notes: Option<String>,
    #[serde(default)]
    pub symptoms: Vec<String>,
}

impl CreateAppointmentRequest {
    /// Field rules enforced at the HTTP edge; scheduling rules live in the lifecycle service.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let opening = NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN);
        let closing = NaiveTime::from_hms_opt(18, 0, 0).unwrap_or(NaiveTime::MIN);

        Validator::new()
            .length("doctor_name", &self.doctor_name, 3, 100, "Doctor name must be between 3 and 100 characters")
            .pattern("doctor_name", &self.doctor_name, &DOCTOR_NAME, "Doctor name must start with \"Dr.\" followed by a name")
            .range("duration", self.duration, 15, 120, "Duration must be between 15 and 120 minutes")
            .range("appointment_time", self.appointment_time, opening, closing,
                "Appointment time must be between 08:00 and 18:00")
            .max_length("notes", self.notes.as_deref(), 500, "Notes cannot exceed 500 characters")
            .finish()
    }
}

/// Fully resolved record handed to the repository on create.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewAppointment {
    pub patient_id: Uuid,
    pub patient_name: String,
    pub doctor_name: String,
    pub specialty: Specialty,
    pub appointment_date: NaiveDate,
    #[serde(with = "hhmm")]
    pub appointment_time: NaiveTime,
    pub duration: i32,
    pub status: AppointmentStatus,
    #[serde(rename = "type")]
    pub appointment_type: AppointmentType,
    pub notes: Option<String>,
    pub symptoms: Vec<String>,
}

impl NewAppointment {
    pub fn from_request(request: CreateAppointmentRequest, patient_name: String) -> Self {
        Self {
            patient_id: request.patient_id,
            patient_name,
            doctor_name: request.doctor_name,
            specialty: request.specialty,
            appointment_date: request.appointment_date,
            appointment_time: request.appointment_time,
            duration: request.duration,
            status: request.status.unwrap_or(AppointmentStatus::Pending),
            appointment_type: request.appointment_type,
            notes: request.notes,
            symptoms: request.symptoms,
        }
    }

    pub fn into_appointment(self, id: Uuid, now: DateTime<Utc>) -> Appointment {
        Appointment {
            id,
            patient_id: self.patient_id,
            patient_name: self.patient_name,
            doctor_name: self.doctor_name,
            specialty: self.specialty,
            appointment_date: self.appointment_date,
            appointment_time: self.appointment_time,
            duration: self.duration,
            status: self.status,
            appointment_type: self.appointment_type,
            notes: self.notes,
            symptoms: self.symptoms,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update. `patient_name` is never read from callers; the lifecycle
/// service fills it in when `patient_id` changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppointmentChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<Uuid>,
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialty: Option<Specialty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment_date: Option<NaiveDate>,
    #[serde(with = "hhmm::option", default, skip_serializing_if = "Option::is_none")]
    pub appointment_time: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub appointment_type: Option<AppointmentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symptoms: Option<Vec<String>>,
}

impl AppointmentChanges {
    pub fn touches_schedule(&self) -> bool {
        self.appointment_date.is_some() || self.appointment_time.is_some() || self.duration.is_some()
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut validator = Validator::new();

        if let Some(doctor_name) = &self.doctor_name {
            validator
                .length("doctor_name", doctor_name, 3, 100, "Doctor name must be between 3 and 100 characters")
                .pattern("doctor_name", doctor_name, &DOCTOR_NAME, "Doctor name must start with \"Dr.\" followed by a name");
        }
        if let Some(duration) = self.duration {
            validator.range("duration", duration, 15, 120, "Duration must be between 15 and 120 minutes");
        }
        validator.max_length("notes", self.notes.as_deref(), 500, "Notes cannot exceed 500 characters");

        validator.finish()
    }

    /// The record as it would look after this update, timestamps untouched.
    pub fn preview(&self, current: &Appointment) -> Appointment {
        let mut merged = current.clone();
        self.clone().apply_to(&mut merged);
        merged
    }

    pub fn apply_to(self, appointment: &mut Appointment) {
        if let Some(patient_id) = self.patient_id {
            appointment.patient_id = patient_id;
        }
        if let Some(patient_name) = self.patient_name {
            appointment.patient_name = patient_name;
        }
        if let Some(doctor_name) = self.doctor_name {
            appointment.doctor_name = doctor_name;
        }
        if let Some(specialty) = self.specialty {
            appointment.specialty = specialty;
        }
        if let Some(date) = self.appointment_date {
            appointment.appointment_date = date;
        }
        if let Some(time) = self.appointment_time {
            appointment.appointment_time = time;
        }
        if let Some(duration) = self.duration {
            appointment.duration = duration;
        }
        if let Some(status) = self.status {
            appointment.status = status;
        }
        if let Some(appointment_type) = self.appointment_type {
            appointment.appointment_type = appointment_type;
        }
        if let Some(notes) = self.notes {
            appointment.notes = Some(notes);
        }
        if let Some(symptoms) = self.symptoms {
            appointment.symptoms = symptoms;
        }
    }
}

/// Status arrives as free text so unknown values surface as `InvalidStatus`
/// rather than a deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
    pub notes: Option<String>,
}

impl StatusUpdateRequest {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new()
            .max_length("notes", self.notes.as_deref(), 500, "Notes cannot exceed 500 characters")
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CancelAppointmentQuery {
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppointmentFilter {
    pub date: Option<NaiveDate>,
    pub status: Option<AppointmentStatus>,
    pub patient_id: Option<Uuid>,
}

impl AppointmentFilter {
    pub fn on_date(date: NaiveDate) -> Self {
        Self { date: Some(date), ..Default::default() }
    }

    pub fn matches(&self, appointment: &Appointment) -> bool {
        self.date.map_or(true, |date| appointment.appointment_date == date)
            && self.status.map_or(true, |status| appointment.status == status)
            && self.patient_id.map_or(true, |id| appointment.patient_id == id)
    }
}

/// Raw list query; `status` is parsed by the handler so a bad value gets a 400.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppointmentListQuery {
    pub date: Option<NaiveDate>,
    pub status: Option<String>,
    pub patient_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictCheckQuery {
    pub doctor_name: String,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub duration: i32,
    pub exclude_appointment_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictCheckResponse {
    pub available: bool,
    pub conflicting_appointments: Vec<Appointment>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Invalid patient: patient not found")]
    InvalidPatient,

    #[error("Appointment date cannot be in the past")]
    InvalidDate,

    #[error("Doctor is not available at the requested time")]
    DoctorUnavailable,

    #[error("Invalid status '{0}': must be one of pending, confirmed, completed, cancelled")]
    InvalidStatus(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error(transparent)]
    Storage(#[from] DatabaseError),
}

// ==============================================================================
// WIRE FORMAT HELPERS
// ==============================================================================

/// `HH:MM` on the wire; `HH:MM:SS` is accepted on input (PostgREST `time` columns).
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn parse(raw: &str) -> Result<NaiveTime, chrono::ParseError> {
        NaiveTime::parse_from_str(raw, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
    }

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(|_| de::Error::custom(format!("time must be in HH:MM format, got '{}'", raw)))
    }

    pub mod option {
        use chrono::NaiveTime;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(time: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error> {
            match time {
                Some(time) => super::serialize(time, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveTime>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) => super::parse(&raw)
                    .map(Some)
                    .map_err(|_| serde::de::Error::custom(format!("time must be in HH:MM format, got '{}'", raw))),
                None => Ok(None),
            }
        }
    }
}
