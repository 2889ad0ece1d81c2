use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Datelike, NaiveDate, Utc};

use shared_database::DatabaseError;
use shared_utils::validation::{Validator, ValidationErrors, EMAIL, PERSON_NAME, PHONE};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmergencyContact {
    pub name: String,
    pub relationship: String,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub phone_number: String,
    pub email: String,
    pub address: String,
    pub emergency_contact: EmergencyContact,
    #[serde(default)]
    pub medical_history: Vec<String>,
    pub insurance_provider: Option<String>,
    pub insurance_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Case-insensitive match on first name, last name, or id.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.first_name.to_lowercase().contains(&term)
            || self.last_name.to_lowercase().contains(&term)
            || self.id.to_string().contains(&term)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePatientRequest {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub phone_number: String,
    pub email: String,
    pub address: String,
    pub emergency_contact: EmergencyContact,
    #[serde(default)]
    pub medical_history: Vec<String>,
    pub insurance_provider: Option<String>,
    pub insurance_number: Option<String>,
}

impl CreatePatientRequest {
    pub fn validate(&self, today: NaiveDate) -> Result<(), ValidationErrors> {
        let age = today.year() - self.date_of_birth.year();

        Validator::new()
            .length("first_name", &self.first_name, 2, 50, "First name must be between 2 and 50 characters")
            .pattern("first_name", &self.first_name, &PERSON_NAME, "First name can only contain letters and spaces")
            .length("last_name", &self.last_name, 2, 50, "Last name must be between 2 and 50 characters")
            .pattern("last_name", &self.last_name, &PERSON_NAME, "Last name can only contain letters and spaces")
            .check("date_of_birth", (0..=120).contains(&age), "Date of birth must be reasonable")
            .pattern("phone_number", &self.phone_number, &PHONE, "Phone number must be valid")
            .pattern("email", &self.email, &EMAIL, "Email must be valid")
            .length("address", &self.address, 10, 200, "Address must be between 10 and 200 characters")
            .length("emergency_contact.name", &self.emergency_contact.name, 2, 50,
                "Emergency contact name must be between 2 and 50 characters")
            .length("emergency_contact.relationship", &self.emergency_contact.relationship, 2, 30,
                "Emergency contact relationship must be between 2 and 30 characters")
            .pattern("emergency_contact.phone", &self.emergency_contact.phone, &PHONE,
                "Emergency contact phone must be valid")
            .check("insurance_provider",
                self.insurance_provider.as_deref().map_or(true, |v| (2..=100).contains(&v.trim().len())),
                "Insurance provider must be between 2 and 100 characters")
            .check("insurance_number",
                self.insurance_number.as_deref().map_or(true, |v| (5..=50).contains(&v.trim().len())),
                "Insurance number must be between 5 and 50 characters")
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePatientRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<EmergencyContact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medical_history: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insurance_provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insurance_number: Option<String>,
}

impl UpdatePatientRequest {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut validator = Validator::new();

        if let Some(first_name) = &self.first_name {
            validator
                .length("first_name", first_name, 2, 50, "First name must be between 2 and 50 characters")
                .pattern("first_name", first_name, &PERSON_NAME, "First name can only contain letters and spaces");
        }
        if let Some(last_name) = &self.last_name {
            validator
                .length("last_name", last_name, 2, 50, "Last name must be between 2 and 50 characters")
                .pattern("last_name", last_name, &PERSON_NAME, "Last name can only contain letters and spaces");
        }
        if let Some(phone) = &self.phone_number {
            validator.pattern("phone_number", phone, &PHONE, "Phone number must be valid");
        }
        if let Some(email) = &self.email {
            validator.pattern("email", email, &EMAIL, "Email must be valid");
        }
        if let Some(address) = &self.address {
            validator.length("address", address, 10, 200, "Address must be between 10 and 200 characters");
        }

        validator.finish()
    }

    pub fn apply_to(self, patient: &mut Patient) {
        if let Some(first_name) = self.first_name {
            patient.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            patient.last_name = last_name;
        }
        if let Some(date_of_birth) = self.date_of_birth {
            patient.date_of_birth = date_of_birth;
        }
        if let Some(gender) = self.gender {
            patient.gender = gender;
        }
        if let Some(phone_number) = self.phone_number {
            patient.phone_number = phone_number;
        }
        if let Some(email) = self.email {
            patient.email = email;
        }
        if let Some(address) = self.address {
            patient.address = address;
        }
        if let Some(emergency_contact) = self.emergency_contact {
            patient.emergency_contact = emergency_contact;
        }
        if let Some(medical_history) = self.medical_history {
            patient.medical_history = medical_history;
        }
        if let Some(insurance_provider) = self.insurance_provider {
            patient.insurance_provider = Some(insurance_provider);
        }
        if let Some(insurance_number) = self.insurance_number {
            patient.insurance_number = Some(insurance_number);
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientSearchQuery {
    pub search: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error("Patient not found")]
    NotFound,

    #[error("A patient with email {email} already exists")]
    EmailAlreadyExists { email: String },

    #[error(transparent)]
    Storage(#[from] DatabaseError),
}
