pub mod patient;
pub mod repository;
pub mod seed;

pub use patient::PatientService;
pub use repository::{InMemoryPatientRepository, PatientRepository, PostgrestPatientRepository};
