pub mod availability;
pub mod lifecycle;
pub mod locks;
pub mod patients;
pub mod repository;
pub mod seed;

pub use availability::AvailabilityChecker;
pub use lifecycle::AppointmentLifecycleService;
pub use locks::SchedulingLocks;
pub use patients::PatientDirectory;
pub use repository::{AppointmentRepository, InMemoryAppointmentRepository, PostgrestAppointmentRepository};
