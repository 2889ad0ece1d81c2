pub mod clock;
pub mod validation;
pub mod test_utils;

pub use clock::{Clock, FixedClock, SystemClock};
pub use validation::{FieldIssue, ValidationErrors, Validator};
