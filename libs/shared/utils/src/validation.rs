// =====================================================================================
// FIELD VALIDATION - REQUEST SHAPE CHECKS FOR THE HTTP LAYER
// =====================================================================================

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

pub static DOCTOR_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Dr\.\s+[a-zA-Z\s]+$").expect("valid doctor name pattern"));

pub static PERSON_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s]+$").expect("valid person name pattern"));

pub static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[\d\s\-\(\)]+$").expect("valid phone pattern"));

pub static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email pattern"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    pub issues: Vec<FieldIssue>,
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.issues.iter().map(|issue| issue.message.as_str()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Collects every failing rule instead of stopping at the first.
#[derive(Debug, Default)]
pub struct Validator {
    issues: Vec<FieldIssue>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self, field: &str, message: impl Into<String>) -> &mut Self {
        self.issues.push(FieldIssue {
            field: field.to_string(),
            message: message.into(),
        });
        self
    }

    /// Length check on the trimmed value, in characters.
    pub fn length(&mut self, field: &str, value: &str, min: usize, max: usize, message: &str) -> &mut Self {
        let len = value.trim().chars().count();
        if len < min || len > max {
            self.issue(field, message);
        }
        self
    }

    pub fn max_length(&mut self, field: &str, value: Option<&str>, max: usize, message: &str) -> &mut Self {
        if let Some(value) = value {
            if value.trim().chars().count() > max {
                self.issue(field, message);
            }
        }
        self
    }

    pub fn pattern(&mut self, field: &str, value: &str, pattern: &Regex, message: &str) -> &mut Self {
        if !pattern.is_match(value.trim()) {
            self.issue(field, message);
        }
        self
    }

    pub fn range<T: PartialOrd>(&mut self, field: &str, value: T, min: T, max: T, message: &str) -> &mut Self {
        if value < min || value > max {
            self.issue(field, message);
        }
        self
    }

    pub fn check(&mut self, field: &str, ok: bool, message: &str) -> &mut Self {
        if !ok {
            self.issue(field, message);
        }
        self
    }

    pub fn finish(&mut self) -> Result<(), ValidationErrors> {
        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors {
                issues: std::mem::take(&mut self.issues),
            })
        }
    }
}
