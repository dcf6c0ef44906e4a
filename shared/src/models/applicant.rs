//! Applicant Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Applicant entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Applicant {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub passport_number: String,
    pub nationality: String,
    pub date_of_birth: String,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(with = "crate::time::iso_utc")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::time::iso_utc")]
    pub updated_at: DateTime<Utc>,
}

impl Applicant {
    /// Display name used in pickers and notices.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Create / update applicant payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicantCreate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub passport_number: String,
    pub nationality: String,
    pub date_of_birth: String,
    #[serde(default)]
    pub is_primary: bool,
}
