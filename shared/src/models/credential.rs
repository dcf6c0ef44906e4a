//! Credential Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Booking portal credential entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    pub id: String,
    pub email: String,
    pub password: String,
    #[serde(default, with = "crate::time::iso_utc::option")]
    pub last_used: Option<DateTime<Utc>>,
    #[serde(with = "crate::time::iso_utc")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::time::iso_utc")]
    pub updated_at: DateTime<Utc>,
}

/// Create / update credential payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialCreate {
    pub email: String,
    pub password: String,
}

/// Result of a login probe against the booking portal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialTestReport {
    pub status: String,
    pub message: String,
    #[serde(with = "crate::time::iso_utc")]
    pub tested_at: DateTime<Utc>,
}
