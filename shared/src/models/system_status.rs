//! Automation Status Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of the Gateway-side automation loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemStatus {
    pub is_running: bool,
    #[serde(default)]
    pub current_task: Option<String>,
    #[serde(with = "crate::time::iso_utc")]
    pub last_update: DateTime<Utc>,
}

/// Response to a start/stop command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomationAck {
    pub message: String,
    pub status: SystemStatus,
}
