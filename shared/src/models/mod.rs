//! Gateway wire models
//!
//! Shared between the client crate and the console. Field names track
//! the Gateway's JSON payloads (snake_case throughout).

pub mod applicant;
pub mod booking;
pub mod credential;
pub mod system_status;
pub mod visa;

// Re-exports
pub use applicant::*;
pub use booking::*;
pub use credential::*;
pub use system_status::*;
pub use visa::*;

use serde::{Deserialize, Serialize};

/// Plain `{"message": ...}` acknowledgement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageAck {
    pub message: String,
}
