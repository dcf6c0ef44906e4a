//! Booking Models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

fn default_members() -> u32 {
    1
}

/// Who the appointment is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentFor {
    Individual,
    Family,
}

/// Appointment request assembled by the console
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingDraft {
    pub location: String,
    pub visa_type: String,
    pub visa_sub_type: String,
    pub category: String,
    pub appointment_for: AppointmentFor,
    #[serde(default = "default_members")]
    pub number_of_members: u32,
    pub schengen_visa_history: String,
    #[serde(default)]
    pub has_premium_lounge: bool,
    #[serde(default)]
    pub family_group_eligible: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Booking slice echoed back inside receipts and stored records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingDetails {
    pub location: String,
    pub visa_type: String,
    pub visa_sub_type: String,
    pub category: String,
    pub appointment_for: AppointmentFor,
    #[serde(default)]
    pub number_of_members: Option<u32>,
    #[serde(default)]
    pub schengen_history: Option<String>,
    #[serde(default)]
    pub premium_lounge: Option<bool>,
}

/// Response to a booking submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingReceipt {
    pub status: String,
    pub message: String,
    pub booking_id: String,
    pub booking_details: BookingDetails,
}

/// Lifecycle state of a stored booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BookingStatus {
    Pending,
    Completed,
    Failed,
    Unknown,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
        }
    }
}

impl From<String> for BookingStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "pending" => Self::Pending,
            "completed" => Self::Completed,
            "failed" => Self::Failed,
            _ => Self::Unknown,
        }
    }
}

impl From<BookingStatus> for String {
    fn from(value: BookingStatus) -> Self {
        value.as_str().to_string()
    }
}

/// Stored booking record
///
/// Older records carry the full `booking_request`; newer ones carry a
/// trimmed `booking_details`. Either may be present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    #[serde(default)]
    pub applicant_id: Option<String>,
    #[serde(default)]
    pub credential_id: Option<String>,
    pub status: BookingStatus,
    #[serde(default)]
    pub validation_passed: Option<bool>,
    #[serde(with = "crate::time::iso_utc")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub booking_request: Option<BookingDraft>,
    #[serde(default)]
    pub booking_details: Option<BookingDetails>,
}

impl Booking {
    /// Appointment location, from whichever slice the record carries.
    pub fn location(&self) -> Option<&str> {
        self.booking_details
            .as_ref()
            .map(|d| d.location.as_str())
            .or_else(|| self.booking_request.as_ref().map(|r| r.location.as_str()))
    }

    /// Appointment category, from whichever slice the record carries.
    pub fn category(&self) -> Option<&str> {
        self.booking_details
            .as_ref()
            .map(|d| d.category.as_str())
            .or_else(|| self.booking_request.as_ref().map(|r| r.category.as_str()))
    }
}

/// Captcha grid puzzle forwarded to the solver
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptchaRequest {
    pub target_number: String,
    pub captcha_images: Vec<String>,
}

/// Captcha solver output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptchaSolution {
    pub target_number: String,
    pub selected_indices: Vec<u32>,
    pub confidence: f64,
    #[serde(with = "crate::time::iso_utc")]
    pub solved_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_status_tolerates_unknown_values() {
        assert_eq!(BookingStatus::from("completed".to_string()), BookingStatus::Completed);
        assert_eq!(BookingStatus::from("cancelled".to_string()), BookingStatus::Unknown);
    }

    #[test]
    fn test_booking_reads_either_request_or_details() {
        let json = r#"{
            "id": "b-1",
            "status": "completed",
            "created_at": "2026-05-11T08:30:00.000001",
            "booking_request": {
                "location": "Oran",
                "visa_type": "Schengen Visa",
                "visa_sub_type": "Tourism",
                "category": "ORAN 1",
                "appointment_for": "Individual",
                "number_of_members": 1,
                "schengen_visa_history": "never"
            }
        }"#;
        let booking: Booking = serde_json::from_str(json).unwrap();
        assert_eq!(booking.location(), Some("Oran"));
        assert_eq!(booking.category(), Some("ORAN 1"));
        assert!(booking.booking_details.is_none());

        let json = r#"{
            "id": "b-2",
            "status": "completed",
            "created_at": "2026-05-11T08:31:00.000001",
            "booking_details": {
                "location": "Algiers",
                "visa_type": "Schengen Visa",
                "visa_sub_type": "Study visa",
                "category": "ALG 2",
                "appointment_for": "Family",
                "number_of_members": 3,
                "schengen_history": "after_2020_6months",
                "premium_lounge": true
            }
        }"#;
        let booking: Booking = serde_json::from_str(json).unwrap();
        assert_eq!(booking.location(), Some("Algiers"));
        assert_eq!(booking.category(), Some("ALG 2"));
    }

    #[test]
    fn test_appointment_for_wire_values() {
        let draft = BookingDraft {
            location: "Oran".to_string(),
            visa_type: "Schengen Visa".to_string(),
            visa_sub_type: "Tourism".to_string(),
            category: "ORAN 1".to_string(),
            appointment_for: AppointmentFor::Family,
            number_of_members: 4,
            schengen_visa_history: "never".to_string(),
            has_premium_lounge: false,
            family_group_eligible: true,
            notes: None,
        };
        let json = serde_json::to_string(&draft).unwrap();
        assert!(json.contains(r#""appointment_for":"Family""#));
        assert!(json.contains(r#""number_of_members":4"#));
    }
}
