//! Push event protocol
//!
//! The Gateway broadcasts `{"type": ..., "data": ...}` frames over its
//! WebSocket channel. [`PushEvent::parse`] turns one text frame into a
//! typed event. Frames that are not valid envelopes come back as errors
//! so the caller can drop them; envelopes whose type this build does not
//! recognize come back as [`PushEvent::Unknown`].

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::models::SystemStatus;

/// Failure to interpret a push frame
#[derive(Debug, Error)]
pub enum PushError {
    #[error("invalid push frame: {0}")]
    Frame(#[from] serde_json::Error),
    #[error("push frame '{event_type}' is missing its data payload")]
    MissingData { event_type: String },
    #[error("push frame '{event_type}' has a malformed data payload: {source}")]
    Payload {
        event_type: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default)]
    data: Option<Value>,
}

/// One event on the Gateway push channel
#[derive(Debug, Clone, PartialEq)]
pub enum PushEvent {
    ApplicantCreated { data: Option<Value> },
    ApplicantUpdated { data: Option<Value> },
    ApplicantDeleted { data: Option<Value> },
    CredentialCreated { data: Option<Value> },
    CredentialUpdated { data: Option<Value> },
    CredentialDeleted { data: Option<Value> },
    SystemStatus { status: SystemStatus },
    SystemStarted { status: SystemStatus },
    SystemStopped { status: SystemStatus },
    BookingCompleted { data: Option<Value> },
    /// Envelope with a type this build does not know about.
    Unknown { event_type: String, data: Option<Value> },
}

impl PushEvent {
    /// Parse one text frame from the push channel.
    pub fn parse(frame: &str) -> Result<Self, PushError> {
        let Envelope { event_type, data } = serde_json::from_str(frame)?;
        let event = match event_type.as_str() {
            "applicant_created" => Self::ApplicantCreated { data },
            "applicant_updated" => Self::ApplicantUpdated { data },
            "applicant_deleted" => Self::ApplicantDeleted { data },
            "credential_created" => Self::CredentialCreated { data },
            "credential_updated" => Self::CredentialUpdated { data },
            "credential_deleted" => Self::CredentialDeleted { data },
            "system_status" => Self::SystemStatus {
                status: status_payload(&event_type, data)?,
            },
            "system_started" => Self::SystemStarted {
                status: status_payload(&event_type, data)?,
            },
            "system_stopped" => Self::SystemStopped {
                status: status_payload(&event_type, data)?,
            },
            "booking_completed" => Self::BookingCompleted { data },
            _ => Self::Unknown { event_type, data },
        };
        Ok(event)
    }

    /// Wire tag of the event.
    pub fn tag(&self) -> &str {
        match self {
            Self::ApplicantCreated { .. } => "applicant_created",
            Self::ApplicantUpdated { .. } => "applicant_updated",
            Self::ApplicantDeleted { .. } => "applicant_deleted",
            Self::CredentialCreated { .. } => "credential_created",
            Self::CredentialUpdated { .. } => "credential_updated",
            Self::CredentialDeleted { .. } => "credential_deleted",
            Self::SystemStatus { .. } => "system_status",
            Self::SystemStarted { .. } => "system_started",
            Self::SystemStopped { .. } => "system_stopped",
            Self::BookingCompleted { .. } => "booking_completed",
            Self::Unknown { event_type, .. } => event_type,
        }
    }
}

fn status_payload(event_type: &str, data: Option<Value>) -> Result<SystemStatus, PushError> {
    let data = data.ok_or_else(|| PushError::MissingData {
        event_type: event_type.to_string(),
    })?;
    serde_json::from_value(data).map_err(|source| PushError::Payload {
        event_type: event_type.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn status_frame(tag: &str) -> String {
        json!({
            "type": tag,
            "data": {
                "is_running": true,
                "current_task": "Checking slots for ORAN",
                "last_update": "2026-05-11T08:30:00.000001"
            }
        })
        .to_string()
    }

    #[test]
    fn test_parse_collection_events() {
        for tag in [
            "applicant_created",
            "applicant_updated",
            "applicant_deleted",
            "credential_created",
            "credential_updated",
            "credential_deleted",
            "booking_completed",
        ] {
            let frame = json!({"type": tag, "data": {"id": "x-1"}}).to_string();
            let event = PushEvent::parse(&frame).unwrap();
            assert_eq!(event.tag(), tag);
            assert!(!matches!(event, PushEvent::Unknown { .. }));
        }
    }

    #[test]
    fn test_parse_system_status_payload() {
        let event = PushEvent::parse(&status_frame("system_status")).unwrap();
        match event {
            PushEvent::SystemStatus { status } => {
                assert!(status.is_running);
                assert_eq!(status.current_task.as_deref(), Some("Checking slots for ORAN"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_started_and_stopped_carry_status() {
        assert!(matches!(
            PushEvent::parse(&status_frame("system_started")).unwrap(),
            PushEvent::SystemStarted { .. }
        ));
        assert!(matches!(
            PushEvent::parse(&status_frame("system_stopped")).unwrap(),
            PushEvent::SystemStopped { .. }
        ));
    }

    #[test]
    fn test_unknown_type_is_preserved() {
        let frame = json!({"type": "slots_opened", "data": {"count": 3}}).to_string();
        match PushEvent::parse(&frame).unwrap() {
            PushEvent::Unknown { event_type, data } => {
                assert_eq!(event_type, "slots_opened");
                assert_eq!(data.unwrap()["count"], 3);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_data_is_optional_for_collection_events() {
        let event = PushEvent::parse(r#"{"type": "applicant_created"}"#).unwrap();
        assert_eq!(event, PushEvent::ApplicantCreated { data: None });
    }

    #[test]
    fn test_rejects_non_envelope_frames() {
        assert!(matches!(
            PushEvent::parse("not json at all"),
            Err(PushError::Frame(_))
        ));
        assert!(matches!(
            PushEvent::parse("[1, 2, 3]"),
            Err(PushError::Frame(_))
        ));
        assert!(matches!(
            PushEvent::parse(r#"{"data": {"id": "x"}}"#),
            Err(PushError::Frame(_))
        ));
    }

    #[test]
    fn test_rejects_system_frames_with_bad_payloads() {
        let frame = json!({"type": "system_status", "data": {"is_running": "maybe"}}).to_string();
        assert!(matches!(
            PushEvent::parse(&frame),
            Err(PushError::Payload { .. })
        ));
        assert!(matches!(
            PushEvent::parse(r#"{"type": "system_started"}"#),
            Err(PushError::MissingData { .. })
        ));
    }
}
