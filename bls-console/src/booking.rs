//! Booking draft lifecycle
//!
//! The controller owns one draft, revalidates it against the rule table
//! after every change, and enforces the submit gates: an invalid draft
//! needs an explicit override, and at most one submission is in flight
//! at a time.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use bls_client::{GatewayClient, GatewayError};
use shared::Notice;
use shared::models::{AppointmentFor, BookingDraft, BookingReceipt, ValidationVerdict};
use tokio::sync::{Mutex, broadcast};

use crate::error::{ConsoleError, ConsoleResult};
use crate::rules::RuleTable;

pub const MIN_FAMILY_MEMBERS: u32 = 1;
pub const MAX_FAMILY_MEMBERS: u32 = 10;

/// Booking endpoint of the Gateway, as the controller sees it.
#[async_trait]
pub trait BookingGateway: Send + Sync {
    async fn book_appointment(&self, draft: &BookingDraft) -> Result<BookingReceipt, GatewayError>;
}

#[async_trait]
impl BookingGateway for GatewayClient {
    async fn book_appointment(&self, draft: &BookingDraft) -> Result<BookingReceipt, GatewayError> {
        GatewayClient::book_appointment(self, draft).await
    }
}

/// Result of a submit attempt that reached a decision.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The Gateway accepted the booking.
    Booked { booking_id: String },
    /// The draft is invalid and no override was given. Nothing was sent.
    ConfirmationRequired(ValidationVerdict),
}

#[derive(Debug)]
struct DraftState {
    draft: BookingDraft,
    verdict: ValidationVerdict,
}

/// Drives one booking draft from defaults to submission.
pub struct BookingDraftController {
    rules: Arc<RuleTable>,
    gateway: Arc<dyn BookingGateway>,
    notices: broadcast::Sender<Notice>,
    state: Mutex<DraftState>,
    submitting: AtomicBool,
}

impl BookingDraftController {
    /// Start a draft from the first entries of the catalog.
    pub fn new(
        rules: Arc<RuleTable>,
        gateway: Arc<dyn BookingGateway>,
        notices: broadcast::Sender<Notice>,
    ) -> ConsoleResult<Self> {
        let location = rules
            .locations()
            .first()
            .cloned()
            .ok_or_else(|| ConsoleError::Configuration("catalog lists no locations".to_string()))?;
        let category = rules
            .categories_for(&location)
            .first()
            .cloned()
            .ok_or_else(|| {
                ConsoleError::Configuration(format!("location '{location}' has no categories"))
            })?;
        let history = rules
            .history_options()
            .first()
            .map(|option| option.value.clone())
            .ok_or_else(|| {
                ConsoleError::Configuration("catalog lists no Schengen history options".to_string())
            })?;
        let visa_type = rules.visa_types().first().cloned().ok_or_else(|| {
            ConsoleError::Configuration("catalog lists no visa types".to_string())
        })?;
        let visa_sub_type = rules.visa_sub_types().first().cloned().ok_or_else(|| {
            ConsoleError::Configuration("catalog lists no visa sub types".to_string())
        })?;

        let draft = BookingDraft {
            location,
            visa_type,
            visa_sub_type,
            category,
            appointment_for: AppointmentFor::Individual,
            number_of_members: MIN_FAMILY_MEMBERS,
            schengen_visa_history: history,
            has_premium_lounge: false,
            family_group_eligible: false,
            notes: None,
        };
        let verdict = rules.validate(
            &draft.location,
            &draft.category,
            &draft.schengen_visa_history,
        );

        Ok(Self {
            rules,
            gateway,
            notices,
            state: Mutex::new(DraftState { draft, verdict }),
            submitting: AtomicBool::new(false),
        })
    }

    fn revalidate(&self, state: &mut DraftState) -> ValidationVerdict {
        state.verdict = self.rules.validate(
            &state.draft.location,
            &state.draft.category,
            &state.draft.schengen_visa_history,
        );
        state.verdict.clone()
    }

    /// Switch location. The category resets to the location's first
    /// entry since categories never carry across locations.
    pub async fn set_location(&self, location: impl Into<String>) -> ConsoleResult<ValidationVerdict> {
        let location = location.into();
        if !self.rules.has_location(&location) {
            return Err(ConsoleError::UnknownLocation(location));
        }
        let mut state = self.state.lock().await;
        state.draft.category = self.rules.categories_for(&location)[0].clone();
        state.draft.location = location;
        Ok(self.revalidate(&mut state))
    }

    /// Pick a category. It must be offered at the draft's location.
    pub async fn set_category(&self, category: impl Into<String>) -> ConsoleResult<ValidationVerdict> {
        let category = category.into();
        let mut state = self.state.lock().await;
        if !self
            .rules
            .categories_for(&state.draft.location)
            .contains(&category)
        {
            return Err(ConsoleError::CategoryOutsideLocation {
                category,
                location: state.draft.location.clone(),
            });
        }
        state.draft.category = category;
        Ok(self.revalidate(&mut state))
    }

    /// Record the Schengen history answer. Any value is accepted here;
    /// an unlisted one simply checks as ineligible everywhere.
    pub async fn set_schengen_history(&self, history: impl Into<String>) -> ValidationVerdict {
        let mut state = self.state.lock().await;
        state.draft.schengen_visa_history = history.into();
        self.revalidate(&mut state)
    }

    /// Individual bookings always count one member.
    pub async fn set_appointment_for(&self, appointment_for: AppointmentFor) -> ValidationVerdict {
        let mut state = self.state.lock().await;
        if matches!(appointment_for, AppointmentFor::Individual) {
            state.draft.number_of_members = MIN_FAMILY_MEMBERS;
        }
        state.draft.appointment_for = appointment_for;
        self.revalidate(&mut state)
    }

    /// Member count, clamped into the bookable range.
    pub async fn set_number_of_members(&self, members: u32) -> ValidationVerdict {
        let mut state = self.state.lock().await;
        state.draft.number_of_members = members.clamp(MIN_FAMILY_MEMBERS, MAX_FAMILY_MEMBERS);
        self.revalidate(&mut state)
    }

    pub async fn set_visa_type(&self, visa_type: impl Into<String>) -> ValidationVerdict {
        let mut state = self.state.lock().await;
        state.draft.visa_type = visa_type.into();
        self.revalidate(&mut state)
    }

    pub async fn set_visa_sub_type(&self, visa_sub_type: impl Into<String>) -> ValidationVerdict {
        let mut state = self.state.lock().await;
        state.draft.visa_sub_type = visa_sub_type.into();
        self.revalidate(&mut state)
    }

    pub async fn set_premium_lounge(&self, premium_lounge: bool) -> ValidationVerdict {
        let mut state = self.state.lock().await;
        state.draft.has_premium_lounge = premium_lounge;
        self.revalidate(&mut state)
    }

    pub async fn set_family_group_eligible(&self, eligible: bool) -> ValidationVerdict {
        let mut state = self.state.lock().await;
        state.draft.family_group_eligible = eligible;
        self.revalidate(&mut state)
    }

    pub async fn set_notes(&self, notes: Option<String>) -> ValidationVerdict {
        let mut state = self.state.lock().await;
        state.draft.notes = notes;
        self.revalidate(&mut state)
    }

    /// Submit the draft.
    ///
    /// An invalid draft returns `ConfirmationRequired` without touching
    /// the Gateway unless `override_verdict` is set. The draft sent is
    /// the one snapshotted at the gate; edits racing the submission do
    /// not leak into it. A second submit while one is in flight fails
    /// with [`ConsoleError::SubmitInFlight`].
    pub async fn submit(&self, override_verdict: bool) -> ConsoleResult<SubmitOutcome> {
        let (draft, verdict) = {
            let state = self.state.lock().await;
            (state.draft.clone(), state.verdict.clone())
        };

        if !verdict.is_valid && !override_verdict {
            return Ok(SubmitOutcome::ConfirmationRequired(verdict));
        }

        if self.submitting.swap(true, Ordering::SeqCst) {
            return Err(ConsoleError::SubmitInFlight);
        }

        let result = self.gateway.book_appointment(&draft).await;
        self.submitting.store(false, Ordering::SeqCst);

        match result {
            Ok(receipt) => {
                let _ = self.notices.send(Notice::info(
                    "Booking submitted",
                    format!("Appointment booked: {}", receipt.booking_id),
                ));
                Ok(SubmitOutcome::Booked {
                    booking_id: receipt.booking_id,
                })
            }
            Err(e) => {
                let _ = self
                    .notices
                    .send(Notice::error("Booking failed", e.to_string()));
                Err(e.into())
            }
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::SeqCst)
    }

    /// Snapshot of the draft as of now.
    pub async fn draft(&self) -> BookingDraft {
        self.state.lock().await.draft.clone()
    }

    /// Verdict for the draft as of now.
    pub async fn verdict(&self) -> ValidationVerdict {
        self.state.lock().await.verdict.clone()
    }
}
