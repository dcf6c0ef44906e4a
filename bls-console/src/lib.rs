//! BLS appointment console core
//!
//! Client-side state for the booking console: the category eligibility
//! rules, the booking draft controller, and the live sync core that
//! keeps the session collections warm over the Gateway push channel.

pub mod booking;
pub mod error;
pub mod rules;
pub mod session;
pub mod store;
pub mod sync;

pub use booking::{BookingDraftController, BookingGateway, SubmitOutcome};
pub use error::{ConsoleError, ConsoleResult};
pub use rules::RuleTable;
pub use session::ConsoleSession;
pub use store::{CollectionStore, RefreshTicket, StatusCell};
pub use sync::ChannelState;
