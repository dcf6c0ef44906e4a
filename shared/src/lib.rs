//! Shared types for the BLS appointment console
//!
//! Wire models for the appointment Gateway REST API, the push event
//! protocol carried over its WebSocket channel, and operator notices.

pub mod models;
pub mod notice;
pub mod push;
pub mod time;

// Re-exports
pub use notice::{Notice, NoticeLevel};
pub use push::{PushError, PushEvent};
pub use serde::{Deserialize, Serialize};
