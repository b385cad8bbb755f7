//! Core domain types for the payhook webhook receiver.
//!
//! Provides the notification model, error taxonomy, the bounded history
//! buffer and the ingestor that ties payload validation, signature checks
//! and history bookkeeping together. Nothing in here knows about HTTP.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod history;
pub mod ingestor;
pub mod models;
pub mod signature;
pub mod time;

pub use error::{PayhookError, Result};
pub use history::{HistoryBuffer, DEFAULT_HISTORY_CAPACITY};
pub use ingestor::Ingestor;
pub use models::{
    Acknowledgement, Headers, NotificationId, NotificationKind, NotificationRecord, QueryParams,
};
pub use signature::{generate_hmac_hex, verify_signature, SignaturePolicy};
pub use time::{Clock, RealClock, TestClock};
