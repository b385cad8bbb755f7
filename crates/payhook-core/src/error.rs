//! Error types and result handling for notification ingestion.
//!
//! Each variant carries a stable code so clients can tell failures apart
//! without parsing messages. The HTTP layer maps codes to status codes.

use thiserror::Error;

/// Result type alias using `PayhookError`.
pub type Result<T> = std::result::Result<T, PayhookError>;

/// Payhook error types with stable codes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayhookError {
    /// Body missing, not JSON, or an empty JSON value (E1001).
    #[error("[E1001] Invalid payload: {reason}")]
    InvalidPayload {
        /// Why the payload was rejected
        reason: String,
    },

    /// HMAC signature missing or not matching the body (E1002).
    #[error("[E1002] Invalid signature: HMAC validation failed")]
    InvalidSignature,

    /// Body exceeds the configured size limit (E1003).
    #[error("[E1003] Payload too large: body exceeds {limit_bytes} byte limit")]
    PayloadTooLarge {
        /// Configured limit in bytes
        limit_bytes: usize,
    },

    /// Unexpected failure while processing a notification.
    #[error("[E9999] Internal error: {0}")]
    Internal(String),
}

impl PayhookError {
    /// Builds an `InvalidPayload` error from any displayable reason.
    pub fn invalid_payload(reason: impl Into<String>) -> Self {
        Self::InvalidPayload { reason: reason.into() }
    }

    /// Returns the error code.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidPayload { .. } => "E1001",
            Self::InvalidSignature => "E1002",
            Self::PayloadTooLarge { .. } => "E1003",
            Self::Internal(_) => "E9999",
        }
    }

    /// Returns whether the failure was caused by the caller's request.
    pub const fn is_client_error(&self) -> bool {
        !matches!(self, Self::Internal(_))
    }
}
