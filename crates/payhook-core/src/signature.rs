//! HMAC-SHA256 signature generation and verification.
//!
//! The provider signs the raw request body with the shared secret and sends
//! the lower-case hex digest in a header (`X-Signature` by default).

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::{error::PayhookError, models::Headers, Result};

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the signature unless configured otherwise.
pub const DEFAULT_SIGNATURE_HEADER: &str = "x-signature";

/// Signature generation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    /// The secret could not be used as an HMAC key.
    InvalidSecret,
}

impl fmt::Display for SignatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSecret => write!(f, "invalid secret key"),
        }
    }
}

impl std::error::Error for SignatureError {}

/// Generates an HMAC-SHA256 signature as a lower-case hex string.
///
/// # Example
///
/// ```
/// use payhook_core::signature::{generate_hmac_hex, verify_signature};
///
/// let body = br#"{"type":"payment"}"#;
/// let signature = generate_hmac_hex(body, "shared-secret").unwrap();
///
/// assert!(verify_signature(body, Some(&signature), "shared-secret"));
/// ```
///
/// # Errors
///
/// Returns `SignatureError::InvalidSecret` if the secret key is rejected.
pub fn generate_hmac_hex(
    payload: &[u8],
    secret: &str,
) -> std::result::Result<String, SignatureError> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| SignatureError::InvalidSecret)?;

    mac.update(payload);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Checks `signature` against the HMAC-SHA256 of `payload`.
///
/// Returns `false` when the signature is absent or empty. Only the bare
/// lower-case hex digest is accepted.
pub fn verify_signature(payload: &[u8], signature: Option<&str>, secret: &str) -> bool {
    let Some(signature) = signature.filter(|s| !s.is_empty()) else {
        return false;
    };

    match generate_hmac_hex(payload, secret) {
        Ok(expected) => timing_safe_eq(signature, &expected),
        Err(_) => false,
    }
}

/// Constant-time string comparison.
///
/// Length is not secret (digests are fixed size), only content is.
fn timing_safe_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (a_byte, b_byte) in a.as_bytes().iter().zip(b.as_bytes()) {
        result |= a_byte ^ b_byte;
    }

    result == 0
}

/// Whether incoming notifications must carry a valid signature.
#[derive(Clone, PartialEq, Eq)]
pub enum SignaturePolicy {
    /// Accept every notification without checking.
    Disabled,
    /// Reject notifications whose signature header does not verify.
    Required {
        /// Lower-case header name carrying the signature
        header: String,
        /// Shared HMAC secret
        secret: String,
    },
}

impl SignaturePolicy {
    /// Requires signatures in `header`, signed with `secret`.
    pub fn required(header: impl AsRef<str>, secret: impl Into<String>) -> Self {
        Self::Required { header: header.as_ref().to_ascii_lowercase(), secret: secret.into() }
    }

    /// Whether this policy checks signatures.
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Required { .. })
    }

    /// Applies the policy to a request.
    ///
    /// `headers` must be keyed by lower-case name.
    ///
    /// # Errors
    ///
    /// Returns `PayhookError::InvalidSignature` when verification is
    /// required and the header is missing or does not match.
    pub fn check(&self, payload: &[u8], headers: &Headers) -> Result<()> {
        match self {
            Self::Disabled => Ok(()),
            Self::Required { header, secret } => {
                let provided = headers.get(header).map(String::as_str);
                if verify_signature(payload, provided, secret) {
                    Ok(())
                } else {
                    Err(PayhookError::InvalidSignature)
                }
            },
        }
    }
}

impl fmt::Debug for SignaturePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => f.write_str("Disabled"),
            Self::Required { header, .. } => f
                .debug_struct("Required")
                .field("header", header)
                .field("secret", &"***")
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // RFC 4231 test case 2.
    const RFC_KEY: &str = "Jefe";
    const RFC_DATA: &[u8] = b"what do ya want for nothing?";
    const RFC_DIGEST: &str = "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843";

    #[test]
    fn generate_matches_rfc_vector() {
        assert_eq!(generate_hmac_hex(RFC_DATA, RFC_KEY).unwrap(), RFC_DIGEST);
    }

    #[test]
    fn generate_hmac_hex_consistent() {
        let sig1 = generate_hmac_hex(b"test payload", "secret").unwrap();
        let sig2 = generate_hmac_hex(b"test payload", "secret").unwrap();

        assert_eq!(sig1, sig2);
        assert_eq!(sig1.len(), 64);
    }

    #[test]
    fn verify_accepts_matching_signature() {
        assert!(verify_signature(RFC_DATA, Some(RFC_DIGEST), RFC_KEY));
    }

    #[test]
    fn verify_rejects_missing_or_empty() {
        assert!(!verify_signature(RFC_DATA, None, RFC_KEY));
        assert!(!verify_signature(RFC_DATA, Some(""), RFC_KEY));
    }

    #[test]
    fn verify_rejects_prefixed_and_uppercase_forms() {
        assert!(!verify_signature(RFC_DATA, Some(&format!("sha256={RFC_DIGEST}")), RFC_KEY));
        assert!(!verify_signature(RFC_DATA, Some(&RFC_DIGEST.to_uppercase()), RFC_KEY));
    }

    #[test]
    fn verify_rejects_wrong_secret_or_body() {
        assert!(!verify_signature(RFC_DATA, Some(RFC_DIGEST), "other"));
        assert!(!verify_signature(b"tampered", Some(RFC_DIGEST), RFC_KEY));
    }

    #[test]
    fn timing_safe_eq_cases() {
        assert!(timing_safe_eq("hello", "hello"));
        assert!(!timing_safe_eq("hello", "world"));
        assert!(!timing_safe_eq("hello", "hello_world"));
    }

    #[test]
    fn policy_lowercases_header_name() {
        let policy = SignaturePolicy::required("X-Signature", RFC_KEY);

        let mut headers = Headers::new();
        headers.insert("x-signature".into(), RFC_DIGEST.into());

        assert!(policy.check(RFC_DATA, &headers).is_ok());
    }

    #[test]
    fn policy_rejects_missing_header() {
        let policy = SignaturePolicy::required(DEFAULT_SIGNATURE_HEADER, RFC_KEY);

        let err = policy.check(RFC_DATA, &Headers::new()).unwrap_err();
        assert_eq!(err, PayhookError::InvalidSignature);
    }

    #[test]
    fn disabled_policy_accepts_anything() {
        let mut headers = Headers::new();
        headers.insert("x-signature".into(), "wrong".into());

        assert!(!SignaturePolicy::Disabled.is_enabled());
        assert!(SignaturePolicy::Disabled.check(b"{}", &headers).is_ok());
    }

    #[test]
    fn debug_masks_secret() {
        let policy = SignaturePolicy::required("x-signature", "super-secret");
        let rendered = format!("{policy:?}");

        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("***"));
    }
}
