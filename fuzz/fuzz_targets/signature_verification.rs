#![no_main]

//! Fuzz target for HMAC signature verification.
//!
//! Splits the input into a secret, a candidate signature and a body.
//! Verification must never panic and must only accept the exact digest.

use libfuzzer_sys::fuzz_target;
use payhook_core::{generate_hmac_hex, verify_signature};

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let secret_len = usize::from(data[0]) % data.len();
    let signature_len = usize::from(data[1]) % (data.len() - secret_len);
    let (secret, rest) = data[2..].split_at(secret_len.min(data.len() - 2));
    let (signature, body) = rest.split_at(signature_len.min(rest.len()));

    let secret = String::from_utf8_lossy(secret);
    let signature = String::from_utf8_lossy(signature);

    let Ok(expected) = generate_hmac_hex(body, &secret) else {
        return;
    };

    assert!(verify_signature(body, Some(&expected), &secret));
    assert_eq!(verify_signature(body, Some(&signature), &secret), signature == expected);
    assert!(!verify_signature(body, None, &secret));
});
