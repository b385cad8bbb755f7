#![no_main]

//! Fuzz target for webhook body ingestion.
//!
//! Arbitrary bytes must either be stored as exactly one record or be
//! rejected as an invalid payload, and the history never grows past its
//! capacity.

use std::sync::Arc;

use libfuzzer_sys::fuzz_target;
use payhook_core::{
    ingestor::{parse_payload, payload_preview, PREVIEW_CHARS},
    Headers, Ingestor, PayhookError, QueryParams, SignaturePolicy, TestClock,
};

fuzz_target!(|data: &[u8]| {
    let ingestor = Ingestor::new(2, SignaturePolicy::Disabled, Arc::new(TestClock::new()));
    let headers = Headers::new();
    let query = QueryParams::new();

    match ingestor.ingest(data, &headers, &query) {
        Ok(_) => {
            assert_eq!(ingestor.len(), 1);
            let record = &ingestor.list_history()[0];
            assert!(payload_preview(&record.payload).chars().count() <= PREVIEW_CHARS);
        },
        Err(PayhookError::InvalidPayload { .. }) => assert!(ingestor.is_empty()),
        Err(other) => panic!("unexpected error for unsigned ingest: {other}"),
    }

    for _ in 0..3 {
        let _ = ingestor.ingest(data, &headers, &query);
    }
    assert!(ingestor.len() <= 2);

    if let Ok(value) = parse_payload(data) {
        let reencoded = serde_json::to_vec(&value).expect("value serializes");
        assert!(parse_payload(&reencoded).is_ok());
    }
});
