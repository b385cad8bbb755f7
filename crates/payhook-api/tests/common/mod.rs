//! Shared helpers for router-level tests.

#![allow(dead_code)]

use std::{
    sync::Arc,
    time::{Duration, UNIX_EPOCH},
};

use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use payhook_api::{create_router, AppState, HttpLimits};
use payhook_core::{Ingestor, SignaturePolicy, TestClock};
use serde_json::Value;

/// 2024-01-15T10:30:00Z
pub const FIXED_EPOCH_SECS: u64 = 1_705_314_600;

/// Router plus handles to the state behind it.
pub struct TestApp {
    pub router: Router,
    pub ingestor: Arc<Ingestor>,
    pub clock: TestClock,
}

impl TestApp {
    /// App with verification disabled and default limits.
    pub fn new() -> Self {
        Self::with(SignaturePolicy::Disabled, 10, HttpLimits::default())
    }

    /// App requiring `X-Signature` signed with `secret`.
    pub fn with_secret(secret: &str) -> Self {
        Self::with(SignaturePolicy::required("X-Signature", secret), 10, HttpLimits::default())
    }

    pub fn with(policy: SignaturePolicy, capacity: usize, limits: HttpLimits) -> Self {
        let clock = TestClock::with_start_time(UNIX_EPOCH + Duration::from_secs(FIXED_EPOCH_SECS));
        let ingestor = Arc::new(Ingestor::new(capacity, policy, Arc::new(clock.clone())));
        let state = AppState::new(Arc::clone(&ingestor), Arc::new(clock.clone()), limits)
            .expect("state builds");

        Self { router: create_router(state), ingestor, clock }
    }
}

/// Builds a JSON `POST /webhook` request.
pub fn webhook_request(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/webhook")
        .header("content-type", "application/json")
        .body(body.into())
        .expect("build request")
}

/// Builds a `GET` request.
pub fn get(uri: &str) -> Request<Body> {
    Request::builder().method("GET").uri(uri).body(Body::empty()).expect("build request")
}

/// Reads a response body as JSON.
pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.expect("read body");
    serde_json::from_slice(&bytes).expect("response is JSON")
}

/// Reads a response body as text.
pub async fn text_body(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.expect("read body");
    String::from_utf8(bytes.to_vec()).expect("response is UTF-8")
}
