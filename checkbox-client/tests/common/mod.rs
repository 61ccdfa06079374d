// checkbox-client/tests/common/mod.rs
// Scripted effects with a virtual clock, shared by the integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use checkbox_client::{ClientConfig, ClientResult, Effects, PreparedRequest, RawResponse};
use serde_json::Value;

pub const SERVER_DATE: &str = "Tue, 15 Oct 2024 08:30:05 GMT";

pub const SHIFT_ID: &str = "5e9a4a3c-2f7b-4a57-8d7c-0b2a6f7c1e01";
pub const RECEIPT_ID: &str = "7d1f0c55-9b3e-4a7e-9d0a-3c1e2b4f5a02";
pub const TRANSACTION_ID: &str = "0b8e6a1d-4c2f-4e3b-a5d6-7f8091a2b303";

/// Answers requests from a script. The last response is repeated once the
/// script runs out. `pause` advances a virtual clock instead of sleeping.
pub struct ScriptedEffects {
    script: Mutex<VecDeque<RawResponse>>,
    requests: Mutex<Vec<PreparedRequest>>,
    pauses: Mutex<Vec<Duration>>,
    base: Instant,
    offset: Mutex<Duration>,
}

impl ScriptedEffects {
    pub fn new<I: IntoIterator<Item = RawResponse>>(responses: I) -> Self {
        Self {
            script: Mutex::new(responses.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
            pauses: Mutex::new(Vec::new()),
            base: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    pub fn json<I: IntoIterator<Item = Value>>(bodies: I) -> Self {
        Self::new(bodies.into_iter().map(|body| ok(&body)))
    }

    pub fn requests(&self) -> Vec<PreparedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.path).collect()
    }

    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses.lock().unwrap().clone()
    }

    pub fn elapsed(&self) -> Duration {
        *self.offset.lock().unwrap()
    }
}

#[async_trait]
impl Effects for ScriptedEffects {
    async fn send(&self, request: PreparedRequest) -> ClientResult<RawResponse> {
        self.requests.lock().unwrap().push(request);
        let mut script = self.script.lock().unwrap();
        let response = if script.len() > 1 {
            script.pop_front()
        } else {
            script.front().cloned()
        };
        Ok(response.expect("script has no responses"))
    }

    async fn pause(&self, duration: Duration) {
        self.pauses.lock().unwrap().push(duration);
        *self.offset.lock().unwrap() += duration;
    }

    fn now(&self) -> Instant {
        self.base + *self.offset.lock().unwrap()
    }
}

/// 200 response with a JSON body and the fixed server date
pub fn ok(body: &Value) -> RawResponse {
    RawResponse::from_json(200, body).with_header("Date", SERVER_DATE)
}

pub fn status(code: u16, body: &Value) -> RawResponse {
    RawResponse::from_json(code, body)
}

pub fn config() -> ClientConfig {
    ClientConfig::new("https://checkbox.test").with_client("checkbox-client-tests", "0.1.0")
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("checkbox_client=debug")
        .with_test_writer()
        .try_init();
}
