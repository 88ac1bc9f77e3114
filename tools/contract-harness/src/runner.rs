//! HTTP request runner — sends one fixture request and checks the response
//! against the fixture's expectations.

use std::time::Duration;

use reqwest::Client;

use crate::fixture::{Expect, Fixture};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Outcome of one fixture assertion.
pub struct RunResult {
    pub expected_status: u16,
    pub actual_status: Option<u16>,
    /// Expected headers that were missing or carried the wrong value.
    pub header_mismatches: Vec<String>,
    /// Set when `expect.body` was given and the actual body differed.
    pub body_mismatch: Option<String>,
    /// Set when the request never produced a response (bad method,
    /// connection refused, timeout).
    pub error: Option<String>,
}

impl RunResult {
    pub fn passed(&self) -> bool {
        self.error.is_none()
            && self.actual_status == Some(self.expected_status)
            && self.header_mismatches.is_empty()
            && self.body_mismatch.is_none()
    }

    fn failed_to_send(expected_status: u16, error: String) -> Self {
        Self {
            expected_status,
            actual_status: None,
            header_mismatches: Vec::new(),
            body_mismatch: None,
            error: Some(error),
        }
    }
}

pub struct Runner {
    client: Client,
    base_url: String,
}

impl Runner {
    pub fn new(base_url: &str) -> Self {
        Self {
            // A hung service should fail the run, not stall it.
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    pub async fn run(&self, fixture: &Fixture) -> RunResult {
        let url = format!("{}{}", self.base_url, fixture.request.path);
        let expected_status = fixture.expect.status;

        let method =
            match reqwest::Method::from_bytes(fixture.request.method.to_uppercase().as_bytes()) {
                Ok(m) => m,
                Err(_) => {
                    return RunResult::failed_to_send(
                        expected_status,
                        format!("unknown HTTP method: {}", fixture.request.method),
                    );
                }
            };

        let mut req = self.client.request(method, &url);
        for (k, v) in &fixture.request.headers {
            req = req.header(k, v);
        }
        if let Some(body) = &fixture.request.body {
            req = req.json(body);
        }

        let resp = match req.send().await {
            Ok(resp) => resp,
            Err(e) => return RunResult::failed_to_send(expected_status, e.to_string()),
        };

        let actual_status = resp.status().as_u16();
        let header_mismatches = check_headers(&fixture.expect, resp.headers());
        let body_mismatch = match &fixture.expect.body {
            Some(expected_body) => {
                let body_text = resp.text().await.unwrap_or_default();
                check_body(expected_body, &body_text)
            }
            None => None,
        };

        RunResult {
            expected_status,
            actual_status: Some(actual_status),
            header_mismatches,
            body_mismatch,
            error: None,
        }
    }
}

/// Subset match: every expected header must be present with the exact
/// value; headers the fixture doesn't name are ignored.
fn check_headers(expect: &Expect, headers: &reqwest::header::HeaderMap) -> Vec<String> {
    let mut mismatches = Vec::new();
    for (name, expected_val) in &expect.headers {
        match headers.get(name.as_str()) {
            Some(actual_val) if actual_val.to_str().unwrap_or("") == expected_val => {}
            Some(actual_val) => {
                mismatches.push(format!(
                    "{name}: expected {:?}, got {:?}",
                    expected_val,
                    actual_val.to_str().unwrap_or("<non-utf8>")
                ));
            }
            None => {
                mismatches.push(format!("{name}: missing (expected {expected_val:?})"));
            }
        }
    }
    mismatches
}

/// Exact match on the parsed JSON, so key order and whitespace never
/// cause false failures.
fn check_body(expected: &serde_json::Value, actual_text: &str) -> Option<String> {
    let actual: serde_json::Value =
        serde_json::from_str(actual_text).unwrap_or(serde_json::Value::Null);
    if &actual != expected {
        Some(format!("body: expected {expected}, got {actual}"))
    } else {
        None
    }
}
