pub mod admin;
pub mod auth;
pub mod contact;
pub mod submit;

use axum::http::{HeaderMap, header};
use serde::Serialize;

/// Bare `{"success": true}` body shared by the write-style endpoints.
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// First hop of x-forwarded-for, falling back to x-real-ip. The service
/// sits behind a proxy, so the socket peer address is never the caller.
pub(crate) fn client_ip(headers: &HeaderMap) -> Option<String> {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        let first = forwarded.split(',').next().map(str::trim).unwrap_or("");
        if !first.is_empty() {
            return Some(first.to_owned());
        }
    }
    headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

pub(crate) fn user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(ToOwned::to_owned)
}

pub(crate) fn origin(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(ToOwned::to_owned)
}

pub(crate) fn referer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
        .map(ToOwned::to_owned)
}
