//! CORS header values for the submission intake endpoint.
//!
//! The effective `Access-Control-Allow-Origin` depends on how far the
//! intake request got: before the site row is known the handler can only
//! echo the request origin; once the site is loaded the value comes from
//! its allow-list. Preflight responses always mirror the origin — the
//! real policy is enforced on the POST.

use axum::http::{HeaderMap, HeaderValue, header};

/// Allow-origin value before the site (and its allow-list) is known:
/// echo the request origin, `*` when the request carried none.
pub fn echo_origin(request_origin: Option<&str>) -> String {
    request_origin.unwrap_or("*").to_owned()
}

/// Allow-origin value from a site's allow-list. An empty list admits any
/// origin (mirrored back); a non-empty list mirrors only listed origins
/// and reports `"null"` for everything else.
pub fn allow_origin_value(allowed: &[String], request_origin: Option<&str>) -> String {
    if allowed.is_empty() {
        return echo_origin(request_origin);
    }
    match request_origin {
        Some(origin) if allowed.iter().any(|a| a == origin) => origin.to_owned(),
        Some(_) => "null".to_owned(),
        // Non-browser callers send no Origin; nothing to mirror.
        None => "null".to_owned(),
    }
}

/// True when the submission must be rejected outright: the list is
/// non-empty, the request carried an Origin, and it is not listed.
/// Origin-less (server-to-server) requests pass.
pub fn origin_rejected(allowed: &[String], request_origin: Option<&str>) -> bool {
    match request_origin {
        Some(origin) => !allowed.is_empty() && !allowed.iter().any(|a| a == origin),
        None => false,
    }
}

/// Headers for the intake POST response (success or policy failure).
pub fn submit_headers(allow_origin: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        header_value(allow_origin),
    );
    headers
}

/// Headers for the unconditional OPTIONS preflight response, cacheable
/// for 24 hours.
pub fn preflight_headers(request_origin: Option<&str>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        header_value(&echo_origin(request_origin)),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type, X-Forms-Site-Key"),
    );
    headers.insert(
        header::ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from_static("86400"),
    );
    headers
}

fn header_value(value: &str) -> HeaderValue {
    // Origin strings that fail header encoding are degraded, not fatal.
    HeaderValue::from_str(value).unwrap_or(HeaderValue::from_static("null"))
}
