use axum::http::StatusCode;

/// Handler for `GET /healthz` — liveness check.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Handler for `GET /readyz` — readiness check. The service holds no
/// connections to warm up, so ready equals alive.
pub async fn readyz() -> StatusCode {
    StatusCode::OK
}
