use axum::{
    Router,
    routing::{get, options, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers::{
    admin::{list_sites, list_submissions},
    auth::{login, logout, me, verify},
    contact::contact,
    submit::{submit, submit_preflight},
};
use crate::health::{healthz, readyz};
use crate::middleware::request_id_layer;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Dashboard auth
        .route("/api/forms/login", post(login))
        .route("/api/forms/verify", post(verify))
        .route("/api/forms/logout", post(logout))
        .route("/api/forms/me", get(me))
        // Admin queries
        .route("/api/forms/sites", get(list_sites))
        .route("/api/forms/submissions", get(list_submissions))
        // Site intake
        .route("/api/forms/submit", post(submit))
        .route("/api/forms/submit", options(submit_preflight))
        // Legacy contact form
        .route("/api/contact", post(contact))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
