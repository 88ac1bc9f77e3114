use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::infra::mail::MailError;
use crate::infra::rowstore::DataStoreError;

/// Forms service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum FormsServiceError {
    #[error("{0}")]
    BadRequest(String),
    #[error("Not authorized.")]
    EmailNotAuthorized,
    #[error("Invalid or expired code.")]
    InvalidCode,
    #[error("Not authenticated.")]
    NoSession,
    #[error("Invalid site.")]
    InvalidSite,
    #[error("Invalid site key.")]
    InvalidSiteKey,
    #[error("Origin not allowed.")]
    OriginNotAllowed,
    #[error("Data store unavailable.")]
    DataStore(#[from] DataStoreError),
    #[error("Mail delivery failed.")]
    Mail(#[from] MailError),
    #[error("Internal error.")]
    Internal(#[from] anyhow::Error),
}

impl FormsServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::EmailNotAuthorized => "NOT_AUTHORIZED",
            Self::InvalidCode => "INVALID_CODE",
            Self::NoSession => "NO_SESSION",
            Self::InvalidSite => "INVALID_SITE",
            Self::InvalidSiteKey => "INVALID_SITE_KEY",
            Self::OriginNotAllowed => "ORIGIN_NOT_ALLOWED",
            Self::DataStore(_) => "DATA_STORE",
            Self::Mail(_) => "MAIL_DELIVERY",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for FormsServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::InvalidCode | Self::NoSession | Self::InvalidSite | Self::InvalidSiteKey => {
                StatusCode::UNAUTHORIZED
            }
            Self::EmailNotAuthorized | Self::OriginNotAllowed => StatusCode::FORBIDDEN,
            Self::DataStore(_) | Self::Mail(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        // Log 500s only — tower-http TraceLayer already records method/uri/status for all
        // requests. 4xx are expected client errors; logging them here would be noise.
        // The source detail (upstream status + body, transport error) must never reach
        // the response, so this is the last place it is visible.
        match &self {
            Self::DataStore(e) => {
                tracing::error!(error = %e, kind = "DATA_STORE", "data store call failed");
            }
            Self::Mail(e) => {
                tracing::error!(error = %e, kind = "MAIL_DELIVERY", "mail delivery failed");
            }
            Self::Internal(e) => {
                tracing::error!(error = %e, kind = "INTERNAL", "internal error");
            }
            _ => {}
        }
        let body = serde_json::json!({
            "success": false,
            "kind": self.kind(),
            "error": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
