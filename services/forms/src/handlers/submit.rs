use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::Value;

use crate::cors;
use crate::state::AppState;
use crate::usecase::submit::{SubmitFormInput, SubmitFormUseCase};

use super::{SuccessResponse, client_ip, origin, referer, user_agent};

/// Header carrying the site's shared secret from the embed script.
pub const SITE_KEY_HEADER: &str = "x-forms-site-key";

// ── POST /api/forms/submit ────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    #[serde(default)]
    pub site_id: Option<String>,
    #[serde(default)]
    pub form_id: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub meta: Option<SubmitMeta>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SubmitMeta {
    #[serde(default)]
    pub page_url: Option<String>,
    #[serde(default)]
    pub referrer: Option<String>,
}

/// Cross-origin intake. Success and failure responses both carry the
/// resolved Access-Control-Allow-Origin header, so this handler builds the
/// response itself instead of returning `Result<_, FormsServiceError>`.
pub async fn submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<SubmitRequest>,
) -> Response {
    let meta = body.meta.unwrap_or_default();
    let input = SubmitFormInput {
        site_id: body.site_id.unwrap_or_default(),
        form_id: body.form_id,
        data: body.data,
        page_url: meta.page_url,
        referrer: meta.referrer,
        presented_key: headers
            .get(SITE_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(ToOwned::to_owned),
        origin: origin(&headers),
        referer_header: referer(&headers),
        ip: client_ip(&headers),
        user_agent: user_agent(&headers),
    };

    let result = SubmitFormUseCase {
        sites: state.site_repo(),
        submissions: state.submission_repo(),
    }
    .execute(input)
    .await;

    match result {
        Ok(out) => (
            StatusCode::OK,
            cors::submit_headers(&out.allow_origin),
            Json(SuccessResponse { success: true }),
        )
            .into_response(),
        Err(rejection) => {
            let mut response = rejection.error.into_response();
            response
                .headers_mut()
                .extend(cors::submit_headers(&rejection.allow_origin));
            response
        }
    }
}

// ── OPTIONS /api/forms/submit ─────────────────────────────────────────────────

/// Browser preflight. Mirrors any origin; the POST handler applies the
/// per-site policy.
pub async fn submit_preflight(headers: HeaderMap) -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        cors::preflight_headers(origin(&headers).as_deref()),
    )
}
