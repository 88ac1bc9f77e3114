use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use crate::domain::types::{SiteSummary, SubmissionRecord};
use crate::error::FormsServiceError;
use crate::state::AppState;
use crate::usecase::admin::{ListSitesUseCase, ListSubmissionsUseCase};

use super::auth::require_session;

// ── GET /api/forms/sites ──────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct SitesResponse {
    pub success: bool,
    pub sites: Vec<SiteSummary>,
}

pub async fn list_sites(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, FormsServiceError> {
    require_session(&state, &jar).await?;

    let sites = ListSitesUseCase {
        sites: state.site_repo(),
    }
    .execute()
    .await?;
    Ok(Json(SitesResponse {
        success: true,
        sites,
    }))
}

// ── GET /api/forms/submissions ────────────────────────────────────────────────

/// Raw query params. `limit` stays a string so the clamp can decide what
/// non-numeric input means instead of a deserializer rejection.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionsQuery {
    #[serde(default)]
    pub limit: Option<String>,
    #[serde(default)]
    pub site_id: Option<String>,
}

#[derive(Serialize)]
pub struct SubmissionsResponse {
    pub success: bool,
    pub submissions: Vec<SubmissionRecord>,
}

pub async fn list_submissions(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<SubmissionsQuery>,
) -> Result<impl IntoResponse, FormsServiceError> {
    require_session(&state, &jar).await?;

    let submissions = ListSubmissionsUseCase {
        submissions: state.submission_repo(),
    }
    .execute(query.limit.as_deref(), query.site_id.as_deref())
    .await?;
    Ok(Json(SubmissionsResponse {
        success: true,
        submissions,
    }))
}
