use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cookie::{clear_session_cookie, set_session_cookie};
use crate::error::FormsServiceError;
use crate::state::AppState;
use crate::usecase::authcode::{RequestLoginCodeInput, RequestLoginCodeUseCase};
use crate::usecase::session::{
    LogoutUseCase, ResolveSessionUseCase, SessionIdentity, VerifyLoginCodeInput,
    VerifyLoginCodeUseCase,
};

use super::{SuccessResponse, client_ip, user_agent};

/// Resolve the session cookie to an identity or fail with the uniform 401.
pub(crate) async fn require_session(
    state: &AppState,
    jar: &CookieJar,
) -> Result<SessionIdentity, FormsServiceError> {
    let token = jar
        .get(&state.config.session_cookie)
        .map(|c| c.value().to_owned());
    ResolveSessionUseCase {
        sessions: state.session_repo(),
    }
    .execute(token.as_deref())
    .await?
    .ok_or(FormsServiceError::NoSession)
}

// ── POST /api/forms/login ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub challenge_id: String,
    pub expires_in_minutes: i64,
}

pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, FormsServiceError> {
    let usecase = RequestLoginCodeUseCase {
        auth_codes: state.auth_code_repo(),
        mailer: state.mailer(),
        admin_emails: state.config.admin_emails.clone(),
        code_ttl_minutes: state.config.code_ttl_minutes,
    };
    let out = usecase
        .execute(RequestLoginCodeInput {
            email: body.email.unwrap_or_default(),
            ip: client_ip(&headers),
            user_agent: user_agent(&headers),
        })
        .await?;
    Ok(Json(LoginResponse {
        success: true,
        challenge_id: out.challenge_id,
        expires_in_minutes: out.expires_in_minutes,
    }))
}

// ── POST /api/forms/verify ────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub challenge_id: Option<String>,
}

pub async fn verify(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    Json(body): Json<VerifyRequest>,
) -> Result<impl IntoResponse, FormsServiceError> {
    let usecase = VerifyLoginCodeUseCase {
        auth_codes: state.auth_code_repo(),
        sessions: state.session_repo(),
        session_ttl_hours: state.config.session_ttl_hours,
    };
    let out = usecase
        .execute(VerifyLoginCodeInput {
            email: body.email.unwrap_or_default(),
            code: body.code.unwrap_or_default(),
            challenge_id: body.challenge_id.unwrap_or_default(),
            ip: client_ip(&headers),
            user_agent: user_agent(&headers),
        })
        .await?;

    let jar = set_session_cookie(
        jar,
        &state.config.session_cookie,
        out.token,
        state.config.session_ttl_seconds(),
    );
    Ok((StatusCode::OK, jar, Json(SuccessResponse { success: true })))
}

// ── POST /api/forms/logout ────────────────────────────────────────────────────

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, FormsServiceError> {
    let token = jar
        .get(&state.config.session_cookie)
        .map(|c| c.value().to_owned());
    LogoutUseCase {
        sessions: state.session_repo(),
    }
    .execute(token.as_deref())
    .await?;

    // The clearing directive goes out whether or not a row was deleted.
    let jar = clear_session_cookie(jar, &state.config.session_cookie);
    Ok((StatusCode::OK, jar, Json(SuccessResponse { success: true })))
}

// ── GET /api/forms/me ─────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub success: bool,
    pub email: String,
    #[serde(serialize_with = "crate::serde::to_rfc3339_ms")]
    pub expires_at: DateTime<Utc>,
}

pub async fn me(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, FormsServiceError> {
    let identity = require_session(&state, &jar).await?;
    Ok(Json(MeResponse {
        success: true,
        email: identity.email,
        expires_at: identity.expires_at,
    }))
}
