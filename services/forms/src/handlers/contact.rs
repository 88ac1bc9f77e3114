use axum::{Json, extract::State, response::IntoResponse};
use serde::Deserialize;

use crate::error::FormsServiceError;
use crate::state::AppState;
use crate::usecase::contact::{ContactInput, ContactUseCase};

use super::SuccessResponse;

// ── POST /api/contact ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    /// Honeypot; real users leave it empty.
    #[serde(default)]
    pub website: Option<String>,
    /// Form load time, epoch milliseconds.
    #[serde(default)]
    pub started_at: Option<i64>,
}

pub async fn contact(
    State(state): State<AppState>,
    Json(body): Json<ContactRequest>,
) -> Result<impl IntoResponse, FormsServiceError> {
    let usecase = ContactUseCase {
        mailer: state.mailer(),
        contact_to: state.config.contact_to.clone(),
    };
    // Discarded spam lands here too: the response is success either way.
    usecase
        .execute(ContactInput {
            name: body.name.unwrap_or_default(),
            email: body.email.unwrap_or_default(),
            message: body.message.unwrap_or_default(),
            website: body.website,
            started_at: body.started_at,
        })
        .await?;
    Ok(Json(SuccessResponse { success: true }))
}
