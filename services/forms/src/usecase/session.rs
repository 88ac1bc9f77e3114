use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::domain::repository::{AuthCodeRepository, SessionRepository};
use crate::domain::types::NewSession;
use crate::error::FormsServiceError;
use crate::secrets;

// ── VerifyCode (login step 2) ─────────────────────────────────────────────────

pub struct VerifyLoginCodeInput {
    pub email: String,
    pub code: String,
    pub challenge_id: String,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug)]
pub struct VerifyLoginCodeOutput {
    /// Plaintext session token for the cookie; never stored or logged.
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

pub struct VerifyLoginCodeUseCase<A, S>
where
    A: AuthCodeRepository,
    S: SessionRepository,
{
    pub auth_codes: A,
    pub sessions: S,
    pub session_ttl_hours: i64,
}

impl<A, S> VerifyLoginCodeUseCase<A, S>
where
    A: AuthCodeRepository,
    S: SessionRepository,
{
    pub async fn execute(
        &self,
        input: VerifyLoginCodeInput,
    ) -> Result<VerifyLoginCodeOutput, FormsServiceError> {
        // 1. Presence checks → 400
        let email = input.email.trim().to_lowercase();
        let code = input.code.trim();
        let challenge_id = input.challenge_id.trim();
        if email.is_empty() || code.is_empty() || challenge_id.is_empty() {
            return Err(FormsServiceError::BadRequest(
                "Missing required fields.".to_owned(),
            ));
        }

        // 2. Active code for (challenge, email) → one generic 401 for every miss
        let record = self
            .auth_codes
            .find_active(challenge_id, &email)
            .await?
            .ok_or(FormsServiceError::InvalidCode)?;

        // 3. Recompute the bound digest
        if secrets::code_digest(code, &email, challenge_id) != record.code_hash {
            return Err(FormsServiceError::InvalidCode);
        }

        // 4. Consume exactly once; losing the race is the same 401
        if !self.auth_codes.consume(&record.id).await? {
            return Err(FormsServiceError::InvalidCode);
        }

        // 5. Mint the opaque session token; store only its digest
        let token = secrets::generate_session_token();
        let now = Utc::now();
        let expires_at = now + Duration::hours(self.session_ttl_hours);
        let session = NewSession {
            id: Uuid::new_v4().to_string(),
            email,
            token_hash: secrets::session_digest(&token),
            expires_at,
            last_used_at: now,
            ip: input.ip,
            user_agent: input.user_agent,
        };
        self.sessions.create(&session).await?;

        tracing::info!(session_id = %session.id, "session created");
        Ok(VerifyLoginCodeOutput { token, expires_at })
    }
}

// ── ResolveSession ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SessionIdentity {
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

pub struct ResolveSessionUseCase<S: SessionRepository> {
    pub sessions: S,
}

impl<S: SessionRepository> ResolveSessionUseCase<S> {
    /// `Ok(None)` is "no usable session"; callers surface that as 401.
    pub async fn execute(
        &self,
        token: Option<&str>,
    ) -> Result<Option<SessionIdentity>, FormsServiceError> {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return Ok(None);
        };
        let Some(session) = self
            .sessions
            .find_active_by_token_hash(&secrets::session_digest(token))
            .await?
        else {
            return Ok(None);
        };

        // Best-effort activity stamp; a failed touch never fails the request.
        if let Err(e) = self.sessions.touch(&session.id).await {
            tracing::warn!(error = %e, "session touch failed");
        }

        Ok(Some(SessionIdentity {
            email: session.email,
            expires_at: session.expires_at,
        }))
    }
}

// ── Logout ────────────────────────────────────────────────────────────────────

pub struct LogoutUseCase<S: SessionRepository> {
    pub sessions: S,
}

impl<S: SessionRepository> LogoutUseCase<S> {
    /// Deleting an absent or unknown token is still a success; logout is
    /// idempotent.
    pub async fn execute(&self, token: Option<&str>) -> Result<(), FormsServiceError> {
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            self.sessions
                .delete_by_token_hash(&secrets::session_digest(token))
                .await?;
        }
        Ok(())
    }
}
