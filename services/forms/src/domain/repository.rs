#![allow(async_fn_in_trait)]

//! Ports the usecases talk to. The row store implementations live in
//! `infra::store`; tests substitute in-memory mocks.

use crate::domain::types::{
    AuthCode, NewAuthCode, NewSession, NewSubmission, OutboundEmail, Session, Site, SiteSummary,
    SubmissionRecord,
};
use crate::error::FormsServiceError;

pub trait AuthCodeRepository: Send + Sync {
    async fn create(&self, code: &NewAuthCode) -> Result<(), FormsServiceError>;

    /// Unexpired, unconsumed code matching both the challenge id and the
    /// email it was issued for.
    async fn find_active(
        &self,
        challenge_id: &str,
        email: &str,
    ) -> Result<Option<AuthCode>, FormsServiceError>;

    /// Marks the code consumed if nobody has beaten us to it. Returns true
    /// only when this call performed the transition.
    async fn consume(&self, challenge_id: &str) -> Result<bool, FormsServiceError>;
}

pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: &NewSession) -> Result<(), FormsServiceError>;

    async fn find_active_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<Session>, FormsServiceError>;

    /// Stamps `last_used_at`. Callers treat failures as non-fatal.
    async fn touch(&self, id: &str) -> Result<(), FormsServiceError>;

    async fn delete_by_token_hash(&self, token_hash: &str) -> Result<(), FormsServiceError>;
}

pub trait SiteRepository: Send + Sync {
    async fn find_by_site_id(&self, site_id: &str) -> Result<Option<Site>, FormsServiceError>;

    /// Every registered site, shaped for the dashboard (no keys).
    async fn list(&self) -> Result<Vec<SiteSummary>, FormsServiceError>;
}

pub trait SubmissionRepository: Send + Sync {
    async fn create(&self, submission: &NewSubmission) -> Result<(), FormsServiceError>;

    /// Newest first, optionally scoped to one site.
    async fn list_recent(
        &self,
        limit: u32,
        site_id: Option<&str>,
    ) -> Result<Vec<SubmissionRecord>, FormsServiceError>;
}

pub trait MailPort: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<(), FormsServiceError>;
}
