//! Row store backed implementations of the domain ports. Each method is
//! one round trip; filters are rendered by `TableQuery` so the collection
//! names and column grammar live here, not in the usecases.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::domain::repository::{
    AuthCodeRepository, SessionRepository, SiteRepository, SubmissionRepository,
};
use crate::domain::types::{
    AuthCode, NewAuthCode, NewSession, NewSubmission, Session, Site, SiteSummary, SubmissionRecord,
};
use crate::error::FormsServiceError;
use crate::infra::rowstore::{DataStoreError, Order, RowStore, TableQuery};

const AUTH_CODES: &str = "forms_auth_codes";
const SESSIONS: &str = "forms_sessions";
const SITES: &str = "forms_sites";
const SUBMISSIONS: &str = "forms_submissions";

/// Dashboard read projection; ip and user_agent stay out of this path.
const SUBMISSION_COLUMNS: &str = "id,site_id,form_id,submitted_at,origin,page_url,referrer,data";

fn decode_row<T: DeserializeOwned>(row: Value) -> Result<T, FormsServiceError> {
    serde_json::from_value(row).map_err(|e| DataStoreError::from(e).into())
}

fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>) -> Result<Vec<T>, FormsServiceError> {
    serde_json::from_value(Value::Array(rows)).map_err(|e| DataStoreError::from(e).into())
}

// ── Auth codes ──────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct StoreAuthCodeRepository {
    pub store: RowStore,
}

impl AuthCodeRepository for StoreAuthCodeRepository {
    async fn create(&self, code: &NewAuthCode) -> Result<(), FormsServiceError> {
        let row = serde_json::to_value(code).map_err(DataStoreError::from)?;
        self.store.insert(AUTH_CODES, &row).await?;
        Ok(())
    }

    async fn find_active(
        &self,
        challenge_id: &str,
        email: &str,
    ) -> Result<Option<AuthCode>, FormsServiceError> {
        let query = TableQuery::table(AUTH_CODES)
            .eq("id", challenge_id)
            .eq("email", email)
            .is_null("consumed_at")
            .gt("expires_at", &Utc::now().to_rfc3339())
            .limit(1);
        let rows = self.store.select(&query).await?;
        rows.into_iter().next().map(decode_row).transpose()
    }

    async fn consume(&self, challenge_id: &str) -> Result<bool, FormsServiceError> {
        // The consumed_at filter makes this conditional: when a concurrent
        // verify already stamped the row, zero rows come back.
        let query = TableQuery::table(AUTH_CODES)
            .eq("id", challenge_id)
            .is_null("consumed_at");
        let patch = json!({ "consumed_at": Utc::now().to_rfc3339() });
        let rows = self.store.update_returning(&query, &patch).await?;
        Ok(!rows.is_empty())
    }
}

// ── Sessions ────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct StoreSessionRepository {
    pub store: RowStore,
}

impl SessionRepository for StoreSessionRepository {
    async fn create(&self, session: &NewSession) -> Result<(), FormsServiceError> {
        let row = serde_json::to_value(session).map_err(DataStoreError::from)?;
        self.store.insert(SESSIONS, &row).await?;
        Ok(())
    }

    async fn find_active_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<Session>, FormsServiceError> {
        let query = TableQuery::table(SESSIONS)
            .eq("token_hash", token_hash)
            .gt("expires_at", &Utc::now().to_rfc3339())
            .limit(1);
        let rows = self.store.select(&query).await?;
        rows.into_iter().next().map(decode_row).transpose()
    }

    async fn touch(&self, id: &str) -> Result<(), FormsServiceError> {
        let query = TableQuery::table(SESSIONS).eq("id", id);
        let patch = json!({ "last_used_at": Utc::now().to_rfc3339() });
        self.store.update(&query, &patch).await?;
        Ok(())
    }

    async fn delete_by_token_hash(&self, token_hash: &str) -> Result<(), FormsServiceError> {
        let query = TableQuery::table(SESSIONS).eq("token_hash", token_hash);
        self.store.delete(&query).await?;
        Ok(())
    }
}

// ── Sites ───────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct StoreSiteRepository {
    pub store: RowStore,
}

impl SiteRepository for StoreSiteRepository {
    async fn find_by_site_id(&self, site_id: &str) -> Result<Option<Site>, FormsServiceError> {
        let query = TableQuery::table(SITES).eq("site_id", site_id).limit(1);
        let rows = self.store.select(&query).await?;
        rows.into_iter().next().map(decode_row).transpose()
    }

    async fn list(&self) -> Result<Vec<SiteSummary>, FormsServiceError> {
        let query = TableQuery::table(SITES)
            .select("site_id,site_name,allowed_origins")
            .order("site_id", Order::Asc);
        let rows = self.store.select(&query).await?;
        decode_rows(rows)
    }
}

// ── Submissions ─────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct StoreSubmissionRepository {
    pub store: RowStore,
}

impl SubmissionRepository for StoreSubmissionRepository {
    async fn create(&self, submission: &NewSubmission) -> Result<(), FormsServiceError> {
        let row = serde_json::to_value(submission).map_err(DataStoreError::from)?;
        self.store.insert(SUBMISSIONS, &row).await?;
        Ok(())
    }

    async fn list_recent(
        &self,
        limit: u32,
        site_id: Option<&str>,
    ) -> Result<Vec<SubmissionRecord>, FormsServiceError> {
        let mut query = TableQuery::table(SUBMISSIONS)
            .select(SUBMISSION_COLUMNS)
            .order("submitted_at", Order::Desc)
            .limit(limit);
        if let Some(site_id) = site_id {
            query = query.eq("site_id", site_id);
        }
        let rows = self.store.select(&query).await?;
        decode_rows(rows)
    }
}
