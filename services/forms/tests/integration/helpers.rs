use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};

use tfm_forms::domain::repository::{
    AuthCodeRepository, MailPort, SessionRepository, SiteRepository, SubmissionRepository,
};
use tfm_forms::domain::types::{
    AuthCode, NewAuthCode, NewSession, NewSubmission, OutboundEmail, Session, Site, SiteSummary,
    SubmissionRecord,
};
use tfm_forms::error::FormsServiceError;
use tfm_forms::infra::mail::MailError;
use tfm_forms::infra::rowstore::DataStoreError;

fn mock_store_error() -> FormsServiceError {
    FormsServiceError::DataStore(DataStoreError::Upstream {
        status: 500,
        body: "mock store failure".to_owned(),
    })
}

// ── MockAuthCodeRepo ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockAuthCodeRepo {
    pub codes: Arc<Mutex<Vec<AuthCode>>>,
    /// When set, `consume` reports that another request won the race.
    pub lose_consume_race: bool,
}

impl MockAuthCodeRepo {
    pub fn new(codes: Vec<AuthCode>) -> Self {
        Self {
            codes: Arc::new(Mutex::new(codes)),
            lose_consume_race: false,
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Shared handle to the stored codes for post-execution inspection.
    pub fn codes_handle(&self) -> Arc<Mutex<Vec<AuthCode>>> {
        Arc::clone(&self.codes)
    }
}

impl AuthCodeRepository for MockAuthCodeRepo {
    async fn create(&self, code: &NewAuthCode) -> Result<(), FormsServiceError> {
        self.codes.lock().unwrap().push(AuthCode {
            id: code.id.clone(),
            email: code.email.clone(),
            code_hash: code.code_hash.clone(),
            expires_at: code.expires_at,
            consumed_at: None,
            ip: code.ip.clone(),
            user_agent: code.user_agent.clone(),
        });
        Ok(())
    }

    async fn find_active(
        &self,
        challenge_id: &str,
        email: &str,
    ) -> Result<Option<AuthCode>, FormsServiceError> {
        Ok(self
            .codes
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == challenge_id && c.email == email && c.is_active())
            .cloned())
    }

    async fn consume(&self, challenge_id: &str) -> Result<bool, FormsServiceError> {
        if self.lose_consume_race {
            return Ok(false);
        }
        let mut codes = self.codes.lock().unwrap();
        match codes
            .iter_mut()
            .find(|c| c.id == challenge_id && c.consumed_at.is_none())
        {
            Some(code) => {
                code.consumed_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

// ── MockSessionRepo ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockSessionRepo {
    pub sessions: Arc<Mutex<Vec<Session>>>,
    /// When set, `touch` fails the way a dead row store would.
    pub fail_touch: bool,
}

impl MockSessionRepo {
    pub fn new(sessions: Vec<Session>) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(sessions)),
            fail_touch: false,
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn sessions_handle(&self) -> Arc<Mutex<Vec<Session>>> {
        Arc::clone(&self.sessions)
    }
}

impl SessionRepository for MockSessionRepo {
    async fn create(&self, session: &NewSession) -> Result<(), FormsServiceError> {
        self.sessions.lock().unwrap().push(Session {
            id: session.id.clone(),
            email: session.email.clone(),
            token_hash: session.token_hash.clone(),
            expires_at: session.expires_at,
            last_used_at: Some(session.last_used_at),
            ip: session.ip.clone(),
            user_agent: session.user_agent.clone(),
        });
        Ok(())
    }

    async fn find_active_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<Session>, FormsServiceError> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.token_hash == token_hash && s.is_active())
            .cloned())
    }

    async fn touch(&self, id: &str) -> Result<(), FormsServiceError> {
        if self.fail_touch {
            return Err(mock_store_error());
        }
        let mut sessions = self.sessions.lock().unwrap();
        if let Some(s) = sessions.iter_mut().find(|s| s.id == id) {
            s.last_used_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn delete_by_token_hash(&self, token_hash: &str) -> Result<(), FormsServiceError> {
        self.sessions
            .lock()
            .unwrap()
            .retain(|s| s.token_hash != token_hash);
        Ok(())
    }
}

// ── MockSiteRepo ─────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockSiteRepo {
    pub sites: Vec<Site>,
}

impl MockSiteRepo {
    pub fn new(sites: Vec<Site>) -> Self {
        Self { sites }
    }
}

impl SiteRepository for MockSiteRepo {
    async fn find_by_site_id(&self, site_id: &str) -> Result<Option<Site>, FormsServiceError> {
        Ok(self.sites.iter().find(|s| s.site_id == site_id).cloned())
    }

    async fn list(&self) -> Result<Vec<SiteSummary>, FormsServiceError> {
        let mut summaries: Vec<SiteSummary> = self
            .sites
            .iter()
            .map(|s| SiteSummary {
                site_id: s.site_id.clone(),
                site_name: s.site_name.clone(),
                allowed_origins: s.allowed_origins.clone(),
            })
            .collect();
        summaries.sort_by(|a, b| a.site_id.cmp(&b.site_id));
        Ok(summaries)
    }
}

// ── MockSubmissionRepo ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockSubmissionRepo {
    pub submissions: Arc<Mutex<Vec<NewSubmission>>>,
    /// Arguments of the most recent `list_recent` call.
    pub last_query: Arc<Mutex<Option<(u32, Option<String>)>>>,
}

impl MockSubmissionRepo {
    pub fn empty() -> Self {
        Self {
            submissions: Arc::new(Mutex::new(vec![])),
            last_query: Arc::new(Mutex::new(None)),
        }
    }

    pub fn submissions_handle(&self) -> Arc<Mutex<Vec<NewSubmission>>> {
        Arc::clone(&self.submissions)
    }

    pub fn last_query(&self) -> Option<(u32, Option<String>)> {
        self.last_query.lock().unwrap().clone()
    }
}

impl SubmissionRepository for MockSubmissionRepo {
    async fn create(&self, submission: &NewSubmission) -> Result<(), FormsServiceError> {
        self.submissions.lock().unwrap().push(submission.clone());
        Ok(())
    }

    async fn list_recent(
        &self,
        limit: u32,
        site_id: Option<&str>,
    ) -> Result<Vec<SubmissionRecord>, FormsServiceError> {
        *self.last_query.lock().unwrap() = Some((limit, site_id.map(ToOwned::to_owned)));
        let rows = self.submissions.lock().unwrap();
        let mut records: Vec<SubmissionRecord> = rows
            .iter()
            .enumerate()
            .filter(|(_, s)| site_id.is_none_or(|id| s.site_id == id))
            .map(|(i, s)| SubmissionRecord {
                id: format!("sub-{i}"),
                site_id: s.site_id.clone(),
                form_id: s.form_id.clone(),
                submitted_at: s.submitted_at,
                origin: s.origin.clone(),
                page_url: s.page_url.clone(),
                referrer: s.referrer.clone(),
                data: s.data.clone(),
            })
            .collect();
        records.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        records.truncate(limit as usize);
        Ok(records)
    }
}

// ── MockMailer ───────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockMailer {
    pub sent: Arc<Mutex<Vec<OutboundEmail>>>,
    pub fail: bool,
}

impl MockMailer {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(vec![])),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            sent: Arc::new(Mutex::new(vec![])),
            fail: true,
        }
    }

    pub fn sent_handle(&self) -> Arc<Mutex<Vec<OutboundEmail>>> {
        Arc::clone(&self.sent)
    }
}

impl MailPort for MockMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), FormsServiceError> {
        if self.fail {
            return Err(FormsServiceError::Mail(MailError::Upstream {
                status: 500,
                body: "mock provider failure".to_owned(),
            }));
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

// ── Test fixture helpers ─────────────────────────────────────────────────────

pub const ADMIN_EMAIL: &str = "ops@example.com";

pub fn admin_allow_list() -> Vec<String> {
    vec![ADMIN_EMAIL.to_owned()]
}

pub fn test_site(site_id: &str, site_key: &str, allowed_origins: Vec<&str>) -> Site {
    Site {
        site_id: site_id.to_owned(),
        site_name: format!("{site_id} marketing site"),
        site_key: site_key.to_owned(),
        allowed_origins: allowed_origins.into_iter().map(ToOwned::to_owned).collect(),
    }
}

/// A stored, unconsumed login code plus its plaintext. The digest binds
/// the code to both the email and the challenge id.
pub fn seeded_code(email: &str) -> (AuthCode, String) {
    let plaintext = "123456".to_owned();
    let challenge_id = uuid::Uuid::new_v4().to_string();
    let code = AuthCode {
        id: challenge_id.clone(),
        email: email.to_owned(),
        code_hash: tfm_forms::secrets::code_digest(&plaintext, email, &challenge_id),
        expires_at: Utc::now() + Duration::minutes(10),
        consumed_at: None,
        ip: None,
        user_agent: None,
    };
    (code, plaintext)
}

/// A stored session plus the plaintext token its hash was derived from.
pub fn seeded_session(email: &str) -> (Session, String) {
    let token = "test-session-token-value".to_owned();
    let session = Session {
        id: uuid::Uuid::new_v4().to_string(),
        email: email.to_owned(),
        token_hash: tfm_forms::secrets::session_digest(&token),
        expires_at: Utc::now() + Duration::hours(168),
        last_used_at: None,
        ip: None,
        user_agent: None,
    };
    (session, token)
}

/// Pull the 6-digit code out of a login email body.
pub fn extract_code(html: &str) -> String {
    let start = html.find("<strong>").expect("code marker") + "<strong>".len();
    let end = html[start..].find("</strong>").expect("code marker") + start;
    html[start..end].to_owned()
}
