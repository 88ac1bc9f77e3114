use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One-time login code row. `id` doubles as the challenge id returned to
/// the client, so verification always names a specific row.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthCode {
    pub id: String,
    pub email: String,
    pub code_hash: String,
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    pub consumed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl AuthCode {
    pub fn is_active(&self) -> bool {
        self.consumed_at.is_none() && self.expires_at > Utc::now()
    }
}

/// Insert shape for a login code. The plaintext code is hashed before it
/// gets here; `consumed_at` starts null by omission.
#[derive(Debug, Clone, Serialize)]
pub struct NewAuthCode {
    pub id: String,
    pub email: String,
    pub code_hash: String,
    pub expires_at: DateTime<Utc>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

/// Dashboard session row. Only the token digest is stored; the plaintext
/// token lives in the client cookie.
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    pub id: String,
    pub email: String,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    pub last_used_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Session {
    pub fn is_active(&self) -> bool {
        self.expires_at > Utc::now()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewSession {
    pub id: String,
    pub email: String,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub last_used_at: DateTime<Utc>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

/// Client site registration, provisioned out of band. `site_key` is the
/// shared secret presented by the embed script; an empty `allowed_origins`
/// list admits any origin.
#[derive(Debug, Clone, Deserialize)]
pub struct Site {
    pub site_id: String,
    pub site_name: String,
    pub site_key: String,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Site projection for the dashboard list — never exposes `site_key`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSummary {
    pub site_id: String,
    pub site_name: String,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Insert shape for an accepted submission. `data` is stored verbatim.
#[derive(Debug, Clone, Serialize)]
pub struct NewSubmission {
    pub site_id: String,
    pub form_id: Option<String>,
    pub data: Map<String, Value>,
    pub origin: Option<String>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub page_url: Option<String>,
    pub referrer: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

/// Submission row as read back for the dashboard. The projection
/// deliberately omits ip and user_agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub id: String,
    pub site_id: String,
    #[serde(default)]
    pub form_id: Option<String>,
    #[serde(serialize_with = "crate::serde::to_rfc3339_ms")]
    pub submitted_at: DateTime<Utc>,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub page_url: Option<String>,
    #[serde(default)]
    pub referrer: Option<String>,
    #[serde(default)]
    pub data: Map<String, Value>,
}

/// One outbound email handed to the mail port.
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}
