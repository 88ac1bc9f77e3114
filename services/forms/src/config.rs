/// Forms service configuration loaded from environment variables.
#[derive(Debug)]
pub struct FormsConfig {
    /// Admin emails allowed to request a login code, normalized to
    /// lowercase. Env var: `FORMS_ADMIN_EMAILS` (comma-separated).
    pub admin_emails: Vec<String>,
    /// One-time login code TTL in minutes (default 10). Env var:
    /// `FORMS_CODE_TTL_MINUTES`.
    pub code_ttl_minutes: i64,
    /// Session TTL in hours (default 168 = 7 days). Env var:
    /// `FORMS_SESSION_TTL_HOURS`.
    pub session_ttl_hours: i64,
    /// Session cookie name (default `tfm_forms_session`). Env var:
    /// `FORMS_SESSION_COOKIE`.
    pub session_cookie: String,
    /// TCP port to listen on (default 3120). Env var: `FORMS_PORT`.
    pub forms_port: u16,
    /// Row-store REST base URL (e.g. "https://db.internal/rest/v1").
    pub datastore_url: String,
    /// Row-store service credential, attached to every gateway call.
    pub datastore_service_key: String,
    /// Mail provider base URL (default "https://api.resend.com").
    pub mail_api_url: String,
    /// Mail provider API key.
    pub mail_api_key: String,
    /// From address for outbound mail (e.g. "TFM Forms <forms@tfm.example>").
    pub mail_from: String,
    /// Inbox that receives contact-form leads.
    pub contact_to: String,
}

impl FormsConfig {
    pub fn from_env() -> Self {
        Self {
            admin_emails: parse_admin_emails(
                &std::env::var("FORMS_ADMIN_EMAILS").expect("FORMS_ADMIN_EMAILS"),
            ),
            code_ttl_minutes: std::env::var("FORMS_CODE_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            session_ttl_hours: std::env::var("FORMS_SESSION_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(168),
            session_cookie: std::env::var("FORMS_SESSION_COOKIE")
                .unwrap_or_else(|_| "tfm_forms_session".to_owned()),
            forms_port: std::env::var("FORMS_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3120),
            datastore_url: std::env::var("DATASTORE_URL").expect("DATASTORE_URL"),
            datastore_service_key: std::env::var("DATASTORE_SERVICE_KEY")
                .expect("DATASTORE_SERVICE_KEY"),
            mail_api_url: std::env::var("MAIL_API_URL")
                .unwrap_or_else(|_| "https://api.resend.com".to_owned()),
            mail_api_key: std::env::var("MAIL_API_KEY").expect("MAIL_API_KEY"),
            mail_from: std::env::var("MAIL_FROM").expect("MAIL_FROM"),
            contact_to: std::env::var("CONTACT_TO").expect("CONTACT_TO"),
        }
    }

    /// Session TTL expressed in seconds, for the cookie Max-Age.
    pub fn session_ttl_seconds(&self) -> i64 {
        self.session_ttl_hours * 3600
    }
}

/// Split the comma-separated allow-list, trimming and lowercasing each
/// entry and dropping empties.
fn parse_admin_emails(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}
