use reqwest::Client;

use crate::domain::repository::MailPort;
use crate::domain::types::OutboundEmail;
use crate::error::FormsServiceError;

/// Mail provider adapter error. The upstream body stays server-side.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("mail transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("mail provider returned {status}: {body}")]
    Upstream { status: u16, body: String },
}

/// Outbound mail over the provider's `POST /emails` REST endpoint.
#[derive(Debug, Clone)]
pub struct HttpMailer {
    client: Client,
    base_url: String,
    api_key: String,
    from: String,
}

impl HttpMailer {
    pub fn new(client: Client, base_url: &str, api_key: &str, from: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key: api_key.to_owned(),
            from: from.to_owned(),
        }
    }
}

impl MailPort for HttpMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), FormsServiceError> {
        let url = format!("{}/emails", self.base_url);
        let payload = serde_json::json!({
            "from": self.from,
            "to": [email.to],
            "subject": email.subject,
            "html": email.html,
        });
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(MailError::from)?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(MailError::Upstream {
                status: status.as_u16(),
                body,
            }
            .into());
        }
        tracing::debug!(to = %email.to, subject = %email.subject, "outbound email accepted");
        Ok(())
    }
}
