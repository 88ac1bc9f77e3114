use chrono::Utc;

use crate::domain::repository::MailPort;
use crate::domain::types::OutboundEmail;
use crate::error::FormsServiceError;

/// Milliseconds between form load and submit below which we assume a bot.
const MIN_FILL_MS: i64 = 3_000;
const MAX_NAME_LEN: usize = 200;
const MAX_EMAIL_LEN: usize = 320;
const MAX_MESSAGE_LEN: usize = 5_000;
/// More links than this in one message reads as link spam.
const MAX_MESSAGE_LINKS: usize = 3;

pub struct ContactInput {
    pub name: String,
    pub email: String,
    pub message: String,
    /// Honeypot field. Humans never see it; bots fill it.
    pub website: Option<String>,
    /// Client-reported form load time, epoch milliseconds.
    pub started_at: Option<i64>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ContactOutcome {
    /// Lead forwarded to the inbox.
    Sent,
    /// Classified as spam; the caller still reports success.
    Discarded,
}

pub struct ContactUseCase<M: MailPort> {
    pub mailer: M,
    pub contact_to: String,
}

impl<M: MailPort> ContactUseCase<M> {
    pub async fn execute(&self, input: ContactInput) -> Result<ContactOutcome, FormsServiceError> {
        // 1. Spam gate first — spam gets a fabricated success, never an error
        if let Some(reason) = spam_reason(&input) {
            tracing::info!(reason, "contact submission discarded");
            return Ok(ContactOutcome::Discarded);
        }

        // 2. Field validation → 400
        let name = input.name.trim();
        let email = input.email.trim();
        let message = input.message.trim();
        if name.is_empty() {
            return Err(FormsServiceError::BadRequest(
                "Missing required field: name.".to_owned(),
            ));
        }
        if email.is_empty() {
            return Err(FormsServiceError::BadRequest(
                "Missing required field: email.".to_owned(),
            ));
        }
        if message.is_empty() {
            return Err(FormsServiceError::BadRequest(
                "Missing required field: message.".to_owned(),
            ));
        }
        if !looks_like_email(email) {
            return Err(FormsServiceError::BadRequest(
                "Invalid email address.".to_owned(),
            ));
        }
        if name.len() > MAX_NAME_LEN || email.len() > MAX_EMAIL_LEN || message.len() > MAX_MESSAGE_LEN
        {
            return Err(FormsServiceError::BadRequest("Field too long.".to_owned()));
        }

        // 3. Forward the lead, HTML-escaped
        let mail = OutboundEmail {
            to: self.contact_to.clone(),
            subject: format!("New contact form message from {name}"),
            html: lead_html(name, email, message),
        };
        self.mailer.send(&mail).await?;
        Ok(ContactOutcome::Sent)
    }
}

fn spam_reason(input: &ContactInput) -> Option<&'static str> {
    if input.website.as_deref().is_some_and(|w| !w.trim().is_empty()) {
        return Some("honeypot");
    }
    match input.started_at {
        None => return Some("missing form timing"),
        Some(started_at) => {
            if Utc::now().timestamp_millis() - started_at < MIN_FILL_MS {
                return Some("submitted too fast");
            }
        }
    }
    if link_count(&input.message) > MAX_MESSAGE_LINKS {
        return Some("link flood");
    }
    if has_bbcode(&input.message) {
        return Some("bbcode markup");
    }
    None
}

fn link_count(message: &str) -> usize {
    let lower = message.to_lowercase();
    lower.matches("http://").count() + lower.matches("https://").count()
}

fn has_bbcode(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("[url=") || lower.contains("[url]") || lower.contains("[link=")
}

/// Structural check only: one `@`, a dotted domain, no whitespace.
fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
        && email.rfind('@') == email.find('@')
}

fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn lead_html(name: &str, email: &str, message: &str) -> String {
    let message = html_escape(message).replace('\n', "<br>");
    format!(
        "<h2>New contact form message</h2>\
         <p><strong>Name:</strong> {}</p>\
         <p><strong>Email:</strong> {}</p>\
         <p><strong>Message:</strong></p><p>{}</p>",
        html_escape(name),
        html_escape(email),
        message
    )
}
