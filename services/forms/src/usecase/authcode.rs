use chrono::{Duration, Utc};

use crate::domain::repository::{AuthCodeRepository, MailPort};
use crate::domain::types::{NewAuthCode, OutboundEmail};
use crate::error::FormsServiceError;
use crate::secrets;

pub struct RequestLoginCodeInput {
    pub email: String,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug)]
pub struct RequestLoginCodeOutput {
    pub challenge_id: String,
    pub expires_in_minutes: i64,
}

pub struct RequestLoginCodeUseCase<A, M>
where
    A: AuthCodeRepository,
    M: MailPort,
{
    pub auth_codes: A,
    pub mailer: M,
    /// Trimmed, lowercased allow-list.
    pub admin_emails: Vec<String>,
    pub code_ttl_minutes: i64,
}

impl<A, M> RequestLoginCodeUseCase<A, M>
where
    A: AuthCodeRepository,
    M: MailPort,
{
    pub async fn execute(
        &self,
        input: RequestLoginCodeInput,
    ) -> Result<RequestLoginCodeOutput, FormsServiceError> {
        // 1. Normalize the address → 400 when absent
        let email = input.email.trim().to_lowercase();
        if email.is_empty() {
            return Err(FormsServiceError::BadRequest(
                "Missing required field: email.".to_owned(),
            ));
        }

        // 2. Allow-list gate → the same generic 403 for every other address
        if !self.admin_emails.iter().any(|a| a == &email) {
            return Err(FormsServiceError::EmailNotAuthorized);
        }

        // 3. Mint code + challenge; only the bound digest is stored
        let code = secrets::generate_code();
        let challenge_id = secrets::generate_challenge_id();
        let record = NewAuthCode {
            id: challenge_id.clone(),
            email: email.clone(),
            code_hash: secrets::code_digest(&code, &email, &challenge_id),
            expires_at: Utc::now() + Duration::minutes(self.code_ttl_minutes),
            ip: input.ip,
            user_agent: input.user_agent,
        };
        self.auth_codes.create(&record).await?;

        // 4. Deliver the plaintext code → 500 on provider failure
        let message = OutboundEmail {
            to: email,
            subject: "Your dashboard login code".to_owned(),
            html: format!(
                "<p>Your login code is <strong>{code}</strong>.</p>\
                 <p>It expires in {} minutes. If you did not request it, you can ignore this email.</p>",
                self.code_ttl_minutes
            ),
        };
        self.mailer.send(&message).await?;

        tracing::info!(challenge_id = %challenge_id, "login code issued");
        Ok(RequestLoginCodeOutput {
            challenge_id,
            expires_in_minutes: self.code_ttl_minutes,
        })
    }
}
