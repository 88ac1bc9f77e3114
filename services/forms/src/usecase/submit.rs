use chrono::Utc;
use serde_json::Value;

use crate::cors;
use crate::domain::repository::{SiteRepository, SubmissionRepository};
use crate::domain::types::NewSubmission;
use crate::error::FormsServiceError;

pub struct SubmitFormInput {
    pub site_id: String,
    pub form_id: Option<String>,
    /// Raw `data` body field; must be a JSON object.
    pub data: Option<Value>,
    pub page_url: Option<String>,
    pub referrer: Option<String>,
    pub presented_key: Option<String>,
    pub origin: Option<String>,
    pub referer_header: Option<String>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug)]
pub struct SubmitOutput {
    /// Resolved Access-Control-Allow-Origin for the success response.
    pub allow_origin: String,
}

/// Rejection carrying the CORS header value alongside the error, so embed
/// scripts can read error responses cross-origin too.
#[derive(Debug)]
pub struct SubmitRejection {
    pub allow_origin: String,
    pub error: FormsServiceError,
}

impl SubmitRejection {
    fn new(allow_origin: &str, error: FormsServiceError) -> Self {
        Self {
            allow_origin: allow_origin.to_owned(),
            error,
        }
    }
}

pub struct SubmitFormUseCase<St, Su>
where
    St: SiteRepository,
    Su: SubmissionRepository,
{
    pub sites: St,
    pub submissions: Su,
}

impl<St, Su> SubmitFormUseCase<St, Su>
where
    St: SiteRepository,
    Su: SubmissionRepository,
{
    pub async fn execute(&self, input: SubmitFormInput) -> Result<SubmitOutput, SubmitRejection> {
        // Before the site row is loaded the allow-origin can only echo the
        // caller's own.
        let origin = input.origin.as_deref();
        let echo = cors::echo_origin(origin);

        // 1. Shape checks → 400
        let site_id = input.site_id.trim().to_owned();
        if site_id.is_empty() {
            return Err(SubmitRejection::new(
                &echo,
                FormsServiceError::BadRequest("Missing required field: siteId.".to_owned()),
            ));
        }
        let data = match input.data {
            Some(Value::Object(map)) => map,
            _ => {
                return Err(SubmitRejection::new(
                    &echo,
                    FormsServiceError::BadRequest("Field \"data\" must be an object.".to_owned()),
                ));
            }
        };

        // 2. Site lookup → 401, still with the echoed origin
        let site = match self.sites.find_by_site_id(&site_id).await {
            Ok(Some(site)) => site,
            Ok(None) => return Err(SubmitRejection::new(&echo, FormsServiceError::InvalidSite)),
            Err(e) => return Err(SubmitRejection::new(&echo, e)),
        };

        // 3. From here the header derives from the site's allow-list
        let allow_origin = cors::allow_origin_value(&site.allowed_origins, origin);

        // 4. Shared-secret check, exact match
        if input.presented_key.as_deref() != Some(site.site_key.as_str()) {
            return Err(SubmitRejection::new(
                &allow_origin,
                FormsServiceError::InvalidSiteKey,
            ));
        }

        // 5. Origin policy; an absent Origin header passes
        if cors::origin_rejected(&site.allowed_origins, origin) {
            return Err(SubmitRejection::new(
                &allow_origin,
                FormsServiceError::OriginNotAllowed,
            ));
        }

        // 6. Persist the payload verbatim plus request metadata
        let submission = NewSubmission {
            site_id,
            form_id: input
                .form_id
                .map(|f| f.trim().to_owned())
                .filter(|f| !f.is_empty()),
            data,
            origin: input.origin.clone(),
            ip: input.ip,
            user_agent: input.user_agent,
            page_url: input.page_url,
            referrer: input.referrer.or(input.referer_header),
            submitted_at: Utc::now(),
        };
        if let Err(e) = self.submissions.create(&submission).await {
            return Err(SubmitRejection::new(&allow_origin, e));
        }

        tracing::info!(site_id = %submission.site_id, "submission stored");
        Ok(SubmitOutput { allow_origin })
    }
}
