use crate::domain::repository::{SiteRepository, SubmissionRepository};
use crate::domain::types::{SiteSummary, SubmissionRecord};
use crate::error::FormsServiceError;

/// Fallback when `limit` is absent, non-numeric, zero, or negative.
pub const DEFAULT_LIST_LIMIT: u32 = 50;
/// Hard ceiling for one submissions page.
pub const MAX_LIST_LIMIT: u32 = 200;

/// Clamp a raw `limit` query value into `[1, MAX_LIST_LIMIT]`.
pub fn clamp_limit(raw: Option<&str>) -> u32 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|n| *n > 0)
        .map(|n| n.min(MAX_LIST_LIMIT as i64) as u32)
        .unwrap_or(DEFAULT_LIST_LIMIT)
}

pub struct ListSitesUseCase<S: SiteRepository> {
    pub sites: S,
}

impl<S: SiteRepository> ListSitesUseCase<S> {
    pub async fn execute(&self) -> Result<Vec<SiteSummary>, FormsServiceError> {
        self.sites.list().await
    }
}

pub struct ListSubmissionsUseCase<S: SubmissionRepository> {
    pub submissions: S,
}

impl<S: SubmissionRepository> ListSubmissionsUseCase<S> {
    pub async fn execute(
        &self,
        raw_limit: Option<&str>,
        site_id: Option<&str>,
    ) -> Result<Vec<SubmissionRecord>, FormsServiceError> {
        let limit = clamp_limit(raw_limit);
        let site_id = site_id.map(str::trim).filter(|s| !s.is_empty());
        self.submissions.list_recent(limit, site_id).await
    }
}
