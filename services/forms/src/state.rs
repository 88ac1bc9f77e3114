use std::sync::Arc;

use reqwest::Client;

use crate::config::FormsConfig;
use crate::infra::mail::HttpMailer;
use crate::infra::rowstore::RowStore;
use crate::infra::store::{
    StoreAuthCodeRepository, StoreSessionRepository, StoreSiteRepository,
    StoreSubmissionRepository,
};

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<FormsConfig>,
    pub store: RowStore,
    pub mailer: HttpMailer,
}

impl AppState {
    /// One reqwest client backs both outbound integrations; reqwest pools
    /// connections per host internally.
    pub fn new(config: FormsConfig) -> Self {
        let client = Client::new();
        let store = RowStore::new(
            client.clone(),
            &config.datastore_url,
            &config.datastore_service_key,
        );
        let mailer = HttpMailer::new(
            client,
            &config.mail_api_url,
            &config.mail_api_key,
            &config.mail_from,
        );
        Self {
            config: Arc::new(config),
            store,
            mailer,
        }
    }

    pub fn auth_code_repo(&self) -> StoreAuthCodeRepository {
        StoreAuthCodeRepository {
            store: self.store.clone(),
        }
    }

    pub fn session_repo(&self) -> StoreSessionRepository {
        StoreSessionRepository {
            store: self.store.clone(),
        }
    }

    pub fn site_repo(&self) -> StoreSiteRepository {
        StoreSiteRepository {
            store: self.store.clone(),
        }
    }

    pub fn submission_repo(&self) -> StoreSubmissionRepository {
        StoreSubmissionRepository {
            store: self.store.clone(),
        }
    }

    pub fn mailer(&self) -> HttpMailer {
        self.mailer.clone()
    }
}
