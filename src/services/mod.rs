pub mod account_service;
pub mod analytics_service;
pub mod catalog_service;
pub mod notion_proxy;
pub mod progress_service;
pub mod seed_service;

pub use account_service::{AccountService, AuthSession};
pub use analytics_service::{Analytics, AnalyticsService};
pub use catalog_service::{CatalogService, CatalogSnapshot, CatalogSync};
pub use notion_proxy::{NotionProxy, ProxiedResponse};
pub use progress_service::ProgressService;
pub use seed_service::{SeedOutcome, SeedService};

use crate::auth::AuthError;
use crate::database::models::ValidationError;
use crate::database::StoreError;
use crate::error::ApiError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Notion request failed: {0}")]
    Upstream(#[from] reqwest::Error),
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(e) => e.into(),
            ServiceError::Store(e) => e.into(),
            ServiceError::Auth(e) => e.into(),
            ServiceError::Upstream(e) => {
                tracing::error!("Notion proxy error: {}", e);
                ApiError::internal_server_error("Notion proxy failed")
            }
        }
    }
}
