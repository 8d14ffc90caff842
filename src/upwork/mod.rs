// src/upwork/mod.rs
//! Upstream platform protocol: OAuth token exchange, authenticated GraphQL
//! client, tenant resolution, job search and categories.

pub mod categories;
pub mod client;
pub mod error;
pub mod normalize;
pub mod oauth;
pub mod search;
pub mod tenant;

pub use client::{UpworkClient, TENANT_HEADER, USER_AGENT};
pub use error::UpworkError;
pub use oauth::{OAuthError, TokenExchange, TokenPair};
pub use search::{JobSearchParams, SearchFilter, DEFAULT_PAGE_SIZE};
pub use tenant::TenantResolver;

use crate::session::SessionContext;
use crate::types::{Category, JobSearchResult};

/// Build a client from the stored credentials, resolve the tenant and run the search.
pub async fn search_jobs(
    session: &SessionContext,
    params: &JobSearchParams,
) -> Result<JobSearchResult, UpworkError> {
    let client = session.authenticated_client().await?;
    let tenant_id = session.tenant_id(&client).await?;
    search::execute_search(&client, &tenant_id, params).await
}

pub async fn list_categories(session: &SessionContext) -> Result<Vec<Category>, UpworkError> {
    let client = session.authenticated_client().await?;
    let tenant_id = session.tenant_id(&client).await?;
    categories::fetch_categories(&client, &tenant_id)
        .await
        .map_err(|e| UpworkError::CategoriesFailed(Box::new(e)))
}
