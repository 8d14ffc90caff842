// src/upwork/tenant.rs
//! Organization (tenant) id resolution, cached once per authenticated account

use super::client::UpworkClient;
use super::error::UpworkError;
use crate::types::response::{CompanySelectorData, GraphQlResponse};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

const COMPANY_SELECTOR_QUERY: &str =
    "query companySelector { companySelector { items { title organizationId } } }";

/// Cached id plus the token generation it belongs to.
#[derive(Default)]
struct TenantSlot {
    tenant_id: Option<String>,
    generation: u64,
}

pub struct TenantResolver {
    slot: Mutex<TenantSlot>,
    default_tenant_id: Option<String>,
}

impl TenantResolver {
    pub fn new(default_tenant_id: Option<String>) -> Self {
        Self {
            slot: Mutex::new(TenantSlot::default()),
            default_tenant_id: default_tenant_id.filter(|id| !id.is_empty()),
        }
    }

    /// Return the cached tenant id, resolving it first if needed. The slot lock
    /// is held across the upstream call so concurrent first callers wait for a
    /// single resolution. A failure leaves the slot empty.
    ///
    /// A client built from tokens older than the cache's generation still gets
    /// an answer, but never reads or fills the cache.
    pub async fn resolve(&self, client: &UpworkClient) -> Result<String, UpworkError> {
        let mut slot = self.slot.lock().await;
        if client.generation() < slot.generation {
            drop(slot);
            warn!("Resolving Tenant ID for superseded tokens, result will not be cached");
            return self.fetch_logged(client).await;
        }
        if client.generation() > slot.generation {
            *slot = TenantSlot {
                tenant_id: None,
                generation: client.generation(),
            };
        }
        if let Some(tenant_id) = slot.tenant_id.as_ref() {
            return Ok(tenant_id.clone());
        }

        let tenant_id = self.fetch_logged(client).await?;
        info!("Resolved organization Tenant ID");
        slot.tenant_id = Some(tenant_id.clone());
        Ok(tenant_id)
    }

    pub async fn cached(&self) -> Option<String> {
        self.slot.lock().await.tenant_id.clone()
    }

    /// Forget the cached id once tokens of `generation` replaced older ones.
    pub async fn invalidate(&self, generation: u64) {
        let mut slot = self.slot.lock().await;
        if generation <= slot.generation {
            return;
        }
        slot.generation = generation;
        if slot.tenant_id.take().is_some() {
            info!("Cleared cached organization Tenant ID");
        }
    }

    async fn fetch_logged(&self, client: &UpworkClient) -> Result<String, UpworkError> {
        info!("Fetching organization Tenant ID...");
        self.fetch(client).await.map_err(|e| {
            error!("Failed to fetch Tenant ID: {}", e);
            UpworkError::TenantResolution(Box::new(e))
        })
    }

    async fn fetch(&self, client: &UpworkClient) -> Result<String, UpworkError> {
        let response: GraphQlResponse<CompanySelectorData> = client
            .graphql("companySelector", COMPANY_SELECTOR_QUERY, None, None)
            .await?;

        if let Some(message) = response.first_error() {
            warn!("companySelector returned errors: {}", message);
        }

        let items = response
            .data
            .and_then(|data| data.company_selector)
            .and_then(|selector| selector.items)
            .unwrap_or_default();

        match items.into_iter().next() {
            Some(first) => {
                if let Some(title) = &first.title {
                    info!("Using organization: {}", title);
                }
                first
                    .organization_id
                    .filter(|id| !id.is_empty())
                    .ok_or_else(|| {
                        UpworkError::Decode("First organization has no organizationId".to_string())
                    })
            }
            None => match &self.default_tenant_id {
                Some(default_id) => {
                    warn!("No organizations returned, using configured default tenant id");
                    Ok(default_id.clone())
                }
                None => Err(UpworkError::NoOrganization),
            },
        }
    }
}
