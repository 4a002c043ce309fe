//! Classic Elastic Load Balancer API (v1.0).
//!
//! # Data Flow
//! ```text
//! ProviderClient (authenticated)
//!     → ElbClient (resource base <elb endpoint>/v1.0/<project>/elbaas/)
//!     → listeners::list / loadbalancers::list → Pager
//!     → Pager::all_pages → Vec<Page>
//!     → extract_* → typed records
//! ```

pub mod listeners;
pub mod loadbalancers;
pub mod pagination;

use url::Url;

use crate::cloud::error::ApiError;
use crate::cloud::identity::ProviderClient;

pub use listeners::{extract_listeners, Listener};
pub use loadbalancers::{extract_load_balancers, LoadBalancer};
pub use pagination::{Page, Pager};

/// Service name used for endpoint lookup.
pub const SERVICE: &str = "elb";

/// Errors from listing load balancer resources.
#[derive(Debug, thiserror::Error)]
pub enum ElbError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("provider client is not scoped to a project")]
    MissingProject,

    #[error("invalid ELB resource URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("pagination loop detected at {0}")]
    PaginationLoop(Url),

    #[error("failed to extract {resource} from {url}: {source}")]
    Extract {
        resource: &'static str,
        url: Url,
        source: serde_json::Error,
    },
}

/// Client for the ELB v1.0 endpoints of one project.
#[derive(Debug, Clone)]
pub struct ElbClient {
    provider: ProviderClient,
    resource_base: Url,
}

impl ElbClient {
    /// Scope an authenticated provider client to the ELB service.
    pub fn new(provider: ProviderClient) -> Result<Self, ElbError> {
        if provider.project_id().is_empty() {
            return Err(ElbError::MissingProject);
        }
        let endpoint = provider.service_endpoint(SERVICE)?;
        let resource_base = endpoint.join(&format!("v1.0/{}/elbaas/", provider.project_id()))?;
        Ok(Self {
            provider,
            resource_base,
        })
    }

    pub fn provider(&self) -> &ProviderClient {
        &self.provider
    }

    pub fn resource_base(&self) -> &Url {
        &self.resource_base
    }

    /// URL of `resource` under the base, with non-empty query pairs.
    pub fn resource_url(&self, resource: &str, query: &[(&str, String)]) -> Result<Url, ElbError> {
        let mut url = self.resource_base.join(resource)?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }
}
