//! Listener listing.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::cloud::elb::pagination::{Page, Pager};
use crate::cloud::elb::{ElbClient, ElbError};

static NO_ITEMS: Value = Value::Null;

/// Filters of the listener list call. Unset fields are not sent.
#[derive(Debug, Clone, Default)]
pub struct ListOpts {
    pub id: Option<String>,
    pub name: Option<String>,
    pub loadbalancer_id: Option<String>,
    pub protocol: Option<String>,
    pub port: Option<u16>,
    pub backend_protocol: Option<String>,
    pub backend_port: Option<u16>,
    pub status: Option<String>,
}

impl ListOpts {
    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        let strings = [
            ("id", &self.id),
            ("name", &self.name),
            ("loadbalancer_id", &self.loadbalancer_id),
            ("protocol", &self.protocol),
            ("backend_protocol", &self.backend_protocol),
            ("status", &self.status),
        ];
        for (key, value) in strings {
            if let Some(value) = value {
                query.push((key, value.clone()));
            }
        }
        if let Some(port) = self.port {
            query.push(("port", port.to_string()));
        }
        if let Some(port) = self.backend_port {
            query.push(("backend_port", port.to_string()));
        }
        query
    }
}

/// A listener of a classic load balancer.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Listener {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub loadbalancer_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub backend_protocol: Option<String>,
    #[serde(default)]
    pub backend_port: Option<u16>,
    #[serde(default)]
    pub lb_algorithm: Option<String>,
    /// Remaining fields as returned by the API.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Start listing listeners.
pub fn list(client: &ElbClient, opts: &ListOpts) -> Result<Pager, ElbError> {
    let url = client.resource_url("listeners", &opts.query())?;
    Ok(Pager::new(client.clone(), url))
}

/// Decode the listeners of every page.
///
/// The API answers with a bare JSON array; an object wrapping the array
/// under `listeners` is accepted as well.
pub fn extract_listeners(pages: &[Page]) -> Result<Vec<Listener>, ElbError> {
    let mut listeners = Vec::new();
    for page in pages {
        let items = match &page.body {
            Value::Object(object) => object.get("listeners").unwrap_or(&NO_ITEMS),
            other => other,
        };
        let batch = Vec::<Listener>::deserialize(items).map_err(|source| ElbError::Extract {
            resource: "listeners",
            url: page.url.clone(),
            source,
        })?;
        listeners.extend(batch);
    }
    Ok(listeners)
}
