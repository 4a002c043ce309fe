//! Load balancer listing.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::cloud::elb::pagination::{Page, Pager};
use crate::cloud::elb::{ElbClient, ElbError};

/// Filters of the load balancer list call. Unset fields are not sent.
#[derive(Debug, Clone, Default)]
pub struct ListOpts {
    pub id: Option<String>,
    pub name: Option<String>,
    pub status: Option<String>,
    pub lb_type: Option<String>,
    pub vpc_id: Option<String>,
    pub vip_address: Option<String>,
}

impl ListOpts {
    fn query(&self) -> Vec<(&'static str, String)> {
        [
            ("id", &self.id),
            ("name", &self.name),
            ("status", &self.status),
            ("type", &self.lb_type),
            ("vpc_id", &self.vpc_id),
            ("vip_address", &self.vip_address),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_ref().map(|v| (key, v.clone())))
        .collect()
    }
}

/// A classic (v1) load balancer.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoadBalancer {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, rename = "type")]
    pub lb_type: Option<String>,
    #[serde(default)]
    pub vpc_id: Option<String>,
    #[serde(default)]
    pub vip_address: Option<String>,
    #[serde(default)]
    pub bandwidth: Option<u32>,
    /// Remaining fields as returned by the API.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize)]
struct LoadBalancerPage {
    loadbalancers: Vec<LoadBalancer>,
}

/// Start listing load balancers.
pub fn list(client: &ElbClient, opts: &ListOpts) -> Result<Pager, ElbError> {
    let url = client.resource_url("loadbalancers", &opts.query())?;
    Ok(Pager::new(client.clone(), url))
}

/// Decode the load balancers of every page (`{"loadbalancers": [...]}`).
pub fn extract_load_balancers(pages: &[Page]) -> Result<Vec<LoadBalancer>, ElbError> {
    let mut load_balancers = Vec::new();
    for page in pages {
        let batch = LoadBalancerPage::deserialize(&page.body).map_err(|source| ElbError::Extract {
            resource: "loadbalancers",
            url: page.url.clone(),
            source,
        })?;
        load_balancers.extend(batch.loadbalancers);
    }
    Ok(load_balancers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use url::Url;

    fn page(body: Value) -> Page {
        Page {
            url: Url::parse("https://elb.example.com/v1.0/p/elbaas/loadbalancers").unwrap(),
            body,
        }
    }

    #[test]
    fn test_query_uses_api_names() {
        let opts = ListOpts {
            lb_type: Some("External".to_string()),
            ..ListOpts::default()
        };
        assert_eq!(opts.query(), vec![("type", "External".to_string())]);
    }

    #[test]
    fn test_extract_across_pages() {
        let pages = vec![
            page(json!({
                "loadbalancers": [{
                    "id": "lb1",
                    "name": "elb",
                    "type": "External",
                    "bandwidth": 5,
                    "vip_address": "80.158.0.1",
                    "admin_state_up": 1
                }],
                "instance_num": "2"
            })),
            page(json!({"loadbalancers": [{"id": "lb2", "type": "Internal"}]})),
        ];

        let lbs = extract_load_balancers(&pages).unwrap();
        assert_eq!(lbs.len(), 2);
        assert_eq!(lbs[0].lb_type.as_deref(), Some("External"));
        assert_eq!(lbs[0].bandwidth, Some(5));
        assert_eq!(lbs[0].extra["admin_state_up"], json!(1));
        assert_eq!(lbs[1].id, "lb2");
    }

    #[test]
    fn test_extract_rejects_array_page() {
        let err = extract_load_balancers(&[page(json!([]))]).unwrap_err();
        assert!(matches!(err, ElbError::Extract { resource: "loadbalancers", .. }));
    }
}
