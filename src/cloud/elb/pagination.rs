//! Page retrieval for list calls.
//!
//! A listing starts at one URL and follows `rel="next"` links found in any
//! `*_links` array of the page body until a page carries none.

use std::collections::HashSet;

use serde_json::Value;
use url::Url;

use crate::cloud::elb::{ElbClient, ElbError};

/// One page of a listing, kept as raw JSON until extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub url: Url,
    pub body: Value,
}

impl Page {
    /// URL of the following page, if the body links one.
    pub fn next_url(&self) -> Option<Url> {
        let object = self.body.as_object()?;
        object
            .iter()
            .filter(|(key, _)| key.as_str() == "links" || key.ends_with("_links"))
            .filter_map(|(_, links)| links.as_array())
            .flatten()
            .find(|link| link.get("rel").and_then(Value::as_str) == Some("next"))
            .and_then(|link| link.get("href").and_then(Value::as_str))
            .and_then(|href| self.url.join(href).ok())
    }
}

/// Lazily fetches the pages of one listing.
#[derive(Debug, Clone)]
pub struct Pager {
    client: ElbClient,
    initial: Url,
}

impl Pager {
    pub fn new(client: ElbClient, initial: Url) -> Self {
        Self { client, initial }
    }

    pub fn initial_url(&self) -> &Url {
        &self.initial
    }

    /// Fetch every page, in order.
    pub async fn all_pages(self) -> Result<Vec<Page>, ElbError> {
        let mut pages = Vec::new();
        let mut seen = HashSet::new();
        let mut next = Some(self.initial);

        while let Some(url) = next {
            if !seen.insert(url.clone()) {
                return Err(ElbError::PaginationLoop(url));
            }
            let body: Value = self.client.provider().get_json(&url).await?;
            let page = Page { url, body };
            tracing::debug!(url = %page.url, "Fetched page");
            next = page.next_url();
            pages.push(page);
        }

        Ok(pages)
    }
}
