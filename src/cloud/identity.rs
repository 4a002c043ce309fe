//! AK/SK authentication and the provider client.
//!
//! # Responsibilities
//! - Validate the identity endpoint
//! - Resolve the project ID from its name when only the name is known
//! - Derive service endpoints from the identity host
//! - Sign and send API calls through the instrumented client
//!
//! # Design Decisions
//! - AK/SK needs no token exchange: every call is signed individually
//! - Service endpoints follow `iam.<r>.<domain>` → `<service>.<region>.<domain>`,
//!   where `<region>` is the configured region (the identity host's own
//!   region label when none is set)
//! - Identity hosts that are IP addresses or single labels (test setups) serve
//!   every service from the identity origin

use std::collections::BTreeMap;

use bytes::Bytes;
use chrono::Utc;
use http::{header, HeaderValue, Method, Request};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::{Host, Url};

use crate::cloud::error::ApiError;
use crate::cloud::signer::{Signer, X_PROJECT_ID};
use crate::config::ProbeConfig;
use crate::http::{body, HttpClient};

/// Errors raised while authenticating.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid {name} endpoint {value:?}: {source}")]
    InvalidEndpoint {
        name: String,
        value: String,
        source: url::ParseError,
    },

    #[error("at least one between project name and project ID should be given")]
    MissingProject,

    #[error("no project named {0:?} is visible with these credentials")]
    ProjectNotFound(String),

    #[error("{count} projects are named {name:?}")]
    AmbiguousProject { name: String, count: usize },

    #[error("project lookup failed: {0}")]
    Api(#[from] ApiError),
}

/// Everything needed to authenticate with an access-key/secret-key pair.
#[derive(Clone)]
pub struct AkskAuthOptions {
    pub identity_endpoint: String,
    pub project_name: Option<String>,
    pub project_id: Option<String>,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
    /// Service name → endpoint URL, bypassing derivation from the identity host.
    pub endpoint_overrides: BTreeMap<String, String>,
}

impl From<&ProbeConfig> for AkskAuthOptions {
    fn from(config: &ProbeConfig) -> Self {
        Self {
            identity_endpoint: config.identity.endpoint.clone(),
            project_name: config.identity.project_name.clone(),
            project_id: config.identity.project_id.clone(),
            region: config.identity.region.clone(),
            access_key: config.credentials.access_key.clone(),
            secret_key: config.credentials.secret_key.clone(),
            endpoint_overrides: config.endpoints.clone(),
        }
    }
}

impl std::fmt::Debug for AkskAuthOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AkskAuthOptions")
            .field("identity_endpoint", &self.identity_endpoint)
            .field("project_name", &self.project_name)
            .field("project_id", &self.project_id)
            .field("region", &self.region)
            .field("access_key", &self.access_key)
            .field("endpoint_overrides", &self.endpoint_overrides)
            .finish_non_exhaustive()
    }
}

/// A project as listed by the identity service.
#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub domain_id: Option<String>,
}

#[derive(Deserialize)]
struct ProjectList {
    #[serde(default)]
    projects: Vec<Project>,
}

/// Client for signed calls against the cloud APIs.
#[derive(Debug, Clone)]
pub struct ProviderClient {
    http: HttpClient,
    signer: Signer,
    identity_base: Url,
    project_id: String,
    region: String,
    endpoint_overrides: BTreeMap<String, Url>,
}

impl ProviderClient {
    /// Create an unauthenticated client for the given identity endpoint.
    pub fn new(
        http: HttpClient,
        identity_endpoint: &str,
        signer: Signer,
    ) -> Result<Self, AuthError> {
        let identity_base = parse_base("identity", identity_endpoint)?;
        Ok(Self {
            http,
            signer,
            identity_base,
            project_id: String::new(),
            region: String::new(),
            endpoint_overrides: BTreeMap::new(),
        })
    }

    /// Serve `service` from `endpoint` instead of the derived one.
    pub fn with_endpoint_override(
        mut self,
        service: &str,
        endpoint: &str,
    ) -> Result<Self, AuthError> {
        let url = parse_base(service, endpoint)?;
        self.endpoint_overrides.insert(service.to_string(), url);
        Ok(self)
    }

    /// Region used for derived service endpoints.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Scope the client to a project.
    pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = project_id.into();
        self
    }

    pub fn identity_base(&self) -> &Url {
        &self.identity_base
    }

    /// Project all calls are scoped to; empty until authenticated.
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Base URL of `service`, always ending with `/`.
    pub fn service_endpoint(&self, service: &str) -> Result<Url, ApiError> {
        if let Some(url) = self.endpoint_overrides.get(service) {
            return Ok(url.clone());
        }

        let mut url = self.identity_base.clone();
        url.set_path("/");
        url.set_query(None);

        if let Some(Host::Domain(domain)) = self.identity_base.host() {
            if let Some(host) = derive_host(domain, service, &self.region) {
                url.set_host(Some(&host)).map_err(|source| ApiError::Endpoint {
                    service: service.to_string(),
                    base: self.identity_base.clone(),
                    source,
                })?;
            }
        }
        Ok(url)
    }

    /// Signed GET returning the raw body of a 2xx response.
    pub async fn get(&self, url: &Url) -> Result<Bytes, ApiError> {
        let mut request = Request::builder()
            .method(Method::GET)
            .uri(url.as_str())
            .header(header::ACCEPT, HeaderValue::from_static("application/json"))
            .body(Bytes::new())?;
        if !self.project_id.is_empty() {
            let project_id = HeaderValue::from_str(&self.project_id).map_err(http::Error::from)?;
            request.headers_mut().insert(X_PROJECT_ID, project_id);
        }
        self.signer.sign(&mut request, Utc::now())?;

        let response = self.http.send(request.map(body::full)).await?;
        let status = response.status();
        let bytes = body::collect(response.into_body())
            .await
            .map_err(|source| ApiError::Body {
                url: url.clone(),
                source,
            })?;

        if !status.is_success() {
            return Err(ApiError::UnexpectedStatus {
                url: url.clone(),
                status,
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }
        Ok(bytes)
    }

    /// Signed GET decoding a JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, ApiError> {
        let bytes = self.get(url).await?;
        serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode {
            url: url.clone(),
            source,
        })
    }

    /// Look up projects by exact name.
    pub async fn find_projects(&self, name: &str) -> Result<Vec<Project>, ApiError> {
        let mut url = self
            .identity_base
            .join("projects")
            .map_err(|source| ApiError::Endpoint {
                service: "identity".to_string(),
                base: self.identity_base.clone(),
                source,
            })?;
        url.query_pairs_mut().append_pair("name", name);

        let list: ProjectList = self.get_json(&url).await?;
        Ok(list
            .projects
            .into_iter()
            .filter(|project| project.name == name)
            .collect())
    }
}

/// Authenticate with AK/SK and return a client scoped to the project.
pub async fn authenticate(
    http: HttpClient,
    options: &AkskAuthOptions,
) -> Result<ProviderClient, AuthError> {
    let signer = Signer::new(options.access_key.clone(), options.secret_key.clone());
    let mut client = ProviderClient::new(http, &options.identity_endpoint, signer)?;
    for (service, endpoint) in &options.endpoint_overrides {
        client = client.with_endpoint_override(service, endpoint)?;
    }
    let client = client.with_region(options.region.trim());

    let project_id = match non_blank(&options.project_id) {
        Some(id) => id.to_string(),
        None => {
            let name = non_blank(&options.project_name).ok_or(AuthError::MissingProject)?;
            let mut projects = client.find_projects(name).await?;
            match projects.len() {
                0 => return Err(AuthError::ProjectNotFound(name.to_string())),
                1 => projects.remove(0).id,
                count => {
                    return Err(AuthError::AmbiguousProject {
                        name: name.to_string(),
                        count,
                    })
                }
            }
        }
    };
    let client = client.with_project(project_id);

    tracing::info!(
        access_key = %client.signer.access_key(),
        project_id = %client.project_id,
        region = %client.region,
        "Authenticated with AK/SK"
    );
    Ok(client)
}

/// `<service>.<region>.<domain>` for a host of the form `<x>.<r>.<domain>`.
///
/// Two-label hosts only get their first label replaced; an empty region keeps
/// the host's own region label.
fn derive_host(domain: &str, service: &str, region: &str) -> Option<String> {
    let mut labels: Vec<&str> = domain.split('.').collect();
    match labels.len() {
        0 | 1 => return None,
        2 => {}
        _ if !region.is_empty() => labels[1] = region,
        _ => {}
    }
    labels[0] = service;
    Some(labels.join("."))
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_base(name: &str, value: &str) -> Result<Url, AuthError> {
    let mut url = Url::parse(value).map_err(|source| AuthError::InvalidEndpoint {
        name: name.to_string(),
        value: value.to_string(),
        source,
    })?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
