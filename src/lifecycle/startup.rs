//! Startup orchestration: the probe run itself.
//!
//! # Responsibilities
//! - Build the instrumented HTTP client from configuration
//! - Authenticate with AK/SK
//! - List listeners, then load balancers, and log them
//!
//! # Design Decisions
//! - Fail fast: any error is returned to `main`, which decides the exit code
//! - Steps run in order, not concurrently

use crate::cloud::elb::{self, ElbClient, Listener, LoadBalancer};
use crate::cloud::{authenticate, AkskAuthOptions};
use crate::config::ProbeConfig;
use crate::error::ProbeError;
use crate::http::HttpClient;

/// Resources found by one run.
#[derive(Debug, Clone, Default)]
pub struct ProbeReport {
    pub listeners: Vec<Listener>,
    pub load_balancers: Vec<LoadBalancer>,
}

/// Run the probe with a client built from `config`.
pub async fn run(config: &ProbeConfig) -> Result<ProbeReport, ProbeError> {
    let http = config.http.client_config().build()?;
    run_with_client(config, http).await
}

/// Run the probe over an existing client.
pub async fn run_with_client(
    config: &ProbeConfig,
    http: HttpClient,
) -> Result<ProbeReport, ProbeError> {
    tracing::info!(
        identity_endpoint = %config.identity.endpoint,
        region = %config.identity.region,
        timeout_secs = http.timeout().as_secs(),
        "Authenticating"
    );
    let provider = authenticate(http, &AkskAuthOptions::from(config)).await?;
    let client = ElbClient::new(provider).map_err(ProbeError::elb("ELB client creation"))?;

    let pages = elb::listeners::list(&client, &elb::listeners::ListOpts::default())
        .map_err(ProbeError::elb("listing listeners"))?
        .all_pages()
        .await
        .map_err(ProbeError::elb("getting all listener pages"))?;
    let listeners =
        elb::extract_listeners(&pages).map_err(ProbeError::elb("extracting listeners"))?;
    tracing::info!(count = listeners.len(), "Listeners: {:?}", listeners);

    let pages = elb::loadbalancers::list(&client, &elb::loadbalancers::ListOpts::default())
        .map_err(ProbeError::elb("listing load balancers"))?
        .all_pages()
        .await
        .map_err(ProbeError::elb("getting all load balancer pages"))?;
    let load_balancers =
        elb::extract_load_balancers(&pages).map_err(ProbeError::elb("extracting load balancers"))?;
    tracing::info!(count = load_balancers.len(), "ELBs: {:?}", load_balancers);

    Ok(ProbeReport {
        listeners,
        load_balancers,
    })
}
