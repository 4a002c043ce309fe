//! Command-line arguments.
//!
//! Flags override values from the optional config file, which override the
//! built-in defaults. Credential flags fall back to the usual `OS_*`
//! environment variables.

use std::path::PathBuf;

use clap::Parser;

use crate::config::schema::{LogFormat, ProbeConfig};

#[derive(Debug, Default, Parser)]
#[command(name = "elb-probe")]
#[command(
    about = "Authenticate with AK/SK and list classic load balancers and listeners",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Identity endpoint [default: https://iam.eu-de.otc.t-systems.com/v3]
    #[arg(long, env = "OS_AUTH_URL")]
    pub identity_endpoint: Option<String>,

    /// Project name
    #[arg(long = "project", env = "OS_PROJECT_NAME")]
    pub project_name: Option<String>,

    /// Project ID
    #[arg(long, env = "OS_PROJECT_ID")]
    pub project_id: Option<String>,

    /// Region [default: eu-de]
    #[arg(long, env = "OS_REGION_NAME")]
    pub region: Option<String>,

    /// Access key
    #[arg(long, env = "OS_ACCESS_KEY", hide_env_values = true)]
    pub access_key: Option<String>,

    /// Secret key
    #[arg(long, env = "OS_SECRET_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    /// Prefix of request/response log lines
    #[arg(long)]
    pub log_prefix: Option<String>,

    /// Global request timeout in seconds; 0 or less selects 15
    #[arg(long, allow_negative_numbers = true)]
    pub timeout_secs: Option<i64>,

    /// Log output format
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,
}

impl Cli {
    /// Overlay the flags that were given onto `config`.
    pub fn apply(&self, config: &mut ProbeConfig) {
        if let Some(endpoint) = &self.identity_endpoint {
            config.identity.endpoint = endpoint.clone();
        }
        if let Some(name) = &self.project_name {
            config.identity.project_name = Some(name.clone());
        }
        if let Some(id) = &self.project_id {
            config.identity.project_id = Some(id.clone());
        }
        if let Some(region) = &self.region {
            config.identity.region = region.clone();
        }
        if let Some(access_key) = &self.access_key {
            config.credentials.access_key = access_key.clone();
        }
        if let Some(secret_key) = &self.secret_key {
            config.credentials.secret_key = secret_key.clone();
        }
        if let Some(prefix) = &self.log_prefix {
            config.http.log_prefix = prefix.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.http.timeout_secs = secs;
        }
        if let Some(format) = self.log_format {
            config.observability.log_format = format;
        }
    }
}
