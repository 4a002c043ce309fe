//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the probe.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::http::HttpClientConfig;

/// Identity endpoint used when none is configured.
pub const DEFAULT_IDENTITY_ENDPOINT: &str = "https://iam.eu-de.otc.t-systems.com/v3";

/// Region used when none is configured.
pub const DEFAULT_REGION: &str = "eu-de";

/// Root configuration for the probe.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProbeConfig {
    /// Identity service and project selection.
    pub identity: IdentityConfig,

    /// AK/SK credentials.
    pub credentials: Credentials,

    /// Instrumented HTTP client settings.
    pub http: HttpConfig,

    /// Per-service endpoint overrides (e.g. `elb = "http://127.0.0.1:9000/"`).
    pub endpoints: BTreeMap<String, String>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Identity configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Identity (IAM v3) endpoint URL.
    pub endpoint: String,

    /// Project name, resolved to an ID during authentication.
    pub project_name: Option<String>,

    /// Project ID; takes precedence over the name.
    pub project_id: Option<String>,

    /// Region of the load balancers.
    pub region: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_IDENTITY_ENDPOINT.to_string(),
            project_name: None,
            project_id: None,
            region: DEFAULT_REGION.to_string(),
        }
    }
}

/// Access-key/secret-key pair.
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Credentials {
    pub access_key: String,
    pub secret_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// HTTP client configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Prefix of request/response log lines.
    pub log_prefix: String,

    /// Global request timeout in seconds. Values ≤ 0 select the default.
    pub timeout_secs: i64,
}

impl HttpConfig {
    /// Client settings derived from this configuration.
    pub fn client_config(&self) -> HttpClientConfig {
        let timeout = u64::try_from(self.timeout_secs)
            .map(Duration::from_secs)
            .unwrap_or(Duration::ZERO);
        HttpClientConfig::new(self.log_prefix.clone(), timeout)
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error) used when `RUST_LOG` is unset.
    pub log_level: String,

    /// Output format of log lines.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProbeConfig::default();
        assert_eq!(config.identity.endpoint, DEFAULT_IDENTITY_ENDPOINT);
        assert_eq!(config.identity.region, "eu-de");
        assert!(config.identity.project_name.is_none());
        assert_eq!(config.observability.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_non_positive_timeout_selects_default() {
        for secs in [0, -1, -30] {
            let http = HttpConfig {
                log_prefix: String::new(),
                timeout_secs: secs,
            };
            let client = http.client_config();
            assert_eq!(client.timeout, Duration::ZERO);
            assert_eq!(client.effective_timeout(), Duration::from_secs(15));
        }
    }

    #[test]
    fn test_positive_timeout_is_kept() {
        let http = HttpConfig {
            log_prefix: "otc".to_string(),
            timeout_secs: 5,
        };
        let client = http.client_config();
        assert_eq!(client.log_prefix, "otc");
        assert_eq!(client.effective_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_secret_key_is_redacted() {
        let credentials = Credentials {
            access_key: "AK".to_string(),
            secret_key: "very-secret".to_string(),
        };
        let printed = format!("{:?}", credentials);
        assert!(printed.contains("AK"));
        assert!(!printed.contains("very-secret"));
    }

    #[test]
    fn test_parse_from_toml() {
        let config: ProbeConfig = toml::from_str(
            r#"
            [identity]
            project_name = "eu-de_demo"

            [credentials]
            access_key = "AK"
            secret_key = "SK"

            [endpoints]
            elb = "http://127.0.0.1:9000/"

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.identity.project_name.as_deref(), Some("eu-de_demo"));
        assert_eq!(config.identity.region, DEFAULT_REGION);
        assert_eq!(config.credentials.secret_key, "SK");
        assert_eq!(config.endpoints["elb"], "http://127.0.0.1:9000/");
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.observability.log_level, "info");
    }
}
