//! Configuration validation.
//!
//! # Responsibilities
//! - Require a project (name or ID) and both halves of the AK/SK pair
//! - Check that endpoints are absolute http(s) URLs
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProbeConfig → Result<(), Vec<ValidationError>>
//! - Runs before any network activity

use url::Url;

use crate::config::schema::ProbeConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("at least one between project name and project ID should be given")]
    MissingProject,

    #[error("access key and secret key should be given")]
    MissingCredentials,

    #[error("region must not be empty")]
    EmptyRegion,

    #[error("invalid {name} endpoint {value:?}: {reason}")]
    InvalidEndpoint {
        name: String,
        value: String,
        reason: String,
    },
}

/// Validate a fully merged configuration.
pub fn validate_config(config: &ProbeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if is_blank(&config.identity.project_name) && is_blank(&config.identity.project_id) {
        errors.push(ValidationError::MissingProject);
    }

    let credentials = &config.credentials;
    if credentials.access_key.trim().is_empty() || credentials.secret_key.trim().is_empty() {
        errors.push(ValidationError::MissingCredentials);
    }

    if config.identity.region.trim().is_empty() {
        errors.push(ValidationError::EmptyRegion);
    }

    if let Err(reason) = check_endpoint(&config.identity.endpoint) {
        errors.push(ValidationError::InvalidEndpoint {
            name: "identity".to_string(),
            value: config.identity.endpoint.clone(),
            reason,
        });
    }

    for (service, endpoint) in &config.endpoints {
        if let Err(reason) = check_endpoint(endpoint) {
            errors.push(ValidationError::InvalidEndpoint {
                name: service.clone(),
                value: endpoint.clone(),
                reason,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

fn check_endpoint(value: &str) -> Result<(), String> {
    let url = Url::parse(value).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(format!("unsupported scheme {:?}", other)),
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> ProbeConfig {
        let mut config = ProbeConfig::default();
        config.identity.project_id = Some("0123456789abcdef".to_string());
        config.credentials.access_key = "AK".to_string();
        config.credentials.secret_key = "SK".to_string();
        config
    }

    #[test]
    fn test_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_project_name_alone_is_enough() {
        let mut config = valid_config();
        config.identity.project_id = None;
        config.identity.project_name = Some("eu-de_demo".to_string());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_missing_project() {
        let mut config = valid_config();
        config.identity.project_id = Some(String::new());
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::MissingProject]);
    }

    #[test]
    fn test_missing_secret_key() {
        let mut config = valid_config();
        config.credentials.secret_key.clear();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::MissingCredentials]);
    }

    #[test]
    fn test_blank_access_key() {
        let mut config = valid_config();
        config.credentials.access_key = "  ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::MissingCredentials]);
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ProbeConfig::default();
        config.identity.endpoint = "ftp://iam.example.com/v3".to_string();
        config
            .endpoints
            .insert("elb".to_string(), "not a url".to_string());

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert_eq!(errors[0], ValidationError::MissingProject);
        assert_eq!(errors[1], ValidationError::MissingCredentials);
        assert!(matches!(
            &errors[2],
            ValidationError::InvalidEndpoint { name, .. } if name == "identity"
        ));
        assert!(matches!(
            &errors[3],
            ValidationError::InvalidEndpoint { name, .. } if name == "elb"
        ));
    }
}
