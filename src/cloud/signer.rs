//! AK/SK request signing (`SDK-HMAC-SHA256`).
//!
//! # Algorithm
//! ```text
//! canonical request = METHOD \n
//!                     canonical URI (escaped segments, trailing '/') \n
//!                     canonical query (sorted k=v joined by '&') \n
//!                     canonical headers ("name:value\n" per header) \n
//!                     signed headers (sorted names joined by ';') \n
//!                     hex(sha256(body))
//! string to sign    = "SDK-HMAC-SHA256" \n X-Sdk-Date \n hex(sha256(canonical request))
//! signature         = hex(hmac_sha256(secret key, string to sign))
//! ```

use bytes::Bytes;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use http::header::{HeaderName, HeaderValue, AUTHORIZATION, HOST};
use http::Request;
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

pub const SIGN_ALGORITHM: &str = "SDK-HMAC-SHA256";
pub const X_SDK_DATE: &str = "x-sdk-date";
pub const X_PROJECT_ID: &str = "x-project-id";
const SDK_DATE_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Errors raised while signing a request.
#[derive(Debug, thiserror::Error)]
pub enum SignError {
    #[error("request URI has no host")]
    MissingHost,

    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] http::header::InvalidHeaderValue),
}

/// Signs requests with an access-key/secret-key pair.
#[derive(Clone)]
pub struct Signer {
    access_key: String,
    secret_key: String,
}

impl Signer {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
        }
    }

    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    /// Add `Host`, `X-Sdk-Date` and `Authorization` headers to `request`.
    pub fn sign(&self, request: &mut Request<Bytes>, now: DateTime<Utc>) -> Result<(), SignError> {
        let host = request
            .uri()
            .authority()
            .map(|a| a.as_str().to_string())
            .ok_or(SignError::MissingHost)?;

        let headers = request.headers_mut();
        headers.remove(AUTHORIZATION);
        if !headers.contains_key(HOST) {
            headers.insert(HOST, HeaderValue::from_str(&host)?);
        }
        headers.insert(
            HeaderName::from_static(X_SDK_DATE),
            HeaderValue::from_str(&now.format(SDK_DATE_FORMAT).to_string())?,
        );

        let (canonical, signed_headers) = canonical_request(request);
        let date = now.format(SDK_DATE_FORMAT).to_string();
        let string_to_sign = format!(
            "{}\n{}\n{}",
            SIGN_ALGORITHM,
            date,
            hex::encode(Sha256::digest(canonical.as_bytes()))
        );
        let signature = self.signature(&string_to_sign);

        let authorization = format!(
            "{} Access={}, SignedHeaders={}, Signature={}",
            SIGN_ALGORITHM, self.access_key, signed_headers, signature
        );
        request
            .headers_mut()
            .insert(AUTHORIZATION, HeaderValue::from_str(&authorization)?);
        Ok(())
    }

    fn signature(&self, string_to_sign: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.secret_key.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(string_to_sign.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer")
            .field("access_key", &self.access_key)
            .finish_non_exhaustive()
    }
}

/// Canonical request and the signed header list.
pub fn canonical_request(request: &Request<Bytes>) -> (String, String) {
    let mut headers: Vec<(String, String)> = request
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).trim().to_string(),
            )
        })
        .collect();
    headers.sort();

    let canonical_headers: String = headers
        .iter()
        .map(|(name, value)| format!("{}:{}\n", name, value))
        .collect();
    let mut names: Vec<&str> = headers.iter().map(|(name, _)| name.as_str()).collect();
    names.dedup();
    let signed_headers = names.join(";");

    let canonical = format!(
        "{}\n{}\n{}\n{}\n{}\n{}",
        request.method(),
        canonical_uri(request.uri().path()),
        canonical_query(request.uri().query().unwrap_or("")),
        canonical_headers,
        signed_headers,
        hex::encode(Sha256::digest(request.body()))
    );
    (canonical, signed_headers)
}

fn canonical_uri(path: &str) -> String {
    let mut uri = path
        .split('/')
        .map(|segment| {
            let decoded = urlencoding::decode(segment)
                .map(|s| s.into_owned())
                .unwrap_or_else(|_| segment.to_string());
            urlencoding::encode(&decoded).into_owned()
        })
        .collect::<Vec<_>>()
        .join("/");
    if !uri.ends_with('/') {
        uri.push('/');
    }
    uri
}

fn canonical_query(query: &str) -> String {
    let mut pairs: Vec<(String, String)> = url::form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| {
            (
                urlencoding::encode(&k).into_owned(),
                urlencoding::encode(&v).into_owned(),
            )
        })
        .collect();
    pairs.sort();
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}
