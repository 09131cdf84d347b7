//! CleanSight analysis backend client.
//!
//! This crate provides a lightweight client for the CleanSight analysis
//! service. It focuses on:
//!
//! - Constructing an HTTP client with sensible defaults
//! - Validating the configured base URL for safety
//! - Submitting datasets as multipart forms ([`CleanSightClient::analyze`])
//! - Fetching generated artifacts by report id ([`CleanSightClient::fetch_artifact`])
//!
//! # Example
//!
//! ```ignore
//! use cleansight_api::CleanSightClient;
//! use cleansight_types::InputSelection;
//!
//! async fn run() -> Result<(), cleansight_api::ClientError> {
//!     let client = CleanSightClient::new("http://localhost:8000")?;
//!     let input = InputSelection::PastedText("a,b\n1,2\n".into());
//!     let (report, handle) = client.analyze(&input).await?;
//!     println!("{} -> {}", handle, report.quality_label());
//!     Ok(())
//! }
//! ```

use std::env;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, Url, header};
use tracing::debug;

mod analysis;
mod artifacts;
mod error;

pub use artifacts::artifact_path;
pub use error::ClientError;

/// Default backend address used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Hostnames allowed to use plain http.
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1", "[::1]", "::1"];

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
/// Thin wrapper around a configured `reqwest::Client` for the analysis
/// backend.
///
/// The client pre-configures default headers and builds requests against a
/// validated base URL. It has no retained state beyond its configuration.
pub struct CleanSightClient {
    pub base_url: String,
    pub http: Client,
    pub user_agent: String,
}

impl CleanSightClient {
    /// Construct a client for `base_url`.
    ///
    /// Loopback hosts may use any scheme; all other hosts must use https.
    /// A trailing slash on the base URL is ignored.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        validate_base_url(&base_url)?;

        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json, */*"));

        let http = Client::builder()
            .default_headers(default_headers)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self {
            base_url,
            http,
            user_agent: format!("cleansight/{}; {}", env!("CARGO_PKG_VERSION"), env::consts::OS),
        })
    }

    /// Build a `reqwest::RequestBuilder` for a method and API-relative path.
    ///
    /// The resulting request includes the configured User-Agent and base
    /// headers, and is resolved relative to `self.base_url`.
    pub fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "building request");

        self.http
            .request(method, url)
            .header(header::USER_AGENT, &self.user_agent)
    }
}

/// Validate that a base URL is acceptable for use by the client.
///
/// Rules:
/// - `localhost`, `127.0.0.1` or `::1`: any http(s) scheme is allowed
/// - otherwise: scheme must be HTTPS
pub fn validate_base_url(base: &str) -> Result<(), ClientError> {
    let parsed_base_url = Url::parse(base).map_err(|error| ClientError::invalid_base_url(base, error.to_string()))?;

    if !matches!(parsed_base_url.scheme(), "http" | "https") {
        return Err(ClientError::invalid_base_url(
            base,
            format!("unsupported scheme '{}'", parsed_base_url.scheme()),
        ));
    }

    let host_name = parsed_base_url
        .host_str()
        .ok_or_else(|| ClientError::invalid_base_url(base, "base URL must include a host"))?;

    if LOCALHOST_DOMAINS
        .iter()
        .any(|&allowed| host_name.eq_ignore_ascii_case(allowed))
    {
        return Ok(());
    }

    if parsed_base_url.scheme() != "https" {
        return Err(ClientError::invalid_base_url(
            base,
            format!("non-localhost hosts must use https; got '{}://'", parsed_base_url.scheme()),
        ));
    }

    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn localhost_may_use_plain_http() {
        assert!(validate_base_url("http://localhost:8000").is_ok());
        assert!(validate_base_url("http://127.0.0.1:9000").is_ok());
        assert!(validate_base_url("http://[::1]:8000").is_ok());
    }

    #[test]
    fn remote_hosts_require_https() {
        assert!(validate_base_url("https://analysis.example.com").is_ok());
        let error = validate_base_url("http://analysis.example.com").unwrap_err();
        assert!(error.to_string().contains("https"));
    }

    #[test]
    fn rejects_garbage_and_odd_schemes() {
        assert!(validate_base_url("not a url").is_err());
        assert!(validate_base_url("ftp://localhost").is_err());
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = CleanSightClient::new("http://localhost:8000/").unwrap();
        assert_eq!(client.base_url, "http://localhost:8000");
        let request = client.request(reqwest::Method::GET, "/analyze/").build().unwrap();
        assert_eq!(request.url().as_str(), "http://localhost:8000/analyze/");
        assert!(request.headers().get(header::USER_AGENT).is_some());
    }

    #[tokio::test]
    async fn https_requests_reach_the_connect_stage() {
        // Nothing listens on port 1, so the request fails while connecting
        // rather than on an unsupported scheme.
        let client = CleanSightClient::new("https://127.0.0.1:1").unwrap();
        let error = client
            .request(reqwest::Method::GET, "/analyze/")
            .send()
            .await
            .unwrap_err();

        let mut chain = Vec::new();
        let mut source: Option<&dyn std::error::Error> = Some(&error);
        while let Some(current) = source {
            chain.push(current.to_string());
            source = current.source();
        }
        assert!(error.is_connect(), "unexpected error: {chain:?}");
        assert!(
            chain.iter().all(|message| !message.contains("scheme is not http")),
            "https was rejected: {chain:?}"
        );
    }
}
