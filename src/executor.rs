//! # Request Executor
//!
//! Performs one HTTP round trip against one target and returns a fully
//! buffered [`ResponseRecord`]. The underlying `reqwest::Client` is a shared
//! connection pool, so cloning an executor is cheap and both targets reuse
//! the same transport.

use crate::errors::TransportError;
use crate::headers::HeaderMultiMap;
use crate::request::RequestSpec;
use crate::response::{ResponseRecord, TargetIndex};
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, HOST, USER_AGENT};
use reqwest::redirect::Policy;
use std::time::Duration;

/// Transport-level settings shared by both targets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportConfig {
    /// Accept TLS certificates that fail verification
    pub insecure: bool,
    /// Per-request deadline covering connect, send and body read
    pub timeout: Option<Duration>,
}

/// Executes a [`RequestSpec`] against a single URL
#[derive(Debug, Clone)]
pub struct RequestExecutor {
    client: reqwest::Client,
}

impl RequestExecutor {
    /// Build the shared transport.
    ///
    /// Redirects are not followed and no proxy is consulted: each target gets
    /// exactly one round trip, and its first response is what gets compared.
    pub fn new(config: &TransportConfig) -> Result<Self> {
        tracing::debug!("Creating transport: {:?}", config);

        let mut builder = reqwest::Client::builder()
            .redirect(Policy::none())
            .no_proxy()
            .danger_accept_invalid_certs(config.insecure);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().context("Failed to build HTTP transport")?;
        Ok(Self { client })
    }

    /// Send `spec` to `url` and buffer the whole response.
    ///
    /// Any failure before the body is completely read, including an invalid
    /// URL, becomes a [`TransportError`] for `target`. The response is consumed
    /// by the body read, which releases the connection on every path.
    pub async fn execute(
        &self,
        spec: &RequestSpec,
        target: TargetIndex,
        url: &str,
    ) -> Result<ResponseRecord, TransportError> {
        let method = spec.method().as_str();

        let headers = build_headers(spec)
            .map_err(|e| TransportError::from_error(target, method, url, &*e))?;

        let mut request = self
            .client
            .request(spec.method().clone(), url)
            .headers(headers);
        if spec.carries_body() {
            request = request.body(spec.body().cloned().unwrap_or_default());
        }

        tracing::debug!("[{}] {} {}", target, method, url);
        let response = request.send().await.map_err(|e| {
            tracing::error!("[{}] {} {} failed: {}", target, method, url, e);
            TransportError::from_error(target, method, url, &e)
        })?;

        let status = response.status().as_u16();
        let headers = HeaderMultiMap::from_header_map(response.headers());
        let body = response.bytes().await.map_err(|e| {
            tracing::error!("[{}] reading body from {} failed: {}", target, url, e);
            TransportError::from_error(target, method, url, &e)
        })?;

        tracing::info!(
            "[{}] {} {} -> {} ({} headers, {} bytes)",
            target,
            method,
            url,
            status,
            headers.len(),
            body.len()
        );
        Ok(ResponseRecord::new(target, url, status, headers, body))
    }
}

/// Request headers in the order they take effect: User-Agent replaces, Host
/// overrides the authority, extra headers are appended on top.
fn build_headers(
    spec: &RequestSpec,
) -> Result<HeaderMap, Box<dyn std::error::Error + Send + Sync>> {
    let mut headers = HeaderMap::new();

    if let Some(user_agent) = spec.user_agent() {
        headers.insert(USER_AGENT, HeaderValue::from_str(user_agent)?);
    }
    if let Some(host) = spec.host() {
        headers.insert(HOST, HeaderValue::from_str(host)?);
    }
    for (name, value) in spec.extra_headers() {
        headers.append(
            HeaderName::from_bytes(name.as_bytes())?,
            HeaderValue::from_str(value)?,
        );
    }

    Ok(headers)
}
