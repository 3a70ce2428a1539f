//! # Request Description
//!
//! [`RequestSpec`] is the single, immutable description of the call sent to
//! both targets. [`Targets`] holds the two URLs being compared.

use crate::errors::ConfigError;
use crate::headers::canonical_header_name;
use crate::response::TargetIndex;
use bytes::Bytes;
use reqwest::Method;
use std::collections::BTreeMap;

pub const DEFAULT_METHOD: &str = "GET";
pub const DEFAULT_USER_AGENT: &str = "httpdiff/0.1";

/// Methods that carry the request body. Matched case-insensitively.
const BODY_METHODS: [&str; 2] = ["POST", "PUT"];

/// Everything about the request except where it is sent.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    method: Method,
    body: Option<Bytes>,
    host: Option<String>,
    user_agent: Option<String>,
    extra_headers: BTreeMap<String, String>,
}

impl Default for RequestSpec {
    fn default() -> Self {
        Self {
            method: Method::GET,
            body: None,
            host: None,
            user_agent: None,
            extra_headers: BTreeMap::new(),
        }
    }
}

impl RequestSpec {
    /// Create a spec for `method`. An empty method means `GET`.
    pub fn new(method: &str) -> Result<Self, ConfigError> {
        let method = method.trim();
        let method = if method.is_empty() {
            Method::GET
        } else {
            Method::from_bytes(method.as_bytes())
                .map_err(|_| ConfigError::InvalidMethod(method.to_string()))?
        };
        Ok(Self {
            method,
            ..Self::default()
        })
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Override the Host header. Empty strings leave the URL's authority in place.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = non_empty(host.into());
        self
    }

    /// Replace the User-Agent header. Empty strings send no override.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = non_empty(user_agent.into());
        self
    }

    /// Add an extra header. A later value for the same name replaces an earlier one.
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.extra_headers
            .insert(canonical_header_name(name), value.into());
        self
    }

    pub fn with_headers<I, N, V>(self, headers: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: AsRef<str>,
        V: Into<String>,
    {
        headers
            .into_iter()
            .fold(self, |spec, (name, value)| spec.with_header(name.as_ref(), value))
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    pub fn extra_headers(&self) -> &BTreeMap<String, String> {
        &self.extra_headers
    }

    /// Whether this method sends `body` on the wire
    pub fn carries_body(&self) -> bool {
        BODY_METHODS
            .iter()
            .any(|m| m.eq_ignore_ascii_case(self.method.as_str()))
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// The two URLs under comparison, index 0 first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Targets {
    urls: [String; 2],
}

impl Targets {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            urls: [first.into(), second.into()],
        }
    }

    /// Accept positional arguments; anything but exactly two is a usage error
    pub fn from_args(args: Vec<String>) -> Result<Self, ConfigError> {
        let count = args.len();
        let urls: [String; 2] = args
            .try_into()
            .map_err(|_| ConfigError::WrongTargetCount(count))?;
        Ok(Self { urls })
    }

    pub fn get(&self, target: TargetIndex) -> &str {
        &self.urls[target.as_usize()]
    }

    pub fn as_array(&self) -> &[String; 2] {
        &self.urls
    }
}
