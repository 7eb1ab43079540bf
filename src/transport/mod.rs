//! Request transport.
//!
//! Resources never talk to the network directly. They hand a
//! [`PlatformRequest`] to a [`RestfulClient`] and interpret the
//! [`PlatformResponse`] themselves, so status and payload validation stays
//! in the resource layer and the transport only reports transport failures.
//!
//! - [`ReqwestClient`]: the production implementation over `reqwest`.
//! - [`crate::testing::MockRestfulClient`]: an in-memory implementation that
//!   records every processed request.

pub mod http;

use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Url;
use serde_json::Value;

use crate::error::TransportError;

pub use http::ReqwestClient;

// ---------------------------------------------------------------------------
// HttpMethod
// ---------------------------------------------------------------------------

/// HTTP methods used by platform relations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    /// Upper-case method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Parse a method name (case-insensitive).
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Some(HttpMethod::Get),
            "POST" => Some(HttpMethod::Post),
            "PUT" => Some(HttpMethod::Put),
            "DELETE" => Some(HttpMethod::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Request / response
// ---------------------------------------------------------------------------

/// One request submitted to the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformRequest {
    pub method: HttpMethod,
    pub url: Url,
    /// JSON body, serialized by the transport.
    pub body: Option<Value>,
    /// Correlation id taken from the caller's logging context.
    pub correlation_id: Option<String>,
}

impl PlatformRequest {
    /// A GET without body.
    pub fn get(url: Url) -> Self {
        Self {
            method: HttpMethod::Get,
            url,
            body: None,
            correlation_id: None,
        }
    }

    /// A POST with a JSON body.
    pub fn post(url: Url, body: Value) -> Self {
        Self {
            method: HttpMethod::Post,
            url,
            body: Some(body),
            correlation_id: None,
        }
    }

    /// Set the correlation id.
    pub fn with_correlation_id(mut self, correlation_id: Option<String>) -> Self {
        self.correlation_id = correlation_id;
        self
    }

    /// `"METHOD url"`, the form recorded by the mock client.
    pub fn signature(&self) -> String {
        format!("{} {}", self.method, self.url)
    }
}

/// Raw response handed back by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformResponse {
    pub status: u16,
    pub body: Bytes,
}

impl PlatformResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// ---------------------------------------------------------------------------
// RestfulClient
// ---------------------------------------------------------------------------

/// The "submit request, get response" capability consumed by resources.
///
/// Implementations return `Err` only for transport failures. Any response
/// that arrived, whatever its status, is returned as `Ok`.
#[async_trait]
pub trait RestfulClient: Send + Sync {
    /// Submit one request and await its response.
    async fn submit(&self, request: PlatformRequest) -> Result<PlatformResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_round_trip() {
        for method in [HttpMethod::Get, HttpMethod::Post, HttpMethod::Put, HttpMethod::Delete] {
            assert_eq!(HttpMethod::from_str_opt(method.as_str()), Some(method));
        }
        assert_eq!(HttpMethod::from_str_opt("post"), Some(HttpMethod::Post));
        assert_eq!(HttpMethod::from_str_opt("PATCH"), None);
        assert_eq!(HttpMethod::default(), HttpMethod::Get);
    }

    #[test]
    fn test_request_signature() {
        let url = Url::parse("https://platform.example.com/a").unwrap();
        let request = PlatformRequest::post(url, serde_json::json!({}));
        assert_eq!(request.signature(), "POST https://platform.example.com/a");
    }

    #[test]
    fn test_response_success_range() {
        assert!(PlatformResponse::new(200, "").is_success());
        assert!(PlatformResponse::new(204, "").is_success());
        assert!(!PlatformResponse::new(302, "").is_success());
        assert!(!PlatformResponse::new(500, "").is_success());
    }
}
