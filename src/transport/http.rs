//! `reqwest`-backed transport.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};

use crate::config::PlatformConfig;
use crate::error::TransportError;
use crate::logging::CORRELATION_HEADER;
use crate::transport::{HttpMethod, PlatformRequest, PlatformResponse, RestfulClient};

/// Production [`RestfulClient`] over a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Build a client with the given timeout, user agent and default headers.
    pub fn new(
        timeout: Duration,
        user_agent: &str,
        default_headers: &HashMap<String, String>,
    ) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        for (name, value) in default_headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| TransportError::InvalidConfig(format!("header {}: {}", name, e)))?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                TransportError::InvalidConfig(format!("header {}: {}", name.as_str(), e))
            })?;
            headers.insert(name, value);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .default_headers(headers)
            .build()
            .map_err(|e| TransportError::InvalidConfig(e.to_string()))?;

        Ok(Self { client })
    }

    /// Build a client from a [`PlatformConfig`].
    pub fn from_config(config: &PlatformConfig) -> Result<Self, TransportError> {
        Self::new(
            Duration::from_secs(config.timeout_secs),
            &config.user_agent,
            &config.default_headers,
        )
    }
}

#[async_trait]
impl RestfulClient for ReqwestClient {
    async fn submit(&self, request: PlatformRequest) -> Result<PlatformResponse, TransportError> {
        let url = request.url.to_string();
        log::debug!("{} {}", request.method, url);

        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(request.url),
            HttpMethod::Post => self.client.post(request.url),
            HttpMethod::Put => self.client.put(request.url),
            HttpMethod::Delete => self.client.delete(request.url),
        };

        if let Some(ref correlation_id) = request.correlation_id {
            builder = builder.header(CORRELATION_HEADER, correlation_id.as_str());
        }
        if let Some(ref body) = request.body {
            builder = builder
                .header(CONTENT_TYPE, "application/json")
                .json(body);
        }

        let resp = builder.send().await.map_err(|e| map_reqwest_error(&url, e))?;
        let status = resp.status().as_u16();
        let body = resp.bytes().await.map_err(|e| map_reqwest_error(&url, e))?;

        log::debug!("{} {} -> HTTP {} ({} bytes)", request.method, url, status, body.len());
        Ok(PlatformResponse::new(status, body))
    }
}

fn map_reqwest_error(url: &str, err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout {
            url: url.to_string(),
        }
    } else if err.is_connect() {
        TransportError::Connect {
            url: url.to_string(),
            message: err.to_string(),
        }
    } else {
        TransportError::Request {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_from_config() {
        let mut config = PlatformConfig::new(
            "https://platform.example.com/discover",
            "sip:app@contoso.com",
        );
        config
            .default_headers
            .insert("Authorization".to_string(), "Bearer abc".to_string());
        assert!(ReqwestClient::from_config(&config).is_ok());
    }

    #[test]
    fn test_rejects_invalid_header_name() {
        let mut headers = HashMap::new();
        headers.insert("bad header".to_string(), "v".to_string());
        let err = ReqwestClient::new(Duration::from_secs(1), "ua", &headers).unwrap_err();
        assert!(matches!(err, TransportError::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // Bind then release an ephemeral port so nothing listens on it.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = ReqwestClient::new(Duration::from_secs(2), "ua", &HashMap::new()).unwrap();
        let url = reqwest::Url::parse(&format!("http://127.0.0.1:{}/discover", port)).unwrap();
        let err = client.submit(PlatformRequest::get(url)).await.unwrap_err();
        assert!(matches!(
            err,
            TransportError::Connect { .. } | TransportError::Request { .. }
        ));
    }
}
