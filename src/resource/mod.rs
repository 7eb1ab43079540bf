//! Hypermedia resource base.
//!
//! Every navigable resource owns a [`ResourceCore`]: the transport handle,
//! the base URL that relative hrefs resolve against, its own self URL and
//! the last successfully parsed [`Snapshot`]. The snapshot starts out empty
//! (uninitialized) and is only ever replaced whole, after a fetch and parse
//! have both succeeded.
//!
//! Operations commit state only after their last await point. Dropping an
//! in-flight future therefore leaves the resource exactly as it was.

pub mod capability;
pub mod document;
pub mod links;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use log::Level;
use reqwest::Url;
use serde_json::Value;

use crate::error::{PlatformResult, RemoteFailure, RemoteServiceError};
use crate::logging::{self, LoggingContext};
use crate::transport::{PlatformRequest, PlatformResponse, RestfulClient};

pub use capability::Capability;
pub use document::{DocumentError, LinksPolicy, Snapshot};
pub use links::{Link, LinkDescriptor, LinkRegistry};

/// Initialization state of a resource instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceState {
    /// Constructed, never fetched.
    Uninitialized,
    /// At least one successful refresh.
    Refreshed,
    /// Refreshed and every required embedded resource resolved.
    Initialized,
}

/// State shared by every resource type.
#[derive(Clone)]
pub struct ResourceCore {
    client: Arc<dyn RestfulClient>,
    base_url: Url,
    self_url: Url,
    snapshot: Option<Snapshot>,
    state: ResourceState,
}

impl fmt::Debug for ResourceCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceCore")
            .field("base_url", &self.base_url.as_str())
            .field("self_url", &self.self_url.as_str())
            .field("state", &self.state)
            .field("relations", &self.snapshot.as_ref().map(|s| s.links.len()))
            .finish()
    }
}

impl ResourceCore {
    pub fn new(client: Arc<dyn RestfulClient>, base_url: Url, self_url: Url) -> Self {
        Self {
            client,
            base_url,
            self_url,
            snapshot: None,
            state: ResourceState::Uninitialized,
        }
    }

    /// Core of an embedded resource whose document is already in hand.
    pub fn with_snapshot(
        client: Arc<dyn RestfulClient>,
        base_url: Url,
        self_url: Url,
        snapshot: Snapshot,
    ) -> Self {
        Self {
            client,
            base_url,
            self_url,
            snapshot: Some(snapshot),
            state: ResourceState::Refreshed,
        }
    }

    pub fn client(&self) -> &Arc<dyn RestfulClient> {
        &self.client
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn self_url(&self) -> &Url {
        &self.self_url
    }

    pub fn state(&self) -> ResourceState {
        self.state
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    /// Current link registry; `None` before the first refresh.
    pub fn links(&self) -> Option<&LinkRegistry> {
        self.snapshot.as_ref().map(|s| &s.links)
    }

    pub fn payload(&self) -> Option<&Value> {
        self.snapshot.as_ref().map(|s| &s.payload)
    }

    /// Replace the snapshot. The state never moves backwards here; an
    /// initialized resource stays initialized across plain refreshes.
    pub fn commit(&mut self, snapshot: Snapshot) {
        self.snapshot = Some(snapshot);
        if self.state == ResourceState::Uninitialized {
            self.state = ResourceState::Refreshed;
        }
    }

    /// Replace the snapshot and mark the resource initialized.
    pub fn commit_initialized(&mut self, snapshot: Snapshot) {
        self.snapshot = Some(snapshot);
        self.state = ResourceState::Initialized;
    }

    /// Submit `request`, logging it against `context`.
    pub async fn send(
        &self,
        context: Option<&LoggingContext>,
        request: PlatformRequest,
    ) -> PlatformResult<PlatformResponse> {
        let signature = request.signature();
        logging::record(context, Level::Debug, format_args!("-> {}", signature));
        let request = request.with_correlation_id(logging::correlation_id(context));
        match self.client.submit(request).await {
            Ok(response) => {
                logging::record(
                    context,
                    Level::Debug,
                    format_args!("<- {} HTTP {}", signature, response.status),
                );
                Ok(response)
            }
            Err(err) => {
                logging::record(context, Level::Warn, format_args!("{} failed: {}", signature, err));
                Err(err.into())
            }
        }
    }

    /// GET the self URL and parse it, checking `required` relations. Does
    /// not touch the current snapshot.
    pub async fn fetch(
        &self,
        context: Option<&LoggingContext>,
        operation: &'static str,
        required: &'static [&'static str],
    ) -> PlatformResult<Snapshot> {
        let response = self
            .send(context, PlatformRequest::get(self.self_url.clone()))
            .await?;
        let snapshot = document::parse_response(
            &self.base_url,
            &self.self_url,
            operation,
            &response,
            LinksPolicy::Required,
        )?;
        for &relation in required {
            if !snapshot.links.has(relation) {
                return Err(RemoteServiceError::new(
                    self.self_url.clone(),
                    operation,
                    RemoteFailure::MissingRelation(relation),
                )
                .into());
            }
        }
        Ok(snapshot)
    }

    /// Build a `RemoteServiceError` against this resource's self URL.
    pub fn remote_error(&self, operation: &'static str, failure: RemoteFailure) -> RemoteServiceError {
        RemoteServiceError::new(self.self_url.clone(), operation, failure)
    }
}

/// Behaviour common to every navigable resource.
#[async_trait]
pub trait PlatformResource: Send + Sync {
    /// Operation label used in errors and logs for a refresh.
    const REFRESH_OPERATION: &'static str;

    /// Relations a document of this type must advertise to be well formed.
    const REQUIRED_RELATIONS: &'static [&'static str] = &[];

    fn core(&self) -> &ResourceCore;

    fn core_mut(&mut self) -> &mut ResourceCore;

    /// Re-fetch and re-parse this resource, replacing its links and payload
    /// on success. On failure nothing changes.
    async fn refresh(&mut self, context: Option<&LoggingContext>) -> PlatformResult<()> {
        let snapshot = self
            .core()
            .fetch(context, Self::REFRESH_OPERATION, Self::REQUIRED_RELATIONS)
            .await?;
        self.core_mut().commit(snapshot);
        Ok(())
    }

    fn self_url(&self) -> &Url {
        self.core().self_url()
    }

    fn state(&self) -> ResourceState {
        self.core().state()
    }

    fn links(&self) -> Option<&LinkRegistry> {
        self.core().links()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockRestfulClient;

    struct Plain {
        core: ResourceCore,
    }

    impl PlatformResource for Plain {
        const REFRESH_OPERATION: &'static str = "refresh plain";
        const REQUIRED_RELATIONS: &'static [&'static str] = &["next"];

        fn core(&self) -> &ResourceCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut ResourceCore {
            &mut self.core
        }
    }

    fn plain(mock: &Arc<MockRestfulClient>) -> Plain {
        let base = Url::parse("https://platform.example.com/").unwrap();
        let url = base.join("/plain").unwrap();
        Plain {
            core: ResourceCore::new(mock.clone(), base, url),
        }
    }

    #[tokio::test]
    async fn test_refresh_commits_snapshot() {
        let mock = Arc::new(MockRestfulClient::new());
        mock.set_response(
            crate::transport::HttpMethod::Get,
            "https://platform.example.com/plain",
            200,
            r#"{"_links":[{"rel":"next","href":"/next"}]}"#,
        );
        let mut resource = plain(&mock);
        assert_eq!(resource.state(), ResourceState::Uninitialized);
        assert!(resource.links().is_none());

        resource.refresh(None).await.unwrap();
        assert_eq!(resource.state(), ResourceState::Refreshed);
        assert!(resource.links().unwrap().has("next"));
        assert!(mock.requests_processed("GET https://platform.example.com/plain"));
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_snapshot() {
        let mock = Arc::new(MockRestfulClient::new());
        let url = "https://platform.example.com/plain";
        mock.set_response(
            crate::transport::HttpMethod::Get,
            url,
            200,
            r#"{"_links":[{"rel":"next","href":"/next"}]}"#,
        );
        let mut resource = plain(&mock);
        resource.refresh(None).await.unwrap();

        mock.set_response(crate::transport::HttpMethod::Get, url, 200, r#"{"_links":[]}"#);
        let err = resource.refresh(None).await.unwrap_err();
        assert!(err.is_remote_service());
        assert!(resource.links().unwrap().has("next"));

        mock.set_response(crate::transport::HttpMethod::Get, url, 500, "");
        assert!(resource.refresh(None).await.is_err());
        assert!(resource.links().unwrap().has("next"));
    }

    struct SilentClient;

    #[async_trait]
    impl RestfulClient for SilentClient {
        async fn submit(
            &self,
            _request: PlatformRequest,
        ) -> Result<PlatformResponse, crate::error::TransportError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_dropped_refresh_commits_nothing() {
        let base = Url::parse("https://platform.example.com/").unwrap();
        let url = base.join("/plain").unwrap();
        let mut resource = Plain {
            core: ResourceCore::new(Arc::new(SilentClient), base, url),
        };

        let outcome = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            resource.refresh(None),
        )
        .await;

        assert!(outcome.is_err());
        assert_eq!(resource.state(), ResourceState::Uninitialized);
        assert!(resource.links().is_none());
        assert!(resource.core().payload().is_none());
    }
}
