//! The discovery document, root of every navigation.

use std::sync::Arc;

use log::Level;
use reqwest::Url;

use super::applications::Applications;
use crate::config::PlatformConfig;
use crate::error::{PlatformError, PlatformResult, RemoteFailure};
use crate::logging::{self, LoggingContext};
use crate::resource::{PlatformResource, ResourceCore};
use crate::transport::RestfulClient;

/// Relation leading to the applications collection.
pub const APPLICATIONS_RELATION: &str = "applications";

const INITIALIZE_OPERATION: &str = "initialize discover";

/// Entry point of the platform.
#[derive(Debug, Clone)]
pub struct Discover {
    core: ResourceCore,
    applications: Option<Applications>,
}

impl Discover {
    /// A discover resource at `discover_url`; relative hrefs in every
    /// document reached from it resolve against `base_url`.
    pub fn new(client: Arc<dyn RestfulClient>, base_url: Url, discover_url: Url) -> Self {
        Self {
            core: ResourceCore::new(client, base_url, discover_url),
            applications: None,
        }
    }

    pub fn from_config(
        client: Arc<dyn RestfulClient>,
        config: &PlatformConfig,
    ) -> PlatformResult<Self> {
        let discover_url = config
            .discover_url()
            .map_err(|e| PlatformError::invalid_argument("config.discover_url", e.to_string()))?;
        let base_url = config
            .base_url()
            .map_err(|e| PlatformError::invalid_argument("config.discover_url", e.to_string()))?;
        Ok(Self::new(client, base_url, discover_url))
    }

    /// Fetch the discovery document and create the applications collection
    /// for `endpoint_id` from its `applications` relation. A current
    /// collection with the same URL and endpoint id is kept as it is.
    ///
    /// An empty `endpoint_id` is rejected before any request is made.
    pub async fn refresh_and_initialize(
        &mut self,
        context: Option<&LoggingContext>,
        endpoint_id: &str,
    ) -> PlatformResult<()> {
        if endpoint_id.trim().is_empty() {
            return Err(PlatformError::invalid_argument(
                "endpoint_id",
                "application endpoint id must not be empty",
            ));
        }

        let snapshot = self
            .core
            .fetch(context, INITIALIZE_OPERATION, Self::REQUIRED_RELATIONS)
            .await?;
        let applications_url = snapshot
            .links
            .url_for(APPLICATIONS_RELATION)
            .map_err(|_| {
                self.core.remote_error(
                    INITIALIZE_OPERATION,
                    RemoteFailure::MissingRelation(APPLICATIONS_RELATION),
                )
            })?
            .clone();

        let keep = self.applications.as_ref().is_some_and(|current| {
            current.self_url() == &applications_url && current.endpoint_id() == endpoint_id
        });
        if !keep {
            logging::record(
                context,
                Level::Debug,
                format_args!("Discovered applications at {}", applications_url),
            );
            self.applications = Some(Applications::new(
                self.core.client().clone(),
                self.core.base_url().clone(),
                applications_url,
                endpoint_id,
            ));
        }
        self.core.commit_initialized(snapshot);
        Ok(())
    }

    pub fn applications(&self) -> Option<&Applications> {
        self.applications.as_ref()
    }

    pub fn applications_mut(&mut self) -> Option<&mut Applications> {
        self.applications.as_mut()
    }

    pub fn into_applications(self) -> Option<Applications> {
        self.applications
    }
}

impl PlatformResource for Discover {
    const REFRESH_OPERATION: &'static str = "refresh discover";
    const REQUIRED_RELATIONS: &'static [&'static str] = &[APPLICATIONS_RELATION];

    fn core(&self) -> &ResourceCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ResourceCore {
        &mut self.core
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ResourceState;
    use crate::testing::fixtures::{self, data_urls};
    use crate::testing::MockRestfulClient;
    use crate::transport::HttpMethod;

    fn discover(mock: &Arc<MockRestfulClient>) -> Discover {
        Discover::new(
            mock.clone(),
            Url::parse(data_urls::BASE).unwrap(),
            Url::parse(data_urls::DISCOVER).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_initialize_creates_applications() {
        let mock = Arc::new(MockRestfulClient::with_default_graph());
        let mut root = discover(&mock);
        let context = LoggingContext::generate();

        root.refresh_and_initialize(Some(&context), fixtures::APPLICATION_ENDPOINT_ID)
            .await
            .unwrap();

        let applications = root.applications().unwrap();
        assert_eq!(applications.self_url().as_str(), data_urls::APPLICATIONS);
        assert_eq!(applications.endpoint_id(), fixtures::APPLICATION_ENDPOINT_ID);
        assert_eq!(root.state(), ResourceState::Initialized);
        assert_eq!(mock.request_count(), 1);
        assert_eq!(
            mock.requests()[0].correlation_id,
            Some(context.job_id.to_string())
        );
    }

    #[tokio::test]
    async fn test_empty_endpoint_id_is_rejected_without_request() {
        let mock = Arc::new(MockRestfulClient::with_default_graph());
        let mut root = discover(&mock);
        let err = root.refresh_and_initialize(None, "  ").await.unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_applications_relation() {
        let mock = Arc::new(MockRestfulClient::with_default_graph());
        mock.override_response(
            data_urls::DISCOVER,
            HttpMethod::Get,
            200,
            fixtures::DISCOVER_NO_APPLICATIONS,
        );
        let mut root = discover(&mock);

        let err = root
            .refresh_and_initialize(None, fixtures::APPLICATION_ENDPOINT_ID)
            .await
            .unwrap_err();

        match err {
            PlatformError::RemoteService(remote) => {
                assert_eq!(remote.failure, RemoteFailure::MissingRelation("applications"))
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(root.applications().is_none());
        assert_eq!(root.state(), ResourceState::Uninitialized);
    }

    #[tokio::test]
    async fn test_not_found_is_remote_service_error() {
        let mock = Arc::new(MockRestfulClient::new());
        let mut root = discover(&mock);
        let err = root
            .refresh_and_initialize(None, fixtures::APPLICATION_ENDPOINT_ID)
            .await
            .unwrap_err();
        match err {
            PlatformError::RemoteService(remote) => {
                assert_eq!(remote.status(), Some(404));
                assert_eq!(remote.url.as_str(), data_urls::DISCOVER);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_from_config() {
        let mock = Arc::new(MockRestfulClient::new());
        let config = PlatformConfig::new(data_urls::DISCOVER, fixtures::APPLICATION_ENDPOINT_ID);
        let root = Discover::from_config(mock, &config).unwrap();
        assert_eq!(root.self_url().as_str(), data_urls::DISCOVER);
        assert_eq!(root.core().base_url().as_str(), data_urls::BASE);

        let bad = PlatformConfig::new("not a url", fixtures::APPLICATION_ENDPOINT_ID);
        let err = Discover::from_config(Arc::new(MockRestfulClient::new()), &bad).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[tokio::test]
    async fn test_reinitialize_keeps_initialized_applications() {
        let mock = Arc::new(MockRestfulClient::with_default_graph());
        let mut root = discover(&mock);
        root.refresh_and_initialize(None, fixtures::APPLICATION_ENDPOINT_ID)
            .await
            .unwrap();
        let applications = root.applications_mut().unwrap();
        applications.refresh_and_initialize(None).await.unwrap();
        applications
            .application_mut()
            .unwrap()
            .refresh_and_initialize(None)
            .await
            .unwrap();

        root.refresh_and_initialize(None, fixtures::APPLICATION_ENDPOINT_ID)
            .await
            .unwrap();

        let applications = root.applications().unwrap();
        assert_eq!(applications.state(), ResourceState::Initialized);
        let application = applications.application().unwrap();
        assert_eq!(application.state(), ResourceState::Initialized);
        assert!(application.communication().is_some());
    }

    #[tokio::test]
    async fn test_reinitialize_with_other_endpoint_replaces_applications() {
        let mock = Arc::new(MockRestfulClient::with_default_graph());
        let mut root = discover(&mock);
        root.refresh_and_initialize(None, fixtures::APPLICATION_ENDPOINT_ID)
            .await
            .unwrap();
        root.applications_mut()
            .unwrap()
            .refresh_and_initialize(None)
            .await
            .unwrap();

        root.refresh_and_initialize(None, "sip:other@contoso.com")
            .await
            .unwrap();

        let applications = root.applications().unwrap();
        assert_eq!(applications.endpoint_id(), "sip:other@contoso.com");
        assert_eq!(applications.state(), ResourceState::Uninitialized);
        assert!(applications.application().is_none());
    }
}
