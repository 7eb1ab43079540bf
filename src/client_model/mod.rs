//! Typed resources of the platform's hypermedia graph.
//!
//! Navigation always starts at [`Discover`]:
//!
//! ```text
//! Discover ──applications──▶ Applications ──(endpointId)──▶ Application
//!                                                            ├─ _embedded.communication
//!                                                            ├─ anonToken    (POST)
//!                                                            └─ adhocMeeting (POST)
//! ```
//!
//! Each hop is created uninitialized by its parent's
//! `refresh_and_initialize` and must be initialized itself before use.

pub mod adhoc_meeting;
pub mod anon_token;
pub mod application;
pub mod applications;
pub mod communication;
pub mod discover;

use std::sync::Arc;

use reqwest::Url;

pub use adhoc_meeting::{AccessLevel, AdhocMeeting, AdhocMeetingInput};
pub use anon_token::{AnonymousApplicationToken, AnonymousApplicationTokenInput};
pub use application::{Application, ApplicationCapability};
pub use applications::Applications;
pub use communication::Communication;
pub use discover::Discover;

use crate::config::base_url_of;
use crate::error::{PlatformError, PlatformResult, RemoteFailure, RemoteServiceError};
use crate::logging::LoggingContext;
use crate::resource::PlatformResource;
use crate::transport::RestfulClient;

/// Walk discover → applications and return the application registered for
/// `endpoint_id`, still uninitialized.
///
/// Issues exactly one GET per hop (two in total).
pub async fn resolve_application(
    client: Arc<dyn RestfulClient>,
    discover_url: Url,
    endpoint_id: &str,
    context: Option<&LoggingContext>,
) -> PlatformResult<Application> {
    let base_url = base_url_of(&discover_url).ok_or_else(|| {
        PlatformError::invalid_argument("discover_url", "URL must be absolute with a host")
    })?;

    let mut root = Discover::new(client, base_url, discover_url);
    root.refresh_and_initialize(context, endpoint_id).await?;
    let discover_url = root.self_url().clone();
    let mut applications = root.into_applications().ok_or_else(|| {
        RemoteServiceError::new(
            discover_url,
            "initialize discover",
            RemoteFailure::MissingRelation(discover::APPLICATIONS_RELATION),
        )
    })?;

    applications.refresh_and_initialize(context).await?;
    let applications_url = applications.self_url().clone();
    let application = applications.into_application().ok_or_else(|| {
        RemoteServiceError::new(
            applications_url,
            "initialize applications",
            RemoteFailure::NoMatchingEntry(endpoint_id.to_string()),
        )
    })?;
    Ok(application)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ResourceState;
    use crate::testing::fixtures::{self, data_urls};
    use crate::testing::MockRestfulClient;
    use crate::transport::HttpMethod;

    fn discover_url() -> Url {
        Url::parse(data_urls::DISCOVER).unwrap()
    }

    #[tokio::test]
    async fn test_resolve_issues_one_get_per_hop() {
        let mock = Arc::new(MockRestfulClient::with_default_graph());
        let application = resolve_application(
            mock.clone(),
            discover_url(),
            fixtures::APPLICATION_ENDPOINT_ID,
            None,
        )
        .await
        .unwrap();

        assert_eq!(application.self_url().as_str(), data_urls::APPLICATION);
        assert_eq!(application.state(), ResourceState::Uninitialized);
        assert_eq!(mock.count_of(&format!("GET {}", data_urls::DISCOVER)), 1);
        assert_eq!(mock.count_of(&format!("GET {}", data_urls::APPLICATIONS)), 1);
        assert_eq!(mock.request_count(), 2);
    }

    #[tokio::test]
    async fn test_full_chain_to_adhoc_meeting() {
        let mock = Arc::new(MockRestfulClient::with_default_graph());
        let context = LoggingContext::generate().with_property("tenant", "contoso");
        let mut application = resolve_application(
            mock.clone(),
            discover_url(),
            fixtures::APPLICATION_ENDPOINT_ID,
            Some(&context),
        )
        .await
        .unwrap();
        application.refresh_and_initialize(Some(&context)).await.unwrap();

        let meeting = application
            .get_adhoc_meeting_resource(Some(&context), Some(&AdhocMeetingInput::new()))
            .await
            .unwrap();

        assert_eq!(meeting.join_url.host_str(), Some("meet.contoso.com"));
        assert_eq!(mock.request_count(), 4);
        assert!(mock
            .requests()
            .iter()
            .all(|r| r.correlation_id.as_deref() == Some(context.job_id.to_string().as_str())));
    }

    #[tokio::test]
    async fn test_resolve_fails_when_no_application_matches() {
        let mock = Arc::new(MockRestfulClient::with_default_graph());
        mock.override_response(
            data_urls::APPLICATIONS,
            HttpMethod::Get,
            200,
            fixtures::APPLICATIONS_NO_MATCH,
        );
        let err = resolve_application(mock, discover_url(), fixtures::APPLICATION_ENDPOINT_ID, None)
            .await
            .unwrap_err();
        assert!(err.is_remote_service());
    }

    #[tokio::test]
    async fn test_resolve_rejects_url_without_host() {
        let mock = Arc::new(MockRestfulClient::new());
        let err = resolve_application(
            mock.clone(),
            Url::parse("mailto:someone@contoso.com").unwrap(),
            fixtures::APPLICATION_ENDPOINT_ID,
            None,
        )
        .await
        .unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(mock.request_count(), 0);
    }
}
