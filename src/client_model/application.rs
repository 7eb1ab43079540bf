//! The application resource.
//!
//! Initializing an application requires its `communication` resource to be
//! embedded in the document. Its optional operations are gated on
//! relations:
//!
//! | Capability                 | Relation       |
//! |----------------------------|----------------|
//! | `GetAnonApplicationToken`  | `anonToken`    |
//! | `GetAdhocMeetingResource`  | `adhocMeeting` |

use std::sync::Arc;

use log::Level;
use reqwest::Url;
use serde::Serialize;

use super::adhoc_meeting::{AdhocMeeting, AdhocMeetingInput};
use super::anon_token::{AnonymousApplicationToken, AnonymousApplicationTokenInput};
use super::communication::{self, Communication};
use crate::error::{PlatformError, PlatformResult, RemoteFailure};
use crate::logging::{self, LoggingContext};
use crate::resource::capability::{self as gate, Capability};
use crate::resource::document::{self, LinksPolicy, Snapshot};
use crate::resource::{PlatformResource, ResourceCore};
use crate::transport::{PlatformRequest, RestfulClient};

/// Optional operations of an [`Application`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApplicationCapability {
    GetAnonApplicationToken,
    GetAdhocMeetingResource,
}

impl Capability for ApplicationCapability {
    const ALL: &'static [Self] = &[
        ApplicationCapability::GetAnonApplicationToken,
        ApplicationCapability::GetAdhocMeetingResource,
    ];

    fn name(self) -> &'static str {
        match self {
            ApplicationCapability::GetAnonApplicationToken => "GetAnonApplicationToken",
            ApplicationCapability::GetAdhocMeetingResource => "GetAdhocMeetingResource",
        }
    }

    fn relation(self) -> &'static str {
        match self {
            ApplicationCapability::GetAnonApplicationToken => "anonToken",
            ApplicationCapability::GetAdhocMeetingResource => "adhocMeeting",
        }
    }
}

const INITIALIZE_OPERATION: &str = "initialize application";
const ANON_TOKEN_OPERATION: &str = "get anonymous application token";
const ADHOC_MEETING_OPERATION: &str = "create adhoc meeting";

/// A trusted application registered on the platform.
#[derive(Debug, Clone)]
pub struct Application {
    core: ResourceCore,
    communication: Option<Communication>,
}

impl Application {
    /// An uninitialized application served from `self_url`.
    pub fn new(client: Arc<dyn RestfulClient>, base_url: Url, self_url: Url) -> Self {
        Self {
            core: ResourceCore::new(client, base_url, self_url),
            communication: None,
        }
    }

    /// Fetch the application and resolve its embedded communication
    /// resource. Nothing is committed unless both succeed; on the first
    /// failed initialization [`communication`](Self::communication) stays
    /// `None`.
    pub async fn refresh_and_initialize(
        &mut self,
        context: Option<&LoggingContext>,
    ) -> PlatformResult<()> {
        let snapshot = self
            .core
            .fetch(context, INITIALIZE_OPERATION, Self::REQUIRED_RELATIONS)
            .await?;

        let embedded = snapshot.embedded(communication::EMBEDDED_NAME).ok_or_else(|| {
            self.core.remote_error(
                INITIALIZE_OPERATION,
                RemoteFailure::MissingEmbeddedResource(communication::EMBEDDED_NAME),
            )
        })?;
        let resolved = Communication::from_embedded(
            self.core.client().clone(),
            self.core.base_url(),
            self.core.self_url(),
            INITIALIZE_OPERATION,
            embedded,
        )?;

        self.core.commit_initialized(snapshot);
        self.communication = Some(resolved);
        logging::record(
            context,
            Level::Debug,
            format_args!(
                "Application {} initialized; capabilities: {:?}",
                self.core.self_url(),
                self.supported_capabilities()
            ),
        );
        Ok(())
    }

    /// The embedded communication resource, once initialized.
    pub fn communication(&self) -> Option<&Communication> {
        self.communication.as_ref()
    }

    pub fn communication_mut(&mut self) -> Option<&mut Communication> {
        self.communication.as_mut()
    }

    /// Whether `capability` is backed by a relation in the current links.
    pub fn supports(&self, capability: ApplicationCapability) -> bool {
        gate::supports(self.core.links(), capability)
    }

    pub fn supported_capabilities(&self) -> Vec<ApplicationCapability> {
        gate::supported(self.core.links())
    }

    /// Issue an anonymous application token.
    ///
    /// Fails with `InvalidArgument` when `input` is `None` or invalid,
    /// whatever the resource's state, and otherwise with
    /// `CapabilityNotAvailable` when `anonToken` is not advertised. Neither
    /// issues a request.
    pub async fn get_anon_application_token(
        &self,
        context: Option<&LoggingContext>,
        input: Option<&AnonymousApplicationTokenInput>,
    ) -> PlatformResult<AnonymousApplicationToken> {
        let input = input.ok_or_else(|| {
            PlatformError::invalid_argument("input", "anonymous application token input is required")
        })?;
        input.validate()?;
        let url = self.gated_url(ApplicationCapability::GetAnonApplicationToken)?;

        let snapshot = self.post(context, &url, ANON_TOKEN_OPERATION, input).await?;
        Ok(AnonymousApplicationToken::from_snapshot(&url, ANON_TOKEN_OPERATION, snapshot)?)
    }

    /// Create an ad-hoc meeting.
    ///
    /// Same preconditions as
    /// [`get_anon_application_token`](Self::get_anon_application_token),
    /// against the `adhocMeeting` relation.
    pub async fn get_adhoc_meeting_resource(
        &self,
        context: Option<&LoggingContext>,
        input: Option<&AdhocMeetingInput>,
    ) -> PlatformResult<AdhocMeeting> {
        let input = input.ok_or_else(|| {
            PlatformError::invalid_argument("input", "adhoc meeting input is required")
        })?;
        let url = self.gated_url(ApplicationCapability::GetAdhocMeetingResource)?;

        let snapshot = self.post(context, &url, ADHOC_MEETING_OPERATION, input).await?;
        Ok(AdhocMeeting::from_snapshot(&url, ADHOC_MEETING_OPERATION, snapshot)?)
    }

    fn gated_url(&self, capability: ApplicationCapability) -> PlatformResult<Url> {
        gate::require(self.core.links(), capability).map(|link| link.url.clone())
    }

    async fn post<T: Serialize + Sync>(
        &self,
        context: Option<&LoggingContext>,
        url: &Url,
        operation: &'static str,
        input: &T,
    ) -> PlatformResult<Snapshot> {
        let body = serde_json::to_value(input)
            .map_err(|e| PlatformError::invalid_argument("input", e.to_string()))?;
        let response = self
            .core
            .send(context, PlatformRequest::post(url.clone(), body))
            .await?;
        Ok(document::parse_response(
            self.core.base_url(),
            url,
            operation,
            &response,
            LinksPolicy::Optional,
        )?)
    }
}

impl PlatformResource for Application {
    const REFRESH_OPERATION: &'static str = "refresh application";

    fn core(&self) -> &ResourceCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ResourceCore {
        &mut self.core
    }
}
