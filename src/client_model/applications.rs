//! The applications collection.

use std::sync::Arc;

use log::Level;
use reqwest::Url;
use serde_json::Value;

use super::application::Application;
use crate::error::{PlatformResult, RemoteFailure, RemoteServiceError};
use crate::logging::{self, LoggingContext};
use crate::resource::links::SELF_RELATION;
use crate::resource::{LinksPolicy, PlatformResource, ResourceCore, Snapshot};
use crate::transport::RestfulClient;

/// Embedded field listing the collection's entries.
pub const EMBEDDED_NAME: &str = "application";

const INITIALIZE_OPERATION: &str = "initialize applications";

/// Applications visible to the caller, one of which is selected by
/// endpoint identity during initialization.
#[derive(Debug, Clone)]
pub struct Applications {
    core: ResourceCore,
    endpoint_id: String,
    application: Option<Application>,
}

impl Applications {
    pub fn new(
        client: Arc<dyn RestfulClient>,
        base_url: Url,
        self_url: Url,
        endpoint_id: impl Into<String>,
    ) -> Self {
        Self {
            core: ResourceCore::new(client, base_url, self_url),
            endpoint_id: endpoint_id.into(),
            application: None,
        }
    }

    pub fn endpoint_id(&self) -> &str {
        &self.endpoint_id
    }

    /// Fetch the collection and select the entry whose `endpointId` equals
    /// this collection's endpoint id (exact match).
    ///
    /// The selected [`Application`] is created uninitialized. When the
    /// selected entry still points at the same URL as the current one, the
    /// current instance and its state are kept.
    pub async fn refresh_and_initialize(
        &mut self,
        context: Option<&LoggingContext>,
    ) -> PlatformResult<()> {
        let snapshot = self
            .core
            .fetch(context, INITIALIZE_OPERATION, Self::REQUIRED_RELATIONS)
            .await?;
        let application_url = self.select(&snapshot)?;

        let keep = self
            .application
            .as_ref()
            .is_some_and(|current| current.self_url() == &application_url);
        if !keep {
            logging::record(
                context,
                Level::Debug,
                format_args!("Selected application {} for {}", application_url, self.endpoint_id),
            );
            self.application = Some(Application::new(
                self.core.client().clone(),
                self.core.base_url().clone(),
                application_url,
            ));
        }
        self.core.commit_initialized(snapshot);
        Ok(())
    }

    fn select(&self, snapshot: &Snapshot) -> Result<Url, RemoteServiceError> {
        let malformed = |detail: String| {
            self.core
                .remote_error(INITIALIZE_OPERATION, RemoteFailure::MalformedPayload(detail))
        };
        let entries: Vec<&Value> = match snapshot.embedded(EMBEDDED_NAME) {
            None => Vec::new(),
            Some(Value::Array(items)) => items.iter().collect(),
            Some(single @ Value::Object(_)) => vec![single],
            Some(_) => {
                return Err(malformed(format!(
                    "embedded {} is neither an object nor an array",
                    EMBEDDED_NAME
                )))
            }
        };

        for entry in entries {
            if entry.get("endpointId").and_then(Value::as_str) != Some(self.endpoint_id.as_str()) {
                continue;
            }
            let parsed = Snapshot::from_value(self.core.base_url(), entry.clone(), LinksPolicy::Required)
                .map_err(|detail| malformed(format!("application entry: {}", detail)))?;
            return parsed
                .links
                .url_for(SELF_RELATION)
                .map(Url::clone)
                .map_err(|e| malformed(format!("application entry: {}", e)));
        }

        Err(self.core.remote_error(
            INITIALIZE_OPERATION,
            RemoteFailure::NoMatchingEntry(self.endpoint_id.clone()),
        ))
    }

    /// The selected application, once initialized.
    pub fn application(&self) -> Option<&Application> {
        self.application.as_ref()
    }

    pub fn application_mut(&mut self) -> Option<&mut Application> {
        self.application.as_mut()
    }

    pub fn into_application(self) -> Option<Application> {
        self.application
    }
}

impl PlatformResource for Applications {
    const REFRESH_OPERATION: &'static str = "refresh applications";

    fn core(&self) -> &ResourceCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ResourceCore {
        &mut self.core
    }
}
