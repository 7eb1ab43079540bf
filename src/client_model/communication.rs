//! The communication resource embedded in an application document.

use std::sync::Arc;

use reqwest::Url;
use serde_json::Value;

use crate::error::{RemoteFailure, RemoteServiceError};
use crate::resource::links::SELF_RELATION;
use crate::resource::{LinksPolicy, PlatformResource, ResourceCore, Snapshot};
use crate::transport::RestfulClient;

/// Name of the embedded field that carries this resource.
pub const EMBEDDED_NAME: &str = "communication";

/// Entry point for conversations and invitations of an application.
///
/// Only ever built from an application's embedded payload, so a
/// `Communication` is always at least refreshed. It can be refreshed on its
/// own afterwards through its `self` relation.
#[derive(Debug, Clone)]
pub struct Communication {
    core: ResourceCore,
}

impl Communication {
    /// Build from the embedded value. Without a `self` relation the
    /// resource falls back to its parent's URL.
    pub(crate) fn from_embedded(
        client: Arc<dyn RestfulClient>,
        base_url: &Url,
        parent_url: &Url,
        operation: &'static str,
        embedded: &Value,
    ) -> Result<Self, RemoteServiceError> {
        let snapshot = Snapshot::from_value(base_url, embedded.clone(), LinksPolicy::Required)
            .map_err(|detail| {
                RemoteServiceError::new(
                    parent_url.clone(),
                    operation,
                    RemoteFailure::MalformedPayload(format!("embedded {}: {}", EMBEDDED_NAME, detail)),
                )
            })?;
        let self_url = snapshot
            .links
            .url_for(SELF_RELATION)
            .map(Url::clone)
            .unwrap_or_else(|_| parent_url.clone());
        Ok(Self {
            core: ResourceCore::with_snapshot(client, base_url.clone(), self_url, snapshot),
        })
    }

    /// Whether the communication advertises `relation`.
    pub fn has_relation(&self, relation: &str) -> bool {
        self.core.links().is_some_and(|links| links.has(relation))
    }

    pub fn payload(&self) -> Option<&Value> {
        self.core.payload()
    }
}

impl PlatformResource for Communication {
    const REFRESH_OPERATION: &'static str = "refresh communication";

    fn core(&self) -> &ResourceCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ResourceCore {
        &mut self.core
    }
}
