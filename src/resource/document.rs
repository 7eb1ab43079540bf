//! Parsing of resource documents into snapshots.

use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

use super::links::{LinkDescriptor, LinkParseError, LinkRegistry};
use crate::error::{ErrorInformation, RemoteFailure, RemoteServiceError};
use crate::transport::PlatformResponse;

/// Field holding relation descriptors.
pub const LINKS_FIELD: &str = "_links";
/// Field holding embedded resources.
pub const EMBEDDED_FIELD: &str = "_embedded";

/// Whether a document must carry `_links`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinksPolicy {
    /// Navigable resources: missing `_links` makes the document malformed.
    Required,
    /// Result documents: missing `_links` yields an empty registry.
    Optional,
}

/// Why a JSON value could not be read as a resource document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("document is not a JSON object")]
    NotAnObject,

    #[error("missing _links")]
    MissingLinks,

    #[error("invalid _links: {0}")]
    InvalidLinks(#[source] serde_json::Error),

    #[error(transparent)]
    Link(#[from] LinkParseError),

    #[error("unexpected document fields: {0}")]
    Fields(#[source] serde_json::Error),
}

/// One successfully parsed resource document.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub links: LinkRegistry,
    pub payload: Value,
}

impl Snapshot {
    /// Parse a JSON value already extracted from a body (e.g. an embedded
    /// resource).
    pub fn from_value(
        base: &Url,
        payload: Value,
        policy: LinksPolicy,
    ) -> Result<Self, DocumentError> {
        let object = payload.as_object().ok_or(DocumentError::NotAnObject)?;

        let descriptors: Vec<LinkDescriptor> = match object.get(LINKS_FIELD) {
            Some(raw) => {
                serde_json::from_value(raw.clone()).map_err(DocumentError::InvalidLinks)?
            }
            None if policy == LinksPolicy::Required => return Err(DocumentError::MissingLinks),
            None => Vec::new(),
        };

        let links = LinkRegistry::from_descriptors(base, &descriptors)?;
        Ok(Self { links, payload })
    }

    /// The embedded resource under `name`, if present.
    pub fn embedded(&self, name: &str) -> Option<&Value> {
        self.payload
            .get(EMBEDDED_FIELD)
            .and_then(Value::as_object)
            .and_then(|embedded: &Map<String, Value>| embedded.get(name))
            .filter(|value| !value.is_null())
    }

    /// Deserialize the document's own fields into `T`.
    pub fn fields<T: DeserializeOwned>(&self) -> Result<T, DocumentError> {
        serde_json::from_value(self.payload.clone()).map_err(DocumentError::Fields)
    }
}

/// Validate `response` and parse its body into a [`Snapshot`].
///
/// Non-success statuses and unparsable bodies both become
/// [`RemoteServiceError`]s naming `url` and `operation`.
pub fn parse_response(
    base: &Url,
    url: &Url,
    operation: &'static str,
    response: &PlatformResponse,
    policy: LinksPolicy,
) -> Result<Snapshot, RemoteServiceError> {
    if !response.is_success() {
        let info = serde_json::from_slice::<ErrorInformation>(&response.body).ok();
        return Err(
            RemoteServiceError::new(url.clone(), operation, RemoteFailure::Status(response.status))
                .with_error_information(info),
        );
    }

    let payload: Value = serde_json::from_slice(&response.body).map_err(|e| {
        RemoteServiceError::new(
            url.clone(),
            operation,
            RemoteFailure::MalformedPayload(e.to_string()),
        )
    })?;

    Snapshot::from_value(base, payload, policy).map_err(|e| {
        RemoteServiceError::new(
            url.clone(),
            operation,
            RemoteFailure::MalformedPayload(e.to_string()),
        )
    })
}
