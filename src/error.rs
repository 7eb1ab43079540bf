//! Error types for the platform client.
//!
//! Four kinds reach callers of resource operations:
//! - [`PlatformError::InvalidArgument`]: the caller passed a missing or
//!   invalid input. Detected before any request is made.
//! - [`PlatformError::CapabilityNotAvailable`]: the backing relation of a
//!   gated operation is absent from the cached links. No request is made.
//! - [`PlatformError::RemoteService`]: the server answered, but with a
//!   failure status, a structurally invalid payload, or without a required
//!   embedded resource.
//! - [`PlatformError::Transport`]: the transport collaborator failed. Passed
//!   through unmodified.

use std::fmt;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result alias used throughout the crate.
pub type PlatformResult<T> = Result<T, PlatformError>;

/// Top-level error returned by resource operations.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// A caller-supplied argument was missing or invalid.
    #[error("Invalid argument `{name}`: {reason}")]
    InvalidArgument {
        /// Name of the offending parameter.
        name: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// The operation's backing relation is not advertised by the resource.
    #[error("Capability {capability} is not available: relation `{relation}` is absent")]
    CapabilityNotAvailable {
        /// Caller-facing capability name.
        capability: &'static str,
        /// Relation the capability is gated on.
        relation: &'static str,
    },

    /// The remote service responded with something unusable.
    #[error(transparent)]
    RemoteService(#[from] RemoteServiceError),

    /// The transport collaborator failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl PlatformError {
    /// Build an `InvalidArgument` error.
    pub fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    /// Whether this error is a [`PlatformError::RemoteService`].
    pub fn is_remote_service(&self) -> bool {
        matches!(self, Self::RemoteService(_))
    }

    /// Whether this error is a [`PlatformError::CapabilityNotAvailable`].
    pub fn is_capability_not_available(&self) -> bool {
        matches!(self, Self::CapabilityNotAvailable { .. })
    }

    /// Whether this error is a [`PlatformError::InvalidArgument`].
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }

    /// Whether this error is a [`PlatformError::Transport`].
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

// ---------------------------------------------------------------------------
// Remote service errors
// ---------------------------------------------------------------------------

/// Why a response was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteFailure {
    /// Non-success HTTP status.
    Status(u16),
    /// Body could not be parsed into the expected document.
    MalformedPayload(String),
    /// A relation the resource cannot work without is missing.
    MissingRelation(&'static str),
    /// A required embedded resource is missing.
    MissingEmbeddedResource(&'static str),
    /// The collection holds no entry for the requested endpoint.
    NoMatchingEntry(String),
}

impl fmt::Display for RemoteFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(code) => write!(f, "HTTP {}", code),
            Self::MalformedPayload(detail) => write!(f, "malformed payload: {}", detail),
            Self::MissingRelation(rel) => write!(f, "relation `{}` is missing", rel),
            Self::MissingEmbeddedResource(name) => {
                write!(f, "{} resource is not embedded", name)
            }
            Self::NoMatchingEntry(id) => write!(f, "no entry matches `{}`", id),
        }
    }
}

/// Error information the platform attaches to failure responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInformation {
    /// Top-level error code (e.g. "BadRequest").
    pub code: String,
    /// Optional refinement of `code`.
    #[serde(default)]
    pub subcode: Option<String>,
    /// Human-readable message.
    #[serde(default)]
    pub message: Option<String>,
}

/// The server responded but the response could not be used.
#[derive(Debug, Clone, Error)]
#[error("{operation} against {url} failed: {failure}")]
pub struct RemoteServiceError {
    /// URL of the offending request.
    pub url: Url,
    /// Operation that was being performed (e.g. "refresh application").
    pub operation: &'static str,
    /// What went wrong.
    pub failure: RemoteFailure,
    /// Error body returned by the platform, when one could be parsed.
    pub error_information: Option<ErrorInformation>,
}

impl RemoteServiceError {
    /// Create a new `RemoteServiceError`.
    pub fn new(url: Url, operation: &'static str, failure: RemoteFailure) -> Self {
        Self {
            url,
            operation,
            failure,
            error_information: None,
        }
    }

    /// Attach the platform's error body.
    pub fn with_error_information(mut self, info: Option<ErrorInformation>) -> Self {
        self.error_information = info;
        self
    }

    /// HTTP status, if the failure was a status failure.
    pub fn status(&self) -> Option<u16> {
        match self.failure {
            RemoteFailure::Status(code) => Some(code),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

/// Failures raised by a [`RestfulClient`](crate::transport::RestfulClient).
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("Connection to {url} failed: {message}")]
    Connect { url: String, message: String },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("Invalid transport configuration: {0}")]
    InvalidConfig(String),
}

// ---------------------------------------------------------------------------
// Link registry errors
// ---------------------------------------------------------------------------

/// Returned by [`LinkRegistry::url_for`](crate::resource::LinkRegistry::url_for)
/// when a relation is absent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Link not found for relation `{relation}`")]
pub struct LinkNotFound {
    /// The relation that was looked up.
    pub relation: String,
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors raised while loading a [`PlatformConfig`](crate::config::PlatformConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Missing configuration value: {0}")]
    Missing(&'static str),

    #[error("Invalid configuration value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url() -> Url {
        Url::parse("https://platform.example.com/platformservice/v1/applications").unwrap()
    }

    #[test]
    fn test_remote_service_error_display() {
        let err = RemoteServiceError::new(
            url(),
            "refresh application",
            RemoteFailure::MissingEmbeddedResource("communication"),
        );
        let msg = err.to_string();
        assert!(msg.contains("refresh application"));
        assert!(msg.contains("communication resource is not embedded"));
        assert!(msg.contains("platform.example.com"));
    }

    #[test]
    fn test_status_accessor() {
        let err = RemoteServiceError::new(url(), "refresh", RemoteFailure::Status(503));
        assert_eq!(err.status(), Some(503));

        let err = RemoteServiceError::new(
            url(),
            "refresh",
            RemoteFailure::MalformedPayload("eof".into()),
        );
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_transport_error_is_not_reinterpreted() {
        let err: PlatformError = TransportError::Timeout {
            url: "https://x".into(),
        }
        .into();
        assert!(err.is_transport());
        assert!(!err.is_remote_service());
    }

    #[test]
    fn test_capability_error_names_relation() {
        let err = PlatformError::CapabilityNotAvailable {
            capability: "GetAdhocMeetingResource",
            relation: "adhocMeeting",
        };
        assert!(err.is_capability_not_available());
        assert!(err.to_string().contains("adhocMeeting"));
    }

    #[test]
    fn test_error_information_deserializes_partial_body() {
        let info: ErrorInformation =
            serde_json::from_str(r#"{"code":"Forbidden"}"#).unwrap();
        assert_eq!(info.code, "Forbidden");
        assert!(info.subcode.is_none());
        assert!(info.message.is_none());
    }
}
