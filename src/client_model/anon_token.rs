//! Anonymous application tokens.

use chrono::{DateTime, Utc};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::{PlatformError, PlatformResult, RemoteFailure, RemoteServiceError};
use crate::resource::{LinkRegistry, Snapshot};

/// Relation pointing at the anonymous-application discovery document.
pub const ANON_DISCOVER_RELATION: &str = "anonymousApplicationsDiscover";

/// Request body for issuing an anonymous application token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnonymousApplicationTokenInput {
    /// Origins allowed to use the token, separated by `;`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_origins: Option<String>,
    /// Meeting the token grants access to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_url: Option<String>,
    /// Caller-chosen session identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_session_id: Option<String>,
}

impl AnonymousApplicationTokenInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_meeting_url(mut self, meeting_url: impl Into<String>) -> Self {
        self.meeting_url = Some(meeting_url.into());
        self
    }

    pub fn with_allowed_origins(mut self, origins: impl Into<String>) -> Self {
        self.allowed_origins = Some(origins.into());
        self
    }

    pub fn with_application_session_id(mut self, id: impl Into<String>) -> Self {
        self.application_session_id = Some(id.into());
        self
    }

    /// `meeting_url`, when set, must be an absolute URL.
    pub fn validate(&self) -> PlatformResult<()> {
        if let Some(ref meeting_url) = self.meeting_url {
            Url::parse(meeting_url)
                .map_err(|e| PlatformError::invalid_argument("input.meeting_url", e.to_string()))?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenFields {
    auth_token: String,
    #[serde(default)]
    auth_token_expiry_time: Option<DateTime<Utc>>,
}

/// A token issued by the platform for anonymous (guest) clients.
#[derive(Debug, Clone, PartialEq)]
pub struct AnonymousApplicationToken {
    pub auth_token: String,
    pub auth_token_expiry_time: Option<DateTime<Utc>>,
    pub links: LinkRegistry,
}

impl AnonymousApplicationToken {
    /// Build from a parsed response; a missing or empty `authToken` is
    /// malformed.
    pub(crate) fn from_snapshot(
        url: &Url,
        operation: &'static str,
        snapshot: Snapshot,
    ) -> Result<Self, RemoteServiceError> {
        let malformed =
            |detail: String| RemoteServiceError::new(url.clone(), operation, RemoteFailure::MalformedPayload(detail));

        let fields: TokenFields = snapshot.fields().map_err(|e| malformed(e.to_string()))?;
        if fields.auth_token.trim().is_empty() {
            return Err(malformed("authToken is empty".to_string()));
        }
        Ok(Self {
            auth_token: fields.auth_token,
            auth_token_expiry_time: fields.auth_token_expiry_time,
            links: snapshot.links,
        })
    }

    /// Discovery URL anonymous clients should start from, if advertised.
    pub fn anonymous_discover_url(&self) -> Option<&Url> {
        self.links.url_for(ANON_DISCOVER_RELATION).ok()
    }

    /// Whether the token has expired at `now`. Tokens without an expiry
    /// never report expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.auth_token_expiry_time.is_some_and(|expiry| expiry <= now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::LinksPolicy;
    use chrono::TimeZone;
    use serde_json::json;

    fn url() -> Url {
        Url::parse("https://platform.example.com/tokens").unwrap()
    }

    fn snapshot(value: serde_json::Value) -> Snapshot {
        let base = Url::parse("https://platform.example.com/").unwrap();
        Snapshot::from_value(&base, value, LinksPolicy::Optional).unwrap()
    }

    #[test]
    fn test_input_serializes_camel_case_and_skips_unset() {
        let input = AnonymousApplicationTokenInput::new()
            .with_meeting_url("https://meet.contoso.com/x")
            .with_application_session_id("s-1");
        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value["meetingUrl"], "https://meet.contoso.com/x");
        assert_eq!(value["applicationSessionId"], "s-1");
        assert!(value.get("allowedOrigins").is_none());
    }

    #[test]
    fn test_input_validation() {
        assert!(AnonymousApplicationTokenInput::new().validate().is_ok());
        let err = AnonymousApplicationTokenInput::new()
            .with_meeting_url("not a url")
            .validate()
            .unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_from_snapshot() {
        let token = AnonymousApplicationToken::from_snapshot(
            &url(),
            "issue token",
            snapshot(json!({
                "authToken": "Bearer abc",
                "authTokenExpiryTime": "2026-10-16T18:30:00Z",
                "_links": [{"rel": "anonymousApplicationsDiscover", "href": "/anon/discover"}]
            })),
        )
        .unwrap();
        assert_eq!(token.auth_token, "Bearer abc");
        assert_eq!(
            token.anonymous_discover_url().unwrap().as_str(),
            "https://platform.example.com/anon/discover"
        );
        let before = Utc.with_ymd_and_hms(2026, 10, 16, 18, 0, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2026, 10, 16, 19, 0, 0).unwrap();
        assert!(!token.is_expired_at(before));
        assert!(token.is_expired_at(after));
    }

    #[test]
    fn test_missing_or_empty_token_is_malformed() {
        let err = AnonymousApplicationToken::from_snapshot(&url(), "issue token", snapshot(json!({})))
            .unwrap_err();
        assert!(matches!(err.failure, RemoteFailure::MalformedPayload(_)));

        let err = AnonymousApplicationToken::from_snapshot(
            &url(),
            "issue token",
            snapshot(json!({"authToken": "  "})),
        )
        .unwrap_err();
        assert!(matches!(err.failure, RemoteFailure::MalformedPayload(_)));
    }
}
