//! Ad-hoc online meetings.

use chrono::{DateTime, Utc};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::{RemoteFailure, RemoteServiceError};
use crate::resource::{LinkRegistry, Snapshot};

/// Who may join a meeting without being let in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessLevel {
    Everyone,
    Invited,
    SameEnterprise,
}

/// Request body for creating an ad-hoc meeting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdhocMeetingInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_level: Option<AccessLevel>,
    /// Opaque value echoed back on platform callbacks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_context: Option<String>,
}

impl AdhocMeetingInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_access_level(mut self, access_level: AccessLevel) -> Self {
        self.access_level = Some(access_level);
        self
    }

    pub fn with_callback_context(mut self, context: impl Into<String>) -> Self {
        self.callback_context = Some(context.into());
        self
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MeetingFields {
    online_meeting_uri: String,
    join_url: String,
    #[serde(default)]
    subject: Option<String>,
    #[serde(default)]
    access_level: Option<AccessLevel>,
    #[serde(default)]
    expiration_time: Option<DateTime<Utc>>,
}

/// A meeting created through the application's `adhocMeeting` relation.
#[derive(Debug, Clone, PartialEq)]
pub struct AdhocMeeting {
    pub online_meeting_uri: String,
    pub join_url: Url,
    pub subject: Option<String>,
    pub access_level: Option<AccessLevel>,
    pub expiration_time: Option<DateTime<Utc>>,
    pub links: LinkRegistry,
}

impl AdhocMeeting {
    pub(crate) fn from_snapshot(
        url: &Url,
        operation: &'static str,
        snapshot: Snapshot,
    ) -> Result<Self, RemoteServiceError> {
        let malformed = |detail: String| {
            RemoteServiceError::new(url.clone(), operation, RemoteFailure::MalformedPayload(detail))
        };
        let fields: MeetingFields = snapshot.fields().map_err(|e| malformed(e.to_string()))?;
        let join_url = Url::parse(&fields.join_url)
            .map_err(|e| malformed(format!("joinUrl `{}`: {}", fields.join_url, e)))?;
        Ok(Self {
            online_meeting_uri: fields.online_meeting_uri,
            join_url,
            subject: fields.subject,
            access_level: fields.access_level,
            expiration_time: fields.expiration_time,
            links: snapshot.links,
        })
    }
}
