//! Canned platform documents.
//!
//! All hrefs are relative, so they also exercise resolution against the
//! base URL derived from [`data_urls::DISCOVER`].

use crate::transport::HttpMethod;

use super::MockRestfulClient;

/// Absolute URLs the default graph is served from.
pub mod data_urls {
    pub const BASE: &str = "https://platform.example.com/";
    pub const DISCOVER: &str = "https://platform.example.com/platformservice/discover";
    pub const APPLICATIONS: &str = "https://platform.example.com/platformservice/v1/applications";
    pub const APPLICATION: &str =
        "https://platform.example.com/platformservice/v1/applications/2104";
    pub const COMMUNICATION: &str =
        "https://platform.example.com/platformservice/v1/applications/2104/communication";
    pub const ANON_TOKEN: &str =
        "https://platform.example.com/platformservice/v1/applications/2104/anonApplicationTokens";
    pub const ADHOC_MEETING: &str =
        "https://platform.example.com/platformservice/v1/applications/2104/adhocMeetings";
}

/// Endpoint identity the default applications collection contains.
pub const APPLICATION_ENDPOINT_ID: &str = "sip:platformtest@contoso.com";

pub const DISCOVER: &str = r#"{
  "_links": [
    { "rel": "self", "href": "/platformservice/discover" },
    { "rel": "applications", "href": "/platformservice/v1/applications" }
  ]
}"#;

pub const DISCOVER_NO_APPLICATIONS: &str = r#"{
  "_links": [
    { "rel": "self", "href": "/platformservice/discover" }
  ]
}"#;

pub const APPLICATIONS: &str = r#"{
  "_links": [
    { "rel": "self", "href": "/platformservice/v1/applications" }
  ],
  "_embedded": {
    "application": [
      {
        "endpointId": "sip:other@contoso.com",
        "_links": [ { "rel": "self", "href": "/platformservice/v1/applications/1001" } ]
      },
      {
        "endpointId": "sip:platformtest@contoso.com",
        "_links": [ { "rel": "self", "href": "/platformservice/v1/applications/2104" } ]
      }
    ]
  }
}"#;

pub const APPLICATIONS_NO_MATCH: &str = r#"{
  "_links": [
    { "rel": "self", "href": "/platformservice/v1/applications" }
  ],
  "_embedded": {
    "application": [
      {
        "endpointId": "sip:other@contoso.com",
        "_links": [ { "rel": "self", "href": "/platformservice/v1/applications/1001" } ]
      }
    ]
  }
}"#;

pub const APPLICATION: &str = r#"{
  "_links": [
    { "rel": "self", "href": "/platformservice/v1/applications/2104" },
    { "rel": "anonToken", "href": "/platformservice/v1/applications/2104/anonApplicationTokens", "method": "POST" },
    { "rel": "adhocMeeting", "href": "/platformservice/v1/applications/2104/adhocMeetings", "method": "POST" }
  ],
  "_embedded": {
    "communication": {
      "_links": [
        { "rel": "self", "href": "/platformservice/v1/applications/2104/communication" },
        { "rel": "conversations", "href": "/platformservice/v1/applications/2104/communication/conversations" }
      ]
    }
  }
}"#;

pub const APPLICATION_NO_ANON_TOKEN: &str = r#"{
  "_links": [
    { "rel": "self", "href": "/platformservice/v1/applications/2104" },
    { "rel": "adhocMeeting", "href": "/platformservice/v1/applications/2104/adhocMeetings", "method": "POST" }
  ],
  "_embedded": {
    "communication": {
      "_links": [ { "rel": "self", "href": "/platformservice/v1/applications/2104/communication" } ]
    }
  }
}"#;

pub const APPLICATION_NO_ADHOC_MEETINGS: &str = r#"{
  "_links": [
    { "rel": "self", "href": "/platformservice/v1/applications/2104" },
    { "rel": "anonToken", "href": "/platformservice/v1/applications/2104/anonApplicationTokens", "method": "POST" }
  ],
  "_embedded": {
    "communication": {
      "_links": [ { "rel": "self", "href": "/platformservice/v1/applications/2104/communication" } ]
    }
  }
}"#;

pub const APPLICATION_NO_COMMUNICATION: &str = r#"{
  "_links": [
    { "rel": "self", "href": "/platformservice/v1/applications/2104" },
    { "rel": "anonToken", "href": "/platformservice/v1/applications/2104/anonApplicationTokens", "method": "POST" },
    { "rel": "adhocMeeting", "href": "/platformservice/v1/applications/2104/adhocMeetings", "method": "POST" }
  ]
}"#;

pub const COMMUNICATION: &str = r#"{
  "_links": [
    { "rel": "self", "href": "/platformservice/v1/applications/2104/communication" },
    { "rel": "conversations", "href": "/platformservice/v1/applications/2104/communication/conversations" },
    { "rel": "messagingInvitations", "href": "/platformservice/v1/applications/2104/communication/messagingInvitations", "method": "POST" }
  ]
}"#;

pub const ANON_TOKEN: &str = r#"{
  "authToken": "Bearer cwt=AAEBHAEFAAAAAAAFFQAAAHmD",
  "authTokenExpiryTime": "2026-10-16T18:30:00Z",
  "_links": [
    { "rel": "anonymousApplicationsDiscover", "href": "/platformservice/anonapplications/discover" }
  ]
}"#;

/// Token response missing `authToken`.
pub const ANON_TOKEN_MALFORMED: &str = r#"{
  "authTokenExpiryTime": "2026-10-16T18:30:00Z"
}"#;

pub const ADHOC_MEETING: &str = r#"{
  "onlineMeetingUri": "sip:platformtest@contoso.com;gruu;opaque=app:conf:focus:id:7K2NQ5CP",
  "joinUrl": "https://meet.contoso.com/platformtest/7K2NQ5CP",
  "subject": "Support session",
  "accessLevel": "Everyone",
  "expirationTime": "2026-10-17T00:00:00Z",
  "_links": [
    { "rel": "self", "href": "/platformservice/v1/applications/2104/adhocMeetings/7K2NQ5CP" }
  ]
}"#;

/// Meeting response that is not valid JSON.
pub const ADHOC_MEETING_MALFORMED: &str = r#"{ "onlineMeetingUri": "sip:x@contoso.com", "#;

pub const NOT_FOUND: &str = r#"{ "code": "NotFound", "message": "No scripted response" }"#;

/// Script the default graph on `mock`.
pub fn install_default_graph(mock: &MockRestfulClient) {
    mock.override_response(data_urls::DISCOVER, HttpMethod::Get, 200, DISCOVER);
    mock.override_response(data_urls::APPLICATIONS, HttpMethod::Get, 200, APPLICATIONS);
    mock.override_response(data_urls::APPLICATION, HttpMethod::Get, 200, APPLICATION);
    mock.override_response(data_urls::COMMUNICATION, HttpMethod::Get, 200, COMMUNICATION);
    mock.override_response(data_urls::ANON_TOKEN, HttpMethod::Post, 200, ANON_TOKEN);
    mock.override_response(data_urls::ADHOC_MEETING, HttpMethod::Post, 200, ADHOC_MEETING);
}
