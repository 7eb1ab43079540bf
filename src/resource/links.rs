//! Link registry: relation name → URL, per resource snapshot.

use std::collections::HashMap;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::LinkNotFound;
use crate::transport::HttpMethod;

/// Relation every navigable resource advertises for itself.
pub const SELF_RELATION: &str = "self";

/// A relation descriptor as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkDescriptor {
    pub rel: String,
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

/// A resolved link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Absolute URL.
    pub url: Url,
    /// Advertised method, `GET` when the descriptor omits it.
    pub method: HttpMethod,
}

/// Raised when a descriptor cannot be turned into a [`Link`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkParseError {
    #[error("relation name is empty")]
    EmptyRelation,

    #[error("href `{href}` of relation `{rel}` is invalid: {reason}")]
    InvalidHref { rel: String, href: String, reason: String },

    #[error("method `{method}` of relation `{rel}` is not supported")]
    UnsupportedMethod { rel: String, method: String },
}

/// Relations advertised by one resource snapshot.
///
/// Relation names are case-sensitive. A registry is never merged into: every
/// successful parse builds a new one that replaces the previous registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkRegistry {
    links: HashMap<String, Link>,
}

impl LinkRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from wire descriptors, resolving relative hrefs
    /// against `base`.
    ///
    /// Duplicate relation names are last-wins.
    pub fn from_descriptors(
        base: &Url,
        descriptors: &[LinkDescriptor],
    ) -> Result<Self, LinkParseError> {
        let mut links = HashMap::with_capacity(descriptors.len());
        for descriptor in descriptors {
            if descriptor.rel.is_empty() {
                return Err(LinkParseError::EmptyRelation);
            }
            let url = base
                .join(&descriptor.href)
                .map_err(|e| LinkParseError::InvalidHref {
                    rel: descriptor.rel.clone(),
                    href: descriptor.href.clone(),
                    reason: e.to_string(),
                })?;
            let method = match descriptor.method.as_deref() {
                None => HttpMethod::Get,
                Some(raw) => HttpMethod::from_str_opt(raw).ok_or_else(|| {
                    LinkParseError::UnsupportedMethod {
                        rel: descriptor.rel.clone(),
                        method: raw.to_string(),
                    }
                })?,
            };
            if let Some(previous) = links.insert(descriptor.rel.clone(), Link { url, method }) {
                // TODO: confirm against the platform whether duplicate relations can occur at all.
                log::warn!(
                    "Duplicate relation `{}`; replacing {} with {}",
                    descriptor.rel,
                    previous.url,
                    descriptor.href
                );
            }
        }
        Ok(Self { links })
    }

    /// Whether `relation` is present.
    pub fn has(&self, relation: &str) -> bool {
        self.links.contains_key(relation)
    }

    /// URL of `relation`.
    pub fn url_for(&self, relation: &str) -> Result<&Url, LinkNotFound> {
        self.links
            .get(relation)
            .map(|link| &link.url)
            .ok_or_else(|| LinkNotFound {
                relation: relation.to_string(),
            })
    }

    pub fn link(&self, relation: &str) -> Option<&Link> {
        self.links.get(relation)
    }

    /// Relation names, in no particular order.
    pub fn relations(&self) -> impl Iterator<Item = &str> {
        self.links.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://platform.example.com/").unwrap()
    }

    fn descriptor(rel: &str, href: &str, method: Option<&str>) -> LinkDescriptor {
        LinkDescriptor {
            rel: rel.to_string(),
            href: href.to_string(),
            method: method.map(str::to_string),
        }
    }

    #[test]
    fn test_relative_hrefs_resolve_against_base() {
        let registry = LinkRegistry::from_descriptors(
            &base(),
            &[descriptor("applications", "/platformservice/v1/applications", None)],
        )
        .unwrap();
        assert_eq!(
            registry.url_for("applications").unwrap().as_str(),
            "https://platform.example.com/platformservice/v1/applications"
        );
    }

    #[test]
    fn test_absolute_hrefs_kept() {
        let registry = LinkRegistry::from_descriptors(
            &base(),
            &[descriptor("self", "https://other.example.com/x", None)],
        )
        .unwrap();
        assert_eq!(registry.url_for("self").unwrap().host_str(), Some("other.example.com"));
    }

    #[test]
    fn test_method_defaults_to_get() {
        let registry = LinkRegistry::from_descriptors(
            &base(),
            &[
                descriptor("self", "/a", None),
                descriptor("anonToken", "/a/anonToken", Some("post")),
            ],
        )
        .unwrap();
        assert_eq!(registry.link("self").unwrap().method, HttpMethod::Get);
        assert_eq!(registry.link("anonToken").unwrap().method, HttpMethod::Post);
    }

    #[test]
    fn test_relations_are_case_sensitive() {
        let registry =
            LinkRegistry::from_descriptors(&base(), &[descriptor("adhocMeeting", "/m", None)])
                .unwrap();
        assert!(registry.has("adhocMeeting"));
        assert!(!registry.has("AdhocMeeting"));
    }

    #[test]
    fn test_url_for_missing_relation() {
        let registry = LinkRegistry::new();
        let err = registry.url_for("applications").unwrap_err();
        assert_eq!(err.relation, "applications");
    }

    #[test]
    fn test_duplicate_relation_last_wins() {
        let registry = LinkRegistry::from_descriptors(
            &base(),
            &[descriptor("self", "/first", None), descriptor("self", "/second", None)],
        )
        .unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.url_for("self").unwrap().path(), "/second");
    }

    #[test]
    fn test_unsupported_method_rejected() {
        let err = LinkRegistry::from_descriptors(&base(), &[descriptor("x", "/x", Some("PATCH"))])
            .unwrap_err();
        assert!(matches!(err, LinkParseError::UnsupportedMethod { .. }));
    }

    #[test]
    fn test_empty_relation_rejected() {
        let err =
            LinkRegistry::from_descriptors(&base(), &[descriptor("", "/x", None)]).unwrap_err();
        assert_eq!(err, LinkParseError::EmptyRelation);
    }
}
