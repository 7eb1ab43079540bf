//! Capability gating.
//!
//! Each resource type declares a compile-time table mapping caller-facing
//! capabilities to the relation that backs them. A capability is supported
//! iff its relation is present in the resource's current [`LinkRegistry`].
//! Support is never stored; it is recomputed from the registry on demand.

use std::fmt::Debug;

use super::links::{Link, LinkRegistry};
use crate::error::{PlatformError, PlatformResult};

/// An optional operation of a resource type.
pub trait Capability: Copy + Debug + Eq + 'static {
    /// Every capability of this resource type.
    const ALL: &'static [Self];

    /// Caller-facing name (e.g. `GetAdhocMeetingResource`).
    fn name(self) -> &'static str;

    /// Relation the capability is gated on.
    fn relation(self) -> &'static str;
}

/// Whether `capability` is supported by `links`.
///
/// `None` means the resource has not been refreshed yet, which supports
/// nothing.
pub fn supports<C: Capability>(links: Option<&LinkRegistry>, capability: C) -> bool {
    links.is_some_and(|registry| registry.has(capability.relation()))
}

/// The backing link of `capability`, or `CapabilityNotAvailable`.
pub fn require<C: Capability>(
    links: Option<&LinkRegistry>,
    capability: C,
) -> PlatformResult<&Link> {
    links
        .and_then(|registry| registry.link(capability.relation()))
        .ok_or(PlatformError::CapabilityNotAvailable {
            capability: capability.name(),
            relation: capability.relation(),
        })
}

/// The currently supported subset of `C::ALL`.
pub fn supported<C: Capability>(links: Option<&LinkRegistry>) -> Vec<C> {
    C::ALL
        .iter()
        .copied()
        .filter(|capability| supports(links, *capability))
        .collect()
}
