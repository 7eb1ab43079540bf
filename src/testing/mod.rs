//! Test support: a recording mock transport and canned documents.
//!
//! Exposed publicly so applications built on this crate can exercise their
//! own navigation logic without a live platform.

pub mod fixtures;
pub mod mock;

pub use mock::MockRestfulClient;
