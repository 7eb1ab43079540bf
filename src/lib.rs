//! # platform-sdk
//!
//! Hypermedia client for a trusted-application communications platform.
//!
//! Every resource is discovered by following named relations (`_links`)
//! starting from a single discovery URL. Optional operations are gated on
//! the presence of their relation in the resource's most recent snapshot,
//! and resources go through a staged `Uninitialized → Refreshed →
//! Initialized` lifecycle.
//!
//! ```no_run
//! use std::sync::Arc;
//! use platform_sdk::client_model::{resolve_application, AdhocMeetingInput, ApplicationCapability};
//! use platform_sdk::transport::ReqwestClient;
//! use platform_sdk::PlatformConfig;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PlatformConfig::from_env()?;
//! let client = Arc::new(ReqwestClient::from_config(&config)?);
//! let mut application =
//!     resolve_application(client, config.discover_url()?, &config.application_endpoint_id, None).await?;
//! application.refresh_and_initialize(None).await?;
//!
//! if application.supports(ApplicationCapability::GetAdhocMeetingResource) {
//!     let meeting = application
//!         .get_adhoc_meeting_resource(None, Some(&AdhocMeetingInput::new().with_subject("Support")))
//!         .await?;
//!     println!("{}", meeting.join_url);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client_model;
pub mod config;
pub mod error;
pub mod logging;
pub mod resource;
pub mod testing;
pub mod transport;

pub use client_model::{Application, ApplicationCapability, Applications, Communication, Discover};
pub use config::PlatformConfig;
pub use error::{PlatformError, PlatformResult, RemoteServiceError, TransportError};
pub use logging::LoggingContext;
pub use resource::{PlatformResource, ResourceState};
pub use transport::{ReqwestClient, RestfulClient};

/// Crate version, sent in the default user agent.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
