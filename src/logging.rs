//! Correlated logging for platform operations.
//!
//! Every public operation accepts an `Option<&LoggingContext>`. When a
//! context is supplied its job id prefixes each record and travels with the
//! outgoing request as a correlation id. Passing `None` only drops the
//! correlation; it never changes what an operation does.

use std::collections::BTreeMap;
use std::fmt;

use log::Level;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Header carrying the job id of a [`LoggingContext`].
pub const CORRELATION_HEADER: &str = "X-Ms-Correlation-Id";

/// Per-call-chain logging context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingContext {
    /// Identifier shared by every record and request of one call chain.
    pub job_id: Uuid,
    /// Extra key/value pairs appended to each record.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl LoggingContext {
    /// Create a context with the given job id.
    pub fn new(job_id: Uuid) -> Self {
        Self {
            job_id,
            properties: BTreeMap::new(),
        }
    }

    /// Create a context with a fresh random job id.
    pub fn generate() -> Self {
        Self::new(Uuid::new_v4())
    }

    /// Attach a property, returning the updated context.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

impl Default for LoggingContext {
    fn default() -> Self {
        Self::generate()
    }
}

impl fmt::Display for LoggingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[job {}", self.job_id)?;
        for (key, value) in &self.properties {
            write!(f, " {}={}", key, value)?;
        }
        write!(f, "]")
    }
}

/// Emit one log record, prefixed with the context when there is one.
pub fn record(context: Option<&LoggingContext>, level: Level, message: fmt::Arguments<'_>) {
    match context {
        Some(ctx) => log::log!(target: "platform_sdk", level, "{} {}", ctx, message),
        None => log::log!(target: "platform_sdk", level, "{}", message),
    }
}

/// Correlation id to send with a request, if a context is present.
pub fn correlation_id(context: Option<&LoggingContext>) -> Option<String> {
    context.map(|ctx| ctx.job_id.to_string())
}
