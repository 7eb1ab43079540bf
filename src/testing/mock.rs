//! In-memory [`RestfulClient`] that records every request it processes.

use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;

use crate::error::TransportError;
use crate::transport::{HttpMethod, PlatformRequest, PlatformResponse, RestfulClient};

use super::fixtures;

#[derive(Debug, Clone)]
enum Reply {
    Respond(PlatformResponse),
    Fail(TransportError),
}

/// Scripted transport for tests.
///
/// Responses are keyed by `(method, url)`. Unscripted requests get a 404
/// with a platform error body. Every submitted request is recorded, whatever
/// the reply, and can be checked with [`requests_processed`](Self::requests_processed).
#[derive(Debug, Default)]
pub struct MockRestfulClient {
    replies: Mutex<HashMap<(HttpMethod, String), Reply>>,
    processed: Mutex<Vec<PlatformRequest>>,
}

impl MockRestfulClient {
    /// A client with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// A client scripted with the default fixture graph
    /// (discover → applications → application and its operations).
    pub fn with_default_graph() -> Self {
        let mock = Self::new();
        fixtures::install_default_graph(&mock);
        mock
    }

    /// Script the response for `method url`.
    pub fn set_response(&self, method: HttpMethod, url: &str, status: u16, body: impl Into<Bytes>) {
        self.replies.lock().insert(
            (method, url.to_string()),
            Reply::Respond(PlatformResponse::new(status, body)),
        );
    }

    /// Replace a scripted response; argument order mirrors how tests read
    /// ("for this URL and method, answer with this document").
    pub fn override_response(&self, url: &str, method: HttpMethod, status: u16, body: &'static str) {
        self.set_response(method, url, status, Bytes::from_static(body.as_bytes()));
    }

    /// Make `method url` fail at the transport level.
    pub fn fail_with(&self, method: HttpMethod, url: &str, error: TransportError) {
        self.replies
            .lock()
            .insert((method, url.to_string()), Reply::Fail(error));
    }

    /// Whether a request with signature `"METHOD url"` was processed.
    pub fn requests_processed(&self, signature: &str) -> bool {
        self.count_of(signature) > 0
    }

    /// How many requests with signature `"METHOD url"` were processed.
    pub fn count_of(&self, signature: &str) -> usize {
        self.processed
            .lock()
            .iter()
            .filter(|request| request.signature() == signature)
            .count()
    }

    /// Total number of processed requests.
    pub fn request_count(&self) -> usize {
        self.processed.lock().len()
    }

    /// Copies of every processed request, in order.
    pub fn requests(&self) -> Vec<PlatformRequest> {
        self.processed.lock().clone()
    }

    /// Forget processed requests; scripted replies are kept.
    pub fn clear_requests(&self) {
        self.processed.lock().clear();
    }
}

#[async_trait]
impl RestfulClient for MockRestfulClient {
    async fn submit(&self, request: PlatformRequest) -> Result<PlatformResponse, TransportError> {
        let key = (request.method, request.url.to_string());
        self.processed.lock().push(request);

        let reply = self.replies.lock().get(&key).cloned();
        match reply {
            Some(Reply::Respond(response)) => Ok(response),
            Some(Reply::Fail(error)) => Err(error),
            None => Ok(PlatformResponse::new(404, fixtures::NOT_FOUND)),
        }
    }
}
