//! Recording mock transport.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use serde_json::Value;

use crate::transport::{HttpRequest, HttpResponse, HttpTransport};
use crate::Error;

/// Mock transport for testing.
///
/// Responses are served from a FIFO queue; once it is empty the default
/// response (`200` with `{"data": []}`) is returned. Every request is
/// recorded, so tests can assert both what was sent and that nothing was.
///
/// ```rust
/// use outreach_sdk::testing::MockTransport;
///
/// let mock = MockTransport::new();
/// mock.push_json(201, serde_json::json!({"access_token": "new"}));
/// assert_eq!(mock.request_count(), 0);
/// ```
pub struct MockTransport {
    responses: RwLock<VecDeque<Result<HttpResponse, Error>>>,
    default_response: RwLock<HttpResponse>,
    requests: RwLock<Vec<HttpRequest>>,
    request_count: AtomicU64,
}

impl MockTransport {
    /// Creates a new mock transport with an empty response queue.
    pub fn new() -> Self {
        Self {
            responses: RwLock::new(VecDeque::new()),
            default_response: RwLock::new(HttpResponse::json(
                200,
                &serde_json::json!({ "data": [] }),
            )),
            requests: RwLock::new(Vec::new()),
            request_count: AtomicU64::new(0),
        }
    }

    /// Queues a response.
    pub fn push_response(&self, response: HttpResponse) {
        self.responses.write().push_back(Ok(response));
    }

    /// Queues a JSON response.
    pub fn push_json(&self, status: u16, body: Value) {
        self.push_response(HttpResponse::json(status, &body));
    }

    /// Queues a transport failure.
    pub fn push_error(&self, error: Error) {
        self.responses.write().push_back(Err(error));
    }

    /// Replaces the response served once the queue is empty.
    pub fn set_default_response(&self, response: HttpResponse) {
        *self.default_response.write() = response;
    }

    /// Returns the number of requests made.
    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Returns a copy of every recorded request, oldest first.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.read().clone()
    }

    /// Returns the most recent request, if any.
    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.read().last().cloned()
    }

    /// Clears recorded requests and queued responses.
    pub fn reset(&self) {
        self.requests.write().clear();
        self.responses.write().clear();
        self.request_count.store(0, Ordering::Relaxed);
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("queued", &self.responses.read().len())
            .field("request_count", &self.request_count())
            .finish()
    }
}

#[async_trait::async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, Error> {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        self.requests.write().push(request);

        let queued = self.responses.write().pop_front();
        match queued {
            Some(result) => result,
            None => Ok(self.default_response.read().clone()),
        }
    }
}
