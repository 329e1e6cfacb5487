//! A small JSON API client and a scripted fetch double
//!
//! [`ApiClient`] talks to anything implementing [`Fetch`]. [`MockFetch`]
//! serves canned responses by URL with an optional delay or forced network
//! failure; a `Mock<(Request,), Promise<Response>>` works as a fetch too.

use futures_util::future::{BoxFuture, FutureExt};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use verdict_runtime::{Mock, Promise, Value};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HttpError {
    #[error("Request timeout")]
    Timeout,

    #[error("HTTP {status}: {text}")]
    Status { status: u16, text: String },

    #[error("Network error")]
    Network,

    #[error("{0}")]
    Transport(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub body: Option<Value>,
}

impl Request {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            body: None,
        }
    }

    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            body: Some(body),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: Value,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Value>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json(&self) -> Value {
        self.body.clone()
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new(200, Value::Undefined)
    }
}

impl From<Response> for Value {
    fn from(response: Response) -> Self {
        Value::object([
            ("status", Value::from(response.status)),
            ("ok", Value::from(response.ok())),
            ("body", response.body),
        ])
    }
}

/// Reason phrase for the status codes the demos use.
pub fn status_text(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown Status",
    }
}

/// Transport used by [`ApiClient`].
pub trait Fetch: Send + Sync {
    fn fetch(&self, request: Request) -> BoxFuture<'static, Result<Response, HttpError>>;
}

impl Fetch for Mock<(Request,), Promise<Response>> {
    fn fetch(&self, request: Request) -> BoxFuture<'static, Result<Response, HttpError>> {
        let promise = self.call((request,));
        async move {
            let promise = promise.map_err(|e| HttpError::Transport(e.message()))?;
            promise.await.map_err(|e| HttpError::Transport(e.message()))
        }
        .boxed()
    }
}

// ============================================================================
// MockFetch
// ============================================================================

#[derive(Debug, Default)]
struct FetchState {
    responses: HashMap<String, Response>,
    delay: Duration,
    fail: bool,
    requests: Vec<Request>,
}

/// Scripted fetch; clones share responses and the request log.
#[derive(Debug, Clone, Default)]
pub struct MockFetch {
    state: Arc<Mutex<FetchState>>,
}

impl MockFetch {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, FetchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Serve `response` for requests to `url`. Unknown URLs get a 404.
    pub fn mock_response(&self, url: impl Into<String>, response: Response) -> &Self {
        self.lock().responses.insert(url.into(), response);
        self
    }

    /// Wait this long before answering.
    pub fn mock_delay(&self, delay: Duration) -> &Self {
        self.lock().delay = delay;
        self
    }

    /// Fail every request with a network error.
    pub fn mock_failure(&self, fail: bool) -> &Self {
        self.lock().fail = fail;
        self
    }

    pub fn reset(&self) {
        *self.lock() = FetchState::default();
    }

    pub fn requests(&self) -> Vec<Request> {
        self.lock().requests.clone()
    }
}

impl Fetch for MockFetch {
    fn fetch(&self, request: Request) -> BoxFuture<'static, Result<Response, HttpError>> {
        let (delay, outcome) = {
            let mut state = self.lock();
            state.requests.push(request.clone());
            let outcome = if state.fail {
                Err(HttpError::Network)
            } else {
                Ok(state
                    .responses
                    .get(&request.url)
                    .cloned()
                    .unwrap_or_else(|| Response::new(404, "Not found")))
            };
            (state.delay, outcome)
        };

        async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            outcome
        }
        .boxed()
    }
}

// ============================================================================
// ApiClient
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// JSON client with a per-request timeout.
#[derive(Debug, Clone)]
pub struct ApiClient<F> {
    base_url: String,
    timeout: Duration,
    fetch: F,
}

impl<F: Fetch> ApiClient<F> {
    pub fn new(fetch: F) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            fetch,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn get(&self, endpoint: &str) -> Result<Value, HttpError> {
        let request = Request::get(format!("{}{}", self.base_url, endpoint));
        self.send(request).await
    }

    pub async fn post(&self, endpoint: &str, body: impl Into<Value>) -> Result<Value, HttpError> {
        let request = Request::post(format!("{}{}", self.base_url, endpoint), body.into());
        self.send(request).await
    }

    async fn send(&self, request: Request) -> Result<Value, HttpError> {
        debug!(method = ?request.method, url = %request.url, "sending request");
        let response = tokio::time::timeout(self.timeout, self.fetch.fetch(request))
            .await
            .map_err(|_| HttpError::Timeout)??;

        if !response.ok() {
            return Err(HttpError::Status {
                status: response.status,
                text: status_text(response.status).to_string(),
            });
        }
        Ok(response.json())
    }
}
