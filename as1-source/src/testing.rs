//! In-memory `Transport` for tests: records every call and replays canned
//! responses keyed by URL.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::{Arc, Mutex, PoisonError};
use url::form_urlencoded;

use crate::{HttpResponse, Method, RequestBody, SourceError, Transport};

#[derive(Clone, Debug, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    /// Full URL, with GET params appended as a query string.
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

#[derive(Clone, Debug)]
enum Canned {
    Response(HttpResponse),
    Failure(String),
}

/// Responses are consumed in the order they were added for each URL; the
/// last one keeps answering. Unknown URLs get an empty 404.
#[derive(Clone, Default)]
pub struct MockTransport {
    responses: Arc<Mutex<HashMap<(Method, String), VecDeque<Canned>>>>,
    calls: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(self, method: Method, url: impl Into<String>, response: HttpResponse) -> Self {
        self.push(method, url.into(), Canned::Response(response));
        self
    }

    pub fn with_get(self, url: impl Into<String>, status: u16, body: Value) -> Self {
        self.with_response(Method::Get, url, HttpResponse::from_json(status, &body))
    }

    pub fn with_post(self, url: impl Into<String>, status: u16, body: Value) -> Self {
        self.with_response(Method::Post, url, HttpResponse::from_json(status, &body))
    }

    /// Makes `url` fail without any HTTP status, as a dropped connection would.
    pub fn with_failure(self, method: Method, url: impl Into<String>, message: impl Into<String>) -> Self {
        self.push(method, url.into(), Canned::Failure(message.into()));
        self
    }

    pub fn calls(&self) -> Vec<RecordedRequest> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.calls().into_iter().map(|call| call.url).collect()
    }

    fn push(&self, method: Method, url: String, canned: Canned) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry((method, url))
            .or_default()
            .push_back(canned);
    }

    fn respond(&self, request: RecordedRequest) -> Result<HttpResponse, SourceError> {
        let key = (request.method, request.url.clone());
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        let mut responses = self.responses.lock().unwrap_or_else(PoisonError::into_inner);
        let canned = match responses.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };
        match canned {
            Some(Canned::Response(response)) => Ok(response),
            Some(Canned::Failure(message)) => Err(SourceError::Transport(Box::new(
                io::Error::new(io::ErrorKind::ConnectionReset, message),
            ))),
            None => Ok(HttpResponse::new(404, "")),
        }
    }
}

/// `url?k=v&...` with the params form-encoded, the way they go on the wire.
pub fn url_with_params(url: &str, params: &[(String, String)]) -> String {
    if params.is_empty() {
        return url.to_string();
    }
    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.iter().map(|(key, value)| (key.as_str(), value.as_str())))
        .finish();
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}{}", url, separator, query)
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(
        &self,
        url: &str,
        headers: &[(String, String)],
        params: &[(String, String)],
    ) -> Result<HttpResponse, SourceError> {
        self.respond(RecordedRequest {
            method: Method::Get,
            url: url_with_params(url, params),
            headers: headers.to_vec(),
            body: RequestBody::Empty,
        })
    }

    async fn post(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: RequestBody,
    ) -> Result<HttpResponse, SourceError> {
        self.respond(RecordedRequest {
            method: Method::Post,
            url: url.to_string(),
            headers: headers.to_vec(),
            body,
        })
    }
}
