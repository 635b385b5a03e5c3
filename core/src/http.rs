//! HTTP request and response types.
//!
//! # Design
//! `RequestTemplate` is the per-call state a caller composes (headers,
//! query parameters, body, attachments). `HttpRequest` is the fully
//! resolved, plain-data request the executor sends, so request building can
//! be tested without a network. `Response` is the immutable result of one
//! round-trip; its JSON view is parsed at most once, on first use.

use std::fmt;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::Config;
use crate::error::Result;
use crate::json_path;

pub const APPLICATION_JSON: &str = "application/json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file sent as one part of a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub field: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    /// Serialized JSON text.
    Json(String),
    Multipart(Vec<Attachment>),
}

/// Per-call request state.
///
/// A fresh template carries only the configured base URI and the JSON
/// content/accept headers. Anything added on top is consumed by exactly one
/// call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTemplate {
    pub base_uri: String,
    pub content_type: String,
    pub accept: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
}

impl RequestTemplate {
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_uri: config.base_url.clone(),
            content_type: APPLICATION_JSON.to_string(),
            accept: APPLICATION_JSON.to_string(),
            headers: Vec::new(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Serialize `body` as the JSON payload.
    pub fn json<T: serde::Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = RequestBody::Json(serde_json::to_string(body)?);
        Ok(self)
    }

    /// Add a file part. Any JSON payload is replaced by the multipart body.
    pub fn attach(mut self, field: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        let attachment = Attachment {
            field: field.into(),
            path: path.into(),
        };
        match &mut self.body {
            RequestBody::Multipart(parts) => parts.push(attachment),
            body => *body = RequestBody::Multipart(vec![attachment]),
        }
        self
    }
}

/// A fully resolved request: absolute URL with encoded query, final headers,
/// encoded body bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Header lookup, ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// The result of one round-trip. Never mutated after construction.
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    headers: Vec<(String, String)>,
    body: String,
    elapsed: Duration,
    json: OnceLock<Option<Value>>,
}

impl Response {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
            elapsed: Duration::ZERO,
            json: OnceLock::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// First header named `name`, ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Structured view of the body, or `None` when the body is not JSON.
    pub fn json(&self) -> Option<&Value> {
        self.json
            .get_or_init(|| serde_json::from_str(&self.body).ok())
            .as_ref()
    }

    /// Resolve a path expression such as `category.name` or `[0].id`.
    /// JSON `null` counts as absent.
    pub fn path(&self, expr: &str) -> Option<&Value> {
        self.json().and_then(|root| json_path::resolve(root, expr))
    }

    /// Decode the body into `T`, ignoring fields `T` does not declare.
    pub fn json_as<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}
