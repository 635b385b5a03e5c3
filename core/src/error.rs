//! Error types for the petstore client.
//!
//! # Design
//! Two failure families never mix. `Error` covers everything that can go
//! wrong before a response exists (transport, encoding, local files,
//! configuration). `AssertionError` covers a received response that did not
//! match an expectation. An HTTP 4xx/5xx is neither: it is an ordinary
//! `Response` the caller inspects.

use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by the executor, handlers and configuration loader.
#[derive(Debug, Error)]
pub enum Error {
    /// No response was received: connection refused, DNS failure, timeout.
    #[error("transport failure: {0}")]
    Transport(#[from] ureq::Error),

    /// A request body could not be encoded, or a response body could not be
    /// decoded into the requested type.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A local file (upload source, config file) could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration was present but unusable.
    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// A response failed a post-hoc check.
///
/// Every variant renders the expected and actual values together with the
/// status, header or path that was checked.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssertionError {
    #[error("expected status code {expected} but got {actual}")]
    StatusCode { expected: u16, actual: u16 },

    #[error("expected successful status code (2xx) but got {actual}")]
    NotSuccess { actual: u16 },

    #[error("response should contain key: {path}")]
    MissingKey { path: String },

    /// The path resolved to a value that differs from the expectation.
    #[error("JSON path '{path}': expected {expected} but got {actual}")]
    JsonPathMismatch {
        path: String,
        expected: serde_json::Value,
        actual: serde_json::Value,
    },

    /// The path resolved to nothing while a non-null value was expected.
    #[error("JSON path '{path}': expected {expected} but the path is absent")]
    JsonPathAbsent {
        path: String,
        expected: serde_json::Value,
    },

    #[error("header should exist: {name}")]
    MissingHeader { name: String },

    #[error("header '{name}': expected {expected} but got {}", actual.as_deref().unwrap_or("<absent>"))]
    HeaderMismatch {
        name: String,
        expected: String,
        actual: Option<String>,
    },

    #[error("response body should contain: {expected}")]
    BodyMissingText { expected: String },

    #[error("response time should be less than {max_ms}ms but got {actual_ms}ms")]
    TooSlow { max_ms: u64, actual_ms: u64 },
}
