//! Blocking request executor for the petstore API.
//!
//! # Design
//! `RequestExecutor` owns a ureq agent, the immutable `Config`, and one
//! staged `RequestTemplate`. Every call takes the staged template and puts
//! a fresh one back, so query parameters or bodies never leak into the next
//! call. Callers who want to carry extra state into a call stage it
//! explicitly with `stage`, or hand a template to `send`.
//!
//! Each call is split into `prepare` (pure: resolves URL, headers and body
//! bytes) and `execute` (the HTTP round-trip). HTTP error statuses come back
//! as ordinary `Response` values; only transport failures are `Err`.
//!
//! The staged template lives in a `RefCell`, so an executor can be shared by
//! several handlers on one thread but never across threads.

use std::cell::RefCell;
use std::io::Read;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};
use ureq::unversioned::multipart::{Form, Part};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::http::{Attachment, HttpMethod, HttpRequest, RequestBody, RequestTemplate, Response};

pub struct RequestExecutor {
    agent: ureq::Agent,
    config: Config,
    staged: RefCell<RequestTemplate>,
}

impl RequestExecutor {
    pub fn new(config: Config) -> Self {
        // Status codes are data here, never errors.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_connect(Some(config.request_timeout))
            .timeout_recv_response(Some(config.response_timeout))
            .build()
            .new_agent();
        let staged = RefCell::new(RequestTemplate::from_config(&config));
        Self {
            agent,
            config,
            staged,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// A template with nothing but the configured base URI and JSON headers.
    pub fn fresh_template(&self) -> RequestTemplate {
        RequestTemplate::from_config(&self.config)
    }

    /// Discard staged query parameters, headers, body and attachments.
    pub fn reset_template(&self) {
        self.staged.replace(self.fresh_template());
    }

    /// Modify the template the next call will start from.
    pub fn stage<F>(&self, f: F)
    where
        F: FnOnce(RequestTemplate) -> RequestTemplate,
    {
        let current = self.take_template();
        self.staged.replace(f(current));
    }

    fn take_template(&self) -> RequestTemplate {
        self.staged.replace(self.fresh_template())
    }

    pub fn get(&self, endpoint: &str) -> Result<Response> {
        let template = self.take_template();
        self.send(HttpMethod::Get, endpoint, template)
    }

    /// GET with query parameters appended in the given order. Repeated
    /// names are sent repeatedly.
    pub fn get_with_params<K, V>(&self, endpoint: &str, params: &[(K, V)]) -> Result<Response>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let template = params
            .iter()
            .fold(self.take_template(), |t, (k, v)| t.query(k.as_ref(), v.as_ref()));
        self.send(HttpMethod::Get, endpoint, template)
    }

    pub fn post<T: Serialize + ?Sized>(&self, endpoint: &str, body: &T) -> Result<Response> {
        let template = self.take_template().json(body)?;
        self.send(HttpMethod::Post, endpoint, template)
    }

    /// Full replace of the resource at `endpoint`.
    pub fn put<T: Serialize + ?Sized>(&self, endpoint: &str, body: &T) -> Result<Response> {
        let template = self.take_template().json(body)?;
        self.send(HttpMethod::Put, endpoint, template)
    }

    pub fn delete(&self, endpoint: &str) -> Result<Response> {
        let template = self.take_template();
        self.send(HttpMethod::Delete, endpoint, template)
    }

    /// Multipart POST with a single file part named `file`.
    pub fn upload_file(
        &self,
        endpoint: &str,
        file_path: impl Into<std::path::PathBuf>,
    ) -> Result<Response> {
        let template = self.take_template().attach("file", file_path);
        self.send(HttpMethod::Post, endpoint, template)
    }

    /// Prepare and execute `template` without touching the staged template.
    pub fn send(
        &self,
        method: HttpMethod,
        endpoint: &str,
        template: RequestTemplate,
    ) -> Result<Response> {
        let request = self.prepare(method, endpoint, &template)?;
        self.execute(request)
    }

    /// Resolve a template into the exact request that would be sent.
    pub fn prepare(
        &self,
        method: HttpMethod,
        endpoint: &str,
        template: &RequestTemplate,
    ) -> Result<HttpRequest> {
        let mut url = join_url(&template.base_uri, endpoint);
        if !template.query.is_empty() {
            let separator = if url.contains('?') { '&' } else { '?' };
            url.push(separator);
            url.push_str(&encode_query(&template.query));
        }

        let mut headers = vec![("accept".to_string(), template.accept.clone())];
        let body = match &template.body {
            RequestBody::Empty => None,
            RequestBody::Json(json) => {
                headers.push(("content-type".to_string(), template.content_type.clone()));
                Some(json.clone().into_bytes())
            }
            RequestBody::Multipart(parts) => {
                let (content_type, bytes) = encode_multipart(parts)?;
                headers.push(("content-type".to_string(), content_type));
                Some(bytes)
            }
        };
        // A staged header replaces the default of the same name.
        headers.retain(|(default, _)| {
            !template
                .headers
                .iter()
                .any(|(name, _)| name.eq_ignore_ascii_case(default))
        });
        headers.extend(template.headers.iter().cloned());

        Ok(HttpRequest {
            method,
            url,
            headers,
            body,
        })
    }

    /// Send a prepared request and collect the full response.
    pub fn execute(&self, request: HttpRequest) -> Result<Response> {
        match &request.body {
            Some(bytes) if bytes.len() <= 4096 && !is_multipart(&request) => info!(
                method = %request.method,
                url = %request.url,
                body = %String::from_utf8_lossy(bytes),
                "sending request"
            ),
            Some(bytes) => info!(
                method = %request.method,
                url = %request.url,
                body_len = bytes.len(),
                "sending request"
            ),
            None => info!(method = %request.method, url = %request.url, "sending request"),
        }

        let started = Instant::now();
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let result = match method {
            HttpMethod::Get => with_headers(self.agent.get(&url), &headers).call(),
            HttpMethod::Delete => with_headers(self.agent.delete(&url), &headers).call(),
            HttpMethod::Post => {
                let builder = with_headers(self.agent.post(&url), &headers);
                match body {
                    Some(bytes) => builder.send(&bytes[..]),
                    None => builder.send_empty(),
                }
            }
            HttpMethod::Put => {
                let builder = with_headers(self.agent.put(&url), &headers);
                match body {
                    Some(bytes) => builder.send(&bytes[..]),
                    None => builder.send_empty(),
                }
            }
        };
        let mut raw = result?;

        let status = raw.status().as_u16();
        let response_headers = raw
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect::<Vec<_>>();
        // A received body is never a transport failure, whatever its encoding.
        let bytes = raw.body_mut().read_to_vec()?;
        let text = String::from_utf8_lossy(&bytes).into_owned();
        let elapsed = started.elapsed();

        debug!(status, elapsed_ms = elapsed.as_millis() as u64, %url, "received response");

        let response = response_headers
            .into_iter()
            .fold(Response::new(status, text), |r, (k, v)| r.with_header(k, v))
            .with_elapsed(elapsed);
        Ok(response)
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn is_multipart(request: &HttpRequest) -> bool {
    request
        .header("content-type")
        .is_some_and(|ct| ct.starts_with("multipart/"))
}

/// Join base and endpoint with exactly one `/` between them.
pub fn join_url(base: &str, endpoint: &str) -> String {
    let base = base.trim_end_matches('/');
    let endpoint = endpoint.trim_start_matches('/');
    if endpoint.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{endpoint}")
    }
}

fn encode_query(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Encode file parts with ureq's form writer. Returns the content type
/// (carrying the boundary) and the body bytes.
fn encode_multipart(parts: &[Attachment]) -> Result<(String, Vec<u8>)> {
    let mut form = Form::new();
    for attachment in parts {
        let part = Part::file(&attachment.path).map_err(|source| Error::Io {
            path: attachment.path.clone(),
            source,
        })?;
        let part = match attachment.path.file_name() {
            Some(name) => part.file_name(&quote_file_name(&name.to_string_lossy())),
            None => part,
        };
        form = form.part(&attachment.field, part);
    }
    let content_type = format!("multipart/form-data; boundary={}", form.boundary());

    let mut body = Vec::new();
    form.read_to_end(&mut body).map_err(|source| Error::Io {
        path: parts.first().map(|a| a.path.clone()).unwrap_or_default(),
        source,
    })?;
    Ok((content_type, body))
}

/// Percent-escape the characters that would end or break a quoted
/// `filename` parameter.
fn quote_file_name(name: &str) -> String {
    name.replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
