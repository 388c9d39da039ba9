//! Executes built requests.
//!
//! `Transport` is the seam between request building and the network.
//! `UreqTransport` is the real implementation; tests plug in fakes that
//! return canned responses.

use std::io::{self, Read as _};
use std::time::Duration;

use ureq::typestate::{WithBody, WithoutBody};
use ureq::RequestBuilder;

use crate::error::ClientError;
use crate::http::{HttpMethod, HttpRequest};
use crate::response::Response;

/// Sends one request and returns its fully buffered response.
pub trait Transport: Send + Sync {
    /// `timeout` is the effective limit for this call, already bounded by
    /// the caller's deadline. `None` means no limit.
    fn execute(
        &self,
        request: &HttpRequest,
        timeout: Option<Duration>,
    ) -> Result<Response, ClientError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn execute(
        &self,
        request: &HttpRequest,
        timeout: Option<Duration>,
    ) -> Result<Response, ClientError> {
        (**self).execute(request, timeout)
    }
}

/// [`Transport`] backed by a [`ureq::Agent`]. Connections are pooled by the
/// agent and reused across calls.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            // Status codes are reported through `Response`, not as errors.
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }

    fn run(
        &self,
        request: &HttpRequest,
        timeout: Option<Duration>,
    ) -> Result<http::Response<ureq::Body>, ureq::Error> {
        let url = request.url.as_str();
        match request.method {
            HttpMethod::Get => send_without_body(self.agent.get(url), request, timeout),
            HttpMethod::Delete => send_without_body(self.agent.delete(url), request, timeout),
            HttpMethod::Post => send_with_body(self.agent.post(url), request, timeout),
            HttpMethod::Put => send_with_body(self.agent.put(url), request, timeout),
            HttpMethod::Patch => send_with_body(self.agent.patch(url), request, timeout),
        }
    }
}

impl Transport for UreqTransport {
    fn execute(
        &self,
        request: &HttpRequest,
        timeout: Option<Duration>,
    ) -> Result<Response, ClientError> {
        match self.run(request, timeout) {
            Ok(resp) => convert_response(resp),
            Err(err) => Err(map_error(err)),
        }
    }
}

fn send_without_body(
    mut builder: RequestBuilder<WithoutBody>,
    request: &HttpRequest,
    timeout: Option<Duration>,
) -> Result<http::Response<ureq::Body>, ureq::Error> {
    for (name, value) in &request.headers {
        builder = builder.header(name, value);
    }
    let builder = builder.config().timeout_global(timeout).build();
    if request.body.is_empty() {
        builder.call()
    } else {
        builder.force_send_body().send(&request.body[..])
    }
}

fn send_with_body(
    mut builder: RequestBuilder<WithBody>,
    request: &HttpRequest,
    timeout: Option<Duration>,
) -> Result<http::Response<ureq::Body>, ureq::Error> {
    for (name, value) in &request.headers {
        builder = builder.header(name, value);
    }
    builder
        .config()
        .timeout_global(timeout)
        .build()
        .send(&request.body[..])
}

fn map_error(err: ureq::Error) -> ClientError {
    match err {
        ureq::Error::Timeout(_) => ClientError::Timeout,
        ureq::Error::Io(e) if e.kind() == io::ErrorKind::TimedOut => ClientError::Timeout,
        ureq::Error::HostNotFound => ClientError::Connection("host not found".to_string()),
        ureq::Error::ConnectionFailed => ClientError::Connection("connection failed".to_string()),
        ureq::Error::Io(e) => ClientError::Connection(e.to_string()),
        ureq::Error::BadUri(uri) => ClientError::InvalidUrl {
            url: uri,
            reason: "rejected by transport".to_string(),
        },
        other => ClientError::Transport(other.to_string()),
    }
}

/// Read the whole body so nothing is left streaming past the call.
fn convert_response(response: http::Response<ureq::Body>) -> Result<Response, ClientError> {
    let (parts, body) = response.into_parts();

    let mut body_bytes = Vec::new();
    body.into_reader()
        .read_to_end(&mut body_bytes)
        .map_err(|e| match e.kind() {
            io::ErrorKind::TimedOut => ClientError::Timeout,
            _ => ClientError::BodyRead(e.to_string()),
        })?;

    Ok(Response::new(parts.status.as_u16(), parts.headers, body_bytes))
}
