//! Client-level and per-call options.
//!
//! # Design
//! Options are values applied in call-site order; a later option replaces an
//! earlier one for the same key. Client options are applied once, when the
//! `Client` is constructed. Request options are folded into a fresh
//! `CallOptions` for every request and never written back to the client, so
//! a per-call header is gone as soon as the request that used it is built,
//! whatever happens to that request afterwards.

use std::time::Duration;

use http::header::{ACCEPT, CONTENT_TYPE};
use http::{HeaderMap, HeaderName, HeaderValue};

use crate::error::ClientError;

pub const APPLICATION_JSON: &str = "application/json";

/// A header value and whether it belongs to the client (default) or to a
/// single call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub value: HeaderValue,
    pub is_default: bool,
}

impl Header {
    pub fn client(value: HeaderValue) -> Self {
        Self {
            value,
            is_default: true,
        }
    }

    pub fn call(value: HeaderValue) -> Self {
        Self {
            value,
            is_default: false,
        }
    }
}

/// Parse a caller-supplied header pair.
pub(crate) fn parse_header(
    name: &str,
    value: &str,
) -> Result<(HeaderName, HeaderValue), ClientError> {
    let invalid = |reason: String| ClientError::InvalidHeader {
        name: name.to_string(),
        reason,
    };
    let header_name =
        HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid(e.to_string()))?;
    let header_value = HeaderValue::from_str(value).map_err(|e| invalid(e.to_string()))?;
    Ok((header_name, header_value))
}

/// A zero duration means no limit.
fn limit(timeout: Duration) -> Option<Duration> {
    (!timeout.is_zero()).then_some(timeout)
}

/// Configuration applied once when a `Client` is constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientOption {
    /// `Content-Type` and `Accept` set to `application/json`, kept for every call.
    DefaultHeaders,
    /// A header kept for every call.
    Header(String, String),
    /// Timeout applied to every call that does not set its own. Zero
    /// disables the limit.
    Timeout(Duration),
}

impl ClientOption {
    pub fn default_headers() -> Self {
        ClientOption::DefaultHeaders
    }

    pub fn header(key: impl Into<String>, value: impl Into<String>) -> Self {
        ClientOption::Header(key.into(), value.into())
    }

    pub fn timeout(timeout: Duration) -> Self {
        ClientOption::Timeout(timeout)
    }

    pub(crate) fn apply(
        &self,
        headers: &mut HeaderMap<Header>,
        timeout: &mut Option<Duration>,
    ) -> Result<(), ClientError> {
        match self {
            ClientOption::DefaultHeaders => {
                for name in [CONTENT_TYPE, ACCEPT] {
                    let value = HeaderValue::from_static(APPLICATION_JSON);
                    headers.insert(name, Header::client(value));
                }
            }
            ClientOption::Header(key, value) => {
                let (name, value) = parse_header(key, value)?;
                headers.insert(name, Header::client(value));
            }
            ClientOption::Timeout(d) => *timeout = limit(*d),
        }
        Ok(())
    }
}

/// Configuration for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOption {
    /// Header sent with this request only.
    Header(String, String),
    /// Query parameter appended to this request's URL.
    Query(String, String),
    /// Explicit body; takes precedence over serialized parameters.
    Body(Vec<u8>),
    /// Timeout for this request only. Zero lifts the client's timeout for
    /// this call.
    Timeout(Duration),
}

impl RequestOption {
    pub fn header(key: impl Into<String>, value: impl Into<String>) -> Self {
        RequestOption::Header(key.into(), value.into())
    }

    pub fn query(key: impl Into<String>, value: impl Into<String>) -> Self {
        RequestOption::Query(key.into(), value.into())
    }

    pub fn body(body: impl Into<Vec<u8>>) -> Self {
        RequestOption::Body(body.into())
    }

    pub fn timeout(timeout: Duration) -> Self {
        RequestOption::Timeout(timeout)
    }
}

/// Everything one call needs from the client plus its own options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallOptions {
    pub headers: HeaderMap<Header>,
    pub query: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
    pub timeout: Option<Duration>,
}

impl CallOptions {
    /// Layer `options` over the client's headers and timeout. Fails on the
    /// first header that is not a valid HTTP name or value.
    pub fn resolve(
        client_headers: &HeaderMap<Header>,
        client_timeout: Option<Duration>,
        options: &[RequestOption],
    ) -> Result<Self, ClientError> {
        let mut call = CallOptions {
            headers: client_headers.clone(),
            timeout: client_timeout,
            ..CallOptions::default()
        };
        for option in options {
            call.apply(option)?;
        }
        Ok(call)
    }

    fn apply(&mut self, option: &RequestOption) -> Result<(), ClientError> {
        match option {
            RequestOption::Header(key, value) => {
                let (name, value) = parse_header(key, value)?;
                self.headers.insert(name, Header::call(value));
            }
            RequestOption::Query(key, value) => {
                match self.query.iter_mut().find(|(k, _)| k == key) {
                    Some(entry) => entry.1 = value.clone(),
                    None => self.query.push((key.clone(), value.clone())),
                }
            }
            RequestOption::Body(body) => self.body = Some(body.clone()),
            RequestOption::Timeout(d) => self.timeout = limit(*d),
        }
        Ok(())
    }

    /// The headers as sent on the wire, without the default/per-call marks.
    pub fn wire_headers(&self) -> HeaderMap {
        let mut wire = HeaderMap::with_capacity(self.headers.len());
        for (name, header) in &self.headers {
            wire.append(name.clone(), header.value.clone());
        }
        wire
    }
}
