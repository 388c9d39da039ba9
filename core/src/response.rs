//! Buffered response for one call.
//!
//! # Design
//! The transport reads the whole body before a `Response` exists, so every
//! accessor is a cheap read and decoding can be repeated. A non-2xx status is
//! still a successful call; use `ok()` or `error_for_status()` to treat it as
//! a failure.

use bytes::Bytes;
use http::header::SET_COOKIE;
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;

use crate::cookie::Cookie;
use crate::error::ClientError;

/// Status, headers and body of a completed call.
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    headers: HeaderMap,
    body: Bytes,
}

impl Response {
    pub fn new(status: u16, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// Canonical reason phrase for the status, or an empty string if the
    /// code has none.
    pub fn status_text(&self) -> &'static str {
        StatusCode::from_u16(self.status)
            .ok()
            .and_then(|code| code.canonical_reason())
            .unwrap_or("")
    }

    /// `true` iff the status is in `200..=299`.
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// First value of `name`, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Cookies from every `Set-Cookie` header. Malformed entries are skipped.
    pub fn cookies(&self) -> Vec<Cookie> {
        self.headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(Cookie::parse)
            .collect()
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body as JSON into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        serde_json::from_slice(&self.body)
            .map_err(|e| ClientError::Deserialization(e.to_string()))
    }

    /// Decode the body into `target`. On failure `target` is left as it was.
    pub fn unmarshal<T: DeserializeOwned>(&self, target: &mut T) -> Result<(), ClientError> {
        *target = self.json()?;
        Ok(())
    }

    /// Turn a non-2xx status into an error, keeping the body for debugging.
    pub fn error_for_status(self) -> Result<Response, ClientError> {
        if self.ok() {
            return Ok(self);
        }
        if self.status == 404 {
            return Err(ClientError::NotFound);
        }
        Err(ClientError::Status {
            status: self.status,
            body: self.text(),
        })
    }
}
