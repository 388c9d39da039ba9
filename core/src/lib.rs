//! Verb-oriented JSON HTTP client.
//!
//! # Overview
//! Builds requests for GET/POST/PUT/PATCH/DELETE against a base URL,
//! serializes parameters into a query string (GET) or a JSON body (the other
//! verbs), sends them through a pluggable `Transport` and returns a fully
//! buffered `Response` with status, headers, cookies and JSON decoding.
//!
//! # Design
//! - `Client` is immutable after construction. Per-call options are resolved
//!   into a fresh value for each request, so nothing staged for one call is
//!   visible to another and one client can be shared across threads.
//! - Building and sending are separate steps: verb methods return an
//!   `HttpRequest` (or a construction error), `Client::send` returns a
//!   `Response` (or a transport error).
//! - Networking is delegated to `ureq` through `UreqTransport`; tests inject
//!   their own `Transport`.
//!
//! ```no_run
//! use rest_core::{CallContext, Client, ClientOption, RequestOption};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Post {
//!     id: u64,
//!     title: String,
//! }
//!
//! # fn main() -> Result<(), rest_core::ClientError> {
//! let client = Client::with_options(
//!     "https://jsonplaceholder.typicode.com",
//!     &[ClientOption::default_headers()],
//! )?;
//! let request = client.get("/posts/1", &[RequestOption::header("x-correlationid", "123")])?;
//! let post: Post = client.send(&CallContext::background(), request)?.json()?;
//! println!("{} {}", post.id, post.title);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod context;
pub mod cookie;
pub mod error;
pub mod http;
pub mod options;
pub mod response;
pub mod transport;

pub use client::Client;
pub use config::{ClientConfig, ConfigError};
pub use context::{CallContext, CancelToken};
pub use cookie::Cookie;
pub use error::{ClientError, ErrorKind};
pub use crate::http::{HttpMethod, HttpRequest};
pub use options::{ClientOption, Header, RequestOption};
pub use response::Response;
pub use transport::{Transport, UreqTransport};
