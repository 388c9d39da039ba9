//! Request builder and dispatch.
//!
//! # Design
//! `Client` holds a base URL, its default headers, a default timeout and a
//! transport. It is never mutated by a call: every verb method resolves the
//! client defaults and its own options into a fresh `CallOptions`, builds a
//! self-contained `HttpRequest`, and returns it. `send` executes a request
//! and hands back the buffered `Response`. Splitting build from send lets a
//! caller inspect or log a request before it goes out, and keeps every
//! construction error on the build side.
//!
//! A call whose context carries a `CancelToken` runs on a worker thread so
//! that `send` can return `Cancelled` as soon as the token fires. The
//! abandoned request finishes in the background, bounded by its timeout.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderValue};
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::context::{CallContext, CancelToken};
use crate::error::ClientError;
use crate::http::{HttpMethod, HttpRequest};
use crate::options::{CallOptions, ClientOption, Header, RequestOption, APPLICATION_JSON};
use crate::response::Response;
use crate::transport::{Transport, UreqTransport};

/// How often a cancellable call checks its token while waiting.
const CANCEL_POLL: Duration = Duration::from_millis(10);

/// HTTP client bound to one base URL.
#[derive(Debug, Clone)]
pub struct Client<T = UreqTransport> {
    base_url: String,
    headers: HeaderMap<Header>,
    timeout: Option<Duration>,
    transport: Arc<T>,
}

impl Client<UreqTransport> {
    /// Client with no default headers and no timeout.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            headers: HeaderMap::default(),
            timeout: None,
            transport: Arc::new(UreqTransport::new()),
        }
    }

    /// Fails if a header option is not a valid HTTP header.
    pub fn with_options(base_url: &str, options: &[ClientOption]) -> Result<Self, ClientError> {
        Self::with_transport(base_url, options, UreqTransport::new())
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::with_options(&config.base_url, &config.client_options())
    }
}

impl<T: Transport + 'static> Client<T> {
    /// Build a client that sends through `transport` instead of the network.
    pub fn with_transport(
        base_url: &str,
        options: &[ClientOption],
        transport: T,
    ) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::default();
        let mut timeout = None;
        for option in options {
            option.apply(&mut headers, &mut timeout)?;
        }
        Ok(Self {
            base_url: base_url.to_string(),
            headers,
            timeout,
            transport: Arc::new(transport),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Headers sent with every call. Always default headers only.
    pub fn headers(&self) -> &HeaderMap<Header> {
        &self.headers
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn get(&self, endpoint: &str, options: &[RequestOption]) -> Result<HttpRequest, ClientError> {
        self.build::<()>(HttpMethod::Get, endpoint, None, options)
    }

    pub fn get_with<P: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        params: &P,
        options: &[RequestOption],
    ) -> Result<HttpRequest, ClientError> {
        self.build(HttpMethod::Get, endpoint, Some(params), options)
    }

    pub fn post(&self, endpoint: &str, options: &[RequestOption]) -> Result<HttpRequest, ClientError> {
        self.build::<()>(HttpMethod::Post, endpoint, None, options)
    }

    pub fn post_with<P: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        params: &P,
        options: &[RequestOption],
    ) -> Result<HttpRequest, ClientError> {
        self.build(HttpMethod::Post, endpoint, Some(params), options)
    }

    pub fn put(&self, endpoint: &str, options: &[RequestOption]) -> Result<HttpRequest, ClientError> {
        self.build::<()>(HttpMethod::Put, endpoint, None, options)
    }

    pub fn put_with<P: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        params: &P,
        options: &[RequestOption],
    ) -> Result<HttpRequest, ClientError> {
        self.build(HttpMethod::Put, endpoint, Some(params), options)
    }

    pub fn patch(&self, endpoint: &str, options: &[RequestOption]) -> Result<HttpRequest, ClientError> {
        self.build::<()>(HttpMethod::Patch, endpoint, None, options)
    }

    pub fn patch_with<P: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        params: &P,
        options: &[RequestOption],
    ) -> Result<HttpRequest, ClientError> {
        self.build(HttpMethod::Patch, endpoint, Some(params), options)
    }

    pub fn delete(&self, endpoint: &str, options: &[RequestOption]) -> Result<HttpRequest, ClientError> {
        self.build::<()>(HttpMethod::Delete, endpoint, None, options)
    }

    pub fn delete_with<P: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        params: &P,
        options: &[RequestOption],
    ) -> Result<HttpRequest, ClientError> {
        self.build(HttpMethod::Delete, endpoint, Some(params), options)
    }

    /// Build a request for any verb.
    ///
    /// The URL is `base_url` followed by `endpoint`, joined as plain strings.
    /// For read verbs `params` become the query string; for the others they
    /// become a JSON body. A `RequestOption::Body` replaces the body either
    /// way.
    pub fn build<P: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        endpoint: &str,
        params: Option<&P>,
        options: &[RequestOption],
    ) -> Result<HttpRequest, ClientError> {
        let mut call = CallOptions::resolve(&self.headers, self.timeout, options)?;

        let mut params_query = None;
        let mut body = Vec::new();
        if let Some(params) = params {
            if method.is_read() {
                params_query = Some(
                    serde_urlencoded::to_string(params)
                        .map_err(|e| ClientError::QueryEncoding(e.to_string()))?,
                );
            } else if call.body.is_none() {
                body = serde_json::to_vec(params)
                    .map_err(|e| ClientError::Serialization(e.to_string()))?;
                if !call.headers.contains_key(CONTENT_TYPE) {
                    call.headers.insert(
                        CONTENT_TYPE,
                        Header::call(HeaderValue::from_static(APPLICATION_JSON)),
                    );
                }
            }
        }
        if let Some(explicit) = call.body.take() {
            body = explicit;
        }

        let url = build_url(&self.base_url, endpoint, params_query.as_deref(), &call.query)?;

        Ok(HttpRequest {
            method,
            url,
            headers: call.wire_headers(),
            body,
            timeout: call.timeout,
        })
    }

    /// Execute `request`, bounded by `ctx`.
    ///
    /// Fails without touching the network if `ctx` is already cancelled or
    /// past its deadline. Cancelling `ctx` while the request is in flight
    /// makes `send` return `Cancelled` without waiting for the server.
    pub fn send(&self, ctx: &CallContext, request: HttpRequest) -> Result<Response, ClientError> {
        ctx.check()?;
        let timeout = ctx.bound(request.timeout);

        debug!(method = %request.method, url = %request.url, ?timeout, "dispatching request");
        let started = Instant::now();
        let result = match ctx.cancel_token() {
            Some(token) => self.execute_cancellable(token, &request, timeout),
            None => self.transport.execute(&request, timeout),
        };
        let elapsed = started.elapsed();

        match result {
            Ok(response) => {
                if ctx.is_cancelled() {
                    debug!(method = %request.method, url = %request.url, "request cancelled in flight");
                    return Err(ClientError::Cancelled);
                }
                debug!(
                    method = %request.method,
                    url = %request.url,
                    status = response.status(),
                    bytes = response.body().len(),
                    ?elapsed,
                    "request completed"
                );
                Ok(response)
            }
            Err(ClientError::Cancelled) => {
                debug!(method = %request.method, url = %request.url, ?elapsed, "request cancelled in flight");
                Err(ClientError::Cancelled)
            }
            Err(err) => {
                warn!(method = %request.method, url = %request.url, ?elapsed, error = %err, "request failed");
                Err(err)
            }
        }
    }

    /// Run the transport on a worker thread and wait for either its result
    /// or `token`.
    fn execute_cancellable(
        &self,
        token: &CancelToken,
        request: &HttpRequest,
        timeout: Option<Duration>,
    ) -> Result<Response, ClientError> {
        let (tx, rx) = mpsc::channel();
        let transport = Arc::clone(&self.transport);
        let request = request.clone();
        thread::Builder::new()
            .name("rest-core-call".to_string())
            .spawn(move || {
                // The receiver is gone once the caller has given up.
                let _ = tx.send(transport.execute(&request, timeout));
            })
            .map_err(|e| ClientError::Transport(format!("cannot spawn call thread: {e}")))?;

        loop {
            match rx.recv_timeout(CANCEL_POLL) {
                Ok(result) => return result,
                Err(RecvTimeoutError::Timeout) if token.is_cancelled() => {
                    return Err(ClientError::Cancelled)
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(ClientError::Transport(
                        "call thread exited without a result".to_string(),
                    ))
                }
            }
        }
    }
}

fn build_url(
    base_url: &str,
    endpoint: &str,
    params_query: Option<&str>,
    option_query: &[(String, String)],
) -> Result<String, ClientError> {
    let raw = format!("{base_url}{endpoint}");
    let mut url = Url::parse(&raw).map_err(|e| ClientError::InvalidUrl {
        url: raw.clone(),
        reason: e.to_string(),
    })?;

    if let Some(encoded) = params_query.filter(|q| !q.is_empty()) {
        let query = match url.query() {
            Some(existing) if !existing.is_empty() => format!("{existing}&{encoded}"),
            _ => encoded.to_string(),
        };
        url.set_query(Some(&query));
    }

    if !option_query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in option_query {
            pairs.append_pair(key, value);
        }
    }

    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use serde::ser::Error as _;
    use serde::{Deserialize, Serializer};

    use super::*;

    /// Records every request and answers with a fixed response.
    #[derive(Default)]
    struct FakeTransport {
        seen: Mutex<Vec<(HttpRequest, Option<Duration>)>>,
        status: u16,
        body: &'static str,
        fail_with_timeout: bool,
        delay: Duration,
    }

    impl FakeTransport {
        fn answering(status: u16, body: &'static str) -> Self {
            Self {
                status,
                body,
                ..Self::default()
            }
        }
    }

    impl Transport for FakeTransport {
        fn execute(
            &self,
            request: &HttpRequest,
            timeout: Option<Duration>,
        ) -> Result<Response, ClientError> {
            self.seen.lock().unwrap().push((request.clone(), timeout));
            thread::sleep(self.delay);
            if self.fail_with_timeout {
                return Err(ClientError::Timeout);
            }
            Ok(Response::new(self.status, HeaderMap::new(), self.body))
        }
    }

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    struct Post {
        id: u64,
        user_id: u64,
        title: String,
        completed: bool,
    }

    fn sample() -> Post {
        Post {
            id: 11,
            user_id: 3,
            title: "hello world".to_string(),
            completed: true,
        }
    }

    /// Stand-in for a value with no serialized form.
    struct Opaque;

    impl Serialize for Opaque {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("opaque values cannot be serialized"))
        }
    }

    fn client() -> Client<FakeTransport> {
        Client::with_transport(
            "http://localhost:3000",
            &[ClientOption::default_headers()],
            FakeTransport::answering(200, "{}"),
        )
        .unwrap()
    }

    #[test]
    fn get_without_params_has_no_body_or_query() {
        let req = client().get("/posts/10", &[]).unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/posts/10");
        assert!(req.body.is_empty());
    }

    #[test]
    fn endpoint_is_concatenated_verbatim() {
        let c = Client::with_transport("http://localhost:3000/", &[], FakeTransport::default())
            .unwrap();
        let req = c.get("/posts", &[]).unwrap();
        assert_eq!(req.url, "http://localhost:3000//posts");
    }

    #[test]
    fn get_with_params_round_trips_through_query() {
        let req = client().get_with("/posts", &sample(), &[]).unwrap();
        assert!(req.body.is_empty(), "read verbs never carry a params body");

        let url = Url::parse(&req.url).unwrap();
        let decoded: Post = serde_urlencoded::from_str(url.query().unwrap()).unwrap();
        assert_eq!(decoded, sample());
    }

    #[test]
    fn write_verbs_round_trip_params_through_json_body() {
        let c = client();
        let builders: [fn(&Client<FakeTransport>, &Post) -> Result<HttpRequest, ClientError>; 4] = [
            |c, p| c.post_with("/posts", p, &[]),
            |c, p| c.put_with("/posts/11", p, &[]),
            |c, p| c.patch_with("/posts/11", p, &[]),
            |c, p| c.delete_with("/posts/11", p, &[]),
        ];
        for build in builders {
            let req = build(&c, &sample()).unwrap();
            let decoded: Post = serde_json::from_slice(&req.body).unwrap();
            assert_eq!(decoded, sample(), "{} body", req.method);
            assert_eq!(req.header("content-type"), Some(APPLICATION_JSON));
            assert!(!req.url.contains('?'));
        }
    }

    #[test]
    fn write_verbs_without_params_send_empty_body() {
        let c = client();
        for req in [
            c.post("/posts", &[]).unwrap(),
            c.put("/posts/1", &[]).unwrap(),
            c.patch("/posts/1", &[]).unwrap(),
            c.delete("/posts/1", &[]).unwrap(),
        ] {
            assert!(req.body.is_empty(), "{} should have an empty body", req.method);
        }
    }

    #[test]
    fn json_content_type_added_only_when_absent() {
        let bare = Client::with_transport("http://h", &[], FakeTransport::default()).unwrap();
        let req = bare.post_with("/p", &sample(), &[]).unwrap();
        assert_eq!(req.header("Content-Type"), Some(APPLICATION_JSON));

        let req = bare
            .post_with(
                "/p",
                &sample(),
                &[RequestOption::header("content-type", "application/vnd.api+json")],
            )
            .unwrap();
        assert_eq!(req.header("Content-Type"), Some("application/vnd.api+json"));
        assert_eq!(req.headers.len(), 1);

        let req = bare.post("/p", &[]).unwrap();
        assert_eq!(req.header("Content-Type"), None);
    }

    #[test]
    fn unserializable_params_yield_no_request() {
        let c = client();
        assert!(matches!(
            c.post_with("/posts", &Opaque, &[]),
            Err(ClientError::Serialization(_))
        ));
        assert!(matches!(
            c.get_with("/posts", &Opaque, &[]),
            Err(ClientError::QueryEncoding(_))
        ));
    }

    #[test]
    fn nested_params_cannot_be_query_encoded() {
        let mut nested = BTreeMap::new();
        nested.insert("filter", vec![1, 2, 3]);
        let err = client().get_with("/posts", &nested, &[]).unwrap_err();
        assert!(matches!(err, ClientError::QueryEncoding(_)));
    }

    #[test]
    fn malformed_url_is_a_construction_error() {
        let c = Client::with_transport("", &[], FakeTransport::default()).unwrap();
        let err = c.get("/posts", &[]).unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl { .. }));

        let c = Client::with_transport("http://[::1", &[], FakeTransport::default()).unwrap();
        assert!(c.get("/posts", &[]).is_err());
    }

    #[test]
    fn invalid_header_is_a_construction_error() {
        let err = client()
            .get("/posts", &[RequestOption::header("bad header", "x")])
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidHeader { .. }));

        let err = client()
            .get("/posts", &[RequestOption::header("x-ok", "line\nbreak")])
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidHeader { .. }));
    }

    #[test]
    fn option_query_is_merged_after_params_query() {
        #[derive(Serialize)]
        struct Filter {
            #[serde(rename = "userId")]
            user_id: u64,
        }
        let req = client()
            .get_with(
                "/posts?sort=desc",
                &Filter { user_id: 1 },
                &[RequestOption::query("page", "2")],
            )
            .unwrap();
        assert_eq!(
            req.url,
            "http://localhost:3000/posts?sort=desc&userId=1&page=2"
        );
    }

    #[test]
    fn option_body_overrides_params() {
        let req = client()
            .post_with("/posts", &sample(), &[RequestOption::body("raw")])
            .unwrap();
        assert_eq!(req.body, b"raw");

        let req = client().put("/posts/1", &[RequestOption::body("x")]).unwrap();
        assert_eq!(req.body, b"x");
    }

    #[test]
    fn per_call_headers_do_not_persist() {
        let c = client();
        let req = c
            .get(
                "/posts",
                &[
                    RequestOption::header("x-useragent", "rest-core"),
                    RequestOption::header("x-correlationid", "123456789"),
                ],
            )
            .unwrap();
        assert_eq!(req.header("x-correlationid"), Some("123456789"));
        assert_eq!(req.header("accept"), Some(APPLICATION_JSON));

        c.send(&CallContext::background(), req).unwrap();

        assert_eq!(c.headers().len(), 2);
        assert!(c.headers().iter().all(|(_, h)| h.is_default));
        let next = c.get("/posts", &[]).unwrap();
        assert_eq!(next.header("x-correlationid"), None);
    }

    #[test]
    fn per_call_headers_do_not_persist_after_failure() {
        let transport = FakeTransport {
            fail_with_timeout: true,
            ..FakeTransport::default()
        };
        let c = Client::with_transport("http://h", &[ClientOption::default_headers()], transport).unwrap();
        let req = c.get("/p", &[RequestOption::header("x-once", "1")]).unwrap();
        assert!(c.send(&CallContext::background(), req).is_err());
        assert!(c.headers().iter().all(|(_, h)| h.is_default));
        assert!(c.headers().get("x-once").is_none());
    }

    #[test]
    fn timeout_resolution() {
        let c = Client::with_transport(
            "http://h",
            &[ClientOption::timeout(Duration::from_secs(3))],
            FakeTransport::answering(200, ""),
        )
        .unwrap();
        assert_eq!(c.get("/", &[]).unwrap().timeout, Some(Duration::from_secs(3)));

        let req = c
            .get("/", &[RequestOption::timeout(Duration::from_millis(50))])
            .unwrap();
        assert_eq!(req.timeout, Some(Duration::from_millis(50)));

        c.send(&CallContext::background(), req).unwrap();
        let seen = c.transport().seen.lock().unwrap();
        assert_eq!(seen[0].1, Some(Duration::from_millis(50)));
    }

    #[test]
    fn send_returns_transport_response() {
        let c = Client::with_transport(
            "http://h",
            &[],
            FakeTransport::answering(200, r#"{"id":10}"#),
        )
        .unwrap();
        let req = c.get("/posts/10", &[]).unwrap();
        let resp = c.send(&CallContext::background(), req).unwrap();
        assert!(resp.ok());
        let value: serde_json::Value = resp.json().unwrap();
        assert_eq!(value["id"], 10);
    }

    #[test]
    fn transport_error_yields_no_response() {
        let transport = FakeTransport {
            fail_with_timeout: true,
            ..FakeTransport::default()
        };
        let c = Client::with_transport("http://h", &[], transport).unwrap();
        let req = c.get("/slow", &[]).unwrap();
        let err = c.send(&CallContext::background(), req).unwrap_err();
        assert!(err.is_timeout());
    }

    #[test]
    fn cancelled_context_never_reaches_transport() {
        let c = client();
        let token = CancelToken::new();
        token.cancel();
        let ctx = CallContext::background().with_cancel(token);
        let req = c.get("/posts", &[]).unwrap();
        assert!(matches!(c.send(&ctx, req), Err(ClientError::Cancelled)));
        assert!(c.transport().seen.lock().unwrap().is_empty());
    }

    #[test]
    fn expired_deadline_never_reaches_transport() {
        let c = client();
        let ctx = CallContext::background().with_deadline(Instant::now());
        let req = c.get("/posts", &[]).unwrap();
        assert!(matches!(c.send(&ctx, req), Err(ClientError::Timeout)));
        assert!(c.transport().seen.lock().unwrap().is_empty());
    }

    #[test]
    fn deadline_bounds_transport_timeout() {
        let c = client();
        let ctx = CallContext::background().with_timeout(Duration::from_secs(1));
        let req = c
            .get("/posts", &[RequestOption::timeout(Duration::from_secs(60))])
            .unwrap();
        c.send(&ctx, req).unwrap();
        let seen = c.transport().seen.lock().unwrap();
        let timeout = seen[0].1.unwrap();
        assert!(timeout <= Duration::from_secs(1));
    }

    #[test]
    fn client_from_config() {
        let config = ClientConfig::from_json(
            r#"{"base_url":"http://localhost:3000","timeout_ms":1500,"default_headers":true,"headers":{"x-api-key":"secret"}}"#,
        )
        .unwrap();
        let c = Client::from_config(&config).unwrap();
        assert_eq!(c.base_url(), "http://localhost:3000");
        assert_eq!(c.timeout(), Some(Duration::from_millis(1500)));
        assert_eq!(c.headers().get("x-api-key").unwrap().value, "secret");
        assert!(c.headers().contains_key(CONTENT_TYPE));
    }

    #[test]
    fn zero_timeout_from_config_means_no_limit() {
        let config =
            ClientConfig::from_json(r#"{"base_url":"http://h","timeout_ms":0}"#).unwrap();
        let c = Client::from_config(&config).unwrap();
        assert_eq!(c.timeout(), None);
        assert_eq!(c.get("/", &[]).unwrap().timeout, None);
    }

    #[test]
    fn invalid_client_header_fails_construction() {
        let result = Client::with_transport(
            "http://h",
            &[ClientOption::header("x-key", "a\r\nb")],
            FakeTransport::default(),
        );
        assert!(matches!(result, Err(ClientError::InvalidHeader { .. })));
    }

    #[test]
    fn request_headers_are_lowercased_in_insertion_order() {
        let req = client()
            .get("/posts", &[RequestOption::header("X-CorrelationID", "42")])
            .unwrap();
        let names: Vec<&str> = req.headers.keys().map(|k| k.as_str()).collect();
        assert_eq!(names, vec!["content-type", "accept", "x-correlationid"]);
        assert_eq!(req.header("x-correlationid"), Some("42"));
    }

    #[test]
    fn cancelling_in_flight_returns_without_waiting() {
        let transport = FakeTransport {
            delay: Duration::from_secs(2),
            ..FakeTransport::answering(200, "{}")
        };
        let c = Client::with_transport("http://h", &[], transport).unwrap();
        let token = CancelToken::new();
        let ctx = CallContext::background().with_cancel(token.clone());

        let canceller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            token.cancel();
        });
        let started = Instant::now();
        let result = c.send(&ctx, c.get("/slow", &[]).unwrap());
        canceller.join().unwrap();

        assert!(matches!(result, Err(ClientError::Cancelled)));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn live_token_lets_the_call_complete() {
        let c = Client::with_transport(
            "http://h",
            &[],
            FakeTransport::answering(201, r#"{"id":7}"#),
        )
        .unwrap();
        let ctx = CallContext::background().with_cancel(CancelToken::new());
        let resp = c.send(&ctx, c.post("/posts", &[]).unwrap()).unwrap();
        assert_eq!(resp.status(), 201);
        assert_eq!(c.transport().seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn transport_errors_cross_the_call_thread() {
        let transport = FakeTransport {
            fail_with_timeout: true,
            ..FakeTransport::default()
        };
        let c = Client::with_transport("http://h", &[], transport).unwrap();
        let ctx = CallContext::background().with_cancel(CancelToken::new());
        let err = c.send(&ctx, c.get("/", &[]).unwrap()).unwrap_err();
        assert!(err.is_timeout());
    }

    #[test]
    fn boxed_transport_can_be_chosen_at_runtime() {
        let transport: Box<dyn Transport> =
            Box::new(FakeTransport::answering(200, r#"{"id":10}"#));
        let c: Client<Box<dyn Transport>> =
            Client::with_transport("http://h", &[ClientOption::default_headers()], transport)
                .unwrap();

        let req = c.get("/posts/10", &[]).unwrap();
        let value: serde_json::Value = c
            .send(&CallContext::background(), req)
            .unwrap()
            .json()
            .unwrap();
        assert_eq!(value["id"], 10);

        let ctx = CallContext::background().with_cancel(CancelToken::new());
        assert!(c.send(&ctx, c.get("/posts/10", &[]).unwrap()).unwrap().ok());
    }
}
