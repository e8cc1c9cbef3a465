use bytes::Bytes;
use fakeapi_core::{FakeApi, Method};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::header::{HeaderValue, CONTENT_TYPE, HOST};
use hyper::{Request, Response, StatusCode};
use serde_json::{json, Value};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

/// Status and body written back for one inbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatched {
    pub status_code: u16,
    pub text: String,
}

impl Dispatched {
    fn failure(status: StatusCode, message: impl std::fmt::Display) -> Self {
        Self {
            status_code: status.as_u16(),
            text: json!({ "error": message.to_string() }).to_string(),
        }
    }
}

/// Turns inbound HTTP requests into engine calls.
///
/// The URL handed to the engine is `prefix + path-and-query`. No matching
/// happens here; everything is decided by the `FakeApi`.
pub struct RequestDispatcher {
    api: Arc<FakeApi>,
    prefix: String,
}

impl RequestDispatcher {
    pub fn new(api: Arc<FakeApi>, prefix: impl Into<String>) -> Self {
        Self {
            api,
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Resolves one decoded request.
    ///
    /// An empty body is a `null` payload. GET and DELETE ignore the body.
    pub fn dispatch(&self, method: &str, path_and_query: &str, body: &[u8]) -> Dispatched {
        let method: Method = match method.parse() {
            Ok(method) => method,
            Err(e) => return Dispatched::failure(StatusCode::NOT_IMPLEMENTED, e),
        };

        let payload = if body.iter().all(u8::is_ascii_whitespace) {
            Value::Null
        } else {
            match serde_json::from_slice::<Value>(body) {
                Ok(payload) => payload,
                Err(e) => {
                    tracing::warn!("fakeapi: rejected {} {}: {}", method, path_and_query, e);
                    return Dispatched::failure(StatusCode::BAD_REQUEST, e);
                }
            }
        };

        let url = format!("{}{}", self.prefix, path_and_query);
        let body = method.has_body().then_some(&payload);
        match self.api.call(method, &url, body, None) {
            Ok(response) => Dispatched {
                status_code: response.status_code,
                text: response.text,
            },
            Err(e) => {
                tracing::error!("fakeapi: {} {} failed: {}", method, url, e);
                Dispatched::failure(StatusCode::INTERNAL_SERVER_ERROR, e)
            }
        }
    }

    /// hyper service entry point.
    pub async fn handle(
        self: Arc<Self>,
        req: Request<Incoming>,
        peer: SocketAddr,
    ) -> Result<Response<Full<Bytes>>, Infallible> {
        let method = req.method().as_str().to_string();
        let path_and_query = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| "/".to_string());
        let host = req
            .headers()
            .get(HOST)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();

        tracing::info!("{} - {} {}{}", peer, method, host, path_and_query);

        let dispatched = match req.into_body().collect().await {
            Ok(collected) => self.dispatch(&method, &path_and_query, &collected.to_bytes()),
            Err(e) => Dispatched::failure(StatusCode::BAD_REQUEST, e),
        };

        let mut response = Response::new(Full::new(Bytes::from(dispatched.text)));
        *response.status_mut() =
            StatusCode::from_u16(dispatched.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(response)
    }
}
