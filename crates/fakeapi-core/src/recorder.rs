//! Fixture generation from real traffic.
//!
//! `FixtureRecorder` wraps any client implementing [`HttpVerbs`], forwards
//! every call to it and remembers the outcome under the ConfigKey the engine
//! would derive for the same request. The collected mapping can be saved and
//! loaded back into a `FakeApi`.

use crate::canonical::encoded_url;
use crate::config::{ConfigEntry, UrlConfig};
use crate::error::FakeApiError;
use crate::keys::config_key;
use crate::response::{FakeResponse, Reply};
use crate::verbs::{HttpVerbs, Method};
use parking_lot::Mutex;
use serde_json::Value;
use std::io::Write;
use std::path::Path;

/// What the recorder needs to read back from a client's response.
pub trait RecordableResponse {
    fn status_code(&self) -> Option<u16>;

    /// URL the client reports having called, when it reports one.
    fn effective_url(&self) -> Option<&str>;

    /// Parsed body; `None` when the body is empty.
    fn body_json(&self) -> Option<Value>;
}

impl RecordableResponse for FakeResponse {
    fn status_code(&self) -> Option<u16> {
        Some(self.status_code)
    }

    fn effective_url(&self) -> Option<&str> {
        Some(&self.url)
    }

    fn body_json(&self) -> Option<Value> {
        if self.content.is_empty() {
            return None;
        }
        self.json().ok()
    }
}

impl RecordableResponse for Reply {
    fn status_code(&self) -> Option<u16> {
        self.response().map(|response| response.status_code)
    }

    fn effective_url(&self) -> Option<&str> {
        self.response().map(|response| response.url.as_str())
    }

    fn body_json(&self) -> Option<Value> {
        match self {
            Reply::Response(response) => response.body_json(),
            Reply::Data(data) => Some(data.clone()),
        }
    }
}

pub struct FixtureRecorder<C> {
    client: C,
    url_config: Mutex<UrlConfig>,
}

impl<C> FixtureRecorder<C>
where
    C: HttpVerbs,
    C::Output: RecordableResponse,
{
    pub fn new(client: C) -> Self {
        Self {
            client,
            url_config: Mutex::new(UrlConfig::new()),
        }
    }

    pub fn into_inner(self) -> C {
        self.client
    }

    /// Snapshot of everything recorded so far.
    pub fn url_config(&self) -> UrlConfig {
        self.url_config.lock().clone()
    }

    /// Writes the recorded mapping as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), FakeApiError> {
        let document = self.url_config.lock().to_json_pretty()?;
        let mut file = std::fs::File::create(path)?;
        file.write_all(document.as_bytes())?;
        tracing::info!("fakeapi: url config saved to {}", path.display());
        Ok(())
    }

    fn record(
        &self,
        method: Method,
        url: &str,
        params: Option<&Value>,
        body: Option<&Value>,
        response: &C::Output,
    ) {
        let called = response
            .effective_url()
            .map(str::to_string)
            .unwrap_or_else(|| encoded_url(url, params));
        let key = config_key(method, &encoded_url(&called, body));

        let entry = ConfigEntry {
            status_code: response.status_code(),
            data: Some(response.body_json().unwrap_or(Value::Null)),
            payload: body.cloned(),
        };
        tracing::debug!("fakeapi: recorded {}", key);
        self.url_config.lock().insert(key, entry);
    }

    fn forward(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
        params: Option<&Value>,
    ) -> Result<C::Output, C::Error> {
        let response = self.client.call_verb(method, url, body, params)?;
        let body = if method.has_body() { body } else { None };
        self.record(method, url, params, body, &response);
        Ok(response)
    }
}

impl<C> HttpVerbs for FixtureRecorder<C>
where
    C: HttpVerbs,
    C::Output: RecordableResponse,
{
    type Output = C::Output;
    type Error = C::Error;

    fn get(&self, url: &str, params: Option<&Value>) -> Result<C::Output, C::Error> {
        self.forward(Method::Get, url, None, params)
    }

    fn post(&self, url: &str, body: Option<&Value>, params: Option<&Value>) -> Result<C::Output, C::Error> {
        self.forward(Method::Post, url, body, params)
    }

    fn put(&self, url: &str, body: Option<&Value>, params: Option<&Value>) -> Result<C::Output, C::Error> {
        self.forward(Method::Put, url, body, params)
    }

    fn patch(&self, url: &str, body: Option<&Value>, params: Option<&Value>) -> Result<C::Output, C::Error> {
        self.forward(Method::Patch, url, body, params)
    }

    fn delete(&self, url: &str) -> Result<C::Output, C::Error> {
        self.forward(Method::Delete, url, None, None)
    }
}
