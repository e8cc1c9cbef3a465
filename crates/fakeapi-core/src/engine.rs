use crate::config::{ConfigSource, UrlConfig};
use crate::error::FakeApiError;
use crate::history::{CallRecord, History};
use crate::keys::{config_key, CandidateKeys};
use crate::registry::ConfigResolver;
use crate::response::{FakeResponse, Reply, Request, ResponseSynthesizer, Returns};
use crate::verbs::{HttpVerbs, Method};
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::collections::HashMap;

/// Resolves fake HTTP calls against a registered `UrlConfig` and keeps the
/// history of every call.
///
/// ## Locking
/// Resolutions share a read guard on the configuration for the whole
/// compute-then-append sequence; `reconfigure` and `reset_history` take the
/// write guard, so neither can interleave with an in-flight call. History
/// appends are serialized by their own mutex. Locks are always taken in the
/// order configuration, history.
pub struct FakeApi {
    config: RwLock<UrlConfig>,
    history: Mutex<History>,
    returns: Returns,
    synthesizer: ResponseSynthesizer,
}

impl FakeApi {
    pub fn new(config: UrlConfig) -> Self {
        Self::with_options(config, Returns::default(), None)
    }

    pub(crate) fn with_options(config: UrlConfig, returns: Returns, nourl_status: Option<u16>) -> Self {
        Self {
            config: RwLock::new(config),
            history: Mutex::new(History::new()),
            returns,
            synthesizer: ResponseSynthesizer::new(nourl_status),
        }
    }

    /// Resolves one call and returns the full response, whatever the reply mode.
    pub fn call(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
        params: Option<&Value>,
    ) -> Result<FakeResponse, FakeApiError> {
        let request = Request {
            method,
            url,
            params,
            body,
        };
        let candidates = CandidateKeys::derive(method, url, params, body);

        let config = self.config.read();
        let resolution = ConfigResolver::new(&config).resolve(&candidates);
        let response = self
            .synthesizer
            .synthesize(&request, candidates.response_url(), resolution)?;

        self.history.lock().record(
            config_key(method, candidates.response_url()),
            candidates.canonical().to_string(),
            &response,
        );
        Ok(response)
    }

    /// Resolves one call and shapes the result according to the reply mode.
    pub fn fake_call(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
        params: Option<&Value>,
    ) -> Result<Reply, FakeApiError> {
        let response = self.call(method, url, body, params)?;
        Ok(match self.returns {
            Returns::Response => Reply::Response(response),
            Returns::Data => Reply::Data(response.data),
        })
    }

    pub fn get(&self, url: &str, params: Option<&Value>) -> Result<Reply, FakeApiError> {
        self.fake_call(Method::Get, url, None, params)
    }

    pub fn post(&self, url: &str, body: Option<&Value>, params: Option<&Value>) -> Result<Reply, FakeApiError> {
        self.fake_call(Method::Post, url, body, params)
    }

    pub fn put(&self, url: &str, body: Option<&Value>, params: Option<&Value>) -> Result<Reply, FakeApiError> {
        self.fake_call(Method::Put, url, body, params)
    }

    pub fn patch(&self, url: &str, body: Option<&Value>, params: Option<&Value>) -> Result<Reply, FakeApiError> {
        self.fake_call(Method::Patch, url, body, params)
    }

    pub fn delete(&self, url: &str) -> Result<Reply, FakeApiError> {
        self.fake_call(Method::Delete, url, None, None)
    }

    /// Replaces the whole configuration.
    pub fn reconfigure(&self, config: UrlConfig) {
        *self.config.write() = config;
        tracing::info!("fakeapi: url config replaced");
    }

    /// Parses `document` and swaps it in. On a parse error the active
    /// configuration is left untouched.
    pub fn load_config_str(&self, document: &str) -> Result<(), FakeApiError> {
        let config = UrlConfig::from_json_str(document)?;
        self.reconfigure(config);
        Ok(())
    }

    pub fn load_config(&self, source: &ConfigSource) -> Result<(), FakeApiError> {
        let config = source.load()?;
        self.reconfigure(config);
        Ok(())
    }

    /// Empties the four history structures. Configuration is unaffected.
    pub fn reset_history(&self) {
        let _config = self.config.write();
        self.history.lock().reset();
    }

    pub fn config(&self) -> UrlConfig {
        self.config.read().clone()
    }

    pub fn history(&self) -> History {
        self.history.lock().clone()
    }

    pub fn url_history(&self) -> Vec<String> {
        self.history.lock().url_history().to_vec()
    }

    pub fn url_history_full(&self) -> Vec<String> {
        self.history.lock().url_history_full().to_vec()
    }

    pub fn url_calls(&self) -> HashMap<String, CallRecord> {
        self.history.lock().url_calls().clone()
    }

    pub fn responses(&self) -> Vec<FakeResponse> {
        self.history.lock().responses().to_vec()
    }
}

impl Default for FakeApi {
    fn default() -> Self {
        Self::new(UrlConfig::default())
    }
}

impl HttpVerbs for FakeApi {
    type Output = Reply;
    type Error = FakeApiError;

    fn get(&self, url: &str, params: Option<&Value>) -> Result<Reply, FakeApiError> {
        FakeApi::get(self, url, params)
    }

    fn post(&self, url: &str, body: Option<&Value>, params: Option<&Value>) -> Result<Reply, FakeApiError> {
        FakeApi::post(self, url, body, params)
    }

    fn put(&self, url: &str, body: Option<&Value>, params: Option<&Value>) -> Result<Reply, FakeApiError> {
        FakeApi::put(self, url, body, params)
    }

    fn patch(&self, url: &str, body: Option<&Value>, params: Option<&Value>) -> Result<Reply, FakeApiError> {
        FakeApi::patch(self, url, body, params)
    }

    fn delete(&self, url: &str) -> Result<Reply, FakeApiError> {
        FakeApi::delete(self, url)
    }
}
