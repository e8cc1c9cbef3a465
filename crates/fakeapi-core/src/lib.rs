pub mod canonical;
pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod keys;
pub mod recorder;
pub mod registry;
pub mod response;
pub mod verbs;

pub use canonical::{canonicalize, encoded_url, readable_url};
pub use config::{ConfigEntry, ConfigSource, ListenerConfig, UrlConfig};
pub use engine::FakeApi;
pub use error::FakeApiError;
pub use history::{CallRecord, History};
pub use keys::{config_key, CandidateKeys};
pub use recorder::{FixtureRecorder, RecordableResponse};
pub use registry::{ConfigResolver, Resolution};
pub use response::{FakeResponse, Reply, Returns};
pub use verbs::{HttpVerbs, Method};

/// Fluent construction of a [`FakeApi`].
///
/// ```
/// use fakeapi_core::{ConfigEntry, FakeApiBuilder};
/// use serde_json::json;
///
/// let api = FakeApiBuilder::new()
///     .route("GET http://localhost/api", ConfigEntry::with_data(json!({"message": "ok"})))
///     .build();
/// let reply = api.get("http://localhost/api", None).unwrap();
/// assert_eq!(reply.data(), &json!({"message": "ok"}));
/// ```
#[derive(Debug, Default)]
pub struct FakeApiBuilder {
    pub config: UrlConfig,
    pub returns: Returns,
    pub nourl_status: Option<u16>,
}

impl FakeApiBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one ConfigKey.
    pub fn route(mut self, key: &str, entry: ConfigEntry) -> Self {
        self.config.insert(key, entry);
        self
    }

    /// Replaces every route registered so far.
    pub fn with_config(mut self, config: UrlConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_returns(mut self, returns: Returns) -> Self {
        self.returns = returns;
        self
    }

    /// Status answered to calls no route matches, instead of the verb default.
    pub fn with_nourl_status(mut self, status_code: u16) -> Self {
        self.nourl_status = Some(status_code);
        self
    }

    pub fn build(self) -> FakeApi {
        FakeApi::with_options(self.config, self.returns, self.nourl_status)
    }
}
