use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum FakeApiError {
    /// The configuration document is not a valid `ConfigKey -> ConfigEntry` object.
    #[error("malformed url config: {0}")]
    ConfigParse(#[source] serde_json::Error),
    #[error("cannot read url config from {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A resolved body could not be rendered as response text.
    #[error("cannot serialize response body: {0}")]
    Serialization(#[source] serde_json::Error),
    /// A response body is not JSON.
    #[error("response body is not json: {0}")]
    BodyDecode(#[source] serde_json::Error),
    #[error("malformed listener config: {0}")]
    ListenerConfig(#[from] toml::de::Error),
    #[error("transport failure: {0}")]
    Transport(#[from] std::io::Error),
}
