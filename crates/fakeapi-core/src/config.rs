use crate::error::FakeApiError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Response registered for one ConfigKey.
///
/// `data` tells "absent" apart from "present and null": `{"data": null}`
/// replays as the body `null`, an entry without `data` replays as `""`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Request body seen when the entry was recorded. Informational only.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl ConfigEntry {
    pub fn with_data(data: Value) -> Self {
        Self {
            data: Some(data),
            ..Self::default()
        }
    }

    pub fn status(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }
}

/// The `"<METHOD> <url>" -> ConfigEntry` mapping.
///
/// Keys are matched verbatim. The mapping is never edited in place by the
/// engine; it is replaced as a whole.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UrlConfig {
    entries: HashMap<String, ConfigEntry>,
}

impl UrlConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON object document.
    pub fn from_json_str(document: &str) -> Result<Self, FakeApiError> {
        serde_json::from_str(document).map_err(FakeApiError::ConfigParse)
    }

    pub fn insert(&mut self, key: impl Into<String>, entry: ConfigEntry) -> Option<ConfigEntry> {
        self.entries.insert(key.into(), entry)
    }

    pub fn get(&self, key: &str) -> Option<&ConfigEntry> {
        self.entries.get(key)
    }

    pub fn get_key_value(&self, key: &str) -> Option<(&str, &ConfigEntry)> {
        self.entries
            .get_key_value(key)
            .map(|(key, entry)| (key.as_str(), entry))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_json_pretty(&self) -> Result<String, FakeApiError> {
        serde_json::to_string_pretty(self).map_err(FakeApiError::Serialization)
    }
}

impl<K: Into<String>> FromIterator<(K, ConfigEntry)> for UrlConfig {
    fn from_iter<I: IntoIterator<Item = (K, ConfigEntry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Where a configuration document is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Path(PathBuf),
    Stdin,
}

impl ConfigSource {
    pub const STDIN_SENTINEL: &'static str = "-";

    /// `-` selects standard input, anything else is a file path.
    pub fn from_arg(arg: &str) -> Self {
        if arg == Self::STDIN_SENTINEL {
            ConfigSource::Stdin
        } else {
            ConfigSource::Path(PathBuf::from(arg))
        }
    }

    pub fn read_to_string(&self) -> Result<String, FakeApiError> {
        match self {
            ConfigSource::Path(path) => {
                std::fs::read_to_string(path).map_err(|source| FakeApiError::ConfigRead {
                    path: path.clone(),
                    source,
                })
            }
            ConfigSource::Stdin => {
                let mut document = String::new();
                std::io::stdin()
                    .lock()
                    .read_to_string(&mut document)
                    .map_err(|source| FakeApiError::ConfigRead {
                        path: PathBuf::from(Self::STDIN_SENTINEL),
                        source,
                    })?;
                Ok(document)
            }
        }
    }

    pub fn load(&self) -> Result<UrlConfig, FakeApiError> {
        UrlConfig::from_json_str(&self.read_to_string()?)
    }
}

/// Settings of the HTTP listener.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ListenerConfig {
    pub host: String,
    pub port: u16,
    /// Prepended to the request path to form the URL handed to the engine.
    pub prefix: Option<String>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8080,
            prefix: None,
        }
    }
}

impl ListenerConfig {
    pub fn from_toml_str(document: &str) -> Result<Self, FakeApiError> {
        Ok(toml::from_str(document)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, FakeApiError> {
        let document = std::fs::read_to_string(path).map_err(|source| FakeApiError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&document)
    }

    /// The configured prefix, or `http://<host>:<port>`.
    pub fn http_prefix(&self) -> String {
        match &self.prefix {
            Some(prefix) => prefix.clone(),
            None => format!("http://{}:{}", self.host, self.port),
        }
    }
}
