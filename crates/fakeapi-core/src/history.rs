use crate::response::FakeResponse;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// Latest outcome for one ConfigKey.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallRecord {
    pub key: String,
    pub data: Value,
    pub status_code: u16,
    pub payload: Option<Value>,
}

/// Append-only record of every call made through the engine.
///
/// Nothing here is cleared except by [`History::reset`].
#[derive(Debug, Clone, Default)]
pub struct History {
    /// `"<METHOD> <encoded url+params>"` per call, duplicates kept.
    url_history: Vec<String>,
    /// Most specific candidate key per call (body folded in).
    url_history_full: Vec<String>,
    url_calls: HashMap<String, CallRecord>,
    responses: Vec<FakeResponse>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one call. `key` is the response key, `full_key` the canonical
    /// candidate key.
    pub fn record(&mut self, key: String, full_key: String, response: &FakeResponse) {
        self.url_history_full.push(full_key);
        self.url_calls.insert(
            key.clone(),
            CallRecord {
                key: key.clone(),
                data: response.data.clone(),
                status_code: response.status_code,
                payload: response.payload.clone(),
            },
        );
        self.url_history.push(key);
        self.responses.push(response.clone());
    }

    pub fn reset(&mut self) {
        self.url_history.clear();
        self.url_history_full.clear();
        self.url_calls.clear();
        self.responses.clear();
    }

    pub fn url_history(&self) -> &[String] {
        &self.url_history
    }

    pub fn url_history_full(&self) -> &[String] {
        &self.url_history_full
    }

    pub fn url_calls(&self) -> &HashMap<String, CallRecord> {
        &self.url_calls
    }

    pub fn responses(&self) -> &[FakeResponse] {
        &self.responses
    }

    pub fn is_empty(&self) -> bool {
        self.url_history.is_empty()
            && self.url_history_full.is_empty()
            && self.url_calls.is_empty()
            && self.responses.is_empty()
    }
}
