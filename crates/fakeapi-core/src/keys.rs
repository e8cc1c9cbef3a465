use crate::canonical::{encoded_url, readable_url};
use crate::verbs::Method;
use serde_json::Value;

/// The ConfigKeys one request may have been registered under, most specific
/// first.
///
/// Order: encoded with body folded in, readable with body, encoded, readable.
/// Duplicates are dropped keeping the first occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateKeys {
    keys: Vec<String>,
    /// Encoded URL with params only; what the response echoes as `url`.
    response_url: String,
}

impl CandidateKeys {
    pub fn derive(method: Method, url: &str, params: Option<&Value>, body: Option<&Value>) -> Self {
        let with_params = encoded_url(url, params);
        let readable = readable_url(url, params);
        let with_body = encoded_url(&with_params, body);
        let readable_with_body = readable_url(&readable, body);

        let mut keys: Vec<String> = Vec::with_capacity(4);
        for variant in [&with_body, &readable_with_body, &with_params, &readable] {
            let key = config_key(method, variant);
            if !keys.contains(&key) {
                keys.push(key);
            }
        }

        Self {
            keys,
            response_url: with_params,
        }
    }

    /// Most specific key: encoded URL, params and body folded in.
    pub fn canonical(&self) -> &str {
        &self.keys[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn response_url(&self) -> &str {
        &self.response_url
    }
}

/// `"<METHOD> <url>"`.
pub fn config_key(method: Method, url: &str) -> String {
    format!("{} {}", method.as_str(), url)
}
