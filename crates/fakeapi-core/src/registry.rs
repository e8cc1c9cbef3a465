use crate::config::{ConfigEntry, UrlConfig};
use crate::keys::CandidateKeys;

/// Outcome of looking a request up in the configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution<'a> {
    Matched { key: &'a str, entry: &'a ConfigEntry },
    NoMatch,
}

impl<'a> Resolution<'a> {
    pub fn entry(&self) -> Option<&'a ConfigEntry> {
        match self {
            Resolution::Matched { entry, .. } => Some(entry),
            Resolution::NoMatch => None,
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, Resolution::Matched { .. })
    }
}

/// Resolves candidate keys against a `UrlConfig`.
///
/// ## Constraint: Exact Keys Only
/// Each candidate is a direct hash lookup. There is no prefix, wildcard or
/// normalizing match; a fixture must spell one of the candidate keys.
pub struct ConfigResolver<'a> {
    config: &'a UrlConfig,
}

impl<'a> ConfigResolver<'a> {
    pub fn new(config: &'a UrlConfig) -> Self {
        Self { config }
    }

    /// Returns the entry of the first candidate present in the configuration.
    pub fn resolve(&self, candidates: &CandidateKeys) -> Resolution<'a> {
        tracing::info!("fakeapi: Calling: {}", candidates.canonical());

        let config = self.config;
        for key in candidates.iter() {
            if let Some((key, entry)) = config.get_key_value(key) {
                return Resolution::Matched { key, entry };
            }
        }

        tracing::debug!("fakeapi: No URL config found for {}", candidates.canonical());
        Resolution::NoMatch
    }
}
