//! Service configuration
//!
//! Everything is read from `NTA_*` environment variables. Unset variables take
//! their defaults; set but invalid values are errors.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::nutrition::usda::{UsdaClientConfig, DEFAULT_BASE_URL, PLACEHOLDER_API_KEY};

pub const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 15;
pub const MAX_LOOKUP_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 86400;
/// Ten years
pub const MAX_CACHE_TTL_SECS: u64 = 10 * 365 * 86400;
pub const DEFAULT_MAX_CONCURRENT_LOOKUPS: usize = 4;
pub const DEFAULT_MAX_TEXT_LEN: usize = 5000;

/// Configuration error types
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got '{value}'")]
    InvalidValue {
        var: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("NTA_ENTITY_SOURCE=http requires NTA_NER_URL")]
    MissingNerUrl,
}

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Where entity spans come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntitySourceKind {
    Lexicon,
    Http,
    None,
}

impl EntitySourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntitySourceKind::Lexicon => "lexicon",
            EntitySourceKind::Http => "http",
            EntitySourceKind::None => "none",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "lexicon" => Some(EntitySourceKind::Lexicon),
            "http" => Some(EntitySourceKind::Http),
            "none" | "disabled" => Some(EntitySourceKind::None),
            _ => None,
        }
    }
}

/// Effective service configuration
#[derive(Debug, Clone)]
pub struct NtaConfig {
    pub usda_api_key: Option<String>,
    pub usda_base_url: String,
    pub lookup_timeout_secs: u64,
    pub cache_ttl_secs: u64,
    pub max_concurrent_lookups: usize,
    pub entity_source: EntitySourceKind,
    pub ner_url: Option<String>,
    pub max_text_len: usize,
}

impl Default for NtaConfig {
    fn default() -> Self {
        Self {
            usda_api_key: None,
            usda_base_url: DEFAULT_BASE_URL.to_string(),
            lookup_timeout_secs: DEFAULT_LOOKUP_TIMEOUT_SECS,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            max_concurrent_lookups: DEFAULT_MAX_CONCURRENT_LOOKUPS,
            entity_source: EntitySourceKind::Lexicon,
            ner_url: None,
            max_text_len: DEFAULT_MAX_TEXT_LEN,
        }
    }
}

/// Configuration as reported by the `nta_config` tool
#[derive(Debug, Clone, Serialize)]
pub struct ConfigSummary {
    /// Key with all but the last four characters masked
    pub usda_api_key: Option<String>,
    pub usda_configured: bool,
    pub usda_base_url: String,
    pub lookup_timeout_secs: u64,
    pub cache_ttl_secs: u64,
    pub max_concurrent_lookups: usize,
    pub entity_source: EntitySourceKind,
    pub ner_url: Option<String>,
    pub max_text_len: usize,
}

impl NtaConfig {
    /// Load from the process environment
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let usda_api_key = get("NTA_USDA_API_KEY").or_else(|| get("USDA_API_KEY"));
        let usda_base_url = get("NTA_USDA_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let lookup_timeout_secs = match get("NTA_LOOKUP_TIMEOUT_SECS") {
            Some(raw) => parse_in_range(
                "NTA_LOOKUP_TIMEOUT_SECS",
                &raw,
                1,
                MAX_LOOKUP_TIMEOUT_SECS,
                "an integer between 1 and 60",
            )?,
            None => DEFAULT_LOOKUP_TIMEOUT_SECS,
        };

        let cache_ttl_secs = match get("NTA_CACHE_TTL_SECS") {
            Some(raw) => parse_in_range(
                "NTA_CACHE_TTL_SECS",
                &raw,
                0,
                MAX_CACHE_TTL_SECS,
                "an integer between 0 and 315360000",
            )?,
            None => DEFAULT_CACHE_TTL_SECS,
        };

        let max_concurrent_lookups = match get("NTA_MAX_CONCURRENT_LOOKUPS") {
            Some(raw) => parse_in_range(
                "NTA_MAX_CONCURRENT_LOOKUPS",
                &raw,
                1,
                1024,
                "an integer between 1 and 1024",
            )? as usize,
            None => DEFAULT_MAX_CONCURRENT_LOOKUPS,
        };

        let max_text_len = match get("NTA_MAX_TEXT_LEN") {
            Some(raw) => parse_in_range(
                "NTA_MAX_TEXT_LEN",
                &raw,
                1,
                u32::MAX as u64,
                "a positive integer",
            )? as usize,
            None => DEFAULT_MAX_TEXT_LEN,
        };

        let ner_url = get("NTA_NER_URL");
        let entity_source = match get("NTA_ENTITY_SOURCE") {
            Some(raw) => EntitySourceKind::parse(&raw).ok_or(ConfigError::InvalidValue {
                var: "NTA_ENTITY_SOURCE",
                value: raw,
                expected: "one of lexicon, http, none",
            })?,
            None if ner_url.is_some() => EntitySourceKind::Http,
            None => EntitySourceKind::Lexicon,
        };
        if entity_source == EntitySourceKind::Http && ner_url.is_none() {
            return Err(ConfigError::MissingNerUrl);
        }

        Ok(Self {
            usda_api_key,
            usda_base_url,
            lookup_timeout_secs,
            cache_ttl_secs,
            max_concurrent_lookups,
            entity_source,
            ner_url,
            max_text_len,
        })
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_secs)
    }

    /// Whether a real USDA key is present
    pub fn usda_configured(&self) -> bool {
        self.usda_api_key
            .as_deref()
            .is_some_and(|k| k != PLACEHOLDER_API_KEY)
    }

    /// Settings for the USDA client
    pub fn usda_client_config(&self) -> UsdaClientConfig {
        UsdaClientConfig {
            api_key: self.usda_api_key.clone(),
            base_url: self.usda_base_url.clone(),
            timeout_secs: self.lookup_timeout_secs,
            cache_ttl_secs: self.cache_ttl_secs,
        }
    }

    /// Redacted view for reporting
    pub fn summary(&self) -> ConfigSummary {
        ConfigSummary {
            usda_api_key: self.usda_api_key.as_deref().map(redact),
            usda_configured: self.usda_configured(),
            usda_base_url: self.usda_base_url.clone(),
            lookup_timeout_secs: self.lookup_timeout_secs,
            cache_ttl_secs: self.cache_ttl_secs,
            max_concurrent_lookups: self.max_concurrent_lookups,
            entity_source: self.entity_source,
            ner_url: self.ner_url.clone(),
            max_text_len: self.max_text_len,
        }
    }
}

fn parse_in_range(
    var: &'static str,
    raw: &str,
    min: u64,
    max: u64,
    expected: &'static str,
) -> ConfigResult<u64> {
    raw.parse::<u64>()
        .ok()
        .filter(|v| (min..=max).contains(v))
        .ok_or_else(|| ConfigError::InvalidValue {
            var,
            value: raw.to_string(),
            expected,
        })
}

fn redact(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), visible)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> ConfigResult<NtaConfig> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        NtaConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.usda_api_key, None);
        assert_eq!(config.usda_base_url, DEFAULT_BASE_URL);
        assert_eq!(config.lookup_timeout_secs, 15);
        assert_eq!(config.cache_ttl_secs, 86400);
        assert_eq!(config.max_concurrent_lookups, 4);
        assert_eq!(config.entity_source, EntitySourceKind::Lexicon);
        assert_eq!(config.max_text_len, 5000);
        assert!(!config.usda_configured());
    }

    #[test]
    fn test_api_key_fallback_and_placeholder() {
        let config = load(&[("USDA_API_KEY", "abc123")]).unwrap();
        assert_eq!(config.usda_api_key.as_deref(), Some("abc123"));
        assert!(config.usda_configured());

        let config = load(&[("NTA_USDA_API_KEY", "primary"), ("USDA_API_KEY", "other")]).unwrap();
        assert_eq!(config.usda_api_key.as_deref(), Some("primary"));

        let config = load(&[("NTA_USDA_API_KEY", PLACEHOLDER_API_KEY)]).unwrap();
        assert!(!config.usda_configured());

        let config = load(&[("NTA_USDA_API_KEY", "   ")]).unwrap();
        assert_eq!(config.usda_api_key, None);
    }

    #[test]
    fn test_invalid_numbers_are_errors() {
        for (var, value) in [
            ("NTA_LOOKUP_TIMEOUT_SECS", "0"),
            ("NTA_LOOKUP_TIMEOUT_SECS", "61"),
            ("NTA_LOOKUP_TIMEOUT_SECS", "soon"),
            ("NTA_MAX_CONCURRENT_LOOKUPS", "0"),
            ("NTA_CACHE_TTL_SECS", "-1"),
            ("NTA_CACHE_TTL_SECS", "315360001"),
            ("NTA_CACHE_TTL_SECS", "18446744073709551615"),
            ("NTA_MAX_TEXT_LEN", "0"),
        ] {
            assert!(
                matches!(load(&[(var, value)]), Err(ConfigError::InvalidValue { .. })),
                "{}={} should be rejected",
                var,
                value
            );
        }
    }

    #[test]
    fn test_cache_can_be_disabled() {
        let config = load(&[("NTA_CACHE_TTL_SECS", "0")]).unwrap();
        assert_eq!(config.cache_ttl_secs, 0);
        assert_eq!(config.usda_client_config().cache_ttl_secs, 0);

        let config = load(&[("NTA_CACHE_TTL_SECS", "315360000")]).unwrap();
        assert_eq!(config.cache_ttl_secs, MAX_CACHE_TTL_SECS);
    }

    #[test]
    fn test_entity_source_selection() {
        let config = load(&[("NTA_NER_URL", "http://localhost:8500/ner")]).unwrap();
        assert_eq!(config.entity_source, EntitySourceKind::Http);

        let config = load(&[
            ("NTA_NER_URL", "http://localhost:8500/ner"),
            ("NTA_ENTITY_SOURCE", "Lexicon"),
        ])
        .unwrap();
        assert_eq!(config.entity_source, EntitySourceKind::Lexicon);

        let config = load(&[("NTA_ENTITY_SOURCE", "none")]).unwrap();
        assert_eq!(config.entity_source, EntitySourceKind::None);

        assert_eq!(
            load(&[("NTA_ENTITY_SOURCE", "http")]).unwrap_err(),
            ConfigError::MissingNerUrl
        );
        assert!(load(&[("NTA_ENTITY_SOURCE", "spacy")]).is_err());
    }

    #[test]
    fn test_summary_redacts_key() {
        let config = load(&[("NTA_USDA_API_KEY", "abcdefgh1234")]).unwrap();
        let summary = config.summary();
        assert_eq!(summary.usda_api_key.as_deref(), Some("********1234"));
        assert!(summary.usda_configured);
        assert_eq!(redact("abc"), "***");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = load(&[("NTA_USDA_BASE_URL", "http://localhost:9000/fdc/v1/")]).unwrap();
        assert_eq!(config.usda_base_url, "http://localhost:9000/fdc/v1");
    }
}
