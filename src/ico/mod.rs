//! IČO (identifikačné číslo organizácie) verification.
//!
//! Format validation and normalization of the 8-digit identifier, a registry
//! lookup with a bounded timeout and a TTL cache, and a format-only fallback
//! so a transient registry outage never blocks registration.

pub mod cache;
pub mod registry;

use std::sync::Mutex;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use cache::IcoCache;
use registry::{lookup_registry, lookup_secondary, LookupOutcome};

/// Why a record is reported as invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationError {
    #[error("IČO must be exactly 8 digits")]
    InvalidFormat,
    #[error("IČO not found in Slovak business registries")]
    NotFound,
}

/// Verification result: either registry data, a format-only confirmation,
/// or an invalid identifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IcoRecord {
    pub ico: String,
    pub valid: bool,
    /// Where the confirmation came from: "registeruz.sk", "finstat.sk"
    /// or "format-only"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_form: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ic_dph: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registered: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<VerificationError>,
    /// Raw upstream payload, kept for callers that need fields we don't map
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<serde_json::Value>,
}

impl IcoRecord {
    /// Syntactically valid identifier that no registry could confirm.
    pub fn format_only(ico: String) -> IcoRecord {
        IcoRecord {
            ico,
            valid: true,
            source: Some("format-only".to_string()),
            company_name: None,
            address: None,
            legal_form: None,
            dic: None,
            ic_dph: None,
            status: None,
            registered: None,
            error: None,
            raw: None,
        }
    }

    pub fn invalid(ico: String, error: VerificationError) -> IcoRecord {
        IcoRecord {
            ico,
            valid: false,
            source: None,
            company_name: None,
            address: None,
            legal_form: None,
            dic: None,
            ic_dph: None,
            status: None,
            registered: None,
            error: Some(error),
            raw: None,
        }
    }
}

/// Valid iff exactly 8 digits remain after stripping separators.
pub fn validate_format(raw: &str) -> bool {
    raw.chars().filter(char::is_ascii_digit).count() == 8
}

/// Strip non-digits and left-pad with zeros to 8 digits.
///
/// Purely mechanical; callers must run [`validate_format`] first.
pub fn normalize(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    format!("{digits:0>8}")
}

#[derive(Debug, Clone, Deserialize)]
pub struct IcoClientConfig {
    #[serde(default = "IcoClientConfig::default_registry_url")]
    pub registry_url: String,
    #[serde(default)]
    pub secondary_url: Option<String>,
    #[serde(default)]
    pub secondary_api_key: Option<String>,
    /// Per-request timeout; registration-flow dependency, so short
    #[serde(default = "IcoClientConfig::default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "IcoClientConfig::default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

impl IcoClientConfig {
    fn default_registry_url() -> String {
        "https://www.registeruz.sk".to_string()
    }

    fn default_timeout_secs() -> u64 {
        5
    }

    fn default_cache_ttl_secs() -> u64 {
        IcoCache::DEFAULT_TTL.as_secs()
    }
}

impl Default for IcoClientConfig {
    fn default() -> Self {
        IcoClientConfig {
            registry_url: Self::default_registry_url(),
            secondary_url: None,
            secondary_api_key: None,
            timeout_secs: Self::default_timeout_secs(),
            cache_ttl_secs: Self::default_cache_ttl_secs(),
        }
    }
}

/// Registry verification client with an in-process TTL cache.
pub struct IcoClient {
    config: IcoClientConfig,
    agent: ureq::Agent,
    cache: Mutex<IcoCache>,
}

enum Tier {
    Primary,
    Secondary,
}

impl IcoClient {
    pub fn new(config: IcoClientConfig) -> IcoClient {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();
        let cache = Mutex::new(IcoCache::new(Duration::from_secs(config.cache_ttl_secs)));
        IcoClient {
            config,
            agent,
            cache,
        }
    }

    /// Verify an identifier against the registry tiers.
    ///
    /// Never fails on network problems: on an exhausted lookup chain a
    /// syntactically valid identifier degrades to a format-only record.
    /// Only a structurally invalid identifier is reported as invalid.
    pub fn verify(&self, raw: &str, allow_secondary: bool) -> IcoRecord {
        if !validate_format(raw) {
            return IcoRecord::invalid(raw.to_string(), VerificationError::InvalidFormat);
        }
        let ico = normalize(raw);

        if let Some(hit) = self.cache.lock().unwrap().get(&ico) {
            log::debug!("{ico}: served from cache");
            return hit;
        }

        // Ordered attempt pipeline: first Found wins, everything else
        // falls through to the next tier.
        let mut attempts: Vec<(Tier, Box<dyn Fn() -> LookupOutcome + '_>)> = vec![(
            Tier::Primary,
            Box::new(|| lookup_registry(&self.agent, &self.config.registry_url, &ico)),
        )];
        if allow_secondary {
            if let (Some(url), Some(key)) =
                (&self.config.secondary_url, &self.config.secondary_api_key)
            {
                let ico = ico.clone();
                attempts.push((
                    Tier::Secondary,
                    Box::new(move || lookup_secondary(&self.agent, url, key, &ico)),
                ));
            }
        }

        let found = attempts.into_iter().find_map(|(tier, attempt)| {
            match attempt() {
                LookupOutcome::Found(record) => Some((tier, record)),
                LookupOutcome::NotFound => {
                    log::debug!("{ico}: not found in registry tier");
                    None
                }
                LookupOutcome::Timeout => {
                    log::warn!("{ico}: registry lookup timed out");
                    None
                }
                LookupOutcome::TransportError(err) => {
                    log::warn!("{ico}: registry lookup failed: {err}");
                    None
                }
            }
        });

        if let Some((tier, record)) = found {
            // Secondary results are deliberately not cached
            if matches!(tier, Tier::Primary) {
                self.cache.lock().unwrap().insert(&ico, record.clone());
            }
            return record;
        }

        // Availability over completeness: a syntactically valid IČO passes
        // registration even when every registry tier is down.
        if ico.len() == 8 {
            log::warn!("{ico}: all lookups failed, accepting on format only");
            IcoRecord::format_only(ico)
        } else {
            IcoRecord::invalid(ico, VerificationError::NotFound)
        }
    }

    /// Drop all cached records. The CLI builds a fresh client per run;
    /// long-lived embedding callers use this as teardown.
    #[allow(dead_code)]
    pub fn clear_cache(&self) {
        self.cache.lock().unwrap().clear();
    }
}

impl Default for IcoClient {
    fn default() -> Self {
        IcoClient::new(IcoClientConfig::default())
    }
}
