//! Helper configuration
//!
//! Names of the enrichment sources as the upstream pipeline attaches them, and
//! the ExoneraTor lookup used for Tor alert context. The defaults reproduce the
//! standard `p_enrichment` layout, so most callers never load a file.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config_error;
use crate::error_handling::{EnrichmentError, EnrichmentResult};

pub const DEFAULT_ENRICHMENT_KEY: &str = "p_enrichment";
pub const DEFAULT_LOCATION_SOURCE: &str = "ip-info-location-cidr";
pub const DEFAULT_ASN_SOURCE: &str = "ip-info-asn-cidr";
pub const DEFAULT_TOR_SOURCE: &str = "tor_exit_nodes";
pub const DEFAULT_EXONERATOR_URL: &str = "https://metrics.torproject.org/exonerator.html";
pub const DEFAULT_EXONERATOR_LANG: &str = "en";

static DEFAULT_CONFIG: Lazy<HelperConfig> = Lazy::new(HelperConfig::default);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct HelperConfig {
    /// Top-level event field holding all enrichment sub-trees
    pub enrichment_key: String,
    pub sources: SourceKeys,
    pub exonerator: ExoneratorConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SourceKeys {
    pub location: String,
    pub asn: String,
    pub tor: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ExoneratorConfig {
    pub base_url: String,
    pub lang: String,
}

impl Default for HelperConfig {
    fn default() -> Self {
        Self {
            enrichment_key: DEFAULT_ENRICHMENT_KEY.to_string(),
            sources: SourceKeys::default(),
            exonerator: ExoneratorConfig::default(),
        }
    }
}

impl Default for SourceKeys {
    fn default() -> Self {
        Self {
            location: DEFAULT_LOCATION_SOURCE.to_string(),
            asn: DEFAULT_ASN_SOURCE.to_string(),
            tor: DEFAULT_TOR_SOURCE.to_string(),
        }
    }
}

impl Default for ExoneratorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_EXONERATOR_URL.to_string(),
            lang: DEFAULT_EXONERATOR_LANG.to_string(),
        }
    }
}

impl HelperConfig {
    /// Shared default configuration used by the plain view constructors.
    pub fn default_ref() -> &'static HelperConfig {
        &DEFAULT_CONFIG
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> EnrichmentResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| EnrichmentError::io(path.display().to_string(), e))?;
        Self::from_yaml_str(&content)
            .map_err(|e| config_error!(format!("invalid helper config {}", path.display()), e))
    }

    pub fn from_yaml_str(content: &str) -> EnrichmentResult<Self> {
        let config: HelperConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults with `ENRICHMENT_KEY`, `EXONERATOR_BASE_URL` and
    /// `EXONERATOR_LANG` applied from the process environment.
    pub fn from_env() -> EnrichmentResult<Self> {
        Self::default().with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from any variable source.
    pub fn with_overrides<F>(mut self, lookup: F) -> EnrichmentResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("ENRICHMENT_KEY") {
            self.enrichment_key = key;
        }
        if let Some(url) = lookup("EXONERATOR_BASE_URL") {
            self.exonerator.base_url = url;
        }
        if let Some(lang) = lookup("EXONERATOR_LANG") {
            self.exonerator.lang = lang;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> EnrichmentResult<()> {
        let required = [
            ("enrichment_key", &self.enrichment_key),
            ("sources.location", &self.sources.location),
            ("sources.asn", &self.sources.asn),
            ("sources.tor", &self.sources.tor),
            ("exonerator.base_url", &self.exonerator.base_url),
            ("exonerator.lang", &self.exonerator.lang),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(config_error!(format!("{} must not be empty", name)));
            }
        }
        if !self.exonerator.base_url.starts_with("http://")
            && !self.exonerator.base_url.starts_with("https://")
        {
            return Err(config_error!(format!(
                "exonerator.base_url must be an http(s) URL, got {}",
                self.exonerator.base_url
            )));
        }
        Ok(())
    }
}
