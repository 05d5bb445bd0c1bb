//! Standardized error handling for the enrichment helpers
//!
//! Data-shape anomalies (missing keys, unexpected types, unparseable payloads)
//! are never errors in this crate; they resolve to `None` or an empty
//! container. The variants below cover deployment misconfiguration and
//! loading of the helper configuration file.

use tracing::error;

/// Remediation hint attached to a geo composition that lacks a source.
pub const ENABLE_BOTH_SOURCES_HINT: &str =
    "Please enable both IPInfo Location and ASN Lookup Tables";

/// Standardized error types for the enrichment helpers
#[derive(Debug, thiserror::Error)]
pub enum EnrichmentError {
    #[error("Configuration error: missing enrichment source(s) {}. {hint}", .missing.join(", "))]
    MissingEnrichmentSource {
        missing: Vec<String>,
        hint: String,
    },

    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {source}")]
    Yaml {
        #[source]
        source: serde_yaml::Error,
    },
}

impl EnrichmentError {
    /// Create a missing-source error and log it; callers are expected to let
    /// it interrupt rule evaluation.
    pub fn missing_sources<I, S>(missing: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let err = Self::MissingEnrichmentSource {
            missing: missing.into_iter().map(Into::into).collect(),
            hint: ENABLE_BOTH_SOURCES_HINT.to_string(),
        };
        error!("{}", err);
        err
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn configuration_with_source<S: Into<String>>(message: S, source: anyhow::Error) -> Self {
        Self::Configuration {
            message: message.into(),
            source: Some(source),
        }
    }

    pub fn io<P: Into<String>>(path: P, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Get a stable error code for reporting
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingEnrichmentSource { .. } => "ENRICHMENT_SOURCE_MISSING",
            Self::Configuration { .. } => "CONFIG_ERROR",
            Self::Io { .. } => "IO_ERROR",
            Self::Yaml { .. } => "CONFIG_PARSE_ERROR",
        }
    }

    /// True for errors caused by how the deployment is set up rather than by
    /// any single event.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingEnrichmentSource { .. } | Self::Configuration { .. } | Self::Yaml { .. }
        )
    }
}

impl From<serde_yaml::Error> for EnrichmentError {
    fn from(source: serde_yaml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Result type alias for enrichment operations
pub type EnrichmentResult<T> = std::result::Result<T, EnrichmentError>;

/// Macro for creating configuration errors
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::error_handling::EnrichmentError::configuration($msg)
    };
    ($msg:expr, $source:expr) => {
        $crate::error_handling::EnrichmentError::configuration_with_source($msg, $source.into())
    };
}
