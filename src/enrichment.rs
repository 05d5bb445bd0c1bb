//! Enrichment sub-tree lookup shared by the IPInfo and Tor views
//!
//! The pipeline attaches each enrichment source at
//! `event[<enrichment_key>][<source>]` as a mapping from the matched field name
//! to that source's record.

use crate::accessor::deep_get;
use crate::config::HelperConfig;
use crate::event::{Event, EventValue};

/// One located enrichment source for a single event.
///
/// `root` is `None` when the event carries no sub-tree for the source; every
/// lookup on such a table returns `None`.
#[derive(Debug, Clone, Copy)]
pub struct EnrichmentTable<'a> {
    source: &'a str,
    root: Option<&'a EventValue>,
}

impl<'a> EnrichmentTable<'a> {
    /// Locate `source` under the configured enrichment key. Never fails.
    ///
    /// Only a non-empty mapping counts as an integrated source; null, empty
    /// and non-mapping sub-trees are treated as absent.
    pub fn locate(event: &'a Event, config: &HelperConfig, source: &'a str) -> Self {
        let root = deep_get(event, &[config.enrichment_key.as_str(), source])
            .filter(|value| value.as_map().map_or(false, |records| !records.is_empty()));
        Self { source, root }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Whether the pipeline attached this source to the event at all.
    pub fn is_present(&self) -> bool {
        self.root.is_some()
    }

    /// The record for `match_field`, if the source matched it.
    pub fn record(&self, match_field: &str) -> Option<&'a EventValue> {
        self.root.and_then(|root| deep_get(root, &[match_field]))
    }

    /// One attribute of the record for `match_field`.
    pub fn attribute(&self, match_field: &str, attribute: &str) -> Option<&'a EventValue> {
        self.root
            .and_then(|root| deep_get(root, &[match_field, attribute]))
    }
}
