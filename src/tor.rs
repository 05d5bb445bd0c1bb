//! Tor exit-node enrichment
//!
//! The `tor_exit_nodes` sub-tree maps each matched field to a record holding
//! the exit node `ip`. Alert context links that IP to the ExoneraTor lookup for
//! the current UTC day.

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::config::HelperConfig;
use crate::enrichment::EnrichmentTable;
use crate::event::Event;

#[derive(Debug, Clone, Copy)]
pub struct TorExitNodes<'a> {
    table: EnrichmentTable<'a>,
    config: &'a HelperConfig,
}

/// Alert context for a Tor exit-node match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TorContext {
    #[serde(rename = "IP")]
    pub ip: String,
    #[serde(rename = "ExoneraTorURL")]
    pub exonera_tor_url: String,
}

impl TorContext {
    pub fn to_json_value(&self) -> Value {
        serde_json::json!({
            "IP": self.ip,
            "ExoneraTorURL": self.exonera_tor_url,
        })
    }
}

impl<'a> TorExitNodes<'a> {
    pub fn new(event: &'a Event) -> Self {
        Self::new_with(event, HelperConfig::default_ref())
    }

    pub fn new_with(event: &'a Event, config: &'a HelperConfig) -> Self {
        Self {
            table: EnrichmentTable::locate(event, config, &config.sources.tor),
            config,
        }
    }

    /// True if Tor enrichment ran for this event, whether or not any field
    /// matched.
    pub fn has_exit_nodes(&self) -> bool {
        self.table.is_present()
    }

    /// Exit node IP recorded for `match_field`. Non-string values count as
    /// absent.
    pub fn ip_address(&self, match_field: &str) -> Option<&'a str> {
        self.table
            .attribute(match_field, "ip")
            .and_then(|value| value.as_str())
    }

    /// ExoneraTor lookup URL for today's UTC date, `None` without an IP.
    pub fn url(&self, match_field: &str) -> Option<String> {
        self.url_on(match_field, Utc::now().date_naive())
    }

    pub fn url_on(&self, match_field: &str, date: NaiveDate) -> Option<String> {
        let ip = self.ip_address(match_field)?;
        Some(format!(
            "{}?ip={}&timestamp={}&lang={}",
            self.config.exonerator.base_url,
            ip,
            date.format("%Y-%m-%d"),
            self.config.exonerator.lang
        ))
    }

    pub fn context(&self, match_field: &str) -> Option<TorContext> {
        self.context_on(match_field, Utc::now().date_naive())
    }

    pub fn context_on(&self, match_field: &str, date: NaiveDate) -> Option<TorContext> {
        let ip = self.ip_address(match_field)?;
        let exonera_tor_url = self.url_on(match_field, date)?;
        Some(TorContext {
            ip: ip.to_string(),
            exonera_tor_url,
        })
    }
}
