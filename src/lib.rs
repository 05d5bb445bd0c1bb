#![deny(warnings)]

//! SIEM Enrichment Helpers Library
//!
//! Normalization layer between the log pipeline and detection rules. Events
//! carry vendor enrichment under `p_enrichment` and free-form detail payloads
//! in whatever shape the source produced; the helpers here turn both into
//! predictable structures without failing on the common "nothing enriched"
//! case.
//!
//! # Modules
//!
//! - `event`: `Event` and the `EventValue` value model
//! - `accessor`: `deep_get`, safe traversal of nested mappings
//! - `payload`: normalization of detail payloads of unknown shape
//! - `enrichment`: lookup of one enrichment source on an event
//! - `ipinfo`: IPInfo location/ASN views and `geoinfo_from_ip`
//! - `tor`: Tor exit-node view and ExoneraTor alert context
//! - `alert_context`: alert context builders for specific log sources
//! - `config`: source names and ExoneraTor settings
//! - `error_handling`: error types

pub mod accessor;
pub mod alert_context;
pub mod config;
pub mod enrichment;
pub mod error_handling;
pub mod event;
pub mod ipinfo;
pub mod payload;
pub mod tor;

// Re-export the main types for convenience
pub use accessor::{deep_get, deep_get_or, FieldLookup};
pub use alert_context::guardduty_context;
pub use config::HelperConfig;
pub use error_handling::{EnrichmentError, EnrichmentResult};
pub use event::{Event, EventValue, Fields};
pub use ipinfo::{geoinfo_from_ip, geoinfo_from_ip_with, GeoRecord, IpInfoAsn, IpInfoLocation};
pub use payload::{
    normalize_payload, normalize_value, parse_additional_details, NormalizedPayload, PayloadShape,
};
pub use tor::{TorContext, TorExitNodes};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let event = Event::new();
        assert!(event.is_empty());
        assert!(IpInfoLocation::from_event(&event).is_none());
        assert!(!TorExitNodes::new(&event).has_exit_nodes());
        assert!(parse_additional_details(&event).is_empty());
    }
}
