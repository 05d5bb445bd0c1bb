//! IPInfo enrichment views and geo composition
//!
//! `IpInfoLocation` and `IpInfoAsn` are read-only views over the
//! `ip-info-location-cidr` and `ip-info-asn-cidr` sub-trees. Accessors take the
//! matched field name and return the stored attribute unchanged, or `None`.
//!
//! Two kinds of absence are kept apart:
//!
//! - the source is not integrated at all: `from_event` returns `None`;
//! - the source is integrated but did not match this field: the view exists and
//!   its accessors return `None`.
//!
//! `geoinfo_from_ip` needs both sources and fails loudly when either one is not
//! integrated.

use serde::Serialize;
use serde_json::Value;

use crate::config::HelperConfig;
use crate::enrichment::EnrichmentTable;
use crate::error_handling::{EnrichmentError, EnrichmentResult};
use crate::event::{Event, EventValue};

/// Location view over `ip-info-location-cidr`.
#[derive(Debug, Clone, Copy)]
pub struct IpInfoLocation<'a> {
    table: EnrichmentTable<'a>,
}

impl<'a> IpInfoLocation<'a> {
    /// Build the view; an absent sub-tree gives a view whose accessors all
    /// return `None`.
    pub fn new(event: &'a Event) -> Self {
        Self::new_with(event, HelperConfig::default_ref())
    }

    pub fn new_with(event: &'a Event, config: &'a HelperConfig) -> Self {
        Self {
            table: EnrichmentTable::locate(event, config, &config.sources.location),
        }
    }

    /// The view, only if the location source was attached to this event.
    pub fn from_event(event: &'a Event) -> Option<Self> {
        Self::from_event_with(event, HelperConfig::default_ref())
    }

    pub fn from_event_with(event: &'a Event, config: &'a HelperConfig) -> Option<Self> {
        let view = Self::new_with(event, config);
        view.table.is_present().then_some(view)
    }

    pub fn is_present(&self) -> bool {
        self.table.is_present()
    }

    pub fn city(&self, match_field: &str) -> Option<&'a EventValue> {
        self.table.attribute(match_field, "city")
    }

    pub fn country(&self, match_field: &str) -> Option<&'a EventValue> {
        self.table.attribute(match_field, "country")
    }

    /// Stored `lat`, usually a decimal string.
    pub fn latitude(&self, match_field: &str) -> Option<&'a EventValue> {
        self.table.attribute(match_field, "lat")
    }

    /// Stored `lng`, usually a decimal string.
    pub fn longitude(&self, match_field: &str) -> Option<&'a EventValue> {
        self.table.attribute(match_field, "lng")
    }

    /// Stored `postal_code`. IPInfo stores `""` when it has no postal code;
    /// that comes back as `Some("")`, not `None`.
    pub fn postal_code(&self, match_field: &str) -> Option<&'a EventValue> {
        self.table.attribute(match_field, "postal_code")
    }

    pub fn region(&self, match_field: &str) -> Option<&'a EventValue> {
        self.table.attribute(match_field, "region")
    }

    pub fn region_code(&self, match_field: &str) -> Option<&'a EventValue> {
        self.table.attribute(match_field, "region_code")
    }

    pub fn timezone(&self, match_field: &str) -> Option<&'a EventValue> {
        self.table.attribute(match_field, "timezone")
    }
}

/// ASN view over `ip-info-asn-cidr`.
#[derive(Debug, Clone, Copy)]
pub struct IpInfoAsn<'a> {
    table: EnrichmentTable<'a>,
}

impl<'a> IpInfoAsn<'a> {
    pub fn new(event: &'a Event) -> Self {
        Self::new_with(event, HelperConfig::default_ref())
    }

    pub fn new_with(event: &'a Event, config: &'a HelperConfig) -> Self {
        Self {
            table: EnrichmentTable::locate(event, config, &config.sources.asn),
        }
    }

    /// The view, only if the ASN source was attached to this event.
    pub fn from_event(event: &'a Event) -> Option<Self> {
        Self::from_event_with(event, HelperConfig::default_ref())
    }

    pub fn from_event_with(event: &'a Event, config: &'a HelperConfig) -> Option<Self> {
        let view = Self::new_with(event, config);
        view.table.is_present().then_some(view)
    }

    pub fn is_present(&self) -> bool {
        self.table.is_present()
    }

    /// AS number, e.g. `AS15169`
    pub fn asn(&self, match_field: &str) -> Option<&'a EventValue> {
        self.table.attribute(match_field, "asn")
    }

    pub fn domain(&self, match_field: &str) -> Option<&'a EventValue> {
        self.table.attribute(match_field, "domain")
    }

    /// Name of the organization owning the AS
    pub fn name(&self, match_field: &str) -> Option<&'a EventValue> {
        self.table.attribute(match_field, "name")
    }

    /// Announced route (CIDR)
    pub fn route(&self, match_field: &str) -> Option<&'a EventValue> {
        self.table.attribute(match_field, "route")
    }

    /// Classification such as `isp`, `hosting` or `business`
    pub fn asn_type(&self, match_field: &str) -> Option<&'a EventValue> {
        self.table.attribute(match_field, "type")
    }
}

/// Unified geolocation and ownership record for one matched field.
///
/// Serializes with the fixed keys `ip, city, region, country, loc, org,
/// postal, timezone`; absent values serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoRecord {
    pub ip: Option<EventValue>,
    pub city: Option<EventValue>,
    pub region: Option<EventValue>,
    pub country: Option<EventValue>,
    /// `"<lat>,<lng>"`
    pub loc: Option<String>,
    /// `"<asn> <name>"`
    pub org: Option<String>,
    pub postal: Option<EventValue>,
    pub timezone: Option<EventValue>,
}

impl GeoRecord {
    pub fn to_json_value(&self) -> Value {
        serde_json::json!({
            "ip": self.ip.as_ref().map_or(Value::Null, Value::from),
            "city": self.city.as_ref().map_or(Value::Null, Value::from),
            "region": self.region.as_ref().map_or(Value::Null, Value::from),
            "country": self.country.as_ref().map_or(Value::Null, Value::from),
            "loc": self.loc.clone(),
            "org": self.org.clone(),
            "postal": self.postal.as_ref().map_or(Value::Null, Value::from),
            "timezone": self.timezone.as_ref().map_or(Value::Null, Value::from),
        })
    }
}

/// Compose location and ASN enrichment for `match_field`.
///
/// Fails with [`EnrichmentError::MissingEnrichmentSource`] if either source is
/// not integrated. Attributes missing for this particular field stay `None`.
pub fn geoinfo_from_ip(event: &Event, match_field: &str) -> EnrichmentResult<GeoRecord> {
    geoinfo_from_ip_with(event, match_field, HelperConfig::default_ref())
}

pub fn geoinfo_from_ip_with(
    event: &Event,
    match_field: &str,
    config: &HelperConfig,
) -> EnrichmentResult<GeoRecord> {
    let (location, asn) = match (
        IpInfoLocation::from_event_with(event, config),
        IpInfoAsn::from_event_with(event, config),
    ) {
        (Some(location), Some(asn)) => (location, asn),
        (location, asn) => {
            let mut missing = Vec::new();
            if location.is_none() {
                missing.push(config.sources.location.as_str());
            }
            if asn.is_none() {
                missing.push(config.sources.asn.as_str());
            }
            return Err(EnrichmentError::missing_sources(missing));
        }
    };

    Ok(GeoRecord {
        ip: event.get_field(match_field).cloned(),
        city: location.city(match_field).cloned(),
        region: location.region(match_field).cloned(),
        country: location.country(match_field).cloned(),
        loc: join_present(
            location.latitude(match_field),
            location.longitude(match_field),
            ",",
        ),
        org: join_present(asn.asn(match_field), asn.name(match_field), " "),
        postal: location.postal_code(match_field).cloned(),
        timezone: location.timezone(match_field).cloned(),
    })
}

/// Join two leaves with `separator`; `None` if either is absent or null.
fn join_present(
    first: Option<&EventValue>,
    second: Option<&EventValue>,
    separator: &str,
) -> Option<String> {
    let first = first.filter(|value| !value.is_null())?;
    let second = second.filter(|value| !value.is_null())?;
    Some(format!("{}{}{}", render(first), separator, render(second)))
}

fn render(value: &EventValue) -> String {
    match value {
        EventValue::Text(text) => text.clone(),
        other => Value::from(other).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn location_event() -> Event {
        Event::from_json_value(json!({
            "p_enrichment": {
                "ip-info-location-cidr": {
                    "match_field": {
                        "city": "Constantinople",
                        "country": "Byzantium",
                        "lat": "41.008610",
                        "lng": "28.971111",
                        "postal_code": "",
                        "region": "Asia Minor",
                        "region_code": "123",
                        "timezone": "GMT+03:00"
                    }
                }
            }
        }))
        .expect("Failed to build location event")
    }

    fn asn_event() -> Event {
        Event::from_json_value(json!({
            "p_enrichment": {
                "ip-info-asn-cidr": {
                    "match_field": {
                        "asn": "AS00000",
                        "domain": "byzantineempire.com",
                        "name": "Byzantine Empire",
                        "route": "1.2.3.4/24",
                        "type": "isp"
                    }
                }
            }
        }))
        .expect("Failed to build ASN event")
    }

    fn text(value: Option<&EventValue>) -> Option<&str> {
        value.and_then(EventValue::as_str)
    }

    #[test]
    fn test_location_accessors() {
        let event = location_event();
        let location = IpInfoLocation::from_event(&event).expect("location should be present");

        assert_eq!(text(location.city("match_field")), Some("Constantinople"));
        assert_eq!(text(location.country("match_field")), Some("Byzantium"));
        assert_eq!(text(location.latitude("match_field")), Some("41.008610"));
        assert_eq!(text(location.longitude("match_field")), Some("28.971111"));
        assert_eq!(text(location.postal_code("match_field")), Some(""));
        assert_eq!(text(location.region("match_field")), Some("Asia Minor"));
        assert_eq!(text(location.region_code("match_field")), Some("123"));
        assert_eq!(text(location.timezone("match_field")), Some("GMT+03:00"));
    }

    #[test]
    fn test_asn_accessors() {
        let event = asn_event();
        let asn = IpInfoAsn::from_event(&event).expect("ASN should be present");

        assert_eq!(text(asn.asn("match_field")), Some("AS00000"));
        assert_eq!(text(asn.domain("match_field")), Some("byzantineempire.com"));
        assert_eq!(text(asn.name("match_field")), Some("Byzantine Empire"));
        assert_eq!(text(asn.route("match_field")), Some("1.2.3.4/24"));
        assert_eq!(text(asn.asn_type("match_field")), Some("isp"));
    }

    #[test]
    fn test_unmatched_field_returns_none() {
        let event = location_event();
        let location = IpInfoLocation::from_event(&event).expect("location should be present");
        assert!(location.city("other_field").is_none());
        assert!(location.postal_code("other_field").is_none());
    }

    #[test]
    fn test_factory_distinguishes_missing_source() {
        let event = location_event();
        assert!(IpInfoLocation::from_event(&event).is_some());
        assert!(IpInfoAsn::from_event(&event).is_none());

        // the plain constructor still works and yields None everywhere
        let asn = IpInfoAsn::new(&event);
        assert!(!asn.is_present());
        assert!(asn.asn("match_field").is_none());
        assert!(asn.name("match_field").is_none());
    }

    #[test]
    fn test_leaf_values_are_not_coerced() {
        let event = Event::from_json_value(json!({
            "p_enrichment": {
                "ip-info-location-cidr": {"src": {"lat": 41.0, "lng": -28.5}}
            }
        }))
        .unwrap();
        let location = IpInfoLocation::new(&event);
        assert_eq!(location.latitude("src"), Some(&EventValue::from(json!(41.0))));
        assert_eq!(location.longitude("src"), Some(&EventValue::from(json!(-28.5))));
    }

    #[test]
    fn test_join_present() {
        let lat = EventValue::from("41.0");
        let lng = EventValue::from(json!(28.5));
        assert_eq!(join_present(Some(&lat), Some(&lng), ","), Some("41.0,28.5".to_string()));
        assert_eq!(join_present(Some(&lat), None, ","), None);
        assert_eq!(join_present(None, Some(&lng), ","), None);
        assert_eq!(join_present(Some(&EventValue::Null), Some(&lng), ","), None);
        assert_eq!(join_present(Some(&lat), Some(&EventValue::Null), ","), None);
    }

    #[test]
    fn test_geoinfo_null_components_are_absent() {
        let event = Event::from_json_value(json!({
            "match_field": "1.2.3.4",
            "p_enrichment": {
                "ip-info-location-cidr": {"match_field": {"lat": null, "lng": "28.9"}},
                "ip-info-asn-cidr": {"match_field": {"asn": "AS1", "name": null}}
            }
        }))
        .unwrap();

        let record = geoinfo_from_ip(&event, "match_field").expect("both sources are present");
        assert!(record.loc.is_none());
        assert!(record.org.is_none());
    }

    #[test]
    fn test_geoinfo_empty_source_is_missing() {
        let event = Event::from_json_value(json!({
            "match_field": "1.2.3.4",
            "p_enrichment": {
                "ip-info-location-cidr": {"match_field": {"city": "X"}},
                "ip-info-asn-cidr": {}
            }
        }))
        .unwrap();

        assert!(IpInfoAsn::from_event(&event).is_none());
        match geoinfo_from_ip(&event, "match_field") {
            Err(EnrichmentError::MissingEnrichmentSource { missing, .. }) => {
                assert_eq!(missing, vec!["ip-info-asn-cidr"]);
            }
            other => panic!("expected missing source error, got {:?}", other),
        }
    }

    #[test]
    fn test_geoinfo_missing_both_sources() {
        let event = Event::from_json_value(json!({"match_field": "1.2.3.4"})).unwrap();
        match geoinfo_from_ip(&event, "match_field") {
            Err(EnrichmentError::MissingEnrichmentSource { missing, .. }) => {
                assert_eq!(missing, vec!["ip-info-location-cidr", "ip-info-asn-cidr"]);
            }
            other => panic!("expected missing source error, got {:?}", other),
        }
    }
}
