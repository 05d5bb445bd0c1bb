//! Event enrichment inspector
//!
//! Reads one event as JSON (file or stdin) and prints what detection rules
//! would see for it: the geo record and Tor context for a matched field, and
//! the normalized detail payload.

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::{json, Map, Value};
use std::io::Read;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use siem_enrichment::{
    geoinfo_from_ip_with, normalize_payload, Event, HelperConfig, TorExitNodes,
};

#[derive(Debug, Parser)]
#[command(name = "event_inspect", version, about = "Show normalized enrichment for one event")]
struct Args {
    /// Path to the event JSON; reads stdin when omitted
    #[arg(short, long, value_name = "PATH")]
    event: Option<PathBuf>,

    /// Matched field to compose geo and Tor context for
    #[arg(short = 'f', long, value_name = "FIELD")]
    match_field: Option<String>,

    /// Detail field to normalize
    #[arg(short, long, value_name = "FIELD", default_value = "additional_details")]
    details_field: String,

    /// Helper configuration (YAML); defaults plus environment overrides otherwise
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Skip geo composition instead of failing when a source is not integrated
    #[arg(long)]
    allow_missing_geo: bool,

    /// Pretty-print the output
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => HelperConfig::from_file(path)
            .with_context(|| format!("Failed to load helper config {}", path.display()))?,
        None => HelperConfig::from_env().context("Invalid helper config in environment")?,
    };
    debug!(?config, "Loaded helper config");

    let raw = read_event(args.event.as_ref())?;
    let event = Event::from_json(&raw).context("Event is not a JSON object")?;
    info!(fields = event.fields().len(), "Inspecting event");

    let report = inspect(&event, &args, &config)?;
    let output = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{}", output);
    Ok(())
}

fn read_event(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read event file {}", path.display())),
        None => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("Failed to read event from stdin")?;
            Ok(raw)
        }
    }
}

fn inspect(event: &Event, args: &Args, config: &HelperConfig) -> Result<Value> {
    let mut report = Map::new();

    if let Some(field) = &args.match_field {
        let geo = match geoinfo_from_ip_with(event, field, config) {
            Ok(record) => record.to_json_value(),
            Err(e) if args.allow_missing_geo && e.is_configuration() => {
                info!(error = %e, "Skipping geo composition");
                Value::Null
            }
            Err(e) => return Err(e).context("Geo composition failed"),
        };
        report.insert("geo".to_string(), geo);

        let tor = TorExitNodes::new_with(event, config);
        report.insert(
            "tor".to_string(),
            json!({
                "has_exit_nodes": tor.has_exit_nodes(),
                "context": tor.context(field).map(|context| context.to_json_value()),
            }),
        );
    }

    report.insert(
        "details".to_string(),
        normalize_payload(event, &args.details_field).to_json_value(),
    );

    Ok(Value::Object(report))
}
