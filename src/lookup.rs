//! ipinfo-style lookup: `GET <endpoint>/<ip>/json`, or `<endpoint>/json`
//! for the caller's own address. No retries; failures go to the caller.

use std::fs;
use std::io::Read;
use std::net::IpAddr;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::location::LocationRecord;

pub const DEFAULT_ENDPOINT: &str = "http://ipinfo.io";

/// Lookup bodies are a few hundred bytes; anything past this is not ipinfo
const MAX_BODY_BYTES: u64 = 1 << 20;

/// Request URL for `ip`, or for the caller's own address when `None`
pub fn lookup_url(endpoint: &str, ip: Option<IpAddr>) -> String {
    let endpoint = endpoint.trim_end_matches('/');
    match ip {
        Some(ip) => format!("{endpoint}/{ip}/json"),
        None => format!("{endpoint}/json"),
    }
}

/// Resolve `ip` over HTTP
pub fn fetch(endpoint: &str, ip: Option<IpAddr>, timeout: Duration) -> Result<LocationRecord> {
    let url = lookup_url(endpoint, ip);
    info!(%url, "looking up location");

    let agent = ureq::AgentBuilder::new().timeout(timeout).build();
    let response = agent
        .get(&url)
        .set("Accept", "application/json")
        .call()
        .with_context(|| format!("request to {url} failed"))?;

    let mut body = Vec::new();
    response
        .into_reader()
        .take(MAX_BODY_BYTES)
        .read_to_end(&mut body)
        .with_context(|| format!("failed to read response from {url}"))?;
    debug!(bytes = body.len(), "lookup response received");

    decode(&mut body).with_context(|| format!("unexpected response from {url}"))
}

/// Read a saved lookup body from disk
pub fn from_file(path: &Path) -> Result<LocationRecord> {
    let mut body = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    info!(path = %path.display(), "loaded location record from file");
    decode(&mut body).with_context(|| format!("unexpected content in {}", path.display()))
}

fn decode(body: &mut [u8]) -> Result<LocationRecord> {
    let record = LocationRecord::from_json(body)?;
    if record.is_empty() {
        warn!("lookup returned an empty record");
    }
    debug!(fields = record.len(), "decoded location record");
    Ok(record)
}
