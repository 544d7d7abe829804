//! Spamhaus DROP / ASN-DROP feeds.
//!
//! Each feed is JSON lines: one object per line carrying either a `cidr` or
//! an `asn`, followed by a metadata line that carries neither.

use serde::Deserialize;
use std::error::Error;

/// One useful line of a DROP feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropEntry {
    Cidr(String),
    Asn(u32),
}

#[derive(Deserialize, Debug)]
struct DropRecord {
    cidr: Option<String>,
    asn: Option<u32>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

/// Parse a JSON-lines feed body. Broken lines are logged and skipped.
pub fn parse_drop_list(body: &str) -> Vec<DropEntry> {
    let mut entries = Vec::new();

    for (i, line) in body.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let deserializer = &mut serde_json::Deserializer::from_str(line);
        let record: DropRecord = match serde_path_to_error::deserialize(deserializer) {
            Ok(record) => record,
            Err(e) => {
                log::warn!("Skipping line {} of DROP feed at '{}': {}", i + 1, e.path(), e);
                continue;
            }
        };
        match record {
            DropRecord { asn: Some(asn), .. } => entries.push(DropEntry::Asn(asn)),
            DropRecord { cidr: Some(cidr), .. } => entries.push(DropEntry::Cidr(cidr)),
            DropRecord { kind, .. } => {
                log::trace!("Ignoring line {} of DROP feed (type={:?})", i + 1, kind);
            }
        }
    }

    entries
}

/// CIDR strings of a parsed feed.
pub fn cidrs(entries: &[DropEntry]) -> Vec<String> {
    entries
        .iter()
        .filter_map(|e| match e {
            DropEntry::Cidr(cidr) => Some(cidr.clone()),
            DropEntry::Asn(_) => None,
        })
        .collect()
}

/// ASNs of a parsed feed.
pub fn asns(entries: &[DropEntry]) -> Vec<u32> {
    entries
        .iter()
        .filter_map(|e| match e {
            DropEntry::Asn(asn) => Some(*asn),
            DropEntry::Cidr(_) => None,
        })
        .collect()
}

/// Download and parse one DROP feed.
pub async fn fetch_drop_list(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<DropEntry>, Box<dyn Error>> {
    log::debug!("fetch_drop_list({url})");
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| format!("Failed to retrieve list from {url}: {e}"))?
        .error_for_status()
        .map_err(|e| format!("Failed to retrieve list from {url}: {e}"))?;
    let body = response
        .text()
        .await
        .map_err(|e| format!("Failed to read list from {url}: {e}"))?;
    Ok(parse_drop_list(&body))
}
