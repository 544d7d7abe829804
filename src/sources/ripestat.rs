//! RIPEstat announced-prefixes lookups.
//!
//! Expands each ASN into the prefixes it currently announces.

use futures::stream::{self, StreamExt};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::error::Error;

#[derive(Deserialize, Debug, Default)]
struct AnnouncedPrefixes {
    #[serde(default)]
    data: Option<PrefixData>,
}

#[derive(Deserialize, Debug, Default)]
struct PrefixData {
    #[serde(default)]
    prefixes: Vec<Prefix>,
}

#[derive(Deserialize, Debug)]
struct Prefix {
    prefix: String,
}

/// Fill the `{asn}` placeholder of a URL template.
pub fn asn_url(template: &str, asn: u32) -> String {
    template.replace("{asn}", &asn.to_string())
}

/// Prefixes listed in an announced-prefixes response body.
pub fn parse_announced_prefixes(body: &str) -> Result<Vec<String>, Box<dyn Error>> {
    let deserializer = &mut serde_json::Deserializer::from_str(body);
    let response: AnnouncedPrefixes = serde_path_to_error::deserialize(deserializer)
        .map_err(|e| format!("Error parsing RIPEstat JSON at '{}': {e}", e.path()))?;
    Ok(response
        .data
        .map(|d| d.prefixes.into_iter().map(|p| p.prefix).collect())
        .unwrap_or_default())
}

/// Prefixes announced by one ASN.
pub async fn fetch_announced_prefixes(
    client: &reqwest::Client,
    template: &str,
    asn: u32,
) -> Result<Vec<String>, Box<dyn Error>> {
    let url = asn_url(template, asn);
    log::debug!("fetch_announced_prefixes(AS{asn}) {url}");
    let body = client
        .get(&url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| format!("Failed to retrieve IP ranges for ASN {asn}: {e}"))?
        .text()
        .await
        .map_err(|e| format!("Failed to read IP ranges for ASN {asn}: {e}"))?;
    parse_announced_prefixes(&body)
}

/// Unique prefixes announced by all `asns`, fetched `concurrency` at a time.
///
/// A failed ASN is logged and contributes nothing.
pub async fn fetch_asn_prefixes(
    client: &reqwest::Client,
    template: &str,
    asns: &[u32],
    concurrency: usize,
) -> BTreeSet<String> {
    let results: Vec<(u32, Result<Vec<String>, Box<dyn Error>>)> = stream::iter(asns.iter().copied())
        .map(|asn| async move { (asn, fetch_announced_prefixes(client, template, asn).await) })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;
    collect_prefixes(results)
}

/// Merge per-ASN lookups into one sorted, de-duplicated set.
///
/// # Arguments
/// * `results` - Each ASN with its lookup result, in any order
///
/// # Returns
/// The union of all successful lookups. Failures are logged and skipped.
pub fn collect_prefixes<I>(results: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = (u32, Result<Vec<String>, Box<dyn Error>>)>,
{
    let mut prefixes = BTreeSet::new();
    for (asn, result) in results {
        match result {
            Ok(list) => {
                log::trace!("AS{asn}: {} prefixes", list.len());
                prefixes.extend(list);
            }
            Err(e) => log::warn!("{e}"),
        }
    }
    prefixes
}
