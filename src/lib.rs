//! Consolidate the Spamhaus DROP lists into minimal per-family CIDR sets.
//!
//! The core ([`processing`]) is pure: tokens in, blocks out. Fetching the
//! feeds ([`sources`]) and writing the artifact ([`output`]) happen around it.

pub mod config;
pub mod models;
pub mod output;
pub mod processing;
pub mod sources;

use config::Config;
use output::Report;
use processing::{consolidate_mixed, Consolidated, NormalizeOptions};
use std::error::Error;
use std::time::Duration;

pub use models::{AddressFamily, CidrBlock, Range, RawToken, TokenError};
pub use processing::{consolidate, ConsolidationResult};

/// Everything fetched from upstream for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceLists {
    pub drop_v4: Vec<String>,
    pub drop_v6: Vec<String>,
    pub asn_drop: Vec<u32>,
    /// Unique prefixes announced by the ASN-DROP ASNs.
    pub asn_prefixes: Vec<String>,
}

impl SourceLists {
    /// All range tokens: ASN prefixes first, then DROP v4 and v6.
    pub fn tokens(&self) -> impl Iterator<Item = &String> {
        self.asn_prefixes
            .iter()
            .chain(self.drop_v4.iter())
            .chain(self.drop_v6.iter())
    }
}

pub fn http_client(config: &Config) -> Result<reqwest::Client, Box<dyn Error>> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .build()
        .map_err(|e| format!("Error building HTTP client: {e}"))?;
    Ok(client)
}

/// Download every feed. A feed that fails is logged and counts as empty.
pub async fn fetch_sources(client: &reqwest::Client, config: &Config) -> SourceLists {
    let drop4 = fetch_or_empty(client, &config.drop_v4_url).await;
    let drop6 = fetch_or_empty(client, &config.drop_v6_url).await;
    let asn_drop = fetch_or_empty(client, &config.asndrop_url).await;

    let mut lists = SourceLists {
        drop_v4: sources::spamhaus::cidrs(&drop4),
        drop_v6: sources::spamhaus::cidrs(&drop6),
        asn_drop: sources::spamhaus::asns(&asn_drop),
        asn_prefixes: vec![],
    };
    log::info!("Spamhaus DROP v4: {} entries", lists.drop_v4.len());
    log::info!("Spamhaus DROP v6: {} entries", lists.drop_v6.len());
    log::info!("Spamhaus ASN-DROP: {} entries", lists.asn_drop.len());

    lists.asn_prefixes = sources::fetch_asn_prefixes(
        client,
        &config.ripestat_url,
        &lists.asn_drop,
        config.ripestat_concurrency,
    )
    .await
    .into_iter()
    .collect();
    log::info!("Fetched {} unique IP ranges", lists.asn_prefixes.len());

    lists
}

async fn fetch_or_empty(client: &reqwest::Client, url: &str) -> Vec<sources::DropEntry> {
    match sources::fetch_drop_list(client, url).await {
        Ok(entries) => entries,
        Err(e) => {
            log::error!("{e}");
            vec![]
        }
    }
}

/// Consolidate fetched sources under the run's options.
pub fn consolidate_sources(sources: &SourceLists, config: &Config) -> Consolidated {
    let options = NormalizeOptions {
        strict_cidr: config.strict_cidr,
    };
    consolidate_mixed(sources.tokens(), &options)
}

/// Fetch, consolidate and write one report.
pub async fn run(config: &Config) -> Result<(Report, Consolidated), Box<dyn Error>> {
    let client = http_client(config)?;
    let lists = fetch_sources(&client, config).await;
    let consolidated = consolidate_sources(&lists, config);
    let report = Report::new(&lists, &consolidated, output::timestamp(config.output_tz));
    output::write_report(&config.output_file, &report)?;
    Ok((report, consolidated))
}
