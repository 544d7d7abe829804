//! JSON report consumed by the firewall alias tooling.

use crate::models::CidrBlock;
use crate::processing::Consolidated;
use crate::SourceLists;
use chrono::SecondsFormat;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::error::Error;

pub const REPORT_COMMENT: &str =
    "Converted the Spamhaus DROP lists into a consolidated list of IP ranges using the RIPEstat API.";

/// One run's artifact. Field order and key names are part of the format.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub comment: String,
    pub timestamp: String,
    #[serde(rename = "ASN-DROP")]
    pub asn_drop: String,
    #[serde(rename = "DROP v4")]
    pub drop_v4: String,
    #[serde(rename = "DROP v6")]
    pub drop_v6: String,
    #[serde(rename = "consolidated v4")]
    pub consolidated_v4: String,
    #[serde(rename = "consolidated v6")]
    pub consolidated_v6: String,
    pub v4: Vec<CidrBlock>,
    pub v6: Vec<CidrBlock>,
}

impl Report {
    pub fn new(sources: &SourceLists, consolidated: &Consolidated, timestamp: String) -> Report {
        Report {
            comment: REPORT_COMMENT.to_string(),
            timestamp,
            asn_drop: format!(
                "{} entries, converted to {} unique IP ranges",
                sources.asn_drop.len(),
                sources.asn_prefixes.len()
            ),
            drop_v4: format!("{} entries", sources.drop_v4.len()),
            drop_v6: format!("{} entries", sources.drop_v6.len()),
            consolidated_v4: format!("{} IPv4 ranges", consolidated.v4.len()),
            consolidated_v6: format!("{} IPv6 ranges", consolidated.v6.len()),
            v4: consolidated.v4.clone(),
            v6: consolidated.v6.clone(),
        }
    }
}

/// Current time as ISO-8601 with seconds precision and UTC offset.
///
/// Uses local time unless a zone is given.
pub fn timestamp(tz: Option<Tz>) -> String {
    match tz {
        Some(tz) => chrono::Utc::now()
            .with_timezone(&tz)
            .fixed_offset()
            .to_rfc3339_opts(SecondsFormat::Secs, false),
        None => chrono::Local::now().to_rfc3339_opts(SecondsFormat::Secs, false),
    }
}

/// Report file contents: a one-element JSON array, 2-space indented.
pub fn render_report(report: &Report) -> Result<String, Box<dyn Error>> {
    serde_json::to_string_pretty(&[report]).map_err(|e| format!("Error serializing report: {e}").into())
}

/// Write the report to `path`, replacing any previous file.
pub fn write_report(path: &str, report: &Report) -> Result<(), Box<dyn Error>> {
    let json = render_report(report)?;
    std::fs::write(path, json).map_err(|e| format!("Error writing report file {path}: {e}"))?;
    log::info!("Wrote report to {path}");
    Ok(())
}

/// Read a report file written by [`write_report`].
pub fn read_report(path: &str) -> Result<Report, Box<dyn Error>> {
    let json = std::fs::read_to_string(path).map_err(|e| format!("Error reading report file {path}: {e}"))?;
    let mut reports: Vec<Report> =
        serde_json::from_str(&json).map_err(|e| format!("Error parsing report JSON: {e}"))?;
    if reports.len() != 1 {
        return Err(format!("Expected exactly one report in {path}, found {}", reports.len()).into());
    }
    Ok(reports.remove(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::{consolidate_mixed, NormalizeOptions};

    fn sample() -> (SourceLists, Consolidated) {
        let sources = SourceLists {
            drop_v4: vec!["10.0.0.0/24".to_string(), "10.0.1.0/24".to_string()],
            drop_v6: vec!["2001:db8::/32".to_string()],
            asn_drop: vec![64496],
            asn_prefixes: vec!["192.0.2.0/24".to_string()],
        };
        let consolidated = consolidate_mixed(sources.tokens(), &NormalizeOptions::default());
        (sources, consolidated)
    }

    #[test]
    fn test_report_fields() {
        let (sources, consolidated) = sample();
        let report = Report::new(&sources, &consolidated, "2026-01-01T00:00:00+00:00".to_string());
        assert_eq!(report.asn_drop, "1 entries, converted to 1 unique IP ranges");
        assert_eq!(report.drop_v4, "2 entries");
        assert_eq!(report.drop_v6, "1 entries");
        assert_eq!(report.consolidated_v4, "2 IPv4 ranges");
        assert_eq!(report.consolidated_v6, "1 IPv6 ranges");
    }

    #[test]
    fn test_render_key_order() {
        let (sources, consolidated) = sample();
        let report = Report::new(&sources, &consolidated, "2026-01-01T00:00:00+00:00".to_string());
        let json = render_report(&report).unwrap();
        assert!(json.starts_with("[\n  {\n    \"comment\""));
        let keys = [
            "\"comment\"",
            "\"timestamp\"",
            "\"ASN-DROP\"",
            "\"DROP v4\"",
            "\"DROP v6\"",
            "\"consolidated v4\"",
            "\"consolidated v6\"",
            "\"v4\"",
            "\"v6\"",
        ];
        let positions: Vec<usize> = keys.iter().map(|k| json.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{json}");
        assert!(json.contains("\"10.0.0.0/23\""));
        assert!(json.contains("\"192.0.2.0/24\""));
    }

    #[test]
    fn test_write_and_read_back() {
        let (sources, consolidated) = sample();
        let report = Report::new(&sources, &consolidated, timestamp(None));
        let path = std::env::temp_dir().join(format!("drop_report_{}.json", std::process::id()));
        let path = path.to_str().unwrap();
        write_report(path, &report).unwrap();
        assert_eq!(read_report(path).unwrap(), report);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_timestamp_format() {
        let ts = timestamp(Some(chrono_tz::UTC));
        assert!(ts.ends_with("+00:00"), "{ts}");
        assert_eq!(ts.len(), "2026-01-01T00:00:00+00:00".len());
        assert!(chrono::DateTime::parse_from_rfc3339(&timestamp(None)).is_ok());
    }
}
