//! Runtime configuration.
//!
//! Values come from the environment (optionally seeded from `.env` by
//! `dotenv` in `main`). Every key is optional.

use chrono_tz::Tz;
use std::error::Error;

pub const SPAMHAUS_DROP_V4_URL: &str = "https://www.spamhaus.org/drop/drop_v4.json";
pub const SPAMHAUS_DROP_V6_URL: &str = "https://www.spamhaus.org/drop/drop_v6.json";
pub const SPAMHAUS_ASNDROP_URL: &str = "https://www.spamhaus.org/drop/asndrop.json";
pub const RIPESTAT_URL: &str =
    "https://stat.ripe.net/data/announced-prefixes/data.json?resource=AS{asn}";
pub const OUTPUT_FILE: &str = "spamhaus_ripe.json";
pub const RIPESTAT_CONCURRENCY: usize = 4;
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Settings for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub drop_v4_url: String,
    pub drop_v6_url: String,
    pub asndrop_url: String,
    /// Contains an `{asn}` placeholder.
    pub ripestat_url: String,
    pub output_file: String,
    pub ripestat_concurrency: usize,
    pub http_timeout_secs: u64,
    pub strict_cidr: bool,
    /// Zone for the report timestamp; local time when unset.
    pub output_tz: Option<Tz>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            drop_v4_url: SPAMHAUS_DROP_V4_URL.to_string(),
            drop_v6_url: SPAMHAUS_DROP_V6_URL.to_string(),
            asndrop_url: SPAMHAUS_ASNDROP_URL.to_string(),
            ripestat_url: RIPESTAT_URL.to_string(),
            output_file: OUTPUT_FILE.to_string(),
            ripestat_concurrency: RIPESTAT_CONCURRENCY,
            http_timeout_secs: HTTP_TIMEOUT_SECS,
            strict_cidr: true,
            output_tz: None,
        }
    }
}

impl Config {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> Result<Config, Box<dyn Error>> {
        Config::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Config, Box<dyn Error>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(v) = get("SPAMHAUS_DROP_V4_URL") {
            config.drop_v4_url = v;
        }
        if let Some(v) = get("SPAMHAUS_DROP_V6_URL") {
            config.drop_v6_url = v;
        }
        if let Some(v) = get("SPAMHAUS_ASNDROP_URL") {
            config.asndrop_url = v;
        }
        if let Some(v) = get("RIPESTAT_URL") {
            if !v.contains("{asn}") {
                return Err(format!("RIPESTAT_URL must contain an {{asn}} placeholder: {v}").into());
            }
            config.ripestat_url = v;
        }
        if let Some(v) = get("OUTPUT_FILE") {
            config.output_file = v;
        }
        if let Some(v) = get("RIPESTAT_CONCURRENCY") {
            let n: usize = v
                .parse()
                .map_err(|e| format!("Invalid RIPESTAT_CONCURRENCY '{v}': {e}"))?;
            if n == 0 {
                return Err("RIPESTAT_CONCURRENCY must be at least 1".into());
            }
            config.ripestat_concurrency = n;
        }
        if let Some(v) = get("HTTP_TIMEOUT_SECS") {
            config.http_timeout_secs = v
                .parse()
                .map_err(|e| format!("Invalid HTTP_TIMEOUT_SECS '{v}': {e}"))?;
        }
        if let Some(v) = get("STRICT_CIDR") {
            config.strict_cidr = parse_bool(&v).ok_or_else(|| format!("Invalid STRICT_CIDR '{v}'"))?;
        }
        if let Some(v) = get("OUTPUT_TZ") {
            let tz: Tz = v
                .parse()
                .map_err(|e| format!("Invalid OUTPUT_TZ '{v}': {e}"))?;
            config.output_tz = Some(tz);
        }

        log::debug!("Config: {config:?}");
        Ok(config)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
