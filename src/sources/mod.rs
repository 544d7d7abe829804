//! Upstream feeds.
//!
//! This module handles all network-facing collaborators:
//! - [`spamhaus`] - DROP v4/v6 and ASN-DROP lists
//! - [`ripestat`] - announced prefixes per ASN

pub mod ripestat;
pub mod spamhaus;

// Re-export public types and functions
pub use ripestat::fetch_asn_prefixes;
pub use spamhaus::{fetch_drop_list, parse_drop_list, DropEntry};
