//! Consolidation entry points.
//!
//! Each call is independent: tokens in, blocks out, no state kept between
//! calls.

use super::decompose::decompose_range;
use super::merge::merge_ranges;
use super::normalize::{normalize, normalize_family, NormalizeOptions};
use crate::models::{AddressFamily, CidrBlock, Range, RawToken};
use serde::Serialize;

/// Consolidated blocks of one family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsolidationResult {
    pub family: AddressFamily,
    /// Ascending by base address.
    pub blocks: Vec<CidrBlock>,
    pub rejected_count: usize,
}

impl ConsolidationResult {
    /// Blocks in `base/prefixLength` form.
    pub fn to_strings(&self) -> Vec<String> {
        self.blocks.iter().map(|b| b.to_string()).collect()
    }
}

/// Consolidated blocks of both families from one mixed batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Consolidated {
    pub v4: Vec<CidrBlock>,
    pub v6: Vec<CidrBlock>,
    #[serde(skip)]
    pub rejected_count: usize,
}

impl Consolidated {
    pub fn blocks(&self, family: AddressFamily) -> &[CidrBlock] {
        match family {
            AddressFamily::Ipv4 => &self.v4,
            AddressFamily::Ipv6 => &self.v6,
        }
    }
}

/// Consolidate `raw_inputs` declared as `family`, using default options.
///
/// # Arguments
/// * `raw_inputs` - Addresses, CIDR blocks or ranges as text or pairs
/// * `family` - The family every token is expected to carry
///
/// # Returns
/// The minimal sorted block set and the number of rejected tokens
pub fn consolidate<I, T>(raw_inputs: I, family: AddressFamily) -> ConsolidationResult
where
    I: IntoIterator<Item = T>,
    T: Into<RawToken>,
{
    consolidate_with(raw_inputs, family, &NormalizeOptions::default())
}

/// Consolidate `raw_inputs` declared as `family`.
///
/// Tokens of the other family are rejected as family mismatches.
///
/// # Arguments
/// * `raw_inputs` - Addresses, CIDR blocks or ranges as text or pairs
/// * `family` - The family every token is expected to carry
/// * `options` - How strictly CIDR tokens are read
///
/// # Returns
/// The minimal sorted block set and the number of rejected tokens
pub fn consolidate_with<I, T>(
    raw_inputs: I,
    family: AddressFamily,
    options: &NormalizeOptions,
) -> ConsolidationResult
where
    I: IntoIterator<Item = T>,
    T: Into<RawToken>,
{
    let normalized = normalize_family(raw_inputs, family, options);
    let rejected_count = normalized.rejected_count();
    let ranges = match family {
        AddressFamily::Ipv4 => normalized.v4,
        AddressFamily::Ipv6 => normalized.v6,
    };
    ConsolidationResult {
        family,
        blocks: consolidate_ranges(ranges),
        rejected_count,
    }
}

/// Consolidate a batch holding both families; each token is filed under its
/// own family and rejected tokens are counted once.
///
/// # Arguments
/// * `raw_inputs` - Tokens of either family, in any order
/// * `options` - How strictly CIDR tokens are read
///
/// # Returns
/// Separate IPv4 and IPv6 block sets plus the total rejection count
pub fn consolidate_mixed<I, T>(raw_inputs: I, options: &NormalizeOptions) -> Consolidated
where
    I: IntoIterator<Item = T>,
    T: Into<RawToken>,
{
    let normalized = normalize(raw_inputs, options);
    let rejected_count = normalized.rejected_count();
    let consolidated = Consolidated {
        v4: consolidate_ranges(normalized.v4),
        v6: consolidate_ranges(normalized.v6),
        rejected_count,
    };
    log::info!(
        "Consolidated to {} IPv4 ranges and {} IPv6 ranges ({} rejected)",
        consolidated.v4.len(),
        consolidated.v6.len(),
        rejected_count
    );
    consolidated
}

/// Minimal block cover of already-validated ranges.
///
/// Output is sorted by (family, base); families never merge with each other.
///
/// # Arguments
/// * `ranges` - Validated ranges, possibly overlapping or adjacent
///
/// # Returns
/// The fewest aligned blocks covering exactly the union of `ranges`
pub fn consolidate_ranges<I>(ranges: I) -> Vec<CidrBlock>
where
    I: IntoIterator<Item = Range>,
{
    merge_ranges(ranges)
        .iter()
        .flat_map(decompose_range)
        .collect()
}
