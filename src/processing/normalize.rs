//! Range normalisation.
//!
//! Turns raw tokens into validated [`Range`] values. A bad token is logged,
//! recorded and skipped; it never affects the rest of the batch.

use crate::models::{addr_to_u128, host_mask, AddressFamily, ParsedToken, Range, RawToken, TokenError};
use colored::Colorize;

/// Knobs for reading tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Reject CIDR tokens with host bits set (`10.0.0.1/24`) instead of
    /// masking them down to their network.
    pub strict_cidr: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        NormalizeOptions { strict_cidr: true }
    }
}

/// Valid ranges split by family, plus every rejection seen.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub v4: Vec<Range>,
    pub v6: Vec<Range>,
    pub rejected: Vec<TokenError>,
}

impl Normalized {
    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }

    /// Ranges of one family.
    pub fn ranges(&self, family: AddressFamily) -> &[Range] {
        match family {
            AddressFamily::Ipv4 => &self.v4,
            AddressFamily::Ipv6 => &self.v6,
        }
    }

    fn push(&mut self, range: Range) {
        match range.family() {
            AddressFamily::Ipv4 => self.v4.push(range),
            AddressFamily::Ipv6 => self.v6.push(range),
        }
    }

    fn reject(&mut self, token: &RawToken, err: TokenError) {
        log::warn!(
            "Skipping invalid IP address or CIDR: {}. Error: {err}",
            token.display().on_red()
        );
        self.rejected.push(err);
    }
}

/// Normalise one token into a range of whatever family it carries.
///
/// # Arguments
/// * `token` - Address, CIDR block (prefix length or IPv4 netmask) or range
/// * `options` - How strictly CIDR tokens are read
///
/// # Returns
/// The inclusive range, or the reason the token was rejected
pub fn normalize_token(token: &RawToken, options: &NormalizeOptions) -> Result<Range, TokenError> {
    let (text, parsed) = match token {
        RawToken::Text(text) => (text.clone(), ParsedToken::parse(text)?),
        RawToken::Pair(start, end) => (token.display(), ParsedToken::parse_pair(start, end)?),
    };

    match parsed {
        ParsedToken::Single(addr) => {
            let family = AddressFamily::of(&addr);
            Range::single(family, addr_to_u128(&addr))
                .ok_or_else(|| TokenError::invalid(&text, "address outside family"))
        }
        ParsedToken::Cidr(addr, prefix_len) => {
            let family = AddressFamily::of(&addr);
            if prefix_len > family.bits() {
                return Err(TokenError::invalid(
                    &text,
                    format!("prefix length /{prefix_len} exceeds {} bits", family.bits()),
                ));
            }
            let mask = host_mask(family, prefix_len);
            let value = addr_to_u128(&addr);
            if options.strict_cidr && value & mask != 0 {
                return Err(TokenError::invalid(&text, "host bits set"));
            }
            let start = value & !mask;
            Range::new(family, start, start | mask)
                .ok_or_else(|| TokenError::invalid(&text, "block outside family"))
        }
        ParsedToken::Span(start, end) => {
            let family = AddressFamily::of(&start);
            let end_family = AddressFamily::of(&end);
            if family != end_family {
                return Err(TokenError::FamilyMismatch {
                    token: text,
                    expected: family,
                    found: end_family,
                });
            }
            Range::new(family, addr_to_u128(&start), addr_to_u128(&end))
                .ok_or_else(|| TokenError::invalid(&text, "start is after end"))
        }
    }
}

/// Normalise a mixed batch, splitting the ranges by family.
///
/// # Arguments
/// * `tokens` - Tokens of either family
/// * `options` - How strictly CIDR tokens are read
///
/// # Returns
/// Valid ranges per family, in input order, and every rejection
pub fn normalize<I, T>(tokens: I, options: &NormalizeOptions) -> Normalized
where
    I: IntoIterator<Item = T>,
    T: Into<RawToken>,
{
    let mut normalized = Normalized::default();
    for token in tokens.into_iter().map(Into::into) {
        match normalize_token(&token, options) {
            Ok(range) => normalized.push(range),
            Err(err) => normalized.reject(&token, err),
        }
    }
    log::debug!(
        "normalize() v4={} v6={} rejected={}",
        normalized.v4.len(),
        normalized.v6.len(),
        normalized.rejected_count()
    );
    normalized
}

/// Normalise a batch declared to hold only `family`; anything else is a
/// family mismatch.
///
/// # Arguments
/// * `tokens` - Tokens expected to carry `family`
/// * `family` - The batch's declared family
/// * `options` - How strictly CIDR tokens are read
///
/// # Returns
/// Valid ranges of `family` and every rejection, mismatches included
pub fn normalize_family<I, T>(tokens: I, family: AddressFamily, options: &NormalizeOptions) -> Normalized
where
    I: IntoIterator<Item = T>,
    T: Into<RawToken>,
{
    let mut normalized = Normalized::default();
    for token in tokens.into_iter().map(Into::into) {
        match normalize_token(&token, options) {
            Ok(range) if range.family() == family => normalized.push(range),
            Ok(range) => {
                let err = TokenError::FamilyMismatch {
                    token: token.display(),
                    expected: family,
                    found: range.family(),
                };
                normalized.reject(&token, err);
            }
            Err(err) => normalized.reject(&token, err),
        }
    }
    normalized
}
