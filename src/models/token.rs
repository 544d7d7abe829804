//! Raw input tokens and the errors raised while reading them.

use super::AddressFamily;
use std::net::{IpAddr, Ipv4Addr};
use thiserror::Error;

/// An input item as handed over by a feed collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawToken {
    /// Free-form text: `10.0.0.1`, `10.0.0.0/8`, `10.0.0.1-10.0.0.9`.
    Text(String),
    /// Explicit start and end address.
    Pair(String, String),
}

impl RawToken {
    /// Token rendered for log lines and error messages.
    pub fn display(&self) -> String {
        match self {
            RawToken::Text(text) => text.clone(),
            RawToken::Pair(start, end) => format!("{start}-{end}"),
        }
    }
}

impl From<&str> for RawToken {
    fn from(text: &str) -> Self {
        RawToken::Text(text.to_string())
    }
}

impl From<String> for RawToken {
    fn from(text: String) -> Self {
        RawToken::Text(text)
    }
}

impl From<&String> for RawToken {
    fn from(text: &String) -> Self {
        RawToken::Text(text.clone())
    }
}

impl From<(&str, &str)> for RawToken {
    fn from((start, end): (&str, &str)) -> Self {
        RawToken::Pair(start.to_string(), end.to_string())
    }
}

/// Why a token was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Not an address, CIDR block or range in any recognised form.
    #[error("malformed token '{token}': {reason}")]
    MalformedToken { token: String, reason: String },

    /// Well-formed but semantically impossible.
    #[error("invalid range '{token}': {reason}")]
    InvalidRange { token: String, reason: String },

    /// The token's family disagrees with the batch or its other half.
    #[error("family mismatch in '{token}': expected {expected}, found {found}")]
    FamilyMismatch {
        token: String,
        expected: AddressFamily,
        found: AddressFamily,
    },
}

impl TokenError {
    pub fn malformed(token: &str, reason: impl Into<String>) -> TokenError {
        TokenError::MalformedToken {
            token: token.to_string(),
            reason: reason.into(),
        }
    }

    pub fn invalid(token: &str, reason: impl Into<String>) -> TokenError {
        TokenError::InvalidRange {
            token: token.to_string(),
            reason: reason.into(),
        }
    }
}

/// Syntactic reading of a token, before any range arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedToken {
    Single(IpAddr),
    Cidr(IpAddr, u8),
    Span(IpAddr, IpAddr),
}

impl ParsedToken {
    /// Read a textual token into one of the three accepted forms.
    pub fn parse(text: &str) -> Result<ParsedToken, TokenError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(TokenError::malformed(text, "empty token"));
        }

        if let Some((addr, len)) = trimmed.split_once('/') {
            let addr = parse_addr(text, addr)?;
            let len = len.trim();
            let len: u8 = if len.contains('.') {
                netmask_prefix(text, &addr, len)?
            } else {
                len.parse()
                    .map_err(|_| TokenError::malformed(text, format!("invalid prefix length '{len}'")))?
            };
            return Ok(ParsedToken::Cidr(addr, len));
        }

        if let Some((start, end)) = trimmed.split_once('-') {
            let start = parse_addr(text, start)?;
            let end = parse_addr(text, end)?;
            return Ok(ParsedToken::Span(start, end));
        }

        Ok(ParsedToken::Single(parse_addr(text, trimmed)?))
    }

    /// Read an explicit start/end pair.
    pub fn parse_pair(start: &str, end: &str) -> Result<ParsedToken, TokenError> {
        let token = format!("{start}-{end}");
        Ok(ParsedToken::Span(
            parse_addr(&token, start)?,
            parse_addr(&token, end)?,
        ))
    }
}

fn parse_addr(token: &str, addr: &str) -> Result<IpAddr, TokenError> {
    addr.trim()
        .parse()
        .map_err(|_| TokenError::malformed(token, format!("invalid address '{}'", addr.trim())))
}

/// Prefix length of a dotted IPv4 netmask such as `255.255.254.0`.
fn netmask_prefix(token: &str, addr: &IpAddr, mask: &str) -> Result<u8, TokenError> {
    let mask: Ipv4Addr = mask
        .parse()
        .map_err(|_| TokenError::malformed(token, format!("invalid netmask '{mask}'")))?;
    if !addr.is_ipv4() {
        return Err(TokenError::FamilyMismatch {
            token: token.to_string(),
            expected: AddressFamily::of(addr),
            found: AddressFamily::Ipv4,
        });
    }
    let bits = u32::from(mask);
    let ones = bits.leading_ones();
    if ones + bits.trailing_zeros() != 32 {
        return Err(TokenError::invalid(token, format!("non-contiguous netmask {mask}")));
    }
    Ok(ones as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forms() {
        assert_eq!(
            ParsedToken::parse("10.0.0.1").unwrap(),
            ParsedToken::Single("10.0.0.1".parse().unwrap())
        );
        assert_eq!(
            ParsedToken::parse(" 10.0.0.0/8 ").unwrap(),
            ParsedToken::Cidr("10.0.0.0".parse().unwrap(), 8)
        );
        assert_eq!(
            ParsedToken::parse("2001:db8::1-2001:db8::ff").unwrap(),
            ParsedToken::Span(
                "2001:db8::1".parse().unwrap(),
                "2001:db8::ff".parse().unwrap()
            )
        );
    }

    #[test]
    fn test_parse_netmask() {
        assert_eq!(
            ParsedToken::parse("10.0.0.0/255.255.255.0").unwrap(),
            ParsedToken::Cidr("10.0.0.0".parse().unwrap(), 24)
        );
        assert_eq!(
            ParsedToken::parse("10.0.0.0/ 255.254.0.0").unwrap(),
            ParsedToken::Cidr("10.0.0.0".parse().unwrap(), 15)
        );
        assert_eq!(
            ParsedToken::parse("0.0.0.0/0.0.0.0").unwrap(),
            ParsedToken::Cidr("0.0.0.0".parse().unwrap(), 0)
        );
        assert_eq!(
            ParsedToken::parse("10.0.0.1/255.255.255.255").unwrap(),
            ParsedToken::Cidr("10.0.0.1".parse().unwrap(), 32)
        );
    }

    #[test]
    fn test_parse_netmask_rejects() {
        assert!(matches!(
            ParsedToken::parse("10.0.0.0/255.0.255.0"),
            Err(TokenError::InvalidRange { .. })
        ));
        assert!(matches!(
            ParsedToken::parse("10.0.0.0/0.0.0.255"),
            Err(TokenError::InvalidRange { .. })
        ));
        assert!(matches!(
            ParsedToken::parse("10.0.0.0/255.255.0"),
            Err(TokenError::MalformedToken { .. })
        ));
        assert!(matches!(
            ParsedToken::parse("2001:db8::/255.255.0.0"),
            Err(TokenError::FamilyMismatch { .. })
        ));
    }

    #[test]
    fn test_parse_malformed() {
        assert!(matches!(
            ParsedToken::parse("999.1.1.1"),
            Err(TokenError::MalformedToken { .. })
        ));
        assert!(matches!(
            ParsedToken::parse("10.0.0.0/abc"),
            Err(TokenError::MalformedToken { .. })
        ));
        assert!(matches!(
            ParsedToken::parse("   "),
            Err(TokenError::MalformedToken { .. })
        ));
        assert!(matches!(
            ParsedToken::parse("AS12345"),
            Err(TokenError::MalformedToken { .. })
        ));
    }

    #[test]
    fn test_error_messages() {
        let err = ParsedToken::parse("999.1.1.1").unwrap_err();
        assert_eq!(
            err.to_string(),
            "malformed token '999.1.1.1': invalid address '999.1.1.1'"
        );
        let err = TokenError::FamilyMismatch {
            token: "::1".to_string(),
            expected: AddressFamily::Ipv4,
            found: AddressFamily::Ipv6,
        };
        assert_eq!(
            err.to_string(),
            "family mismatch in '::1': expected IPv4, found IPv6"
        );
    }

    #[test]
    fn test_raw_token_display() {
        assert_eq!(RawToken::from(("10.0.0.1", "10.0.0.9")).display(), "10.0.0.1-10.0.0.9");
        assert_eq!(RawToken::from("10.0.0.0/8").display(), "10.0.0.0/8");
    }
}
