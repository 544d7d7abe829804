//! CIDR block of either family.
//!
//! Provides [`CidrBlock`], the output unit of consolidation, together with
//! its `base/prefixLength` string form.

use super::family::{addr_to_u128, block_end, host_mask, AddressFamily};
use super::token::{ParsedToken, TokenError};
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

/// Aligned block of `2^(bits - prefix_len)` addresses.
///
/// Ordering is by family, then base address, then prefix length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CidrBlock {
    family: AddressFamily,
    base: u128,
    prefix_len: u8,
}

impl CidrBlock {
    /// Build a block, or `None` when the prefix is too long for the family,
    /// the base lies outside the family, or the base is not aligned.
    pub fn new(family: AddressFamily, base: u128, prefix_len: u8) -> Option<CidrBlock> {
        if prefix_len > family.bits() || base > family.max_address() {
            return None;
        }
        if base & host_mask(family, prefix_len) != 0 {
            return None;
        }
        Some(CidrBlock {
            family,
            base,
            prefix_len,
        })
    }

    /// Build a block whose alignment the caller has already established.
    pub(crate) fn aligned(family: AddressFamily, base: u128, prefix_len: u8) -> CidrBlock {
        debug_assert!(
            CidrBlock::new(family, base, prefix_len).is_some(),
            "{base:#x}/{prefix_len} is not an aligned {family} block"
        );
        CidrBlock {
            family,
            base,
            prefix_len,
        }
    }

    pub fn family(&self) -> AddressFamily {
        self.family
    }

    /// First address as a number.
    pub fn base(&self) -> u128 {
        self.base
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// Last address as a number.
    pub fn last(&self) -> u128 {
        block_end(self.family, self.base, self.prefix_len)
    }

    /// Network address.
    pub fn lo(&self) -> IpAddr {
        self.family.to_ip(self.base)
    }

    pub fn overlaps(&self, other: &CidrBlock) -> bool {
        self.family == other.family && self.base <= other.last() && other.base <= self.last()
    }

    /// The other half of this block's parent, or `None` for a /0.
    pub fn sibling(&self) -> Option<CidrBlock> {
        if self.prefix_len == 0 {
            return None;
        }
        let split_bit = host_mask(self.family, self.prefix_len) + 1;
        Some(CidrBlock {
            family: self.family,
            base: self.base ^ split_bit,
            prefix_len: self.prefix_len,
        })
    }
}

impl FromStr for CidrBlock {
    type Err = TokenError;

    /// Parse `base/prefixLength`; the base must be the block's network address.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match ParsedToken::parse(s)? {
            ParsedToken::Cidr(addr, prefix_len) => {
                let family = AddressFamily::of(&addr);
                if prefix_len > family.bits() {
                    return Err(TokenError::invalid(
                        s,
                        format!("prefix length /{prefix_len} exceeds {} bits", family.bits()),
                    ));
                }
                CidrBlock::new(family, addr_to_u128(&addr), prefix_len)
                    .ok_or_else(|| TokenError::invalid(s, "host bits set"))
            }
            _ => Err(TokenError::malformed(s, "expected base/prefixLength")),
        }
    }
}

impl fmt::Display for CidrBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.lo(), self.prefix_len)
    }
}

impl Serialize for CidrBlock {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CidrBlock {
    fn deserialize<D>(deserializer: D) -> Result<CidrBlock, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        CidrBlock::from_str(&s).map_err(de::Error::custom)
    }
}
