//! Address families and the bit helpers shared by both of them.
//!
//! Addresses of either family are carried as `u128` so the same arithmetic
//! covers the 32-bit and the 128-bit space. Nothing here ever computes a
//! block span directly (a /0 IPv6 span does not fit in `u128`); blocks are
//! described by their host mask instead.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// IPv4 or IPv6 address space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AddressFamily {
    Ipv4,
    Ipv6,
}

impl AddressFamily {
    /// Address width in bits.
    pub const fn bits(self) -> u8 {
        match self {
            AddressFamily::Ipv4 => 32,
            AddressFamily::Ipv6 => 128,
        }
    }

    /// Highest address of the family.
    pub const fn max_address(self) -> u128 {
        match self {
            AddressFamily::Ipv4 => u32::MAX as u128,
            AddressFamily::Ipv6 => u128::MAX,
        }
    }

    /// Family of a parsed address.
    pub fn of(addr: &IpAddr) -> AddressFamily {
        match addr {
            IpAddr::V4(_) => AddressFamily::Ipv4,
            IpAddr::V6(_) => AddressFamily::Ipv6,
        }
    }

    /// Render a numeric address of this family.
    ///
    /// IPv4 values above `u32::MAX` are truncated; callers only pass values
    /// that came out of a validated `Range` or `CidrBlock`.
    pub fn to_ip(self, value: u128) -> IpAddr {
        match self {
            AddressFamily::Ipv4 => IpAddr::V4(Ipv4Addr::from(value as u32)),
            AddressFamily::Ipv6 => IpAddr::V6(Ipv6Addr::from(value)),
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressFamily::Ipv4 => write!(f, "IPv4"),
            AddressFamily::Ipv6 => write!(f, "IPv6"),
        }
    }
}

/// Numeric value of an address.
pub fn addr_to_u128(addr: &IpAddr) -> u128 {
    match addr {
        IpAddr::V4(v4) => u32::from(*v4) as u128,
        IpAddr::V6(v6) => u128::from(*v6),
    }
}

/// Mask of the host bits of a `/prefix_len` block, i.e. span - 1.
///
/// `prefix_len` must not exceed the family width.
pub fn host_mask(family: AddressFamily, prefix_len: u8) -> u128 {
    let host_bits = (family.bits() - prefix_len) as u32;
    if host_bits == 0 {
        0
    } else {
        u128::MAX >> (128 - host_bits)
    }
}

/// Last address of the `/prefix_len` block starting at `base`.
pub fn block_end(family: AddressFamily, base: u128, prefix_len: u8) -> u128 {
    base | host_mask(family, prefix_len)
}

/// Smallest prefix length for which `addr` is a valid network address.
///
/// Counts trailing zero bits, capped at the family width so that address 0
/// yields a /0.
pub fn lo_prefix(family: AddressFamily, addr: u128) -> u8 {
    let trailing_zeros = addr.trailing_zeros().min(family.bits() as u32) as u8;
    family.bits() - trailing_zeros
}
