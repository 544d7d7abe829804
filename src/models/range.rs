//! Inclusive address range of a single family.

use super::family::{block_end, AddressFamily};
use super::CidrBlock;
use std::fmt;

/// Inclusive `[start, end]` span of addresses within one family.
///
/// Only constructible through [`Range::new`], which guarantees
/// `start <= end <= family.max_address()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    family: AddressFamily,
    start: u128,
    end: u128,
}

impl Range {
    /// Build a range, or `None` when `start > end` or `end` lies outside the
    /// family's address space.
    pub fn new(family: AddressFamily, start: u128, end: u128) -> Option<Range> {
        if start > end || end > family.max_address() {
            return None;
        }
        Some(Range { family, start, end })
    }

    /// Range holding exactly one address.
    pub fn single(family: AddressFamily, addr: u128) -> Option<Range> {
        Range::new(family, addr, addr)
    }

    pub fn family(&self) -> AddressFamily {
        self.family
    }

    pub fn start(&self) -> u128 {
        self.start
    }

    pub fn end(&self) -> u128 {
        self.end
    }

    /// True when `other` overlaps this range or starts right after it.
    ///
    /// Expects `other.start() >= self.start()` (sorted input). A range ending
    /// on the family's last address touches anything that follows it, since
    /// nothing can start beyond that address.
    pub fn touches(&self, other: &Range) -> bool {
        if self.family != other.family {
            return false;
        }
        match self.end.checked_add(1) {
            Some(next) => other.start <= next,
            None => true,
        }
    }

    /// Smallest range covering both `self` and `other`.
    ///
    /// Only meaningful when the two ranges touch.
    pub fn merge(self, other: Range) -> Range {
        Range {
            family: self.family,
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl From<CidrBlock> for Range {
    fn from(block: CidrBlock) -> Self {
        Range {
            family: block.family(),
            start: block.base(),
            end: block_end(block.family(), block.base(), block.prefix_len()),
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.family.to_ip(self.start),
            self.family.to_ip(self.end)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_inverted_and_out_of_space() {
        assert!(Range::new(AddressFamily::Ipv4, 10, 9).is_none());
        assert!(Range::new(AddressFamily::Ipv4, 0, 1 << 32).is_none());
        assert!(Range::new(AddressFamily::Ipv4, 0, u32::MAX as u128).is_some());
        assert!(Range::new(AddressFamily::Ipv6, 0, u128::MAX).is_some());
    }

    #[test]
    fn test_touches_adjacent_and_gap() {
        let a = Range::new(AddressFamily::Ipv4, 0, 255).unwrap();
        let adjacent = Range::new(AddressFamily::Ipv4, 256, 511).unwrap();
        let gap = Range::new(AddressFamily::Ipv4, 257, 511).unwrap();
        assert!(a.touches(&adjacent));
        assert!(!a.touches(&gap));
    }

    #[test]
    fn test_touches_at_top_of_space() {
        let top = Range::new(AddressFamily::Ipv6, u128::MAX - 1, u128::MAX).unwrap();
        let last = Range::single(AddressFamily::Ipv6, u128::MAX).unwrap();
        assert!(top.touches(&last));
    }

    #[test]
    fn test_touches_never_crosses_family() {
        let v4 = Range::new(AddressFamily::Ipv4, 0, 10).unwrap();
        let v6 = Range::new(AddressFamily::Ipv6, 5, 10).unwrap();
        assert!(!v4.touches(&v6));
    }

    #[test]
    fn test_merge_and_display() {
        let a = Range::new(AddressFamily::Ipv4, 0x0A00_0000, 0x0A00_00FF).unwrap();
        let b = Range::new(AddressFamily::Ipv4, 0x0A00_0080, 0x0A00_01FF).unwrap();
        assert_eq!(a.merge(b).to_string(), "10.0.0.0-10.0.1.255");
    }
}
