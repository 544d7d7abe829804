//! Splitting a range into maximal aligned CIDR blocks.

use crate::models::{block_end, lo_prefix, AddressFamily, CidrBlock, Range};

/// Cover `range` exactly with the fewest aligned blocks.
///
/// # Arguments
/// * `range` - Inclusive range of one family
///
/// # Returns
/// Blocks in ascending order, each as large as alignment and `range` allow
pub fn decompose_range(range: &Range) -> Vec<CidrBlock> {
    let family = range.family();
    let end = range.end();
    let mut start = range.start();
    let mut blocks = Vec::new();

    loop {
        let prefix_len = find_biggest_block(family, start, end);
        let block_last = block_end(family, start, prefix_len);
        blocks.push(CidrBlock::aligned(family, start, prefix_len));
        if block_last >= end {
            break;
        }
        start = block_last + 1;
    }

    log::trace!("decompose_range({range}) -> {} blocks", blocks.len());
    blocks
}

/// Find the shortest prefix for a block starting at `start` that stays
/// within `end`.
///
/// The returned prefix length is constrained by:
/// 1. The alignment of `start` (trailing zero bits)
/// 2. The block must not extend past `end`
///
/// # Arguments
/// * `family` - Address family of both bounds
/// * `start` - First address of the block
/// * `end` - Last address the block may cover, `>= start`
///
/// # Returns
/// The prefix length of the biggest block that satisfies both constraints
pub fn find_biggest_block(family: AddressFamily, start: u128, end: u128) -> u8 {
    debug_assert!(start <= end, "start[{start:#x}] > end[{end:#x}]");
    let span = end - start;
    // Largest power of two not above span + 1; span == MAX is the whole IPv6 space.
    let size_prefix = match span.checked_add(1) {
        Some(count) => family.bits() - (127 - count.leading_zeros()) as u8,
        None => 0,
    };
    let prefix_len = lo_prefix(family, start).max(size_prefix);
    debug_assert!(
        prefix_len <= family.bits(),
        "prefix_len[{prefix_len}] > {} should never happen.",
        family.bits()
    );
    prefix_len
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::addr_to_u128;

    fn ip(s: &str) -> u128 {
        addr_to_u128(&s.parse().unwrap())
    }

    fn strings(blocks: &[CidrBlock]) -> Vec<String> {
        blocks.iter().map(|b| b.to_string()).collect()
    }

    #[test]
    fn test_find_biggest_block() {
        let v4 = AddressFamily::Ipv4;
        assert_eq!(24, find_biggest_block(v4, ip("10.0.0.0"), ip("10.0.0.255")));
        assert_eq!(23, find_biggest_block(v4, ip("10.0.0.0"), ip("10.0.1.255")));
        // 10.0.0.0 up to just before 10.11.16.0
        assert_eq!(13, find_biggest_block(v4, ip("10.0.0.0"), ip("10.11.15.255")));
        // 10.11.12.0 has 10 trailing zeros but only 4 /24s fit
        assert_eq!(22, find_biggest_block(v4, ip("10.11.12.0"), ip("10.11.15.255")));
        assert_eq!(0, find_biggest_block(v4, 0, v4.max_address()));
    }

    #[test]
    fn test_find_biggest_block_alignment() {
        // 10.6.2.80 ends in 0101_0000, so it can be at most a /28
        let start = ip("10.6.2.80");
        let prefix_len = find_biggest_block(AddressFamily::Ipv4, start, ip("10.6.7.255"));
        assert_eq!(28, prefix_len, "10.6.2.80 can only be /28 or smaller due to alignment");
    }

    #[test]
    fn test_find_biggest_block_ipv6() {
        let v6 = AddressFamily::Ipv6;
        assert_eq!(0, find_biggest_block(v6, 0, u128::MAX));
        assert_eq!(128, find_biggest_block(v6, u128::MAX, u128::MAX));
        assert_eq!(
            32,
            find_biggest_block(v6, ip("2001:db8::"), ip("2001:db8:ffff:ffff:ffff:ffff:ffff:ffff"))
        );
    }

    #[test]
    fn test_decompose_clean_block() {
        let range = Range::new(AddressFamily::Ipv4, ip("192.168.0.0"), ip("192.168.1.255")).unwrap();
        assert_eq!(strings(&decompose_range(&range)), vec!["192.168.0.0/23"]);
    }

    #[test]
    fn test_decompose_unaligned() {
        let range = Range::new(AddressFamily::Ipv4, ip("10.0.0.1"), ip("10.0.0.10")).unwrap();
        assert_eq!(
            strings(&decompose_range(&range)),
            vec!["10.0.0.1/32", "10.0.0.2/31", "10.0.0.4/30", "10.0.0.8/31", "10.0.0.10/32"]
        );
    }

    #[test]
    fn test_decompose_whole_spaces() {
        let v4 = Range::new(AddressFamily::Ipv4, 0, AddressFamily::Ipv4.max_address()).unwrap();
        assert_eq!(strings(&decompose_range(&v4)), vec!["0.0.0.0/0"]);
        let v6 = Range::new(AddressFamily::Ipv6, 1, u128::MAX).unwrap();
        let blocks = decompose_range(&v6);
        assert_eq!(blocks.len(), 128);
        assert_eq!(blocks[0].to_string(), "::1/128");
        assert_eq!(blocks[127].to_string(), "8000::/1");
    }

    #[test]
    fn test_find_biggest_block_size_bound() {
        let v6 = AddressFamily::Ipv6;
        // one address short of the whole space: aligned at 0 but only /1 fits
        assert_eq!(1, find_biggest_block(v6, 0, u128::MAX - 1));
        assert_eq!(2, find_biggest_block(v6, 1 << 126, u128::MAX - 1));
        let v4 = AddressFamily::Ipv4;
        assert_eq!(1, find_biggest_block(v4, 0, v4.max_address() - 1));
        assert_eq!(32, find_biggest_block(v4, 0, 0));
        assert_eq!(31, find_biggest_block(v4, 0, 2));
    }

    #[test]
    fn test_decompose_all_but_last_ipv6() {
        let range = Range::new(AddressFamily::Ipv6, 0, u128::MAX - 1).unwrap();
        let blocks = decompose_range(&range);
        assert_eq!(blocks.len(), 128);
        assert_eq!(blocks[0].to_string(), "::/1");
        assert_eq!(blocks[1].to_string(), "8000::/2");
        assert_eq!(blocks[127].to_string(), "ffff:ffff:ffff:ffff:ffff:ffff:ffff:fffe/128");
    }
}
