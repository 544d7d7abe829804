//! Domain models for range consolidation.
//!
//! This module contains the core data structures used throughout the application:
//! - [`AddressFamily`] - IPv4/IPv6 and the bit helpers shared by both
//! - [`Range`] - validated inclusive address range
//! - [`CidrBlock`] - aligned block, the output unit
//! - [`RawToken`] and [`TokenError`] - unvalidated input and its rejections

mod cidr;
mod family;
mod range;
mod token;

// Re-export public types
pub use cidr::CidrBlock;
pub use family::{addr_to_u128, block_end, host_mask, lo_prefix, AddressFamily};
pub use range::Range;
pub use token::{ParsedToken, RawToken, TokenError};
