//! Domain models for address ranges.
//!
//! This module contains the value types used throughout the crate:
//! - [`Address`] - IPv4 or IPv6 address with prefix arithmetic
//! - [`IpRange`] - inclusive range of addresses from one family
//! - [`CidrBlock`] - aligned prefix block produced by decomposition

mod address;
mod cidr;
mod range;

// Re-export public types
pub use address::{host_mask, Address, IpVersion, IPV4_BITS, IPV6_BITS};
pub(crate) use cidr::parse_prefix;
pub use cidr::CidrBlock;
pub use range::IpRange;
