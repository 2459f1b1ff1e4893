//! CIDR block, the unit produced by the decomposer.

use super::address::{host_mask, Address};
use crate::error::CidrError;
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// An aligned block of `2^(width - prefix)` addresses starting at `base`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CidrBlock {
    base: Address,
    prefix: u8,
}

impl CidrBlock {
    /// Create the `/prefix` block containing `addr`.
    ///
    /// The base is always aligned, so `10.0.0.42/24` becomes `10.0.0.0/24`.
    pub fn new(addr: Address, prefix: u8) -> Result<CidrBlock, CidrError> {
        let base = addr.prefix_floor(prefix)?;
        Ok(CidrBlock { base, prefix })
    }

    /// A `/32` or `/128` block holding only `addr`.
    pub fn host(addr: Address) -> CidrBlock {
        CidrBlock {
            base: addr,
            prefix: addr.width(),
        }
    }

    /// Parse `<address>/<prefix>` text; a missing prefix means a host block.
    pub fn parse(text: &str) -> Result<CidrBlock, CidrError> {
        let text = text.trim();
        match text.split_once('/') {
            Some((addr, prefix)) => {
                let addr = Address::parse(addr)?;
                let prefix = parse_prefix(prefix, addr.width())?;
                CidrBlock::new(addr, prefix)
            }
            None => Address::parse(text).map(CidrBlock::host),
        }
    }

    /// Lowest address of the block.
    pub fn base(&self) -> Address {
        self.base
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    /// Highest address of the block.
    pub fn last(&self) -> Address {
        // prefix was validated on construction
        self.base.prefix_ceil(self.prefix).unwrap_or(self.base)
    }

    /// Number of addresses in the block, `None` for the whole IPv6 space.
    pub fn size(&self) -> Option<u128> {
        let host_bits = u32::from(self.base.width() - self.prefix);
        1u128.checked_shl(host_bits)
    }

    /// Check whether `addr` lies inside the block.
    pub fn contains(&self, addr: &Address) -> bool {
        addr.version() == self.base.version()
            && host_mask(self.base.width(), self.prefix)
                .map(|mask| addr.to_bits() & !mask == self.base.to_bits())
                .unwrap_or(false)
    }
}

/// Parse a CIDR suffix and check it against the address width.
pub(crate) fn parse_prefix(text: &str, width: u8) -> Result<u8, CidrError> {
    let invalid = || CidrError::InvalidPrefixLength(format!("/{text}"));
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    match text.parse::<u8>() {
        Ok(prefix) if prefix <= width => Ok(prefix),
        _ => Err(invalid()),
    }
}

impl fmt::Display for CidrBlock {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.prefix)
    }
}

impl FromStr for CidrBlock {
    type Err = CidrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CidrBlock::parse(s)
    }
}

impl Serialize for CidrBlock {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for CidrBlock {
    fn deserialize<D>(deserializer: D) -> Result<CidrBlock, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        CidrBlock::parse(&s).map_err(|e| de::Error::custom(format!("invalid CIDR {s}: {e}")))
    }
}
