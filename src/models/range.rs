//! Inclusive address range.

use super::address::{Address, IpVersion};
use super::cidr::CidrBlock;
use crate::error::CidrError;
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Inclusive interval `[lower, upper]` of addresses from one family.
///
/// Ranges parsed from `/n` notation remember the prefix so they can be
/// reported as a single block without decomposing them again.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct IpRange {
    lower: Address,
    upper: Address,
    prefix: Option<u8>,
}

impl IpRange {
    /// Create a range, failing on mixed families or `lower > upper`.
    pub fn new(lower: Address, upper: Address) -> Result<IpRange, CidrError> {
        match lower.compare(&upper) {
            Ok(Ordering::Greater) => Err(CidrError::InvalidRange(format!(
                "lower bound {lower} is above upper bound {upper}"
            ))),
            Ok(_) => Ok(IpRange {
                lower,
                upper,
                prefix: None,
            }),
            Err(_) => Err(CidrError::InvalidRange(format!(
                "{lower} and {upper} are of different address families"
            ))),
        }
    }

    /// The range covered by the `/prefix` block containing `addr`.
    pub fn from_cidr(addr: Address, prefix: u8) -> Result<IpRange, CidrError> {
        Ok(IpRange {
            lower: addr.prefix_floor(prefix)?,
            upper: addr.prefix_ceil(prefix)?,
            prefix: Some(prefix),
        })
    }

    /// Parse any supported notation, see [`crate::processing::parse_range`].
    pub fn parse(text: &str) -> Result<IpRange, CidrError> {
        crate::processing::parse_range(text)
    }

    pub fn lower(&self) -> Address {
        self.lower
    }

    pub fn upper(&self) -> Address {
        self.upper
    }

    /// Prefix length remembered from `/n` notation.
    pub fn prefix(&self) -> Option<u8> {
        self.prefix
    }

    pub fn version(&self) -> IpVersion {
        self.lower.version()
    }

    /// Check whether `addr` lies inside the range.
    pub fn contains(&self, addr: &Address) -> bool {
        self.lower <= *addr && *addr <= self.upper
    }

    /// The single block this range was parsed from, if its bounds still match it exactly.
    pub fn exact_block(&self) -> Option<CidrBlock> {
        let prefix = self.prefix?;
        let block = CidrBlock::new(self.lower, prefix).ok()?;
        (block.base() == self.lower && block.last() == self.upper).then_some(block)
    }

    /// True when `other` overlaps this range or starts right after it.
    ///
    /// Assumes `self.lower <= other.lower`, as in a sorted list.
    pub(crate) fn touches(&self, other: &IpRange) -> bool {
        self.version() == other.version()
            && other.lower.to_bits() <= self.upper.to_bits().saturating_add(1)
    }

    /// Smallest range covering both `self` and `other` (same family).
    pub(crate) fn merge(&self, other: &IpRange) -> IpRange {
        if other.lower == self.lower && other.upper == self.upper {
            return *self;
        }
        let lower = if other.lower < self.lower { other.lower } else { self.lower };
        let upper = if other.upper > self.upper { other.upper } else { self.upper };
        IpRange {
            lower,
            upper,
            prefix: None,
        }
    }

    /// Sort key placing all IPv4 ranges before IPv6 ranges.
    pub(crate) fn sort_key(&self) -> (IpVersion, u128, u128) {
        (self.version(), self.lower.to_bits(), self.upper.to_bits())
    }

    /// Minimal CIDR cover of the range.
    pub fn to_cidr(&self) -> Result<Vec<CidrBlock>, CidrError> {
        crate::processing::decompose(self)
    }

    /// Minimal CIDR cover rendered as `<address>/<prefix>` strings.
    ///
    /// # Examples
    /// ```
    /// use ip_range_cidr::models::IpRange;
    /// let range = IpRange::parse("132.230.25.0-128").unwrap();
    /// assert_eq!(
    ///     range.to_cidr_strings().unwrap(),
    ///     vec!["132.230.25.0/25", "132.230.25.128/32"]
    /// );
    /// ```
    pub fn to_cidr_strings(&self) -> Result<Vec<String>, CidrError> {
        Ok(self.to_cidr()?.iter().map(|block| block.to_string()).collect())
    }
}

impl fmt::Display for IpRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{}", self.lower, self.upper)
    }
}

impl FromStr for IpRange {
    type Err = CidrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IpRange::parse(s)
    }
}

impl From<CidrBlock> for IpRange {
    fn from(block: CidrBlock) -> Self {
        IpRange {
            lower: block.base(),
            upper: block.last(),
            prefix: Some(block.prefix()),
        }
    }
}

/// Ranges that are still exactly their `/n` block serialize in CIDR form so
/// the prefix survives a round trip.
impl Serialize for IpRange {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        match self.exact_block() {
            Some(block) => serializer.serialize_str(&block.to_string()),
            None => serializer.serialize_str(&self.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for IpRange {
    fn deserialize<D>(deserializer: D) -> Result<IpRange, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        IpRange::parse(&s).map_err(|e| de::Error::custom(format!("invalid range {s}: {e}")))
    }
}
