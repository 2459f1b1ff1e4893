//! IPv4 and IPv6 addresses as plain integer values.
//!
//! Provides [`Address`] together with the prefix arithmetic used by the range
//! parser and the CIDR decomposer.

use crate::error::CidrError;
use itertools::Itertools;
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

/// Number of bits in an IPv4 address.
pub const IPV4_BITS: u8 = 32;
/// Number of bits in an IPv6 address.
pub const IPV6_BITS: u8 = 128;

/// Address family.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IpVersion {
    /// 32-bit addresses.
    V4,
    /// 128-bit addresses.
    V6,
}

impl IpVersion {
    /// Width of an address of this family in bits.
    pub fn width(self) -> u8 {
        match self {
            IpVersion::V4 => IPV4_BITS,
            IpVersion::V6 => IPV6_BITS,
        }
    }

    /// Highest integer value an address of this family can hold.
    pub fn max_bits(self) -> u128 {
        match self {
            IpVersion::V4 => u32::MAX as u128,
            IpVersion::V6 => u128::MAX,
        }
    }
}

impl fmt::Display for IpVersion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IpVersion::V4 => f.write_str("v4"),
            IpVersion::V6 => f.write_str("v6"),
        }
    }
}

/// Mask covering the host part of a `/prefix` block in a `width`-bit address.
///
/// # Examples
/// ```
/// use ip_range_cidr::models::host_mask;
/// assert_eq!(host_mask(32, 24).unwrap(), 0xFF);
/// assert_eq!(host_mask(128, 0).unwrap(), u128::MAX);
/// ```
pub fn host_mask(width: u8, prefix: u8) -> Result<u128, CidrError> {
    if prefix > width {
        return Err(CidrError::InvalidPrefixLength(format!(
            "/{prefix} is longer than {width} bits"
        )));
    }
    let host_bits = u32::from(width - prefix);
    if host_bits >= u128::BITS {
        Ok(u128::MAX)
    } else {
        Ok((1u128 << host_bits) - 1)
    }
}

/// An IPv4 or IPv6 address.
///
/// Ordering is only defined between addresses of the same family:
/// [`Address::compare`] fails with [`CidrError::TypeMismatch`] and
/// `partial_cmp` returns `None` when the families differ.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Address {
    /// IPv4 address.
    V4(Ipv4Addr),
    /// IPv6 address.
    V6(Ipv6Addr),
}

impl Address {
    /// Parse dotted-decimal IPv4 or full eight-group IPv6 text.
    ///
    /// # Examples
    /// ```
    /// use ip_range_cidr::models::Address;
    /// let addr = Address::parse("132.230.25.150").unwrap();
    /// assert_eq!(addr.to_bits(), 2229672342);
    /// ```
    pub fn parse(text: &str) -> Result<Address, CidrError> {
        if text.contains(':') {
            parse_v6(text).map(Address::V6)
        } else if text.contains('.') {
            parse_v4(text).map(Address::V4)
        } else {
            Err(CidrError::InvalidAddress(text.to_string()))
        }
    }

    /// Build an address of the given family from its integer value.
    pub fn from_bits(version: IpVersion, bits: u128) -> Result<Address, CidrError> {
        match version {
            IpVersion::V4 => u32::try_from(bits)
                .map(|bits| Address::V4(Ipv4Addr::from(bits)))
                .map_err(|_| CidrError::InvalidAddress(format!("{bits} does not fit in 32 bits"))),
            IpVersion::V6 => Ok(Address::V6(Ipv6Addr::from(bits))),
        }
    }

    /// Integer value of the address.
    pub fn to_bits(&self) -> u128 {
        match self {
            Address::V4(addr) => u32::from(*addr) as u128,
            Address::V6(addr) => u128::from(*addr),
        }
    }

    pub fn version(&self) -> IpVersion {
        match self {
            Address::V4(_) => IpVersion::V4,
            Address::V6(_) => IpVersion::V6,
        }
    }

    /// Width of the address in bits (32 or 128).
    pub fn width(&self) -> u8 {
        self.version().width()
    }

    /// Compare two addresses of the same family.
    pub fn compare(&self, other: &Address) -> Result<Ordering, CidrError> {
        match (self, other) {
            (Address::V4(a), Address::V4(b)) => Ok(a.cmp(b)),
            (Address::V6(a), Address::V6(b)) => Ok(a.cmp(b)),
            _ => Err(CidrError::TypeMismatch),
        }
    }

    /// The next address, failing at the top of the address space.
    pub fn successor(&self) -> Result<Address, CidrError> {
        let bits = self.to_bits();
        if bits == self.version().max_bits() {
            return Err(CidrError::AddressOverflow(format!("no address after {self}")));
        }
        Ok(self.with_bits(bits + 1))
    }

    /// The previous address, failing at the bottom of the address space.
    pub fn predecessor(&self) -> Result<Address, CidrError> {
        match self.to_bits().checked_sub(1) {
            Some(bits) => Ok(self.with_bits(bits)),
            None => Err(CidrError::AddressOverflow(format!("no address before {self}"))),
        }
    }

    /// Lowest address of the `/prefix` block containing `self`.
    pub fn prefix_floor(&self, prefix: u8) -> Result<Address, CidrError> {
        let mask = host_mask(self.width(), prefix)?;
        Ok(self.with_bits(self.to_bits() & !mask))
    }

    /// Highest address of the `/prefix` block containing `self`.
    pub fn prefix_ceil(&self, prefix: u8) -> Result<Address, CidrError> {
        let mask = host_mask(self.width(), prefix)?;
        Ok(self.with_bits(self.to_bits() | mask))
    }

    /// Canonical text form, see the [`fmt::Display`] impl.
    pub fn format(&self) -> String {
        self.to_string()
    }

    // `bits` must already fit the family of `self`.
    fn with_bits(&self, bits: u128) -> Address {
        match self {
            Address::V4(_) => Address::V4(Ipv4Addr::from(bits as u32)),
            Address::V6(_) => Address::V6(Ipv6Addr::from(bits)),
        }
    }
}

fn parse_v4(text: &str) -> Result<Ipv4Addr, CidrError> {
    let invalid = || CidrError::InvalidAddress(text.to_string());

    let octets: Vec<&str> = text.split('.').collect();
    if octets.len() != 4 {
        return Err(invalid());
    }

    let mut bytes = [0u8; 4];
    for (byte, octet) in bytes.iter_mut().zip(&octets) {
        if octet.is_empty() || !octet.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        *byte = octet.parse().map_err(|_| invalid())?;
    }
    Ok(Ipv4Addr::from(bytes))
}

fn parse_v6(text: &str) -> Result<Ipv6Addr, CidrError> {
    let invalid = || CidrError::InvalidAddress(text.to_string());

    let groups: Vec<&str> = text.split(':').collect();
    if groups.len() != 8 {
        return Err(invalid());
    }

    let mut segments = [0u16; 8];
    for (segment, group) in segments.iter_mut().zip(&groups) {
        if group.is_empty() || group.len() > 4 || !group.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        *segment = u16::from_str_radix(group, 16).map_err(|_| invalid())?;
    }
    Ok(Ipv6Addr::from(segments))
}

impl FromStr for Address {
    type Err = CidrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::parse(s)
    }
}

impl PartialOrd for Address {
    fn partial_cmp(&self, other: &Address) -> Option<Ordering> {
        self.compare(other).ok()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Address::V4(addr) => write!(f, "{addr}"),
            // Eight zero-padded groups, never compressed.
            Address::V6(addr) => write!(
                f,
                "{}",
                addr.segments()
                    .iter()
                    .map(|segment| format!("{segment:04x}"))
                    .join(":")
            ),
        }
    }
}

impl From<Ipv4Addr> for Address {
    fn from(addr: Ipv4Addr) -> Self {
        Address::V4(addr)
    }
}

impl From<Ipv6Addr> for Address {
    fn from(addr: Ipv6Addr) -> Self {
        Address::V6(addr)
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Address, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Address::parse(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(text: &str) -> Address {
        Address::parse(text).unwrap()
    }

    #[test]
    fn test_host_mask() {
        assert_eq!(host_mask(32, 0).unwrap(), 0xFFFFFFFF);
        assert_eq!(host_mask(32, 8).unwrap(), 0x00FFFFFF);
        assert_eq!(host_mask(32, 24).unwrap(), 0xFF);
        assert_eq!(host_mask(32, 32).unwrap(), 0);
        assert_eq!(host_mask(128, 0).unwrap(), u128::MAX);
        assert_eq!(host_mask(128, 64).unwrap(), u64::MAX as u128);
        assert!(host_mask(32, 33).is_err());
        assert!(host_mask(128, 129).is_err());
    }

    #[test]
    fn test_parse_ipv4() {
        assert_eq!(addr("132.230.25.150").to_bits(), 2229672342);
        assert_eq!(addr("0.0.0.0").to_bits(), 0);
        assert_eq!(addr("255.255.255.255").to_bits(), 4294967295);
        assert_eq!(addr("192.168.002.10").to_string(), "192.168.2.10");
        assert_eq!(addr("132.230.25.150").version(), IpVersion::V4);
    }

    #[test]
    fn test_parse_ipv4_invalid() {
        for text in [
            "", "1", "1.2.3", "1.2.3.4.5", "1..2.3", "256.0.0.1", "1.2.3.f", "-1.2.3.4", "+1.2.3.4",
            "1.2.3.*",
        ] {
            assert_eq!(
                Address::parse(text),
                Err(CidrError::InvalidAddress(text.to_string())),
                "'{text}' should not parse"
            );
        }
    }

    #[test]
    fn test_parse_ipv6() {
        let a = addr("2001:4860:4860:0:0:0:0:88ff");
        assert_eq!(a.version(), IpVersion::V6);
        assert_eq!(a.to_bits(), 0x2001_4860_4860_0000_0000_0000_0000_88ff);
        assert_eq!(a.to_string(), "2001:4860:4860:0000:0000:0000:0000:88ff");
        assert_eq!(
            addr("ABCD:0:0:0:0:0:0:1").to_string(),
            "abcd:0000:0000:0000:0000:0000:0000:0001"
        );
    }

    #[test]
    fn test_parse_ipv6_invalid() {
        for text in [
            "2001:4860::88ff",
            "2001:4860:4860:0:0:0:0",
            "2001:4860:4860:0:0:0:0:0:1",
            "2001:4860:4860:0:0:0:0:*",
            "12345:0:0:0:0:0:0:0",
            "g:0:0:0:0:0:0:0",
            "::ffff:1.2.3.4",
        ] {
            assert!(Address::parse(text).is_err(), "'{text}' should not parse");
        }
    }

    #[test]
    fn test_from_bits() {
        assert_eq!(Address::from_bits(IpVersion::V4, 222).unwrap().to_string(), "0.0.0.222");
        assert_eq!(Address::from_bits(IpVersion::V4, 256).unwrap().to_string(), "0.0.1.0");
        assert_eq!(
            Address::from_bits(IpVersion::V4, 2229672342).unwrap().to_string(),
            "132.230.25.150"
        );
        assert_eq!(
            Address::from_bits(IpVersion::V4, 4294967295).unwrap().to_string(),
            "255.255.255.255"
        );
        assert!(Address::from_bits(IpVersion::V4, 4294967296).is_err());
        assert_eq!(
            Address::from_bits(IpVersion::V6, 1).unwrap().to_string(),
            "0000:0000:0000:0000:0000:0000:0000:0001"
        );
    }

    #[test]
    fn test_prefix_floor() {
        let ip = addr("192.168.1.42");
        assert_eq!(ip.prefix_floor(24).unwrap(), addr("192.168.1.0"));
        assert_eq!(ip.prefix_floor(16).unwrap(), addr("192.168.0.0"));
        assert_eq!(ip.prefix_floor(8).unwrap(), addr("192.0.0.0"));
        assert_eq!(ip.prefix_floor(32).unwrap(), ip);
        assert_eq!(ip.prefix_floor(0).unwrap(), addr("0.0.0.0"));
        assert!(matches!(ip.prefix_floor(33), Err(CidrError::InvalidPrefixLength(_))));
    }

    #[test]
    fn test_prefix_ceil() {
        let ip = addr("192.168.1.0");
        assert_eq!(ip.prefix_ceil(24).unwrap(), addr("192.168.1.255"));
        assert_eq!(ip.prefix_ceil(16).unwrap(), addr("192.168.255.255"));
        assert_eq!(ip.prefix_ceil(8).unwrap(), addr("192.255.255.255"));
        assert_eq!(ip.prefix_ceil(32).unwrap(), ip);
        assert_eq!(ip.prefix_ceil(0).unwrap(), addr("255.255.255.255"));

        let ip = addr("4001:4860:4860:0:0:0:0:88ff");
        assert_eq!(
            ip.prefix_floor(2).unwrap().to_string(),
            "4000:0000:0000:0000:0000:0000:0000:0000"
        );
        assert_eq!(
            ip.prefix_ceil(2).unwrap().to_string(),
            "7fff:ffff:ffff:ffff:ffff:ffff:ffff:ffff"
        );
        assert_eq!(ip.prefix_ceil(0).unwrap().to_bits(), u128::MAX);
        assert!(ip.prefix_ceil(129).is_err());
    }

    #[test]
    fn test_successor_predecessor() {
        assert_eq!(addr("10.0.0.255").successor().unwrap(), addr("10.0.1.0"));
        assert_eq!(addr("10.0.1.0").predecessor().unwrap(), addr("10.0.0.255"));
        assert!(matches!(
            addr("255.255.255.255").successor(),
            Err(CidrError::AddressOverflow(_))
        ));
        assert!(matches!(addr("0.0.0.0").predecessor(), Err(CidrError::AddressOverflow(_))));

        let top = Address::from_bits(IpVersion::V6, u128::MAX).unwrap();
        assert!(top.successor().is_err());
        assert_eq!(top.predecessor().unwrap().to_bits(), u128::MAX - 1);
    }

    #[test]
    fn test_compare() {
        let ip1 = addr("10.0.0.1");
        let ip2 = addr("10.0.0.2");
        let ip6 = addr("0:0:0:0:0:0:0:1");

        assert_eq!(ip1.compare(&ip2), Ok(Ordering::Less));
        assert_eq!(ip2.compare(&ip1), Ok(Ordering::Greater));
        assert_eq!(ip1.compare(&ip1), Ok(Ordering::Equal));
        assert!(ip1 < ip2);
        assert_eq!(ip1.compare(&ip6), Err(CidrError::TypeMismatch));
        assert_eq!(ip1.partial_cmp(&ip6), None);
        assert!(!(ip1 < ip6) && !(ip1 > ip6));
    }

    #[test]
    fn test_serde_roundtrip() {
        let ip = addr("2001:4860:4860:0:0:0:0:88ff");
        let json = serde_json::to_string(&ip).unwrap();
        assert_eq!(json, "\"2001:4860:4860:0000:0000:0000:0000:88ff\"");
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ip);
        assert!(serde_json::from_str::<Address>("\"1.2.3\"").is_err());
    }

    #[test]
    fn test_version_display() {
        assert_eq!(IpVersion::V4.to_string(), "v4");
        assert_eq!(IpVersion::V6.to_string(), "v6");
        assert_eq!(IpVersion::V4.width(), 32);
        assert_eq!(IpVersion::V6.width(), 128);
    }
}
