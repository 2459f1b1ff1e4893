//! Range notation parser.
//!
//! Accepted notations, tried in this order:
//! - CIDR: `132.230.25.0/24`, `2001:4860:4860:0:0:0:0:88ff/128`
//! - dash interval: `132.230.25.10-132.230.26.37`, or `132.230.10.17-210` with a bare last octet
//! - IPv4 wildcard blocks: `132.230.*`, `132.230.25.*`, `132.230.23-55.*`
//! - single address: `132.230.25.150`

use crate::error::CidrError;
use crate::models::{parse_prefix, Address, IpRange};
use lazy_static::lazy_static;
use regex::Regex;
use std::net::Ipv4Addr;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("Invalid Regex?");
    static ref CIDR_NOTATION: Regex =
        Regex::new(r"^(?P<addr>[^/]*)/(?P<prefix>[^/]*)$").expect("Invalid Regex?");
    static ref DASH_NOTATION: Regex =
        Regex::new(r"^(?P<left>[^-]+)-(?P<right>[^-]+)$").expect("Invalid Regex?");
    static ref SHORT_UPPER: Regex = Regex::new(r"^[0-9]{1,3}$").expect("Invalid Regex?");
    static ref WILDCARD_BLOCK: Regex =
        Regex::new(r"^(?:\*|(?P<low>[0-9]+)-(?P<high>[0-9]+)|(?P<value>[0-9]+))$")
            .expect("Invalid Regex?");
}

/// Parse range text in any supported notation.
///
/// All whitespace is removed first, so `"132.230.25.0 - 132.230.25.255"` is accepted.
///
/// # Examples
/// ```
/// use ip_range_cidr::processing::parse_range;
/// let range = parse_range("132.230.*").unwrap();
/// assert_eq!(range.to_string(), "132.230.0.0-132.230.255.255");
/// ```
pub fn parse_range(text: &str) -> Result<IpRange, CidrError> {
    let text = WHITESPACE.replace_all(text, "");
    let text = text.as_ref();
    log::trace!("parse_range({text})");

    if text.contains('/') {
        return parse_cidr(text);
    }
    if let Some(range) = parse_dash(text)? {
        return Ok(range);
    }
    // A dash interval missing one of its bounds.
    if text.starts_with('-') || text.ends_with('-') {
        return Err(CidrError::InvalidRange(text.to_string()));
    }
    if text.contains('.') && !text.contains(':') {
        return parse_wildcard(text);
    }

    Address::parse(text)
        .and_then(|addr| IpRange::new(addr, addr))
        .map_err(|_| CidrError::InvalidRange(text.to_string()))
}

/// `address/prefix`
fn parse_cidr(text: &str) -> Result<IpRange, CidrError> {
    let caps = CIDR_NOTATION
        .captures(text)
        .ok_or_else(|| CidrError::InvalidRange(text.to_string()))?;

    let addr = Address::parse(&caps["addr"])?;
    let prefix = parse_prefix(&caps["prefix"], addr.width())?;
    IpRange::from_cidr(addr, prefix)
}

/// `left-right`, or `None` when `left` is not a complete address.
fn parse_dash(text: &str) -> Result<Option<IpRange>, CidrError> {
    let Some(caps) = DASH_NOTATION.captures(text) else {
        return Ok(None);
    };
    let Ok(lower) = Address::parse(&caps["left"]) else {
        return Ok(None);
    };

    let right = &caps["right"];
    let upper = match (Address::parse(right), lower) {
        (Ok(upper), _) => upper,
        (Err(_), Address::V4(lower)) if SHORT_UPPER.is_match(right) => {
            let [a, b, c, _] = lower.octets();
            let last: u8 = right
                .parse()
                .map_err(|_| CidrError::InvalidAddress(format!("{a}.{b}.{c}.{right}")))?;
            Address::V4(Ipv4Addr::new(a, b, c, last))
        }
        (Err(_), Address::V6(_)) if SHORT_UPPER.is_match(right) => {
            return Err(CidrError::InvalidRange(format!(
                "{text}: short upper bounds are only supported for IPv4"
            )));
        }
        (Err(e), _) => return Err(e),
    };

    IpRange::new(lower, upper).map(Some)
}

/// Dotted IPv4 blocks where the trailing blocks may be `*` or `low-high`.
fn parse_wildcard(text: &str) -> Result<IpRange, CidrError> {
    let (body, dangling) = match text.strip_suffix('.') {
        Some(body) => (body, true),
        None => (text, false),
    };

    let mut blocks: Vec<&str> = body.split('.').collect();
    match (blocks.len(), dangling) {
        (4, false) => {}
        (3, false) if blocks[2] == "*" => blocks.push("*"),
        (3, _) => return Err(CidrError::InvalidBlock(text.to_string())),
        _ => return Err(CidrError::InvalidRange(text.to_string())),
    }

    let mut lower = [0u8; 4];
    let mut upper = [0u8; 4];
    let mut spread = false;
    for (i, block) in blocks.iter().enumerate() {
        // The network part is always literal.
        if i < 2 {
            let value = parse_octet(block)?;
            lower[i] = value;
            upper[i] = value;
            continue;
        }

        let (low, high) = parse_block(block)?;
        if spread && *block != "*" {
            return Err(CidrError::InvalidBlock(text.to_string()));
        }
        spread |= low != high;
        lower[i] = low;
        upper[i] = high;
    }

    log::trace!("wildcard {text} -> {:?}..{:?}", lower, upper);
    IpRange::new(
        Address::V4(Ipv4Addr::from(lower)),
        Address::V4(Ipv4Addr::from(upper)),
    )
}

/// Low and high value of a single wildcard block.
fn parse_block(block: &str) -> Result<(u8, u8), CidrError> {
    let caps = WILDCARD_BLOCK
        .captures(block)
        .ok_or_else(|| CidrError::NumberFormat(block.to_string()))?;

    if let (Some(low), Some(high)) = (caps.name("low"), caps.name("high")) {
        let low = parse_octet(low.as_str())?;
        let high = parse_octet(high.as_str())?;
        if low >= high {
            return Err(CidrError::NumberFormat(block.to_string()));
        }
        return Ok((low, high));
    }
    match caps.name("value") {
        Some(value) => parse_octet(value.as_str()).map(|value| (value, value)),
        None => Ok((0, 255)),
    }
}

fn parse_octet(text: &str) -> Result<u8, CidrError> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CidrError::NumberFormat(text.to_string()));
    }
    text.parse()
        .map_err(|_| CidrError::NumberFormat(text.to_string()))
}
