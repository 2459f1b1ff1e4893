//! Error type shared by the address, range and decomposition code.

use thiserror::Error;

/// Errors raised while parsing or operating on addresses and ranges.
///
/// Every variant carries the offending input (or a short description of it)
/// so callers can report it without keeping the original text around.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CidrError {
    /// Text is not a well-formed IPv4 or IPv6 address.
    #[error("invalid IP address: {0}")]
    InvalidAddress(String),
    /// Unparseable range text, reversed bounds or mixed address families.
    #[error("invalid IP range: {0}")]
    InvalidRange(String),
    /// A wildcard range is missing its trailing `*` or has a wildcard in the wrong place.
    #[error("invalid block notation: {0}")]
    InvalidBlock(String),
    /// Prefix length is not a number or is larger than the address width.
    #[error("invalid prefix length: {0}")]
    InvalidPrefixLength(String),
    /// A wildcard block is not numeric or outside `0..=255`.
    #[error("invalid block number: {0}")]
    NumberFormat(String),
    /// Successor of the highest or predecessor of the lowest address.
    #[error("address overflow: {0}")]
    AddressOverflow(String),
    /// An IPv4 address was mixed with an IPv6 address.
    #[error("cannot mix IPv4 and IPv6 addresses")]
    TypeMismatch,
}
