//! IP range to CIDR conversion.
//!
//! Parses IPv4/IPv6 ranges written as CIDR blocks, dash intervals, IPv4
//! wildcards or single addresses, merges them, and decomposes them into the
//! smallest list of CIDR blocks covering exactly the same addresses.
//!
//! # Modules
//! - [`models`] - Addresses, CIDR blocks and ranges
//! - [`processing`] - Parsing, decomposition and collections
//! - [`output`] - Plain, CSV and JSON rendering
//! - [`config`] - Environment based settings
//! - [`error`] - Error kinds

pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod processing;

use std::error::Error;
use std::io::BufRead;

// Re-export commonly used types
pub use error::CidrError;
pub use models::{Address, CidrBlock, IpRange, IpVersion};
pub use processing::{decompose, parse_range, RangeCollection};

/// Parse `texts`, optionally compact them, and decompose the result.
///
/// Returns the ranges that were decomposed together with their blocks.
pub fn ranges_to_cidr<I, S>(
    texts: I,
    compact: bool,
) -> Result<(RangeCollection, Vec<CidrBlock>), Box<dyn Error>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut ranges = RangeCollection::new();
    for text in texts {
        let text = text.as_ref();
        let range = parse_range(text).map_err(|e| format!("Error parsing '{text}': {e}"))?;
        log::debug!("parsed '{text}' -> {range}");
        ranges.add(range);
    }

    if compact {
        ranges = ranges.compact();
    }
    let blocks = ranges.to_cidr()?;
    log::info!("{} ranges -> {} CIDR blocks", ranges.len(), blocks.len());
    Ok((ranges, blocks))
}

/// Read one range per line, skipping blank lines and `#` comments.
pub fn read_range_lines<R: BufRead>(reader: R) -> Result<Vec<String>, Box<dyn Error>> {
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        lines.push(line.to_string());
    }
    Ok(lines)
}
