//! Interval to CIDR decomposition.
//!
//! Splits an inclusive address range into the minimal list of aligned prefix
//! blocks covering it exactly.

use crate::error::CidrError;
use crate::models::{Address, CidrBlock, IpRange};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Decompose `range` into the minimal ascending list of CIDR blocks.
///
/// Every address of the range is covered by exactly one block and no block
/// reaches outside the range.
///
/// # Examples
/// ```
/// use ip_range_cidr::models::IpRange;
/// use ip_range_cidr::processing::decompose;
/// let range = IpRange::parse("63.0.0.0-255.255.255.255").unwrap();
/// let blocks: Vec<String> = decompose(&range).unwrap().iter().map(|b| b.to_string()).collect();
/// assert_eq!(blocks, vec!["63.0.0.0/8", "64.0.0.0/2", "128.0.0.0/1"]);
/// ```
pub fn decompose(range: &IpRange) -> Result<Vec<CidrBlock>, CidrError> {
    if let Some(block) = range.exact_block() {
        log::trace!("decompose({range}) is exactly {block}");
        return Ok(vec![block]);
    }

    // Keyed by base so the result comes out ascending whatever order the
    // worklist is drained in.
    let mut blocks: BTreeMap<u128, CidrBlock> = BTreeMap::new();
    let mut pending = vec![(range.lower(), range.upper())];

    while let Some((lower, upper)) = pending.pop() {
        let block = find_biggest_block(lower, upper)?;
        log::trace!("{lower}-{upper}: take {block}");

        if block.base() != lower {
            pending.push((lower, block.base().predecessor()?));
        }
        if block.last() != upper {
            pending.push((block.last().successor()?, upper));
        }
        blocks.insert(block.base().to_bits(), block);
    }

    log::debug!("decompose({range}) -> {} blocks", blocks.len());
    Ok(blocks.into_values().collect())
}

/// Find the widest aligned block lying inside `[lower, upper]` that touches one of its ends.
///
/// Prefix lengths are tried from `/0` down to the host route. At each length the
/// block containing `upper` is checked first and the block containing `lower`
/// overrides it when both fit. The host route of `lower` always fits, so the
/// search cannot come up empty.
fn find_biggest_block(lower: Address, upper: Address) -> Result<CidrBlock, CidrError> {
    for prefix in 0..lower.width() {
        let mut found = None;

        let high = CidrBlock::new(upper, prefix)?;
        if fits(&high, &lower, &upper)? {
            found = Some(high);
        }
        let low = CidrBlock::new(lower, prefix)?;
        if fits(&low, &lower, &upper)? {
            found = Some(low);
        }

        if let Some(block) = found {
            return Ok(block);
        }
    }
    Ok(CidrBlock::host(lower))
}

fn fits(block: &CidrBlock, lower: &Address, upper: &Address) -> Result<bool, CidrError> {
    Ok(block.base().compare(lower)? != Ordering::Less
        && block.last().compare(upper)? != Ordering::Greater)
}
