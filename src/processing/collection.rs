//! Collections of ranges: compaction, gap finding and decomposition.

use super::decompose::decompose;
use super::parser::parse_range;
use crate::error::CidrError;
use crate::models::{CidrBlock, IpRange};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// An owned list of ranges, possibly overlapping and of mixed families.
///
/// IPv4 and IPv6 ranges never merge with each other; wherever ranges are
/// ordered, all IPv4 ranges come before all IPv6 ranges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RangeCollection {
    ranges: Vec<IpRange>,
}

impl RangeCollection {
    pub fn new() -> RangeCollection {
        RangeCollection::default()
    }

    /// Parse every text with [`parse_range`], stopping at the first error.
    pub fn parse_all<I, S>(texts: I) -> Result<RangeCollection, CidrError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        texts
            .into_iter()
            .map(|text| parse_range(text.as_ref()))
            .collect()
    }

    /// Add a range. Overlaps are only resolved by [`RangeCollection::compact`].
    pub fn add(&mut self, range: IpRange) {
        self.ranges.push(range);
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn ranges(&self) -> &[IpRange] {
        &self.ranges
    }

    pub fn iter(&self) -> std::slice::Iter<'_, IpRange> {
        self.ranges.iter()
    }

    /// Merge overlapping and adjacent ranges of the same family.
    ///
    /// The result is sorted by lower bound and no two of its ranges overlap
    /// or touch.
    pub fn compact(&self) -> RangeCollection {
        let ranges: Vec<IpRange> = self
            .ranges
            .iter()
            .copied()
            .sorted_by_key(IpRange::sort_key)
            .coalesce(|a, b| {
                if a.touches(&b) {
                    Ok(a.merge(&b))
                } else {
                    Err((a, b))
                }
            })
            .collect();

        log::debug!("compact(): {} ranges -> {}", self.ranges.len(), ranges.len());
        RangeCollection { ranges }
    }

    /// Address intervals lying between the compacted ranges of each family.
    pub fn gaps(&self) -> Result<RangeCollection, CidrError> {
        let compacted = self.compact();
        let mut gaps = RangeCollection::new();

        for (below, above) in compacted.ranges.iter().tuple_windows() {
            if below.version() != above.version() {
                continue;
            }
            let gap = IpRange::new(below.upper().successor()?, above.lower().predecessor()?)?;
            log::trace!("gap {gap} between {below} and {above}");
            gaps.add(gap);
        }
        Ok(gaps)
    }

    /// Decompose every range, in ascending order, into CIDR blocks.
    ///
    /// Ranges are not merged first; call [`RangeCollection::compact`] for the
    /// minimal representation of the whole collection.
    pub fn to_cidr(&self) -> Result<Vec<CidrBlock>, CidrError> {
        let mut blocks = Vec::new();
        for range in self.ranges.iter().sorted_by_key(|range| range.sort_key()) {
            blocks.extend(decompose(range)?);
        }
        Ok(blocks)
    }

    /// [`RangeCollection::to_cidr`] rendered as `<address>/<prefix>` strings.
    pub fn to_cidr_strings(&self) -> Result<Vec<String>, CidrError> {
        Ok(self.to_cidr()?.iter().map(|block| block.to_string()).collect())
    }
}

impl FromIterator<IpRange> for RangeCollection {
    fn from_iter<T: IntoIterator<Item = IpRange>>(iter: T) -> Self {
        RangeCollection {
            ranges: iter.into_iter().collect(),
        }
    }
}

impl Extend<IpRange> for RangeCollection {
    fn extend<T: IntoIterator<Item = IpRange>>(&mut self, iter: T) {
        self.ranges.extend(iter);
    }
}

impl<'a> IntoIterator for &'a RangeCollection {
    type Item = &'a IpRange;
    type IntoIter = std::slice::Iter<'a, IpRange>;

    fn into_iter(self) -> Self::IntoIter {
        self.ranges.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection(texts: &[&str]) -> RangeCollection {
        RangeCollection::parse_all(texts).expect("Error parsing ranges")
    }

    #[test]
    fn test_to_cidr_without_compaction() {
        let ranges = collection(&["132.230.25.128-132.230.25.255"]);
        assert_eq!(ranges.to_cidr_strings().unwrap(), vec!["132.230.25.128/25"]);

        let ranges = collection(&["132.230.25.0-132.230.25.127", "132.230.25.128-132.230.25.255"]);
        assert_eq!(
            ranges.to_cidr_strings().unwrap(),
            vec!["132.230.25.0/25", "132.230.25.128/25"]
        );
    }

    #[test]
    fn test_compact() {
        let tests: [(&[&str], &[&str]); 7] = [
            (
                &["132.230.25.0-132.230.25.127", "132.230.25.128-132.230.25.255"],
                &["132.230.25.0/24"],
            ),
            (
                &["132.230.25.0-132.230.25.127", "132.230.26.0-132.230.26.127"],
                &["132.230.25.0/25", "132.230.26.0/25"],
            ),
            (
                &[
                    "132.230.25.0-132.230.25.127",
                    "132.230.26.0-132.230.26.127",
                    "132.230.25.*",
                ],
                &["132.230.25.0/24", "132.230.26.0/25"],
            ),
            (
                &[
                    "132.230.25.0-132.230.25.127",
                    "132.230.26.0-132.230.26.127",
                    "132.230.30.0-132.230.30.127",
                ],
                &["132.230.25.0/25", "132.230.26.0/25", "132.230.30.0/25"],
            ),
            (
                &[
                    "132.230.25.0-132.230.25.127",
                    "132.230.26.128-132.230.26.255",
                    "132.230.30.0-132.230.30.127",
                ],
                &["132.230.25.0/25", "132.230.26.128/25", "132.230.30.0/25"],
            ),
            (
                &[
                    "132.230.25.0-132.230.25.127",
                    "132.230.26.128-132.230.26.255",
                    "132.230.30.0-132.230.30.128",
                ],
                &["132.230.25.0/25", "132.230.26.128/25", "132.230.30.0/25", "132.230.30.128/32"],
            ),
            (
                &[
                    "132.230.25.0-132.230.25.127",
                    "132.230.26.128-132.230.26.255",
                    "132.230.30.0-132.230.30.130",
                ],
                &[
                    "132.230.25.0/25",
                    "132.230.26.128/25",
                    "132.230.30.0/25",
                    "132.230.30.128/31",
                    "132.230.30.130/32",
                ],
            ),
        ];

        for (input, expected) in tests {
            let compacted = collection(input).compact();
            assert_eq!(compacted.to_cidr_strings().unwrap(), expected, "compact({input:?})");
        }
    }

    #[test]
    fn test_compact_chain_and_order() {
        let ranges = collection(&["10.0.0.20-30", "10.0.0.0-9", "10.0.0.10-19", "10.0.0.25-40"]);
        let compacted = ranges.compact();
        assert_eq!(compacted.len(), 1);
        assert_eq!(compacted.ranges()[0].to_string(), "10.0.0.0-10.0.0.40");
    }

    #[test]
    fn test_compact_keeps_families_apart() {
        let ranges = collection(&[
            "0:0:0:0:0:0:0:0/96",
            "10.0.0.0/8",
            "0:0:0:0:0:0:1:0/112",
            "11.0.0.0/8",
        ]);
        let compacted = ranges.compact();
        assert_eq!(
            compacted.to_cidr_strings().unwrap(),
            vec![
                "10.0.0.0/7",
                "0000:0000:0000:0000:0000:0000:0000:0000/96"
            ]
        );
    }

    #[test]
    fn test_compact_is_idempotent() {
        let ranges = collection(&["10.0.0.0/25", "10.0.0.64/26", "10.0.1.0/24", "10.0.3.7"]);
        let once = ranges.compact();
        assert_eq!(once.compact(), once);
        assert_eq!(once.len(), 3);
    }

    #[test]
    fn test_compact_keeps_known_prefix_of_untouched_range() {
        let compacted = collection(&["10.0.0.0/24", "10.0.2.0/24"]).compact();
        assert_eq!(compacted.ranges()[0].prefix(), Some(24));
        assert_eq!(compacted.ranges()[1].prefix(), Some(24));
    }

    #[test]
    fn test_gaps() {
        let ranges = collection(&["10.0.0.0/24", "10.0.2.0/24", "10.0.3.0-10.0.3.9", "10.0.3.20"]);
        let gaps = ranges.gaps().unwrap();
        let gaps: Vec<String> = gaps.iter().map(|gap| gap.to_string()).collect();
        assert_eq!(gaps, vec!["10.0.1.0-10.0.1.255", "10.0.3.10-10.0.3.19"]);

        let ranges = collection(&["10.0.0.0/24", "0:0:0:0:0:0:0:1"]);
        assert!(ranges.gaps().unwrap().is_empty());
    }

    #[test]
    fn test_serde() {
        let ranges = collection(&["132.230.25.*", "10.0.0.1"]);
        let json = serde_json::to_string(&ranges).unwrap();
        assert_eq!(json, r#"["132.230.25.0-132.230.25.255","10.0.0.1-10.0.0.1"]"#);
        let back: RangeCollection = serde_json::from_str(&json).unwrap();
        assert_eq!(back.compact(), ranges.compact());
    }
}
