//! JSON report output.

use crate::models::CidrBlock;
use crate::processing::RangeCollection;
use serde::Serialize;
use std::error::Error;

/// Input ranges next to the CIDR blocks computed from them.
#[derive(Serialize, Debug)]
pub struct CidrReport<'a> {
    /// Ranges as they were decomposed (after compaction, if enabled).
    pub ranges: &'a RangeCollection,
    /// Resulting blocks in ascending order.
    pub cidrs: &'a [CidrBlock],
}

/// Render a pretty printed JSON report.
pub fn render_json(
    ranges: &RangeCollection,
    blocks: &[CidrBlock],
) -> Result<String, Box<dyn Error>> {
    let report = CidrReport {
        ranges,
        cidrs: blocks,
    };
    let json =
        serde_json::to_string_pretty(&report).map_err(|e| format!("Error serializing JSON: {e}"))?;
    Ok(json)
}
