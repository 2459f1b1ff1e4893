//! CSV output formatting for CIDR blocks.

use crate::models::CidrBlock;
use colored::Colorize;

use super::terminal::format_field;

const CNT_WIDTH: usize = 6;
const CIDR_WIDTH: usize = 46;
const ADDR_WIDTH: usize = 42;
const SIZE_WIDTH: usize = 10;

/// Render blocks as CSV, one row per block with its first and last address.
///
/// # Arguments
/// * `blocks` - The CIDR blocks to print
/// * `range_count` - Number of input ranges, reported in the trailing note
pub fn render_csv(blocks: &[CidrBlock], range_count: usize) -> String {
    log::info!("#Start render_csv() {} blocks", blocks.len());

    let mut out = String::new();
    out.push_str(&csv_header());
    out.push('\n');

    for (i, block) in blocks.iter().enumerate() {
        out.push_str(&csv_row(i + 1, block));
        out.push('\n');
    }

    out.push_str(&format!(
        "#{}# {} blocks from {} ranges\n",
        "NOTE".on_blue(),
        blocks.len(),
        range_count
    ));
    out
}

fn csv_header() -> String {
    format!(
        "{},{},{},{},{}",
        format_field("cnt", CNT_WIDTH),
        format_field("cidr", CIDR_WIDTH),
        format_field("first", ADDR_WIDTH),
        format_field("last", ADDR_WIDTH),
        format_field("size", SIZE_WIDTH),
    )
}

/// Format a single CSV row.
fn csv_row(j: usize, block: &CidrBlock) -> String {
    let size = match block.size() {
        Some(size) => size.to_string(),
        None => "2^128".to_string(),
    };
    format!(
        r#"{j},{cidr},{first},{last},{size}"#,
        j = format_field(j, CNT_WIDTH),
        cidr = format_field(block, CIDR_WIDTH),
        first = format_field(block.base(), ADDR_WIDTH),
        last = format_field(block.last(), ADDR_WIDTH),
        size = format_field(size, SIZE_WIDTH),
    )
}
