//! Output formatting for CIDR blocks.
//!
//! This module handles formatting and outputting decomposition results:
//! - [`csv`] - CSV output formatting
//! - [`json`] - JSON report
//! - [`terminal`] - Plain terminal output

mod csv;
mod json;
mod terminal;

use crate::config::OutputFormat;
use crate::models::CidrBlock;
use crate::processing::RangeCollection;
use std::error::Error;

pub use csv::render_csv;
pub use json::{render_json, CidrReport};
pub use terminal::{format_field, render_plain};

/// Render `blocks` computed from `ranges` in the requested format.
pub fn render(
    format: OutputFormat,
    ranges: &RangeCollection,
    blocks: &[CidrBlock],
) -> Result<String, Box<dyn Error>> {
    match format {
        OutputFormat::Plain => Ok(render_plain(blocks)),
        OutputFormat::Csv => Ok(render_csv(blocks, ranges.len())),
        OutputFormat::Json => render_json(ranges, blocks),
    }
}
