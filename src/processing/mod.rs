//! Range processing logic.
//!
//! This module contains the algorithms working on the models:
//! - `parser` - Range notation parsing
//! - `decompose` - Range to minimal CIDR list
//! - `collection` - Compaction and gap finding over many ranges

mod collection;
mod decompose;
mod parser;

// Re-export public functions
pub use collection::RangeCollection;
pub use decompose::decompose;
pub use parser::parse_range;
