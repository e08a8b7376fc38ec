//! Roster export formats.
//!
//! # Responsibility
//! - Render the collection as CSV through a swappable quoting dialect.
//! - Name and write export files.

pub mod csv;
