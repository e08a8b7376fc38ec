//! Substring search over the in-memory roster.
//!
//! # Responsibility
//! - Decide whether a record matches a free-text query.
//! - Expose lazy, restartable match sequences.

pub mod filter;
