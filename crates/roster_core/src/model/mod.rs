//! Domain model for the employee roster.
//!
//! # Responsibility
//! - Define the record shape shared by storage, search and export.
//! - Define the raw form input accepted from front ends.
//!
//! # Invariants
//! - Every field of a record is display text; no numeric coercion happens here.
//! - Record order is insertion order and carries no other meaning.

pub mod employee;
