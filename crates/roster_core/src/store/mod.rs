//! Record store: the single owner of the employee collection.
//!
//! # Responsibility
//! - Keep the in-memory collection and its persisted slot in lockstep.
//! - Enforce duplicate-id checks on create (and on update when configured).
//!
//! # Invariants
//! - After any operation returns, the slot holds exactly the in-memory list.
//! - A failed operation leaves both the list and the slot untouched.

pub mod record_store;
