//! Front-end facing use-case services.
//!
//! # Responsibility
//! - Translate form submissions and button actions into store calls.
//! - Produce the short notices a front end shows after each action.

pub mod record_service;
