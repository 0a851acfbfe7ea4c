//! Test utilities for Rollcall services.
//!
//! Import from `[dev-dependencies]` only.

pub mod auth;
